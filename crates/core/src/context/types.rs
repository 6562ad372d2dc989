use serde::{Deserialize, Serialize};

/// Referral tokens carried through a flow.
///
/// These come from the page URL (`?promoter=...&birthday=...`) and travel
/// with the registration and with every payment status query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoter_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday_token: Option<String>,
}

impl ContextTokens {
    pub fn new(promoter_token: Option<String>, birthday_token: Option<String>) -> Self {
        Self {
            promoter_token,
            birthday_token,
        }
    }

    /// Parse tokens from a URL query string.
    ///
    /// Recognizes `promoter`/`promoter_token` and `birthday`/`birthday_token`.
    /// Empty values are treated as absent. A leading `?` is allowed.
    pub fn from_query(query: &str) -> Self {
        let mut tokens = Self::default();

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = decode(value);
            if value.is_empty() {
                continue;
            }
            match key {
                "promoter" | "promoter_token" => tokens.promoter_token = Some(value),
                "birthday" | "birthday_token" => tokens.birthday_token = Some(value),
                _ => {}
            }
        }

        tokens
    }

    pub fn is_empty(&self) -> bool {
        self.promoter_token.is_none() && self.birthday_token.is_none()
    }

    /// Query parameters for backend requests.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(token) = &self.promoter_token {
            pairs.push(("promoter_token", token.as_str()));
        }
        if let Some(token) = &self.birthday_token {
            pairs.push(("birthday_token", token.as_str()));
        }
        pairs
    }
}

fn decode(value: &str) -> String {
    let plus_decoded = value.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|v| v.into_owned())
        .unwrap_or(plus_decoded)
        .trim()
        .to_string()
}
