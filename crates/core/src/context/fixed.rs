use super::{ContextTokens, SessionContext};

/// Context with no referral tokens.
pub struct NoContext;

impl NoContext {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext for NoContext {
    fn tokens(&self) -> ContextTokens {
        ContextTokens::default()
    }

    fn source_name(&self) -> &'static str {
        "none"
    }
}

/// Context with tokens fixed at construction, typically parsed from the
/// page URL by the host.
pub struct StaticContext {
    tokens: ContextTokens,
}

impl StaticContext {
    pub fn new(tokens: ContextTokens) -> Self {
        Self { tokens }
    }

    pub fn from_query(query: &str) -> Self {
        Self::new(ContextTokens::from_query(query))
    }
}

impl SessionContext for StaticContext {
    fn tokens(&self) -> ContextTokens {
        self.tokens.clone()
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_context_is_empty() {
        let context = NoContext::new();
        assert!(context.tokens().is_empty());
        assert_eq!(context.source_name(), "none");
    }

    #[test]
    fn test_static_context_from_query() {
        let context = StaticContext::from_query("promoter=abc");
        assert_eq!(context.tokens().promoter_token.as_deref(), Some("abc"));
        assert_eq!(context.source_name(), "static");
    }
}
