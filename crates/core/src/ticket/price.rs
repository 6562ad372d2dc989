//! Ticket price and gender tier types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a price value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    #[error("empty price")]
    Empty,

    #[error("invalid price: {0}")]
    Invalid(String),

    #[error("negative price: {0}")]
    Negative(String),
}

/// A ticket price, stored in cents.
///
/// Displays with two decimals (`"40.00"`) and serializes as that string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Create a price from cents.
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Create a price from whole units.
    pub const fn from_units(units: u64) -> Self {
        Self {
            cents: units.saturating_mul(100),
        }
    }

    /// Amount in cents.
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Build a price from a floating point amount, rounding to the cent.
    pub fn from_f64(amount: f64) -> Result<Self, PriceParseError> {
        if !amount.is_finite() {
            return Err(PriceParseError::Invalid(amount.to_string()));
        }
        if amount < 0.0 {
            return Err(PriceParseError::Negative(amount.to_string()));
        }
        if amount * 100.0 >= u64::MAX as f64 {
            return Err(PriceParseError::Invalid(amount.to_string()));
        }
        Ok(Self {
            cents: (amount * 100.0).round() as u64,
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    /// Accepts `40`, `40.00`, `40,00`, `40.5` and `R$ 40,00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches("R$").trim();
        if trimmed.is_empty() {
            return Err(PriceParseError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(PriceParseError::Negative(s.to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        let (units, fraction) = match normalized.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (normalized.as_str(), ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) || fraction.len() > 2 {
            return Err(PriceParseError::Invalid(s.to_string()));
        }

        let units: u64 = units
            .parse()
            .map_err(|_| PriceParseError::Invalid(s.to_string()))?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().unwrap_or(0) * 10,
            _ => fraction.parse::<u64>().unwrap_or(0),
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(|| PriceParseError::Invalid(s.to_string()))?;

        Ok(Self { cents })
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(n) => Price::from_f64(n),
            RawPrice::Text(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Error parsing a gender tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized gender tier: {0:?}")]
pub struct GenderParseError(pub String);

/// The two gender tiers an event prices tickets by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "male", alias = "m")]
    Masculino,
    #[serde(alias = "female", alias = "f")]
    Feminino,
}

impl Gender {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Masculino => "masculino",
            Gender::Feminino => "feminino",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = GenderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculino" | "male" | "m" => Ok(Gender::Masculino),
            "feminino" | "female" | "f" => Ok(Gender::Feminino),
            _ => Err(GenderParseError(s.to_string())),
        }
    }
}
