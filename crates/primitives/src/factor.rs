//! Benchmark factor and fund identifiers.

use std::borrow::Borrow;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Name of a benchmark factor in a basket.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub struct FactorName(pub String);

impl FactorName {
    /// Large-cap US equity.
    pub const SPX: &'static str = "SPX";
    /// Aggregate US bonds.
    pub const AGG: &'static str = "AGG";
    /// Treasury bills (cash).
    pub const TBILL: &'static str = "TBILL";
    /// Small-cap US equity.
    pub const RTY: &'static str = "RTY";
    /// International developed equity.
    pub const EAFE: &'static str = "EAFE";

    /// The standard five-factor benchmark universe.
    pub const STANDARD: [&'static str; 5] =
        [Self::AGG, Self::EAFE, Self::RTY, Self::SPX, Self::TBILL];

    /// Create a new factor name.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the factor name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FactorName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactorName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FactorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a fund: issuing company, product mnemonic and fund code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{company}/{mnemonic}/{code}")]
pub struct FundId {
    /// Issuing company number.
    pub company: u32,
    /// Product mnemonic.
    pub mnemonic: String,
    /// Internal fund code.
    pub code: u32,
}

impl FundId {
    /// Mnemonic used for pure NAV records.
    pub const BASE_NAV: &'static str = "BASENAV";

    /// Create a new fund identifier. A blank mnemonic means the base NAV.
    #[must_use]
    pub fn new(company: u32, mnemonic: impl Into<String>, code: u32) -> Self {
        let mnemonic = mnemonic.into();
        let mnemonic = if mnemonic.trim().is_empty() {
            Self::BASE_NAV.to_string()
        } else {
            mnemonic.trim().to_string()
        };
        Self { company, mnemonic, code }
    }

    /// Create an identifier for the base NAV of a fund.
    #[must_use]
    pub fn base_nav(company: u32, code: u32) -> Self {
        Self::new(company, Self::BASE_NAV, code)
    }
}
