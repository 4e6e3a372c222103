//! # Bank Code Resolver
//!
//! Closed-world resolution of free-text bank names to canonical bank codes for
//! P2P payment routing.
//!
//! ## Features
//!
//! - **Exact and alias lookup**: O(1) lookups over normalized names and aliases
//! - **Fuzzy matching**: similarity scoring plus approximate substring search,
//!   tuned to reject rather than guess
//! - **Two precedence policies**: a loose "starts-with" policy and a strict
//!   fuzzy policy behind one resolver
//! - **Payment-type fallback**: structured payment-type codes mapped straight
//!   to bank codes
//! - **Payment instructions**: builds payment instructions from P2P orders and
//!   skips orders whose bank cannot be resolved
//!
//! A wrong match routes money to the wrong institution, so every lookup path
//! degrades to `None` when it is not confident.

pub mod catalog;
pub mod exact_match;
pub mod fuzzy_match;
pub mod normalize;
pub mod payment;
pub mod payment_methods;
pub mod prefix_index;
pub mod resolver;

pub use catalog::{AliasEntry, BankCatalog};
pub use fuzzy_match::{FuzzyOutcome, FuzzyThresholds};
pub use payment::{
    PayOrder, PaymentBatch, PaymentError, PaymentInstruction, PaymentInstructionBuilder,
    SkippedOrder,
};
pub use resolver::{BankResolver, PaymentTerm, Resolution, ResolverConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog construction errors
///
/// Lookups never fail; these are only raised while loading or validating a
/// catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid bank code: {0:?}")]
    InvalidBankCode(String),

    #[error("Alias key is not normalized: {0:?}")]
    UnnormalizedAlias(String),

    #[error("Duplicate alias: {0}")]
    DuplicateAlias(String),

    #[error("Duplicate payment type code: {0}")]
    DuplicatePaymentType(u32),

    #[error("Catalog contains no banks")]
    EmptyCatalog,

    #[error("Failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
}

/// Canonical institution code.
///
/// Always a string of 3 to 6 ASCII digits. Leading zeros are significant, so
/// there is deliberately no conversion from integer types and deserialization
/// only accepts JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BankCode(String);

impl BankCode {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 6;

    /// Parse and validate a bank code
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let trimmed = raw.trim();
        let valid_len = (Self::MIN_LEN..=Self::MAX_LEN).contains(&trimmed.len());
        if !valid_len || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CatalogError::InvalidBankCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BankCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for BankCode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BankCode {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BankCode> for String {
    fn from(code: BankCode) -> Self {
        code.0
    }
}

/// A bank known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankRecord {
    #[serde(rename = "BANK_NAME")]
    pub name: String,
    #[serde(rename = "BANK_CODE")]
    pub code: BankCode,
}

impl BankRecord {
    pub fn new(name: &str, code: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            name: name.to_string(),
            code: BankCode::parse(code)?,
        })
    }

    /// Export as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Numeric payment-type code mapped to a bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodEntry {
    pub name: String,
    #[serde(rename = "paymentTypeCode")]
    pub payment_type: u32,
    #[serde(rename = "bankCode")]
    pub bank_code: BankCode,
}

/// Precedence policy used by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrictness {
    /// Exact, unique starts-with, alias, then suffix-stripped alias
    Loose,
    /// Exact, prefix filter, generic-term filter, then fuzzy
    Strict,
}

impl fmt::Display for MatchStrictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrictness::Loose => write!(f, "loose"),
            MatchStrictness::Strict => write!(f, "strict"),
        }
    }
}

/// Stage that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    ExactName,
    Alias,
    StartsWith,
    SuffixStripped,
    Fuzzy,
    PaymentType,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::ExactName => write!(f, "exact_name"),
            MatchKind::Alias => write!(f, "alias"),
            MatchKind::StartsWith => write!(f, "starts_with"),
            MatchKind::SuffixStripped => write!(f, "suffix_stripped"),
            MatchKind::Fuzzy => write!(f, "fuzzy"),
            MatchKind::PaymentType => write!(f, "payment_type"),
        }
    }
}
