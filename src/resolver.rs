//! Resolver facade
//!
//! One resolver, two precedence policies:
//!
//! - [`MatchStrictness::Loose`] (`find_bank_code`): exact name, unique
//!   starts-with on the first word, unique starts-with on the full phrase,
//!   alias, then alias after stripping corporate suffixes.
//! - [`MatchStrictness::Strict`] (`match_bank`): exact name or alias, prefix
//!   plausibility filter, generic-term filter, then the fuzzy pipeline.
//!
//! The policies are not interchangeable. Loose accepts any unique prefix and is
//! meant for operator-facing lookups; Strict is the one payment construction
//! relies on.

use crate::catalog::BankCatalog;
use crate::exact_match::{alias_table, name_table, ExactMatcher};
use crate::fuzzy_match::{is_generic_term, FuzzyMatcher, FuzzyThresholds};
use crate::normalize::{first_word, normalize, normalize_alias};
use crate::payment_methods::PaymentMethodTable;
use crate::prefix_index::PrefixIndex;
use crate::{BankRecord, CatalogError, MatchKind, MatchStrictness, PaymentMethodEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Length of the prefixes held by the prefix index
    pub prefix_len: usize,
    /// Shortest normalized text used for starts-with lookups
    pub min_starts_with_len: usize,
    pub fuzzy: FuzzyThresholds,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            prefix_len: 3,
            min_starts_with_len: 3,
            fuzzy: FuzzyThresholds::default(),
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A resolved bank and the stage that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub bank: BankRecord,
    pub kind: MatchKind,
}

impl Resolution {
    fn new(bank: &BankRecord, kind: MatchKind) -> Self {
        Self {
            bank: bank.clone(),
            kind,
        }
    }
}

/// Payment term as supplied by the counterparty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerm {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub payment_type: Option<u32>,
    #[serde(default)]
    pub account_no: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

/// Bank name resolver over an immutable catalog
#[derive(Debug, Clone)]
pub struct BankResolver {
    catalog: BankCatalog,
    config: ResolverConfig,
    exact: ExactMatcher,
    prefixes: PrefixIndex,
    fuzzy: FuzzyMatcher,
    payment_methods: PaymentMethodTable,
}

impl BankResolver {
    /// Create a resolver with default configuration
    pub fn new(catalog: BankCatalog) -> Self {
        Self::with_config(catalog, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration
    pub fn with_config(catalog: BankCatalog, config: ResolverConfig) -> Self {
        let names = name_table(&catalog);
        let aliases = alias_table(&catalog);
        let fuzzy = FuzzyMatcher::from_tables(&names, &aliases, config.fuzzy.clone());
        let exact = ExactMatcher::from_tables(names, &aliases);
        let prefixes = PrefixIndex::build(&catalog, config.prefix_len);
        let payment_methods = PaymentMethodTable::new(&catalog);

        debug!(
            banks = catalog.len(),
            aliases = aliases.len(),
            prefixes = prefixes.len(),
            fingerprint = %catalog.fingerprint(),
            "bank resolver initialized"
        );

        Self {
            catalog,
            config,
            exact,
            prefixes,
            fuzzy,
            payment_methods,
        }
    }

    /// Resolver over the bundled catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self::new(BankCatalog::builtin()?))
    }

    pub fn catalog(&self) -> &BankCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a free-text bank name under the given policy
    pub fn resolve(&self, input: &str, strictness: MatchStrictness) -> Option<Resolution> {
        let resolution = match strictness {
            MatchStrictness::Loose => self.resolve_loose(input),
            MatchStrictness::Strict => self.resolve_strict(input),
        };

        match &resolution {
            Some(found) => debug!(
                input,
                %strictness,
                code = %found.bank.code,
                kind = %found.kind,
                "bank resolved"
            ),
            None => debug!(input, %strictness, "bank not resolved"),
        }
        resolution
    }

    /// Loose policy, see the module docs
    pub fn find_bank_code(&self, input: &str) -> Option<BankRecord> {
        self.resolve(input, MatchStrictness::Loose)
            .map(|found| found.bank)
    }

    /// Strict policy, see the module docs
    pub fn match_bank(&self, input: &str) -> Option<BankRecord> {
        self.resolve(input, MatchStrictness::Strict)
            .map(|found| found.bank)
    }

    /// Resolve several names under one policy
    pub fn resolve_batch(
        &self,
        inputs: &[&str],
        strictness: MatchStrictness,
    ) -> Vec<Option<Resolution>> {
        inputs
            .iter()
            .map(|input| self.resolve(input, strictness))
            .collect()
    }

    /// Payment-method entry for a numeric payment-type code
    pub fn find_payment_method_by_type(&self, payment_type: u32) -> Option<&PaymentMethodEntry> {
        self.payment_methods.find_payment_method_by_type(payment_type)
    }

    /// Resolve the bank of a payment term.
    ///
    /// The bank name, then the branch name, go through the strict policy. The
    /// payment-type code is consulted only when the term carries no usable
    /// name at all: a name that fails to resolve is not overridden by a
    /// payment type that may point at another institution.
    pub fn resolve_payment_term(&self, term: &PaymentTerm) -> Option<Resolution> {
        let names: Vec<&str> = [term.bank_name.as_deref(), term.branch_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|name| !normalize(name).is_empty())
            .collect();

        if !names.is_empty() {
            let found = names
                .iter()
                .find_map(|name| self.resolve(name, MatchStrictness::Strict));
            if found.is_none() {
                debug!(?names, "named bank unresolved, payment type ignored");
            }
            return found;
        }

        let method = self.find_payment_method_by_type(term.payment_type?)?;
        let bank = match self.catalog.bank_by_code(&method.bank_code) {
            Some(bank) => bank.clone(),
            None => BankRecord {
                name: method.name.clone(),
                code: method.bank_code.clone(),
            },
        };
        debug!(
            payment_type = method.payment_type,
            code = %bank.code,
            "bank resolved from payment type"
        );
        Some(Resolution {
            bank,
            kind: MatchKind::PaymentType,
        })
    }

    fn resolve_loose(&self, input: &str) -> Option<Resolution> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }

        if let Some(bank) = self.exact.match_name(&normalized) {
            return Some(Resolution::new(bank, MatchKind::ExactName));
        }

        if let Some(word) = first_word(input).map(normalize) {
            if word.len() >= self.config.min_starts_with_len {
                if let Some(bank) = self.exact.unique_starts_with(&word) {
                    return Some(Resolution::new(bank, MatchKind::StartsWith));
                }
            }
        }

        if normalized.len() >= self.config.min_starts_with_len {
            if let Some(bank) = self.exact.unique_starts_with(&normalized) {
                return Some(Resolution::new(bank, MatchKind::StartsWith));
            }
        }

        if let Some(bank) = self.exact.match_alias(&normalized) {
            return Some(Resolution::new(bank, MatchKind::Alias));
        }

        let stripped = normalize_alias(input);
        if stripped != normalized {
            if let Some(bank) = self.exact.match_alias(&stripped) {
                return Some(Resolution::new(bank, MatchKind::SuffixStripped));
            }
        }

        None
    }

    fn resolve_strict(&self, input: &str) -> Option<Resolution> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }

        if let Some(bank) = self.exact.match_name(&normalized) {
            return Some(Resolution::new(bank, MatchKind::ExactName));
        }
        if let Some(bank) = self.exact.match_alias(&normalized) {
            return Some(Resolution::new(bank, MatchKind::Alias));
        }

        if !self.prefixes.is_plausible_prefix(&normalized) {
            debug!(input = %normalized, "implausible prefix rejected");
            return None;
        }
        if is_generic_term(&normalized) {
            debug!(input = %normalized, "generic bank term rejected");
            return None;
        }

        self.fuzzy
            .match_fuzzy(&normalized)
            .map(|bank| Resolution {
                bank,
                kind: MatchKind::Fuzzy,
            })
    }
}
