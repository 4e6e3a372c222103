//! Bank catalog
//!
//! The fixed, ordered list of known banks together with the alias table and
//! the payment-method table. A catalog is validated once when it is built and
//! is immutable afterwards, so it can be shared freely between threads.

use crate::normalize::normalize;
use crate::{BankCode, BankRecord, CatalogError, PaymentMethodEntry};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, warn};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Free-text alias pointing at a bank.
///
/// The alias key must already be normalized; the target is a copy of the
/// bank record, not a reference into the bank list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    #[serde(flatten)]
    pub bank: BankRecord,
}

impl AliasEntry {
    pub fn new(alias: &str, bank: BankRecord) -> Self {
        Self {
            alias: alias.to_string(),
            bank,
        }
    }
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    banks: Vec<BankRecord>,
    #[serde(default)]
    aliases: Vec<AliasEntry>,
    #[serde(default, rename = "paymentMethods")]
    payment_methods: Vec<PaymentMethodEntry>,
}

/// Immutable bank catalog
#[derive(Debug, Clone)]
pub struct BankCatalog {
    banks: Vec<BankRecord>,
    aliases: Vec<AliasEntry>,
    payment_methods: Vec<PaymentMethodEntry>,
    /// First bank index for each code
    by_code: HashMap<BankCode, usize>,
}

impl BankCatalog {
    /// Catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_parts(file.banks, file.aliases, file.payment_methods)
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build and validate a catalog from its parts
    pub fn from_parts(
        banks: Vec<BankRecord>,
        aliases: Vec<AliasEntry>,
        payment_methods: Vec<PaymentMethodEntry>,
    ) -> Result<Self, CatalogError> {
        if banks.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut by_code = HashMap::new();
        for (index, bank) in banks.iter().enumerate() {
            if let Some(&first) = by_code.get(&bank.code) {
                let first: &BankRecord = &banks[first];
                debug!(
                    code = %bank.code,
                    canonical = %first.name,
                    duplicate = %bank.name,
                    "duplicate bank code, keeping first entry as canonical"
                );
            } else {
                by_code.insert(bank.code.clone(), index);
            }
        }

        let mut seen_aliases = HashSet::new();
        for entry in &aliases {
            if entry.alias.is_empty() || normalize(&entry.alias) != entry.alias {
                return Err(CatalogError::UnnormalizedAlias(entry.alias.clone()));
            }
            if !seen_aliases.insert(entry.alias.clone()) {
                return Err(CatalogError::DuplicateAlias(entry.alias.clone()));
            }
            if !by_code.contains_key(&entry.bank.code) {
                warn!(
                    alias = %entry.alias,
                    code = %entry.bank.code,
                    "alias points at a code missing from the bank list"
                );
            }
        }

        let mut seen_types = HashSet::new();
        for method in &payment_methods {
            if !seen_types.insert(method.payment_type) {
                return Err(CatalogError::DuplicatePaymentType(method.payment_type));
            }
            if !by_code.contains_key(&method.bank_code) {
                warn!(
                    payment_type = method.payment_type,
                    code = %method.bank_code,
                    "payment method points at a code missing from the bank list"
                );
            }
        }

        Ok(Self {
            banks,
            aliases,
            payment_methods,
            by_code,
        })
    }

    pub fn banks(&self) -> &[BankRecord] {
        &self.banks
    }

    pub fn aliases(&self) -> &[AliasEntry] {
        &self.aliases
    }

    pub fn payment_methods(&self) -> &[PaymentMethodEntry] {
        &self.payment_methods
    }

    /// Number of banks
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Canonical bank for a code.
    ///
    /// When several spellings share a code, the one listed first wins.
    pub fn bank_by_code(&self, code: &BankCode) -> Option<&BankRecord> {
        self.by_code.get(code).map(|&index| &self.banks[index])
    }

    /// SHA-256 over the catalog content, hex encoded.
    ///
    /// Order-sensitive, so two catalogs with the same fingerprint resolve
    /// identically.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for bank in &self.banks {
            hasher.update(format!("B|{}|{}\n", bank.name, bank.code));
        }
        for entry in &self.aliases {
            hasher.update(format!(
                "A|{}|{}|{}\n",
                entry.alias, entry.bank.name, entry.bank.code
            ));
        }
        for method in &self.payment_methods {
            hasher.update(format!(
                "P|{}|{}|{}\n",
                method.payment_type, method.name, method.bank_code
            ));
        }

        hasher
            .finalize()
            .iter()
            .fold(String::with_capacity(64), |mut hex, byte| {
                let _ = write!(hex, "{byte:02x}");
                hex
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bank(name: &str, code: &str) -> BankRecord {
        BankRecord::new(name, code).unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = BankCatalog::builtin().unwrap();
        assert!(catalog.len() > 50);
        assert!(!catalog.aliases().is_empty());
        assert!(!catalog.payment_methods().is_empty());
    }

    #[test]
    fn test_builtin_names_are_unique_after_normalization() {
        let catalog = BankCatalog::builtin().unwrap();
        let mut seen = HashSet::new();
        for bank in catalog.banks() {
            assert!(seen.insert(normalize(&bank.name)), "{} collides", bank.name);
        }
    }

    #[test]
    fn test_bank_by_code_prefers_first_spelling() {
        let catalog = BankCatalog::builtin().unwrap();
        let code = BankCode::parse("090405").unwrap();
        assert_eq!(catalog.bank_by_code(&code).unwrap().name, "Moniepoint MFB");

        let code = BankCode::parse("100004").unwrap();
        assert_eq!(catalog.bank_by_code(&code).unwrap().name, "Paycom (OPay)");
    }

    #[test]
    fn test_bank_by_code_unknown() {
        let catalog = BankCatalog::builtin().unwrap();
        let code = BankCode::parse("999999").unwrap();
        assert!(catalog.bank_by_code(&code).is_none());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = BankCatalog::from_parts(vec![], vec![], vec![]);
        assert!(matches!(result, Err(CatalogError::EmptyCatalog)));
    }

    #[test]
    fn test_unnormalized_alias_rejected() {
        let target = bank("Guaranty Trust Bank", "000013");
        let result = BankCatalog::from_parts(
            vec![target.clone()],
            vec![AliasEntry::new("GT Bank", target)],
            vec![],
        );
        assert!(matches!(result, Err(CatalogError::UnnormalizedAlias(_))));
    }

    #[test]
    fn test_empty_alias_rejected() {
        let target = bank("Guaranty Trust Bank", "000013");
        let result =
            BankCatalog::from_parts(vec![target.clone()], vec![AliasEntry::new("", target)], vec![]);
        assert!(matches!(result, Err(CatalogError::UnnormalizedAlias(_))));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let target = bank("Guaranty Trust Bank", "000013");
        let result = BankCatalog::from_parts(
            vec![target.clone()],
            vec![
                AliasEntry::new("gtb", target.clone()),
                AliasEntry::new("gtb", target),
            ],
            vec![],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateAlias(alias)) if alias == "gtb"));
    }

    #[test]
    fn test_duplicate_payment_type_rejected() {
        let kuda = bank("Kuda MFB", "090267");
        let method = PaymentMethodEntry {
            name: "Kuda".to_string(),
            payment_type: 500,
            bank_code: kuda.code.clone(),
        };
        let result = BankCatalog::from_parts(vec![kuda], vec![], vec![method.clone(), method]);
        assert!(matches!(result, Err(CatalogError::DuplicatePaymentType(500))));
    }

    #[test]
    fn test_numeric_code_in_json_rejected() {
        let json = r#"{"banks": [{"BANK_NAME": "Guaranty Trust Bank", "BANK_CODE": 58}]}"#;
        assert!(matches!(
            BankCatalog::from_json(json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "banks": [{{"BANK_NAME": "Kuda MFB", "BANK_CODE": "090267"}}],
                "aliases": [{{"alias": "kuda", "BANK_NAME": "Kuda MFB", "BANK_CODE": "090267"}}],
                "paymentMethods": [{{"name": "Kuda", "paymentTypeCode": 500, "bankCode": "090267"}}]
            }}"#
        )
        .unwrap();

        let catalog = BankCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.aliases()[0].bank.code.as_str(), "090267");
        assert_eq!(catalog.payment_methods()[0].payment_type, 500);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = BankCatalog::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_fingerprint_is_stable_and_order_sensitive() {
        let a = bank("Access Bank", "000014");
        let z = bank("Zenith Bank", "000015");

        let first = BankCatalog::from_parts(vec![a.clone(), z.clone()], vec![], vec![]).unwrap();
        let again = BankCatalog::from_parts(vec![a.clone(), z.clone()], vec![], vec![]).unwrap();
        let swapped = BankCatalog::from_parts(vec![z, a], vec![], vec![]).unwrap();

        assert_eq!(first.fingerprint(), again.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
        assert_ne!(first.fingerprint(), swapped.fingerprint());
    }
}
