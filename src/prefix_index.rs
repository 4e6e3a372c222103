//! Prefix index used as a cheap rejection filter before fuzzy matching

use crate::catalog::BankCatalog;
use crate::normalize::{normalize, normalize_alias};
use std::collections::HashSet;

/// Prefixes forced into the index for inputs that no catalog entry reaches
pub const EXTRA_PREFIXES: [&str; 2] = ["ace", "gua"];

/// Set of normalized leading character runs over every catalog identifier
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    prefixes: HashSet<String>,
    prefix_len: usize,
}

impl PrefixIndex {
    /// Build the index from bank names, authored aliases and suffix-stripped
    /// names, plus [`EXTRA_PREFIXES`]
    pub fn build(catalog: &BankCatalog, prefix_len: usize) -> Self {
        let mut index = Self {
            prefixes: HashSet::new(),
            prefix_len,
        };

        for bank in catalog.banks() {
            index.insert(&normalize(&bank.name));
            index.insert(&normalize_alias(&bank.name));
        }
        for entry in catalog.aliases() {
            index.insert(&entry.alias);
        }
        for extra in EXTRA_PREFIXES {
            index.insert(extra);
        }

        index
    }

    fn insert(&mut self, normalized: &str) {
        if let Some(prefix) = leading(normalized, self.prefix_len) {
            self.prefixes.insert(prefix.to_string());
        }
    }

    /// Whether a normalized input could belong to the catalog.
    ///
    /// Inputs shorter than the prefix length always pass; this is a
    /// rejection filter, not a completeness check.
    pub fn is_plausible_prefix(&self, normalized_input: &str) -> bool {
        match leading(normalized_input, self.prefix_len) {
            Some(prefix) => self.prefixes.contains(prefix),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// First `len` characters, or `None` when the input is shorter.
/// Normalized text is ASCII, so byte slicing is safe.
fn leading(normalized: &str, len: usize) -> Option<&str> {
    if normalized.len() >= len && normalized.is_char_boundary(len) {
        Some(&normalized[..len])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AliasEntry;
    use crate::BankRecord;

    fn fixture() -> BankCatalog {
        let gtb = BankRecord::new("Guaranty Trust Bank", "000013").unwrap();
        let kuda = BankRecord::new("Kuda MFB", "090267").unwrap();
        BankCatalog::from_parts(
            vec![gtb.clone(), kuda],
            vec![AliasEntry::new("gtb", gtb)],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_prefixes_are_plausible() {
        let index = PrefixIndex::build(&fixture(), 3);
        assert!(index.is_plausible_prefix("guarantytrust"));
        assert!(index.is_plausible_prefix("kudabank"));
        assert!(index.is_plausible_prefix("gtbplc"));
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        let index = PrefixIndex::build(&fixture(), 3);
        assert!(!index.is_plausible_prefix("zzzbank"));
        assert!(!index.is_plausible_prefix("xyznonexistentbank"));
    }

    #[test]
    fn test_extra_prefixes_present() {
        let index = PrefixIndex::build(&fixture(), 3);
        assert!(index.is_plausible_prefix("acebank"));
    }

    #[test]
    fn test_short_input_bypasses_filter() {
        let index = PrefixIndex::build(&fixture(), 3);
        assert!(index.is_plausible_prefix("zz"));
        assert!(index.is_plausible_prefix(""));
    }

    #[test]
    fn test_index_size() {
        // gua, kud, gtb plus the extra "ace"
        let index = PrefixIndex::build(&fixture(), 3);
        assert_eq!(index.len(), 4);
    }
}
