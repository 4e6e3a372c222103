//! Exact name and alias matching on normalized input

use crate::catalog::BankCatalog;
use crate::normalize::{normalize, normalize_alias};
use crate::{BankRecord, MatchKind};
use std::collections::{HashMap, HashSet};

/// Ordered alias table: authored aliases first, then every bank name with its
/// corporate suffixes stripped. Earlier entries win on key collisions.
pub fn alias_table(catalog: &BankCatalog) -> Vec<(String, BankRecord)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut table: Vec<(String, BankRecord)> = catalog
        .aliases()
        .iter()
        .filter(|entry| seen.insert(entry.alias.clone()))
        .map(|entry| (entry.alias.clone(), entry.bank.clone()))
        .collect();

    for bank in catalog.banks() {
        let key = normalize_alias(&bank.name);
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        table.push((key, bank.clone()));
    }

    table
}

/// Ordered list of normalized bank names
pub fn name_table(catalog: &BankCatalog) -> Vec<(String, BankRecord)> {
    catalog
        .banks()
        .iter()
        .map(|bank| (normalize(&bank.name), bank.clone()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Hash lookups over normalized names and aliases
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    names: Vec<(String, BankRecord)>,
    name_index: HashMap<String, usize>,
    aliases: HashMap<String, BankRecord>,
}

impl ExactMatcher {
    pub fn new(catalog: &BankCatalog) -> Self {
        Self::from_tables(name_table(catalog), &alias_table(catalog))
    }

    /// Build from tables produced by [`name_table`] and [`alias_table`]
    pub fn from_tables(
        names: Vec<(String, BankRecord)>,
        alias_entries: &[(String, BankRecord)],
    ) -> Self {
        let mut name_index = HashMap::new();
        for (index, (key, _)) in names.iter().enumerate() {
            name_index.entry(key.clone()).or_insert(index);
        }

        let mut aliases = HashMap::new();
        for (key, bank) in alias_entries {
            aliases.entry(key.clone()).or_insert_with(|| bank.clone());
        }

        Self {
            names,
            name_index,
            aliases,
        }
    }

    /// Bank whose normalized name equals the normalized input
    pub fn match_name(&self, normalized: &str) -> Option<&BankRecord> {
        if normalized.is_empty() {
            return None;
        }
        self.name_index
            .get(normalized)
            .map(|&index| &self.names[index].1)
    }

    /// Bank whose alias key equals the normalized input
    pub fn match_alias(&self, normalized: &str) -> Option<&BankRecord> {
        if normalized.is_empty() {
            return None;
        }
        self.aliases.get(normalized)
    }

    /// Normalize the input, then try names before aliases
    pub fn match_exact(&self, input: &str) -> Option<(&BankRecord, MatchKind)> {
        let normalized = normalize(input);
        if let Some(bank) = self.match_name(&normalized) {
            return Some((bank, MatchKind::ExactName));
        }
        self.match_alias(&normalized)
            .map(|bank| (bank, MatchKind::Alias))
    }

    /// The single bank whose normalized name starts with `prefix`.
    ///
    /// Several spellings of the same code count as one bank; the first listed
    /// is returned. Two or more distinct codes make the prefix ambiguous.
    pub fn unique_starts_with(&self, prefix: &str) -> Option<&BankRecord> {
        if prefix.is_empty() {
            return None;
        }

        let mut found: Option<&BankRecord> = None;
        for (key, bank) in &self.names {
            if !key.starts_with(prefix) {
                continue;
            }
            match found {
                None => found = Some(bank),
                Some(first) if first.code == bank.code => {}
                Some(_) => return None,
            }
        }
        found
    }
}
