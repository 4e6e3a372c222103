//! Fuzzy bank name matching
//!
//! Two independent signals are combined:
//!
//! 1. Sørensen-Dice similarity between the normalized input and every catalog
//!    identifier (bank names and alias keys).
//! 2. An approximate substring search scoring how many edits it takes to find
//!    the input inside an identifier (lower is better).
//!
//! Containment only counts when the identifier starts with the input, so a
//! word that happens to occur inside a longer name ("payment" in "9 Payment
//! Service Bank") is not evidence for that bank.
//!
//! A candidate is only accepted when it clears every bar. Anything ambiguous
//! or uncertain yields no match: a missed match goes to manual review, a wrong
//! one sends money to the wrong bank.

use crate::catalog::BankCatalog;
use crate::exact_match::{alias_table, name_table};
use crate::normalize::normalize;
use crate::BankRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Normalized inputs too generic to identify a single bank
pub const GENERIC_TERMS: [&str; 6] = ["bank", "banking", "ban", "banks", "banc", "bnk"];

/// Fuzzy matching thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyThresholds {
    /// Minimum similarity for an identifier to count as a candidate
    pub similarity_threshold: f64,
    /// Similarity required to accept a candidate outright
    pub acceptance_similarity: f64,
    /// Candidates closer than this are ambiguous
    pub ambiguity_gap: f64,
    /// Maximum search score (edits per input character) for a search hit
    pub search_threshold: f64,
    /// Second-best search hit must trail the best by more than this
    pub search_score_gap: f64,
    /// Minimum input length for prefix containment to count as evidence
    pub min_substring_len: usize,
}

impl Default for FuzzyThresholds {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            acceptance_similarity: 0.99,
            ambiguity_gap: 0.05,
            search_threshold: 0.5,
            search_score_gap: 0.3,
            min_substring_len: 5,
        }
    }
}

/// Why the fuzzy matcher did or did not produce a bank
#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyOutcome {
    Matched(BankRecord),
    /// Blank after normalization
    Empty,
    /// Input is a generic term such as "bank"
    Generic,
    /// Two banks scored too close to call
    Ambiguous,
    /// Nothing came close enough
    NoCandidate,
    /// Best search hit failed cross-validation
    Rejected,
}

impl FuzzyOutcome {
    pub fn into_bank(self) -> Option<BankRecord> {
        match self {
            FuzzyOutcome::Matched(bank) => Some(bank),
            _ => None,
        }
    }
}

/// Scored catalog identifier
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    score: f64,
}

/// Fuzzy matcher over a catalog's identifiers
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    /// Normalized identifier and the bank it names, in catalog order
    identifiers: Vec<(String, BankRecord)>,
    thresholds: FuzzyThresholds,
}

impl FuzzyMatcher {
    pub fn new(catalog: &BankCatalog, thresholds: FuzzyThresholds) -> Self {
        Self::from_tables(&name_table(catalog), &alias_table(catalog), thresholds)
    }

    /// Build from tables produced by [`name_table`] and [`alias_table`].
    /// Names come first; a key seen twice keeps its first bank.
    pub fn from_tables(
        names: &[(String, BankRecord)],
        aliases: &[(String, BankRecord)],
        thresholds: FuzzyThresholds,
    ) -> Self {
        let mut seen = HashSet::new();
        let identifiers = names
            .iter()
            .chain(aliases)
            .filter(|(key, _)| seen.insert(key.as_str()))
            .cloned()
            .collect();

        Self {
            identifiers,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &FuzzyThresholds {
        &self.thresholds
    }

    /// Best bank for the input, or `None` unless the match is certain
    pub fn match_fuzzy(&self, raw_input: &str) -> Option<BankRecord> {
        self.evaluate(raw_input).into_bank()
    }

    /// Run the full pipeline and report the outcome
    pub fn evaluate(&self, raw_input: &str) -> FuzzyOutcome {
        let normalized = normalize(raw_input);
        if normalized.is_empty() {
            return FuzzyOutcome::Empty;
        }
        if is_generic_term(&normalized) {
            debug!(input = %normalized, "generic bank term rejected");
            return FuzzyOutcome::Generic;
        }

        let direct = self.similarity_candidates(&normalized);
        if let [best, second, ..] = direct.as_slice() {
            if best.score - second.score < self.thresholds.ambiguity_gap {
                debug!(
                    input = %normalized,
                    first = %self.identifiers[best.index].0,
                    second = %self.identifiers[second.index].0,
                    score = best.score,
                    "ambiguous similarity match"
                );
                return FuzzyOutcome::Ambiguous;
            }
        }
        if let Some(best) = direct.first() {
            if best.score >= self.thresholds.acceptance_similarity {
                return FuzzyOutcome::Matched(self.identifiers[best.index].1.clone());
            }
        }

        let hits = self.search(&normalized);
        let Some(top) = hits.first() else {
            return FuzzyOutcome::NoCandidate;
        };
        if let Some(second) = hits.get(1) {
            if second.score - top.score <= self.thresholds.search_score_gap {
                debug!(
                    input = %normalized,
                    first = %self.identifiers[top.index].0,
                    second = %self.identifiers[second.index].0,
                    "ambiguous search match"
                );
                return FuzzyOutcome::Ambiguous;
            }
        }

        let (identifier, bank) = &self.identifiers[top.index];
        let similar = similarity(&normalized, identifier) >= self.thresholds.acceptance_similarity;
        let contained = normalized.len() >= self.thresholds.min_substring_len
            && identifier.starts_with(normalized.as_str());

        if similar || contained {
            debug!(input = %normalized, identifier = %identifier, code = %bank.code, "fuzzy match accepted");
            FuzzyOutcome::Matched(bank.clone())
        } else {
            debug!(input = %normalized, identifier = %identifier, "search hit failed cross-validation");
            FuzzyOutcome::Rejected
        }
    }

    /// Identifiers scoring above the similarity threshold, best first, one per
    /// bank code
    fn similarity_candidates(&self, normalized: &str) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .identifiers
            .iter()
            .enumerate()
            .map(|(index, (identifier, _))| Candidate {
                index,
                score: similarity(normalized, identifier),
            })
            .filter(|c| c.score > self.thresholds.similarity_threshold)
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.best_per_code(candidates)
    }

    /// Search hits within the search threshold, best (lowest) first, one per
    /// bank code
    fn search(&self, normalized: &str) -> Vec<Candidate> {
        let pattern_len = normalized.len() as f64;
        let mut hits: Vec<Candidate> = self
            .identifiers
            .iter()
            .enumerate()
            .map(|(index, (identifier, _))| Candidate {
                index,
                score: substring_edit_distance(normalized, identifier) as f64 / pattern_len,
            })
            .filter(|c| c.score <= self.thresholds.search_threshold)
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        self.best_per_code(hits)
    }

    /// Keep the first candidate for each bank code. Input must be sorted.
    fn best_per_code(&self, sorted: Vec<Candidate>) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        sorted
            .into_iter()
            .filter(|c| seen.insert(&self.identifiers[c.index].1.code))
            .collect()
    }
}

/// Whether a normalized input is on the generic-term deny list
pub fn is_generic_term(normalized: &str) -> bool {
    GENERIC_TERMS.contains(&normalized)
}

/// Sørensen-Dice bigram similarity in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b)
}

/// Fewest edits needed to turn `pattern` into some substring of `text`.
///
/// Semi-global edit distance: the match may start and end anywhere in
/// `text`, so a pattern fully contained in the text scores 0.
pub fn substring_edit_distance(pattern: &str, text: &str) -> usize {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    // Row for the empty pattern prefix: free start anywhere in the text
    let mut previous = vec![0usize; text.len() + 1];
    let mut current = vec![0usize; text.len() + 1];

    for (i, &p) in pattern.iter().enumerate() {
        current[0] = i + 1;
        for (j, &t) in text.iter().enumerate() {
            let substitution = previous[j] + usize::from(p != t);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous.into_iter().min().unwrap_or(pattern.len())
}
