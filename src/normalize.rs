//! Input normalization for bank name matching
//!
//! All matching happens on normalized text: lowercase ASCII letters and digits
//! with everything else removed.

/// Corporate suffix words dropped when building and matching aliases
pub const CORPORATE_SUFFIXES: [&str; 4] = ["bank", "plc", "limited", "ltd"];

/// Lowercase and strip every character outside `[a-z0-9]`.
///
/// Total over all inputs. Blank input yields an empty string, which never
/// matches anything downstream.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Remove the corporate suffix words, keeping the remaining words
/// space-separated in their original form.
///
/// Words are split on any non-alphanumeric character, so `"Sterling Bank Plc."`
/// becomes `"Sterling"`. Suffixes are only removed as whole words: `"Bankly"`
/// is left alone.
pub fn strip_corporate_suffixes(input: &str) -> String {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !is_corporate_suffix(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalization used for alias keys: suffix words removed, then normalized
pub fn normalize_alias(input: &str) -> String {
    normalize(&strip_corporate_suffixes(input))
}

fn is_corporate_suffix(word: &str) -> bool {
    CORPORATE_SUFFIXES
        .iter()
        .any(|suffix| word.eq_ignore_ascii_case(suffix))
}

/// First whitespace-separated word of the input, if any
pub fn first_word(input: &str) -> Option<&str> {
    input.split_whitespace().next()
}
