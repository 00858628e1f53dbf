/*!
 * Preservation checks: content that must survive translation untouched.
 *
 * Compares the collected preserved content of the original and the
 * translation: opaque-script runs, placeholders, reference keys,
 * abbreviation codes and entry identifiers. Each finding is independent
 * and non-fatal.
 */

use std::collections::HashMap;

use super::extract::PreservedContent;

/// One preservation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreservationIssue {
    /// An original opaque-script run is absent from the translation
    MissingScript { run: String },
    /// The translation carries an opaque-script run the original lacks
    ExtraScript { run: String },
    /// Placeholder inventories differ
    PlaceholderMismatch { original: Vec<String>, translated: Vec<String> },
    /// A reference key occurs fewer times in the translation
    MissingReference { key: String, shortfall: usize },
    /// A reference key occurs more times in the translation
    ExtraReference { key: String, excess: usize },
    /// An abbreviation code is absent from the translation
    MissingAbbreviation { code: String },
    /// An entry identifier is absent from the translation
    MissingEntryId { id: String },
    /// The translation carries an entry identifier the original lacks
    ExtraEntryId { id: String },
}

impl PreservationIssue {
    /// Issue message; `script_label` names the opaque script for humans
    pub fn message(&self, script_label: &str) -> String {
        match self {
            PreservationIssue::MissingScript { run } => {
                format!("missing {}: {}", script_label, run)
            }
            PreservationIssue::ExtraScript { run } => {
                format!("extra {}: {}", script_label, run)
            }
            PreservationIssue::PlaceholderMismatch { original, translated } => {
                format!(
                    "placeholder mismatch: orig=[{}] translated=[{}]",
                    original.join(", "),
                    translated.join(", ")
                )
            }
            PreservationIssue::MissingReference { key, shortfall } => {
                format!("missing ref attribute: {} (x{})", key, shortfall)
            }
            PreservationIssue::ExtraReference { key, excess } => {
                format!("extra ref attribute: {} (x{})", key, excess)
            }
            PreservationIssue::MissingAbbreviation { code } => {
                format!("missing lookup/abbreviation: {}", code)
            }
            PreservationIssue::MissingEntryId { id } => {
                format!("missing entry ID: {}", id)
            }
            PreservationIssue::ExtraEntryId { id } => {
                format!("extra entry ID: {}", id)
            }
        }
    }
}

/// Validator for checks over collected preserved content
pub struct PreservationValidator;

/// Distinct items in first-seen order
fn distinct(items: &[String]) -> Vec<&String> {
    let mut seen: Vec<&String> = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn counts(items: &[String]) -> HashMap<&str, usize> {
    let mut map = HashMap::new();
    for item in items {
        *map.entry(item.as_str()).or_insert(0) += 1;
    }
    map
}

impl PreservationValidator {
    pub fn new() -> Self {
        PreservationValidator
    }

    /// Run all preservation checks over a collected pair
    pub fn check(
        &self,
        original: &PreservedContent,
        translated: &PreservedContent,
    ) -> Vec<PreservationIssue> {
        let mut issues = Vec::new();

        // Opaque script: every distinct original run must appear somewhere
        // in the translation's opaque containers, and vice versa
        for run in distinct(&original.script_runs) {
            if !translated.script_runs.contains(run) {
                issues.push(PreservationIssue::MissingScript { run: run.clone() });
            }
        }
        for run in distinct(&translated.script_runs) {
            if !original.script_runs.contains(run) {
                issues.push(PreservationIssue::ExtraScript { run: run.clone() });
            }
        }

        // Placeholders: same names, same multiplicity
        let mut orig_placeholders = original.placeholders.clone();
        let mut trans_placeholders = translated.placeholders.clone();
        orig_placeholders.sort();
        trans_placeholders.sort();
        if orig_placeholders != trans_placeholders {
            issues.push(PreservationIssue::PlaceholderMismatch {
                original: orig_placeholders,
                translated: trans_placeholders,
            });
        }

        // Reference keys: the translation's multiset must dominate the
        // original's, and carry nothing beyond it
        let orig_refs = counts(&original.references);
        let trans_refs = counts(&translated.references);
        for key in distinct(&original.references) {
            let have = trans_refs.get(key.as_str()).copied().unwrap_or(0);
            let want = orig_refs.get(key.as_str()).copied().unwrap_or(0);
            if want > have {
                issues.push(PreservationIssue::MissingReference {
                    key: key.clone(),
                    shortfall: want - have,
                });
            }
        }
        for key in distinct(&translated.references) {
            let have = trans_refs.get(key.as_str()).copied().unwrap_or(0);
            let want = orig_refs.get(key.as_str()).copied().unwrap_or(0);
            if have > want {
                issues.push(PreservationIssue::ExtraReference {
                    key: key.clone(),
                    excess: have - want,
                });
            }
        }

        // Abbreviation codes
        for code in distinct(&original.abbreviations) {
            if !translated.abbreviations.contains(code) {
                issues.push(PreservationIssue::MissingAbbreviation { code: code.clone() });
            }
        }

        // Entry identifiers: identical sets
        for id in distinct(&original.entry_ids) {
            if !translated.entry_ids.contains(id) {
                issues.push(PreservationIssue::MissingEntryId { id: id.clone() });
            }
        }
        for id in distinct(&translated.entry_ids) {
            if !original.entry_ids.contains(id) {
                issues.push(PreservationIssue::ExtraEntryId { id: id.clone() });
            }
        }

        issues
    }
}

impl Default for PreservationValidator {
    fn default() -> Self {
        Self::new()
    }
}
