/*!
 * Tag-level checks.
 *
 * Two concerns share the collected tag data. First, translatable tags
 * (part of speech, primary gloss, descriptions) whose original instance
 * carries Latin prose must not come back empty. Second, the raw sequence
 * of tag tokens must survive: spurious wrappers, dropped divs and
 * self-closing-to-paired conversions all show up as sequence changes that
 * the content checks cannot see. Known-benign wrappers a translator may
 * merge or unwrap (their text content is covered by the content checks)
 * are filtered from both sequences before comparing.
 */

use std::collections::HashMap;
use std::fmt;

use crate::profile::ScriptProfile;

use super::extract::PreservedContent;

/// One tag-level finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagIssue {
    /// A translatable tag instance came back empty
    EmptyTranslatable { tag: String, instance: usize, original: String },
    /// A tag token occurs fewer times in the translation
    SequenceMissing { token: String, count: usize },
    /// A tag token occurs more times in the translation
    SequenceExtra { token: String, count: usize },
    /// Token streams first disagree at this position
    SequenceDiverges { index: usize, original: String, translated: String },
}

/// Render a tag token for messages: `pos` opens, `/pos` closes
fn render_token(token: &str) -> String {
    format!("<{}>", token)
}

impl fmt::Display for TagIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagIssue::EmptyTranslatable { tag, instance, original } => {
                write!(f, "empty translated tag: <{}> instance {} (original: '{}')", tag, instance, original)
            }
            TagIssue::SequenceMissing { token, count } => {
                write!(f, "tag sequence: missing {} (x{})", render_token(token), count)
            }
            TagIssue::SequenceExtra { token, count } => {
                write!(f, "tag sequence: extra {} (x{})", render_token(token), count)
            }
            TagIssue::SequenceDiverges { index, original, translated } => {
                write!(
                    f,
                    "tag sequence differs at token {}: original {} vs translated {}",
                    index, original, translated
                )
            }
        }
    }
}

/// Validator for translatable-tag emptiness and tag-sequence preservation
pub struct TagValidator {
    tolerated: Vec<String>,
}

/// Whether text contains Latin-alphabet-range characters
fn has_latin(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c))
}

impl TagValidator {
    pub fn new(profile: &ScriptProfile) -> Self {
        TagValidator { tolerated: profile.tolerated_tags.clone() }
    }

    fn is_tolerated(&self, token: &str) -> bool {
        let name = token.trim_start_matches('/');
        self.tolerated.iter().any(|t| t == name)
    }

    /// Check 8: original has prose, paired translated instance is empty.
    /// Instances pair by per-tag-name document order; an absent pair is
    /// the sequence check's concern, not this one's.
    pub fn check_empty_translatables(
        &self,
        original: &PreservedContent,
        translated: &PreservedContent,
    ) -> Vec<TagIssue> {
        let mut trans_by_name: HashMap<&str, Vec<&str>> = HashMap::new();
        for (name, text) in &translated.translatables {
            trans_by_name.entry(name.as_str()).or_default().push(text.as_str());
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut issues = Vec::new();
        for (name, text) in &original.translatables {
            let idx = {
                let counter = seen.entry(name.as_str()).or_insert(0);
                let idx = *counter;
                *counter += 1;
                idx
            };
            if !has_latin(text) {
                continue;
            }
            let paired = trans_by_name.get(name.as_str()).and_then(|v| v.get(idx));
            if let Some(paired_text) = paired {
                if paired_text.is_empty() {
                    issues.push(TagIssue::EmptyTranslatable {
                        tag: name.clone(),
                        instance: idx + 1,
                        original: excerpt(text, 60),
                    });
                }
            }
        }
        issues
    }

    /// Check 10: compare raw tag-token sequences after dropping tolerated
    /// wrappers from both sides
    pub fn check_sequence(
        &self,
        original: &PreservedContent,
        translated: &PreservedContent,
    ) -> Vec<TagIssue> {
        let orig: Vec<&String> =
            original.tag_sequence.iter().filter(|t| !self.is_tolerated(t)).collect();
        let trans: Vec<&String> =
            translated.tag_sequence.iter().filter(|t| !self.is_tolerated(t)).collect();
        if orig == trans {
            return Vec::new();
        }

        let mut issues = Vec::new();

        let mut orig_counts: HashMap<&str, usize> = HashMap::new();
        for token in &orig {
            *orig_counts.entry(token.as_str()).or_insert(0) += 1;
        }
        let mut trans_counts: HashMap<&str, usize> = HashMap::new();
        for token in &trans {
            *trans_counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut ordered_tokens: Vec<&str> = Vec::new();
        for token in orig.iter().chain(trans.iter()) {
            if !ordered_tokens.contains(&token.as_str()) {
                ordered_tokens.push(token.as_str());
            }
        }
        for token in ordered_tokens {
            let want = orig_counts.get(token).copied().unwrap_or(0);
            let have = trans_counts.get(token).copied().unwrap_or(0);
            if want > have {
                issues.push(TagIssue::SequenceMissing {
                    token: token.to_string(),
                    count: want - have,
                });
            } else if have > want {
                issues.push(TagIssue::SequenceExtra {
                    token: token.to_string(),
                    count: have - want,
                });
            }
        }

        // First divergence, for order-only differences and as a pointer
        let limit = orig.len().min(trans.len());
        let mut diverge = None;
        for i in 0..limit {
            if orig[i] != trans[i] {
                diverge = Some((i, render_token(orig[i]), render_token(trans[i])));
                break;
            }
        }
        if diverge.is_none() && orig.len() != trans.len() {
            diverge = Some(if orig.len() > trans.len() {
                (limit, render_token(orig[limit]), "(end)".to_string())
            } else {
                (limit, "(end)".to_string(), render_token(trans[limit]))
            });
        }
        if let Some((index, original, translated)) = diverge {
            issues.push(TagIssue::SequenceDiverges { index, original, translated });
        }

        issues
    }
}

/// Truncate to at most `max` characters on a char boundary
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
