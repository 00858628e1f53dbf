/*!
 * ISO language code handling.
 *
 * Configuration carries ISO 639-1 (2-letter) or ISO 639-3 (3-letter)
 * codes; prompts want English language names. Codes are normalized by
 * trimming and lowercasing before lookup.
 */

use anyhow::{anyhow, Result};
use isolang::Language;

fn parse(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// English display name of a language code
pub fn language_name(code: &str) -> Result<String> {
    parse(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
