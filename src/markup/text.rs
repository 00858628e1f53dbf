/*!
 * Text-level helpers: entity decoding, tag stripping and whitespace cleanup.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokenizer::{Token, Tokenizer};

static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Decode the handful of entities the corpus uses. Unknown entities are
/// kept verbatim so nothing is silently lost.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let semi = rest[..rest.len().min(12)].find(';');
        match semi {
            Some(end) => {
                let entity = &rest[1..end];
                let decoded = match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{00A0}'),
                    _ => decode_numeric(entity),
                };
                match decoded {
                    Some(c) => {
                        out.push(c);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `#123` and `#x1F` numeric character references
fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let cp = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(cp)
}

/// Replace every tag with a single space and decode entities in the text
/// runs. The result preserves word boundaries across adjacent tags.
pub fn strip_tags(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for token in Tokenizer::new(src) {
        match token {
            Token::Text(text) => out.push_str(&decode_entities(text)),
            Token::Open(_) | Token::Close(_) | Token::SelfClosing(_) => out.push(' '),
            Token::Comment(_) | Token::Declaration(_) => {}
        }
    }
    out
}

/// Collapse all whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Cleanup applied to extracted plain text: per-line horizontal-space
/// collapsing and trimming, blank runs capped at one empty line, and the
/// whole result trimmed.
pub fn tidy_plain(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.split('\n') {
        let collapsed = SPACES_RE.replace_all(line, " ");
        lines.push(collapsed.trim().to_string());
    }
    let joined = lines.join("\n");
    let capped = BLANK_RUN_RE.replace_all(&joined, "\n\n");
    capped.trim().to_string()
}
