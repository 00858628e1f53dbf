/*!
 * Chunk wrapping and response cleanup.
 *
 * A fragment of an entry is not a complete document: header fragments open
 * `<html>`/`<body>` without closing them, trailing fragments close tags
 * they never opened, and sense fragments can start inside a paragraph.
 * Before prompting, the fragment is balanced with the missing tags and the
 * original body is bracketed with sentinel comments; after generation the
 * text between the sentinels is taken back out. When the service drops the
 * sentinels, the balancing tags recorded at wrap time are stripped from the
 * edges instead.
 *
 * The same module cleans generation output: code-fence removal and
 * detection of `>>> ERRATA` replies claiming the source entry is defective.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Comment marking where the original fragment begins inside a wrapped chunk
pub const WRAPPER_HEAD: &str = "<!-- @@CHUNK-WRAPPER-HEAD@@ -->";
/// Comment marking where the original fragment ends inside a wrapped chunk
pub const WRAPPER_TAIL: &str = "<!-- @@CHUNK-WRAPPER-TAIL@@ -->";

/// Reply prefix claiming the source entry itself is defective
pub const ERRATA_PREFIX: &str = ">>> ERRATA";

static SENTINEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*@@CHUNK-WRAPPER-(?:HEAD|TAIL)@@\s*-->").unwrap());

static HTML_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<html[\s>]").unwrap());
static HTML_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</html\s*>").unwrap());
static BODY_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<body[\s>]").unwrap());
static BODY_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</body\s*>").unwrap());
static P_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<p[\s>]").unwrap());
static P_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</p\s*>").unwrap());

/// The balancing tags added around a chunk at wrap time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkWrap {
    /// Opening tags prepended before the sentinel, outermost first
    lead: Vec<&'static str>,
    /// Closing tags appended after the sentinel, innermost first
    tail: Vec<&'static str>,
}

impl ChunkWrap {
    /// Whether wrapping added no balancing tags
    pub fn is_balanced(&self) -> bool {
        self.lead.is_empty() && self.tail.is_empty()
    }
}

/// Balance a fragment into a self-contained document and bracket the
/// original body with sentinel comments.
pub fn wrap_chunk(chunk: &str) -> (String, ChunkWrap) {
    // Outermost container first; the tail list is reversed afterwards so
    // the innermost close lands first
    let containers: [(&str, &str, &Regex, &Regex); 3] = [
        ("<html>", "</html>", &HTML_OPEN_RE, &HTML_CLOSE_RE),
        ("<body>", "</body>", &BODY_OPEN_RE, &BODY_CLOSE_RE),
        ("<p>", "</p>", &P_OPEN_RE, &P_CLOSE_RE),
    ];

    let mut lead = Vec::new();
    let mut tail = Vec::new();
    for (open_tag, close_tag, open_re, close_re) in containers {
        let opens = open_re.find_iter(chunk).count();
        let closes = close_re.find_iter(chunk).count();
        for _ in opens..closes {
            lead.push(open_tag);
        }
        for _ in closes..opens {
            tail.push(close_tag);
        }
    }
    tail.reverse();

    let mut wrapped = String::new();
    for tag in &lead {
        wrapped.push_str(tag);
        wrapped.push('\n');
    }
    wrapped.push_str(WRAPPER_HEAD);
    wrapped.push('\n');
    wrapped.push_str(chunk);
    if !chunk.ends_with('\n') {
        wrapped.push('\n');
    }
    wrapped.push_str(WRAPPER_TAIL);
    for tag in &tail {
        wrapped.push('\n');
        wrapped.push_str(tag);
    }

    (wrapped, ChunkWrap { lead, tail })
}

/// Recover the fragment body from a generated wrapped chunk.
pub fn unwrap_chunk(output: &str, wrap: &ChunkWrap) -> String {
    if let (Some(head), Some(tail)) = (output.find(WRAPPER_HEAD), output.rfind(WRAPPER_TAIL)) {
        let start = head + WRAPPER_HEAD.len();
        if start <= tail {
            return output[start..tail].trim().to_string();
        }
    }

    // Sentinels lost: drop any damaged remains, then peel the balancing
    // tags off the edges
    let stripped = SENTINEL_RE.replace_all(output, "");
    let mut body = stripped.trim();
    for tag in &wrap.lead {
        body = body.trim_start();
        if let Some(rest) = body.strip_prefix(tag) {
            body = rest;
        }
    }
    for tag in wrap.tail.iter().rev() {
        body = body.trim_end();
        if let Some(rest) = body.strip_suffix(tag) {
            body = rest;
        }
    }
    body.trim().to_string()
}

/// Remove a Markdown code fence around a completion, if present.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let body = match trimmed.find('\n') {
        Some(i) => &trimmed[i + 1..],
        None => return String::new(),
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

/// Detect a reply that declares the source entry defective instead of
/// producing markup. Returns the stated reason.
pub fn parse_errata(text: &str) -> Option<String> {
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(ERRATA_PREFIX) {
            let reason = rest.trim_start_matches(':').trim();
            return Some(if reason.is_empty() {
                "unspecified defect".to_string()
            } else {
                reason.to_string()
            });
        }
    }
    None
}
