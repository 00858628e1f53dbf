/*!
 * Plain-text extraction.
 *
 * Renders a markup entry into the plain-text form translators work on:
 * an `=== id ===` header line, the visible text with structural blocks on
 * their own lines, placeholder notation for images, `---` for rules, and
 * `_`/`^` wrapping for sub/superscripts. The document is split on markup
 * boundaries first and a `@@SPLIT:type@@` marker line is emitted before
 * every fragment after the first, so splitting the extracted text by
 * markers yields exactly as many fragments as splitting the markup does.
 */

use crate::markup::text::{decode_entities, tidy_plain};
use crate::markup::{walk, ElementKind, MarkupVisitor, Tag};
use crate::profile::ScriptProfile;
use crate::split::EntrySplitter;

/// Block classes rendered on their own line in the plain text
const BLOCK_CLASSES: [&str; 4] = ["sense", "subsense", "stem", "section"];

struct ExtractVisitor<'p> {
    profile: &'p ScriptProfile,
    out: String,
    ids: Vec<String>,
    /// Name and depth of the subtree currently being skipped
    skip: Option<(String, usize)>,
    entry_depth: usize,
    entry_buf: String,
    h1_depth: usize,
}

impl<'p> ExtractVisitor<'p> {
    fn new(profile: &'p ScriptProfile) -> Self {
        ExtractVisitor {
            profile,
            out: String::new(),
            ids: Vec::new(),
            skip: None,
            entry_depth: 0,
            entry_buf: String::new(),
            h1_depth: 0,
        }
    }
}

impl MarkupVisitor for ExtractVisitor<'_> {
    fn open_element(&mut self, tag: &Tag, kind: ElementKind) {
        if let Some((name, depth)) = &mut self.skip {
            if tag.name == *name {
                *depth += 1;
            }
            return;
        }
        match kind {
            ElementKind::Head | ElementKind::Skipped => {
                self.skip = Some((tag.name.clone(), 1));
            }
            ElementKind::EntryId => self.entry_depth += 1,
            ElementKind::Heading => self.h1_depth += 1,
            ElementKind::Placeholder => {
                if let Some(n) = self.profile.placeholder_index(&tag.name) {
                    self.out.push_str(&format!("[{}: Placeholders/{}.gif]", tag.name, n));
                }
            }
            ElementKind::Rule => self.out.push_str("\n---\n"),
            ElementKind::Subscript => self.out.push('_'),
            ElementKind::Superscript => self.out.push('^'),
            ElementKind::Block => {
                let own_line = tag.name == "p"
                    || tag.classes().iter().any(|c| BLOCK_CLASSES.contains(c));
                if own_line {
                    self.out.push('\n');
                }
            }
            _ => {}
        }
    }

    fn close_element(&mut self, name: &str, kind: ElementKind) {
        if let Some((skip_name, depth)) = &mut self.skip {
            if name == *skip_name {
                *depth -= 1;
                if *depth == 0 {
                    self.skip = None;
                }
            }
            return;
        }
        match kind {
            ElementKind::EntryId => {
                if self.entry_depth > 0 {
                    self.entry_depth -= 1;
                    if self.entry_depth == 0 {
                        let id = self.entry_buf.trim().to_string();
                        if !id.is_empty() {
                            self.ids.push(id);
                        }
                        self.entry_buf.clear();
                    }
                }
            }
            ElementKind::Heading => self.h1_depth = self.h1_depth.saturating_sub(1),
            ElementKind::Subscript => self.out.push('_'),
            ElementKind::Superscript => self.out.push('^'),
            _ => {}
        }
    }

    fn text_run(&mut self, text: &str) {
        if self.skip.is_some() {
            return;
        }
        let decoded = decode_entities(text);
        if self.entry_depth > 0 {
            self.entry_buf.push_str(&decoded);
            return;
        }
        if self.h1_depth > 0 {
            // Headword brackets mark reconstructed roots; drop them here
            let cleaned: String =
                decoded.chars().filter(|c| !matches!(c, '[' | ']' | '\n')).collect();
            self.out.push_str(&cleaned);
        } else {
            self.out.push_str(&decoded);
        }
    }
}

/// Extractor configured for one corpus profile
pub struct TextExtractor {
    profile: ScriptProfile,
    splitter: EntrySplitter,
}

impl TextExtractor {
    /// Extractor with the default corpus profile
    pub fn new() -> Self {
        Self::with_profile(ScriptProfile::default())
    }

    /// Extractor with a custom profile
    pub fn with_profile(profile: ScriptProfile) -> Self {
        let splitter = EntrySplitter::with_profile(&profile);
        TextExtractor { profile, splitter }
    }

    fn render(&self, src: &str) -> (String, Vec<String>) {
        let mut visitor = ExtractVisitor::new(&self.profile);
        walk(&self.profile, src, &mut visitor);
        (visitor.out, visitor.ids)
    }

    /// Plain text of one fragment: no header line, no markers
    pub fn extract_fragment(&self, src: &str) -> String {
        let (text, _) = self.render(src);
        tidy_plain(&text)
    }

    /// Full plain-text document: entry-ID header line, then each markup
    /// fragment's text with a boundary marker before every fragment after
    /// the first
    pub fn extract(&self, html: &str) -> String {
        let fragments = self.splitter.split_markup(html);
        let mut ids: Vec<String> = Vec::new();
        let mut body = String::new();

        for (i, fragment) in fragments.iter().enumerate() {
            let (text, fragment_ids) = self.render(&fragment.content);
            ids.extend(fragment_ids);
            if i > 0 {
                body.push_str(&format!("\n@@SPLIT:{}@@\n", fragment.kind.as_str()));
            }
            body.push_str(&text);
        }

        let tidied = tidy_plain(&body);
        format!("=== {} ===\n{}\n", ids.join(" "), tidied)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
