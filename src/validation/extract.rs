/*!
 * Preserved-content collection.
 *
 * One walk over a markup document gathers everything the preservation
 * checks compare: opaque-script runs, placeholder names, reference keys,
 * abbreviation codes, entry identifiers, translatable-tag instances and
 * the raw tag sequence. Collection is tolerant of malformed markup: a
 * close tag without an open is ignored, an element left open at end of
 * input is finalized as if closed there.
 */

use crate::markup::text::decode_entities;
use crate::markup::{walk, ElementKind, MarkupVisitor, Tag};
use crate::profile::ScriptProfile;

/// Everything a preservation comparison needs from one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreservedContent {
    /// Text runs of preserved opaque tags, trimmed, empty runs dropped
    pub script_runs: Vec<String>,
    /// Placeholder tag names in document order
    pub placeholders: Vec<String>,
    /// Reference-attribute values in document order
    pub references: Vec<String>,
    /// Abbreviation codes, nested superscript/subscript prose excluded
    pub abbreviations: Vec<String>,
    /// Entry identifiers
    pub entry_ids: Vec<String>,
    /// Raw tag tokens in document order: `name` opens, `/name` closes
    pub tag_sequence: Vec<String>,
    /// Translatable-tag instances as (tag name, trimmed text), in order
    pub translatables: Vec<(String, String)>,
}

/// What an open capture slot is collecting for
#[derive(Debug, Clone, PartialEq, Eq)]
enum CaptureTarget {
    Script,
    Abbreviation,
    EntryId,
    Translatable(String),
}

struct CaptureSlot {
    name: String,
    target: CaptureTarget,
    buf: String,
    /// Depth of sub/sup nesting whose text is excluded (abbreviations only)
    suppress: usize,
}

struct Collector<'p> {
    profile: &'p ScriptProfile,
    out: PreservedContent,
    slots: Vec<CaptureSlot>,
}

impl Collector<'_> {
    fn finalize(&mut self, slot: CaptureSlot) {
        let text = slot.buf.trim().to_string();
        match slot.target {
            CaptureTarget::Script => {
                if !text.is_empty() {
                    self.out.script_runs.push(text);
                }
            }
            CaptureTarget::Abbreviation => {
                if !text.is_empty() {
                    self.out.abbreviations.push(text);
                }
            }
            CaptureTarget::EntryId => {
                if !text.is_empty() {
                    self.out.entry_ids.push(text);
                }
            }
            // Empty translated instances are exactly what check 8 looks for
            CaptureTarget::Translatable(name) => {
                self.out.translatables.push((name, text));
            }
        }
    }
}

impl MarkupVisitor for Collector<'_> {
    fn open_element(&mut self, tag: &Tag, kind: ElementKind) {
        self.out.tag_sequence.push(tag.name.clone());

        match kind {
            ElementKind::Placeholder => self.out.placeholders.push(tag.name.clone()),
            ElementKind::Reference => {
                if let Some(value) = tag.attr(&self.profile.reference_attr) {
                    if !value.is_empty() {
                        self.out.references.push(value.to_string());
                    }
                }
            }
            ElementKind::Subscript | ElementKind::Superscript => {
                for slot in &mut self.slots {
                    if slot.target == CaptureTarget::Abbreviation {
                        slot.suppress += 1;
                    }
                }
            }
            _ => {}
        }

        let target = if self.profile.preserved_tags.iter().any(|t| *t == tag.name) {
            Some(CaptureTarget::Script)
        } else if self.profile.abbreviation_tags.iter().any(|t| *t == tag.name) {
            Some(CaptureTarget::Abbreviation)
        } else if tag.name == self.profile.entry_tag {
            Some(CaptureTarget::EntryId)
        } else if self.profile.translatable_tags.iter().any(|t| *t == tag.name) {
            Some(CaptureTarget::Translatable(tag.name.clone()))
        } else {
            None
        };
        if let Some(target) = target {
            self.slots.push(CaptureSlot {
                name: tag.name.clone(),
                target,
                buf: String::new(),
                suppress: 0,
            });
        }
    }

    fn close_element(&mut self, name: &str, kind: ElementKind) {
        self.out.tag_sequence.push(format!("/{}", name));

        if matches!(kind, ElementKind::Subscript | ElementKind::Superscript) {
            for slot in &mut self.slots {
                if slot.target == CaptureTarget::Abbreviation && slot.suppress > 0 {
                    slot.suppress -= 1;
                }
            }
        }

        if self.slots.iter().any(|s| s.name == name) {
            // Pop through implicitly-closed inner slots down to the match
            while let Some(slot) = self.slots.pop() {
                let done = slot.name == name;
                self.finalize(slot);
                if done {
                    break;
                }
            }
        }
    }

    fn text_run(&mut self, text: &str) {
        if self.slots.is_empty() {
            return;
        }
        let decoded = decode_entities(text);
        for slot in &mut self.slots {
            if slot.suppress == 0 {
                slot.buf.push_str(&decoded);
            }
        }
    }
}

/// Collect the preserved content of one document
pub fn collect(profile: &ScriptProfile, src: &str) -> PreservedContent {
    let mut collector = Collector { profile, out: PreservedContent::default(), slots: Vec::new() };
    walk(profile, src, &mut collector);
    // Elements never closed are finalized at end of input
    while let Some(slot) = collector.slots.pop() {
        collector.finalize(slot);
    }
    collector.out
}
