/*!
 * Element classification and the visitor walk.
 *
 * Every tag name in the corpus maps onto one variant of `ElementKind`, and
 * consumers (text extraction, preserved-content collection) implement
 * `MarkupVisitor` and dispatch on the kind instead of re-matching tag
 * names. The walk is flat: the token stream is delivered in document order
 * and visitors keep whatever nesting state they need, which is what keeps
 * broken markup from derailing them.
 */

use crate::profile::ScriptProfile;

use super::tokenizer::{Tag, Token, Tokenizer};

/// Role a tag plays in an entry document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<head>` metadata container, excluded from text
    Head,
    /// `<h1>` entry heading
    Heading,
    /// Tag whose text is the entry identifier
    EntryId,
    /// Image placeholder (`placeholderN`)
    Placeholder,
    /// Editorial tag excluded from the plain-text derivative
    Skipped,
    /// `<hr>` separator
    Rule,
    /// `<sub>`
    Subscript,
    /// `<sup>`
    Superscript,
    /// Opaque-script or notation tag, content copied through verbatim
    Opaque,
    /// Cross-reference tag carrying its target in an attribute
    Reference,
    /// Abbreviation link (`lookup`, `reflink`)
    Abbreviation,
    /// Block-level container (`div`, `p`)
    Block,
    /// Anything else; descend without special handling
    Other,
}

/// Map a tag name onto its role under the given profile
pub fn classify(profile: &ScriptProfile, name: &str) -> ElementKind {
    match name {
        "head" => ElementKind::Head,
        "h1" => ElementKind::Heading,
        "hr" => ElementKind::Rule,
        "sub" => ElementKind::Subscript,
        "sup" => ElementKind::Superscript,
        "div" | "p" => ElementKind::Block,
        _ => {
            if name == profile.entry_tag {
                ElementKind::EntryId
            } else if profile.is_placeholder_tag(name) {
                ElementKind::Placeholder
            } else if profile.is_skipped_tag(name) {
                ElementKind::Skipped
            } else if profile.is_opaque_tag(name) {
                ElementKind::Opaque
            } else if name == profile.reference_tag {
                ElementKind::Reference
            } else if profile.abbreviation_tags.iter().any(|t| t == name) {
                ElementKind::Abbreviation
            } else {
                ElementKind::Other
            }
        }
    }
}

/// Receiver for the flat document walk
pub trait MarkupVisitor {
    /// An opening (or self-closing) tag was scanned
    fn open_element(&mut self, tag: &Tag, kind: ElementKind);
    /// A closing tag was scanned
    fn close_element(&mut self, name: &str, kind: ElementKind);
    /// A raw text run was scanned; entities are not decoded
    fn text_run(&mut self, text: &str);
}

/// Void elements written without a closing tag in the corpus
fn is_void(name: &str) -> bool {
    matches!(name, "hr" | "br" | "img")
}

/// Walk the document, dispatching classified tokens to the visitor.
/// Self-closing and void tags produce an open immediately followed by a close.
pub fn walk<V: MarkupVisitor>(profile: &ScriptProfile, src: &str, visitor: &mut V) {
    for token in Tokenizer::new(src) {
        match token {
            Token::Open(tag) => {
                let kind = classify(profile, &tag.name);
                visitor.open_element(&tag, kind);
                if is_void(&tag.name) {
                    visitor.close_element(&tag.name, kind);
                }
            }
            Token::SelfClosing(tag) => {
                let kind = classify(profile, &tag.name);
                visitor.open_element(&tag, kind);
                visitor.close_element(&tag.name, kind);
            }
            Token::Close(name) => {
                let kind = classify(profile, &name);
                visitor.close_element(&name, kind);
            }
            Token::Text(text) => visitor.text_run(text),
            Token::Comment(_) | Token::Declaration(_) => {}
        }
    }
}
