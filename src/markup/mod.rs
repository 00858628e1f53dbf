/*!
 * Markup scanning primitives shared by the splitter, the validator and the
 * plain-text extractor.
 *
 * The corpus is legacy HTML with custom tag names and occasional breakage
 * (unclosed elements, stray angle brackets). Everything here is tolerant:
 * scanning never fails, it just keeps going with the best interpretation.
 */

pub mod element;
pub mod text;
pub mod tokenizer;

pub use element::{classify, walk, ElementKind, MarkupVisitor};
pub use tokenizer::{Tag, Token, Tokenizer};
