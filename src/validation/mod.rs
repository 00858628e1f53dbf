/*!
 * Validation module for translated dictionary entries.
 *
 * This module verifies that everything which must survive translation
 * actually did:
 * - Opaque-script runs, placeholders, references, abbreviations, entry IDs
 * - Coverage of the translated plain text by the translated markup
 * - Translatable tags that came back empty
 * - Residual source-language phrases
 * - Raw tag-sequence preservation
 *
 * # Architecture
 *
 * - `extract`: collects preserved content from one document in one walk
 * - `preservation`: content-identity checks over a collected pair
 * - `coverage`: plain-text-line presence in markup visible text
 * - `remnants`: source-language phrase blocklist scan
 * - `tags`: empty-translatable and tag-sequence checks
 * - `service`: orchestrates all validators
 */

pub mod coverage;
pub mod extract;
pub mod preservation;
pub mod remnants;
pub mod service;
pub mod tags;

// Re-export main types
pub use extract::PreservedContent;
pub use service::{EntryValidator, ValidationIssue};
