/*!
 * Script profile: the per-corpus vocabulary driving splitting and validation.
 *
 * Everything language- or corpus-specific lives here so the engine itself
 * stays generic: which character ranges count as opaque script, which tag
 * names are opaque / preserved / translatable, the stem-heading vocabulary,
 * and the heuristic constants. All fields have serde defaults matching the
 * BDB Hebrew lexicon corpus, and every one can be overridden from the
 * config file.
 */

use serde::{Deserialize, Serialize};

/// Inclusive Unicode codepoint range treated as opaque script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodepointRange {
    /// First codepoint of the range
    pub start: u32,
    /// Last codepoint of the range (inclusive)
    pub end: u32,
}

impl CodepointRange {
    /// Create a new inclusive range
    pub const fn new(start: u32, end: u32) -> Self {
        CodepointRange { start, end }
    }

    /// Whether the character falls inside the range
    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        cp >= self.start && cp <= self.end
    }
}

/// Corpus vocabulary and heuristic constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptProfile {
    /// Codepoint ranges whose content must survive translation byte-for-byte
    #[serde(default = "default_opaque_ranges")]
    pub opaque_ranges: Vec<CodepointRange>,

    /// Tags whose content is opaque script or notation, copied through verbatim
    #[serde(default = "default_opaque_tags")]
    pub opaque_tags: Vec<String>,

    /// Opaque tags whose text runs are individually checked for preservation
    #[serde(default = "default_preserved_tags")]
    pub preserved_tags: Vec<String>,

    /// Tags holding abbreviation text that must be copied through untranslated
    #[serde(default = "default_abbreviation_tags")]
    pub abbreviation_tags: Vec<String>,

    /// Tags whose (non-empty) content is expected to be translated
    #[serde(default = "default_translatable_tags")]
    pub translatable_tags: Vec<String>,

    /// Wrapper tags a translator may add or drop without breaking structure
    #[serde(default = "default_tolerated_tags")]
    pub tolerated_tags: Vec<String>,

    /// Tags (with their content) excluded from the plain-text derivative
    #[serde(default = "default_skipped_tags")]
    pub skipped_tags: Vec<String>,

    /// Tag carrying the entry identifier as its text
    #[serde(default = "default_entry_tag")]
    pub entry_tag: String,

    /// Tag carrying cross-references in an attribute
    #[serde(default = "default_reference_tag")]
    pub reference_tag: String,

    /// Attribute of `reference_tag` holding the reference target
    #[serde(default = "default_reference_attr")]
    pub reference_attr: String,

    /// Tag-name prefix of image placeholders (`placeholder1`, `placeholder2`, ...)
    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,

    /// Human-readable name of the opaque script, used in issue messages
    #[serde(default = "default_script_label")]
    pub script_label: String,

    /// Stem headings that open a morphological block, matched at line start
    #[serde(default = "default_stem_names")]
    pub stem_names: Vec<String>,

    /// Source-language words whose survival in a translation marks a remnant
    #[serde(default = "default_remnant_markers")]
    pub remnant_markers: Vec<String>,

    /// Word the `&` entity may legitimately be rendered as in the target language
    #[serde(default = "default_ampersand_word")]
    pub ampersand_word: String,

    /// Lower bound of the translated/original size ratio before flagging
    #[serde(default = "default_size_ratio_min")]
    pub size_ratio_min: f64,

    /// Upper bound of the translated/original size ratio before flagging
    #[serde(default = "default_size_ratio_max")]
    pub size_ratio_max: f64,
}

fn default_opaque_ranges() -> Vec<CodepointRange> {
    // Hebrew block plus the alphabetic presentation forms used by the corpus
    vec![CodepointRange::new(0x0590, 0x05FF), CodepointRange::new(0xFB1D, 0xFB4F)]
}

fn default_opaque_tags() -> Vec<String> {
    to_strings(&["bdbheb", "bdbarc", "transliteration", "grk"])
}

fn default_preserved_tags() -> Vec<String> {
    to_strings(&["bdbheb", "bdbarc"])
}

fn default_abbreviation_tags() -> Vec<String> {
    to_strings(&["lookup", "reflink"])
}

fn default_translatable_tags() -> Vec<String> {
    to_strings(&["language", "pos", "primary", "descrip", "meta", "gloss"])
}

fn default_tolerated_tags() -> Vec<String> {
    to_strings(&["highlight", "lookup", "reflink", "sub", "sup"])
}

fn default_skipped_tags() -> Vec<String> {
    to_strings(&["checkingneeded", "wrongreferenceremoved"])
}

fn default_entry_tag() -> String {
    "entry".to_string()
}

fn default_reference_tag() -> String {
    "ref".to_string()
}

fn default_reference_attr() -> String {
    "ref".to_string()
}

fn default_placeholder_prefix() -> String {
    "placeholder".to_string()
}

fn default_script_label() -> String {
    "Hebrew/Aramaic".to_string()
}

fn default_stem_names() -> Vec<String> {
    to_strings(&[
        "Qal", "Qal Passive", "Niph`al", "Nithp.", "Pi`el", "Piel", "Piel.", "Pi`lel",
        "Pil`el.", "Pilpel", "Pil.", "Pu`al", "Pual", "Pu`lal", "Hiph`il", "Hilph.",
        "Hoph`al", "Hithpa`el", "Hithpa`al", "Hithpa`lel", "Hithpalpel", "Hithpe`el",
        "Hithpo`el", "Hithpo`lel", "Hithpolel", "Hithp.", "Hitph.", "Hothpa`al",
        "Po`el", "Po`el.", "Poe`l", "Po`êl", "Pô`el", "Po`al", "Po`lel", "Po`lel.",
        "Pol`el", "Polel", "Pô`lel", "Polpal", "Po`lal", "Po`lal.", "Po", "Po.",
        "Po`", "Po`.", "Po`l.", "Pa`el", "Pa`lel", "Palpel", "Pa.", "Pe`al",
        "Pe`al`al", "Pe`il", "Pe`îl", "Peîl", "Pe", "Ethpo`lel", "Haph`el", "Hephal",
        "Ishtaph.", "Ithpa`al", "Ithpe`el", "Shaph`el", "Tiph`el",
    ])
}

fn default_remnant_markers() -> Vec<String> {
    to_strings(&[
        " the ", " of the ", " which ", " father ", " mother ", " son of ",
        "daughter of", " see ", " compare ", " mourn ", " choose ", "worn out",
        " gift ",
    ])
}

fn default_ampersand_word() -> String {
    "et".to_string()
}

fn default_size_ratio_min() -> f64 {
    0.85
}

fn default_size_ratio_max() -> f64 {
    1.30
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ScriptProfile {
    fn default() -> Self {
        ScriptProfile {
            opaque_ranges: default_opaque_ranges(),
            opaque_tags: default_opaque_tags(),
            preserved_tags: default_preserved_tags(),
            abbreviation_tags: default_abbreviation_tags(),
            translatable_tags: default_translatable_tags(),
            tolerated_tags: default_tolerated_tags(),
            skipped_tags: default_skipped_tags(),
            entry_tag: default_entry_tag(),
            reference_tag: default_reference_tag(),
            reference_attr: default_reference_attr(),
            placeholder_prefix: default_placeholder_prefix(),
            script_label: default_script_label(),
            stem_names: default_stem_names(),
            remnant_markers: default_remnant_markers(),
            ampersand_word: default_ampersand_word(),
            size_ratio_min: default_size_ratio_min(),
            size_ratio_max: default_size_ratio_max(),
        }
    }
}

impl ScriptProfile {
    /// Whether a character belongs to the opaque script
    pub fn is_opaque_char(&self, c: char) -> bool {
        self.opaque_ranges.iter().any(|r| r.contains(c))
    }

    /// Whether the string contains at least one opaque-script character
    pub fn has_opaque(&self, text: &str) -> bool {
        text.chars().any(|c| self.is_opaque_char(c))
    }

    /// Whether the tag name is an opaque-content tag
    pub fn is_opaque_tag(&self, name: &str) -> bool {
        self.opaque_tags.iter().any(|t| t == name)
    }

    /// Whether the tag name is a placeholder tag (`placeholder` followed by digits)
    pub fn is_placeholder_tag(&self, name: &str) -> bool {
        name.len() > self.placeholder_prefix.len()
            && name.starts_with(self.placeholder_prefix.as_str())
            && name[self.placeholder_prefix.len()..].bytes().all(|b| b.is_ascii_digit())
    }

    /// Numeric suffix of a placeholder tag name, if it is one
    pub fn placeholder_index<'a>(&self, name: &'a str) -> Option<&'a str> {
        if self.is_placeholder_tag(name) {
            Some(&name[self.placeholder_prefix.len()..])
        } else {
            None
        }
    }

    /// Whether the tag is excluded from the plain-text derivative
    pub fn is_skipped_tag(&self, name: &str) -> bool {
        self.skipped_tags.iter().any(|t| t == name)
    }
}
