/*!
 * Tolerant tag tokenizer.
 *
 * Scans a markup string into a flat token stream: open tags, close tags,
 * self-closing tags, text runs, comments and declarations. No validation is
 * performed and no input is rejected. A `<` that does not start a
 * well-formed tag is emitted as text, and a tag left open at end of input
 * is emitted as text too, so no byte is ever dropped.
 */

/// A parsed tag with its lowercased name and attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased element name
    pub name: String,
    /// Attributes in document order, names lowercased, values entity-decoded
    pub attrs: Vec<(String, String)>,
}

impl Tag {
    /// Value of the named attribute, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `class` attribute, split on whitespace
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// One scanned token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name attr="v">`
    Open(Tag),
    /// `</name>`
    Close(String),
    /// `<name/>`
    SelfClosing(Tag),
    /// Raw text run, entities not decoded
    Text(&'a str),
    /// `<!-- ... -->`, content without the delimiters
    Comment(&'a str),
    /// `<!DOCTYPE ...>` and other `<!` declarations
    Declaration(&'a str),
}

/// Iterator scanning a markup string into tokens
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Start scanning at the beginning of the string
    pub fn new(src: &'a str) -> Self {
        Tokenizer { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Scan a comment starting at `<!--`; an unterminated comment runs to EOF
    fn scan_comment(&mut self) -> Token<'a> {
        let start = self.pos + 4;
        match self.src[start..].find("-->") {
            Some(rel) => {
                let content = &self.src[start..start + rel];
                self.pos = start + rel + 3;
                Token::Comment(content)
            }
            None => {
                let content = &self.src[start..];
                self.pos = self.src.len();
                Token::Comment(content)
            }
        }
    }

    /// Scan `<!...>` declarations
    fn scan_declaration(&mut self) -> Token<'a> {
        let start = self.pos + 2;
        match self.src[start..].find('>') {
            Some(rel) => {
                let content = &self.src[start..start + rel];
                self.pos = start + rel + 1;
                Token::Declaration(content)
            }
            None => {
                let content = &self.src[start..];
                self.pos = self.src.len();
                Token::Declaration(content)
            }
        }
    }

    /// Scan `</name ...>`; returns None when the close never terminates
    fn scan_close(&mut self) -> Option<Token<'a>> {
        let start = self.pos + 2;
        let rel = self.src[start..].find('>')?;
        let name: String = self.src[start..start + rel]
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        self.pos = start + rel + 1;
        Some(Token::Close(name))
    }

    /// Scan an open or self-closing tag; returns None on malformed input
    fn scan_open(&mut self) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        let mut i = self.pos + 1;

        let name_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
            i += 1;
        }
        if i == name_start {
            return None;
        }
        let name = self.src[name_start..i].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut self_closing = false;
        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                // Tag never closed; caller falls back to text
                return None;
            }
            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    // `/>` ends the tag, a lone `/` is skipped
                    if i + 1 < bytes.len() && bytes[i + 1] == b'>' {
                        self_closing = true;
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                _ => {
                    let attr_start = i;
                    while i < bytes.len()
                        && !bytes[i].is_ascii_whitespace()
                        && bytes[i] != b'='
                        && bytes[i] != b'>'
                        && bytes[i] != b'/'
                    {
                        i += 1;
                    }
                    if i == attr_start {
                        // Unexpected byte, skip it rather than loop forever
                        i += 1;
                        continue;
                    }
                    let attr_name = self.src[attr_start..i].to_ascii_lowercase();
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    let value = if i < bytes.len() && bytes[i] == b'=' {
                        i += 1;
                        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                            i += 1;
                        }
                        if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                            let quote = bytes[i];
                            i += 1;
                            let val_start = i;
                            while i < bytes.len() && bytes[i] != quote {
                                i += 1;
                            }
                            let raw = &self.src[val_start..i];
                            if i < bytes.len() {
                                i += 1;
                            }
                            super::text::decode_entities(raw)
                        } else {
                            let val_start = i;
                            while i < bytes.len()
                                && !bytes[i].is_ascii_whitespace()
                                && bytes[i] != b'>'
                            {
                                i += 1;
                            }
                            super::text::decode_entities(&self.src[val_start..i])
                        }
                    } else {
                        String::new()
                    };
                    attrs.push((attr_name, value));
                }
            }
        }

        self.pos = i;
        let tag = Tag { name, attrs };
        Some(if self_closing {
            Token::SelfClosing(tag)
        } else {
            Token::Open(tag)
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.src.len() {
            return None;
        }
        let rest = self.rest();
        if !rest.starts_with('<') {
            // Text run up to the next `<`
            let end = rest.find('<').map(|i| self.pos + i).unwrap_or(self.src.len());
            let text = &self.src[self.pos..end];
            self.pos = end;
            return Some(Token::Text(text));
        }

        if rest.starts_with("<!--") {
            return Some(self.scan_comment());
        }
        if rest.starts_with("<!") {
            return Some(self.scan_declaration());
        }

        let saved = self.pos;
        let token = if rest.starts_with("</") {
            self.scan_close()
        } else {
            self.scan_open()
        };
        match token {
            Some(t) => Some(t),
            None => {
                // Not a tag after all: emit the `<` as text and resume after it
                self.pos = saved + 1;
                Some(Token::Text(&self.src[saved..saved + 1]))
            }
        }
    }
}
