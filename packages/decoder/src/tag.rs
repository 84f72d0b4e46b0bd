//! Parser for field annotations
//!
//! An annotation is a comma separated list of tokens:
//! ```text
//! !Parent,!Next,li.item,[href],text
//! ```
//! Leading tokens prefixed with `!` are directives applied to the selection
//! before narrowing. The remaining tokens are positional selector slots:
//! slot 0 narrows the selection, slot 1 picks the value (or the map key) and
//! every later slot is handed down to the next nesting level.

use std::fmt;

/// Prefix marking a directive token
pub const DIRECTIVE_PREFIX: char = '!';

/// Annotation that excludes a field from decoding entirely
pub const IGNORE_TAG: &str = "!ignore";

/// A parsed annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    raw: String,
    directives: Vec<String>,
    selectors: Vec<String>,
}

impl Tag {
    /// Parse a raw annotation string
    ///
    /// Directives are only recognised while at least one token remains after
    /// them, so a lone `!foo` is a selector.
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split(',').collect();

        let mut offset = 0;
        while tokens.len() - 1 > offset && tokens[offset].starts_with(DIRECTIVE_PREFIX) {
            offset += 1;
        }

        Self {
            raw: raw.to_string(),
            directives: tokens[..offset]
                .iter()
                .map(|token| token[DIRECTIVE_PREFIX.len_utf8()..].to_string())
                .collect(),
            selectors: tokens[offset..].iter().map(|token| token.to_string()).collect(),
        }
    }

    /// The annotation exactly as written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True for a missing annotation
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_ignored(&self) -> bool {
        self.raw == IGNORE_TAG
    }

    /// Directive names, without their prefix, in application order
    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Selector in slot `which`, or an empty string when the slot is absent
    pub fn selector(&self, which: usize) -> &str {
        self.selectors.get(which).map(String::as_str).unwrap_or("")
    }

    /// Drop the value selector in slot 1, shifting later slots down
    ///
    /// Slot 0 and the directives are kept. A tag without a value selector is
    /// returned unchanged.
    pub fn pop_value(&self) -> Tag {
        if self.selectors.len() < 2 {
            return self.clone();
        }

        let mut selectors = Vec::with_capacity(self.selectors.len() - 1);
        selectors.push(self.selectors[0].clone());
        selectors.extend(self.selectors[2..].iter().cloned());

        let raw = self
            .directives
            .iter()
            .map(|directive| format!("{}{}", DIRECTIVE_PREFIX, directive))
            .chain(selectors.iter().cloned())
            .collect::<Vec<_>>()
            .join(",");

        Tag {
            raw,
            directives: self.directives.clone(),
            selectors,
        }
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::parse("")
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Tag::parse(raw)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
