use serde::{Deserialize, Serialize};

/// The style given to a match whose rule could not be identified
pub const FALLBACK_STYLE: &str = "text";

/// What a span length counts
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Unicode scalar values
    #[default]
    Chars,
    /// UTF-8 bytes, the offsets Rust strings use
    Bytes,
    /// UTF-16 code units, what JVM and JS text components count
    Utf16,
}

impl LengthUnit {
    /// Length of `text` in this unit
    pub fn measure(self, text: &str) -> usize {
        match self {
            LengthUnit::Chars => text.chars().count(),
            LengthUnit::Bytes => text.len(),
            LengthUnit::Utf16 => text.encode_utf16().count(),
        }
    }

    /// Byte offset in `text` after `len` units, clamped to the text length.
    /// Never splits a char: a unit count landing inside one rounds up to its end.
    pub(crate) fn byte_offset(self, text: &str, len: usize) -> usize {
        match self {
            LengthUnit::Chars => text
                .char_indices()
                .nth(len)
                .map_or(text.len(), |(idx, _)| idx),
            LengthUnit::Bytes => {
                let mut idx = len.min(text.len());
                while !text.is_char_boundary(idx) {
                    idx += 1;
                }
                idx
            }
            LengthUnit::Utf16 => {
                let mut units = 0;
                for (idx, c) in text.char_indices() {
                    if units >= len {
                        return idx;
                    }
                    units += c.len_utf16();
                }
                text.len()
            }
        }
    }
}

/// Options for computing spans, NOT rendering them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions<'a> {
    pub(crate) length_unit: LengthUnit,
    pub(crate) merge_same_style_spans: bool,
    pub(crate) fallback_style: &'a str,
    pub(crate) fallback_to_plain: bool,
}

impl Default for StyleOptions<'_> {
    fn default() -> Self {
        Self {
            length_unit: LengthUnit::default(),
            merge_same_style_spans: false,
            fallback_style: FALLBACK_STYLE,
            fallback_to_plain: false,
        }
    }
}

impl<'a> StyleOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unit span lengths are measured in.
    pub fn length_unit(mut self, value: LengthUnit) -> Self {
        self.length_unit = value;
        self
    }

    /// Merges consecutive matches with the same style into a single span
    pub fn merge_same_style_spans(mut self, value: bool) -> Self {
        self.merge_same_style_spans = value;
        self
    }

    /// Style used when a match cannot be attributed to a rule.
    pub fn fallback_style(mut self, value: &'a str) -> Self {
        self.fallback_style = value;
        self
    }

    /// Whether to fallback to the plain language if the requested
    /// language is not found.
    pub fn fallback_to_plain(mut self, value: bool) -> Self {
        self.fallback_to_plain = value;
        self
    }
}
