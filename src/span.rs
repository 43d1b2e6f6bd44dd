use std::slice;

use serde::{Deserialize, Serialize};

use crate::options::LengthUnit;

/// A contiguous run of text with at most one style.
///
/// Spans don't know where they start: a span starts where the previous one ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// The style identifier, `None` for text that no rule matched
    pub style: Option<String>,
    /// Length in the [`LengthUnit`] of the [`StyleSpans`] holding it
    pub len: usize,
}

impl Span {
    pub fn plain(len: usize) -> Self {
        Self { style: None, len }
    }

    pub fn styled(style: impl Into<String>, len: usize) -> Self {
        Self {
            style: Some(style.into()),
            len,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.style.is_none()
    }
}

/// The ordered, gap-free partition of a text into [`Span`]s.
///
/// Lengths add up to the length of the styled text. An empty text is a single empty plain
/// span, otherwise no span is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpans {
    spans: Vec<Span>,
    unit: LengthUnit,
}

impl StyleSpans {
    pub(crate) fn new(spans: Vec<Span>, unit: LengthUnit) -> Self {
        Self { spans, unit }
    }

    /// The unit span lengths are expressed in
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Sum of all the span lengths: the length of the styled text
    pub fn total_len(&self) -> usize {
        self.spans.iter().map(|s| s.len).sum()
    }

    pub fn iter(&self) -> slice::Iter<'_, Span> {
        self.spans.iter()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.spans
    }

    pub fn into_vec(self) -> Vec<Span> {
        self.spans
    }

    /// Cuts `text` along the spans, yielding each piece with its style.
    ///
    /// `text` should be the text the spans were computed from. Concatenating the pieces
    /// gives it back.
    pub fn slices<'t>(&'t self, text: &'t str) -> Vec<(&'t str, Option<&'t str>)> {
        let mut rest = text;
        let mut out = Vec::with_capacity(self.spans.len());
        for span in &self.spans {
            let (piece, remaining) = rest.split_at(self.unit.byte_offset(rest, span.len));
            out.push((piece, span.style.as_deref()));
            rest = remaining;
        }
        out
    }
}

impl<'a> IntoIterator for &'a StyleSpans {
    type Item = &'a Span;
    type IntoIter = slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl IntoIterator for StyleSpans {
    type Item = Span;
    type IntoIter = std::vec::IntoIter<Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}
