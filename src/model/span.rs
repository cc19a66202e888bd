use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, other: &TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the spans share a byte. An empty span overlaps a region only
    /// when it sits strictly inside it, or another empty span at the same point.
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

impl std::fmt::Display for TextSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One splice applied to a document: `span` of the old text replaced by
/// `inserted` bytes of new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub span: TextSpan,
    pub inserted: usize,
}

impl TextChange {
    pub fn new(span: TextSpan, inserted: usize) -> Self {
        Self { span, inserted }
    }

    fn shift(&self, offset: usize) -> usize {
        offset - self.span.end + self.span.start + self.inserted
    }

    /// Maps a span of the old text into the new text.
    ///
    /// Spans entirely before the change are unchanged, spans after it shift, and
    /// spans enclosing it stretch or shrink. A span that only partially covers the
    /// replaced range no longer exists in the new text and maps to `None`.
    pub fn map_span(&self, span: TextSpan) -> Option<TextSpan> {
        if span.end <= self.span.start {
            Some(span)
        } else if span.start >= self.span.end {
            Some(TextSpan::new(self.shift(span.start), self.shift(span.end)))
        } else if span.start <= self.span.start && self.span.end <= span.end {
            Some(TextSpan::new(span.start, self.shift(span.end)))
        } else {
            None
        }
    }
}

/// Folds `span` through a sequence of changes, oldest first.
pub fn map_span_through(changes: &[TextChange], span: TextSpan) -> Option<TextSpan> {
    changes
        .iter()
        .try_fold(span, |current, change| change.map_span(current))
}
