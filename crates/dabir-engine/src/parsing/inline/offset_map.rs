use std::ops::Range;

/// One text leaf's share of a rendered run and of its Markdown source.
///
/// Offsets are in characters. `leaf` is the child-index path from the
/// serialized node slice down to the leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub leaf: Vec<usize>,
    pub rendered: usize,
    pub source: usize,
    pub len: usize,
}

impl Segment {
    fn covers_rendered(&self, offset: usize) -> bool {
        self.rendered <= offset && offset <= self.rendered + self.len
    }

    fn covers_source(&self, offset: usize) -> bool {
        self.source <= offset && offset <= self.source + self.len
    }
}

/// Maps caret offsets between rendered text and Markdown source.
///
/// Built by [`to_markdown_mapped`](super::to_markdown_mapped) during the
/// same walk that emits the source, so the two never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    pub(super) segments: Vec<Segment>,
    pub(super) element_spans: Vec<Range<usize>>,
    pub(super) source_len: usize,
}

impl OffsetMap {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Rendered offset to source offset. Boundary offsets resolve to the
    /// earlier leaf; offsets past every leaf land at the end of the source.
    pub fn to_source(&self, rendered: usize) -> usize {
        self.segments
            .iter()
            .find(|s| s.covers_rendered(rendered))
            .map_or(self.source_len, |s| s.source + (rendered - s.rendered))
    }

    /// Source offset to `(leaf path, offset in leaf)`.
    ///
    /// An offset inside markup snaps to the start of the next leaf, or to
    /// the end of the last leaf when none follows.
    pub fn locate(&self, source: usize) -> Option<(&[usize], usize)> {
        if let Some(seg) = self.segments.iter().find(|s| s.covers_source(source)) {
            return Some((&seg.leaf, source - seg.source));
        }
        if let Some(seg) = self.segments.iter().find(|s| s.source > source) {
            return Some((&seg.leaf, 0));
        }
        self.segments.last().map(|s| (s.leaf.as_slice(), s.len))
    }

    /// Source offset to rendered offset, with the snapping of
    /// [`OffsetMap::locate`].
    pub fn to_rendered(&self, source: usize) -> usize {
        if let Some(seg) = self.segments.iter().find(|s| s.covers_source(source)) {
            return seg.rendered + (source - seg.source);
        }
        if let Some(seg) = self.segments.iter().find(|s| s.source > source) {
            return seg.rendered;
        }
        self.segments.last().map_or(0, |s| s.rendered + s.len)
    }

    /// True when `source` falls strictly between the delimiters of a
    /// top-level element.
    pub fn inside_markup(&self, source: usize) -> bool {
        self.element_spans
            .iter()
            .any(|r| r.start < source && source < r.end)
    }
}
