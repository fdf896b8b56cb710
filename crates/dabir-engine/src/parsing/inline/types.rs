use std::ops::Range;

use crate::tree::Tag;

/// The inline constructs, in scan precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Link,
    Strong,
    Emphasis,
    Strikethrough,
    Highlight,
    Code,
}

impl InlineKind {
    /// First match wins at each position.
    pub const PRECEDENCE: [InlineKind; 6] = [
        InlineKind::Link,
        InlineKind::Strong,
        InlineKind::Emphasis,
        InlineKind::Strikethrough,
        InlineKind::Highlight,
        InlineKind::Code,
    ];

    /// Whether the content is scanned once more for the other kinds.
    pub fn rescans(self) -> bool {
        matches!(
            self,
            InlineKind::Link | InlineKind::Strong | InlineKind::Emphasis
        )
    }
}

/// One recognized construct, as byte ranges into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    pub kind: InlineKind,
    /// Full range including delimiters.
    pub full: Range<usize>,
    /// Label or content between the delimiters.
    pub inner: Range<usize>,
    /// Link target, links only.
    pub href: Option<Range<usize>>,
}

impl InlineMatch {
    pub fn tag(&self, s: &str) -> Tag {
        match self.kind {
            InlineKind::Link => Tag::Link {
                href: self
                    .href
                    .clone()
                    .map(|r| s[r].to_string())
                    .unwrap_or_default(),
            },
            InlineKind::Strong => Tag::Strong,
            InlineKind::Emphasis => Tag::Emphasis,
            InlineKind::Strikethrough => Tag::Strikethrough,
            InlineKind::Highlight => Tag::Highlight,
            InlineKind::Code => Tag::InlineCode,
        }
    }
}
