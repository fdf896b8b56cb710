//! # Node Tree
//!
//! The owned value tree produced by the block parser and consumed by the
//! serializer, plus the arena-backed [`Document`] that implements the live
//! editing [`Surface`](crate::surface::Surface).
//!
//! ## Modules
//!
//! - **`document`**: `Document`, the in-memory surface with stable `NodeId`s
//!
//! Every attribute a node needs is carried by its [`Tag`], so structural
//! equality of two trees is plain `PartialEq`.

pub mod document;

pub use document::Document;

use serde::{Deserialize, Serialize};

/// Column alignment of a table, derived from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
    #[default]
    None,
}

/// The five callout flavours an admonition block can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmonitionKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AdmonitionKind {
    pub const ALL: [AdmonitionKind; 5] = [
        AdmonitionKind::Note,
        AdmonitionKind::Tip,
        AdmonitionKind::Important,
        AdmonitionKind::Warning,
        AdmonitionKind::Caution,
    ];

    /// English keyword, also used in outlines and HTML class names.
    pub fn name(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "note",
            AdmonitionKind::Tip => "tip",
            AdmonitionKind::Important => "important",
            AdmonitionKind::Warning => "warning",
            AdmonitionKind::Caution => "caution",
        }
    }

    /// Persian keyword written after the opening `...`.
    pub fn persian(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "توجه",
            AdmonitionKind::Tip => "نکته",
            AdmonitionKind::Important => "مهم",
            AdmonitionKind::Warning => "هشدار",
            AdmonitionKind::Caution => "احتیاط",
        }
    }

    /// Resolves either keyword form.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(keyword) || k.persian() == keyword)
    }
}

/// Element tag. Attributes live inside the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Heading { level: u8 },
    Paragraph,
    Strong,
    Emphasis,
    Strikethrough,
    Highlight,
    InlineCode,
    Link { href: String },
    Image { src: String, alt: String },
    HorizontalRule,
    Blockquote,
    BlockquoteLine,
    OrderedList { start: u32 },
    UnorderedList,
    Checklist,
    ListItem { checked: Option<bool> },
    CodeFence { lang: String },
    Table { alignments: Vec<Alignment> },
    TableRow,
    TableCell,
    Admonition { kind: AdmonitionKind },
    Verse,
    VerseCouplet,
    VerseLine,
}

impl Tag {
    /// Inline formatting produced by the inline transcoder.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Tag::Strong
                | Tag::Emphasis
                | Tag::Strikethrough
                | Tag::Highlight
                | Tag::InlineCode
                | Tag::Link { .. }
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Tag::OrderedList { .. } | Tag::UnorderedList | Tag::Checklist
        )
    }

    /// Tags whose source can be revealed for raw editing.
    pub fn is_revealable(&self) -> bool {
        self.is_inline() || matches!(self, Tag::Heading { .. })
    }

    /// Containers inside which nothing is revealed or live-converted.
    pub fn is_opaque_container(&self) -> bool {
        matches!(
            self,
            Tag::CodeFence { .. } | Tag::Table { .. } | Tag::Blockquote | Tag::Admonition { .. }
        )
    }

    /// Short label used by outlines and log lines.
    pub fn label(&self) -> String {
        match self {
            Tag::Heading { level } => format!("heading({level})"),
            Tag::Paragraph => "paragraph".into(),
            Tag::Strong => "strong".into(),
            Tag::Emphasis => "emphasis".into(),
            Tag::Strikethrough => "strikethrough".into(),
            Tag::Highlight => "highlight".into(),
            Tag::InlineCode => "code".into(),
            Tag::Link { href } => format!("link({href:?})"),
            Tag::Image { src, alt } => format!("image({src:?}, {alt:?})"),
            Tag::HorizontalRule => "rule".into(),
            Tag::Blockquote => "blockquote".into(),
            Tag::BlockquoteLine => "quote-line".into(),
            Tag::OrderedList { start } => format!("ordered-list({start})"),
            Tag::UnorderedList => "unordered-list".into(),
            Tag::Checklist => "checklist".into(),
            Tag::ListItem { checked: None } => "item".into(),
            Tag::ListItem { checked: Some(true) } => "item [x]".into(),
            Tag::ListItem {
                checked: Some(false),
            } => "item [ ]".into(),
            Tag::CodeFence { lang } => format!("code-fence({lang:?})"),
            Tag::Table { alignments } => {
                let cols: Vec<&str> = alignments
                    .iter()
                    .map(|a| match a {
                        Alignment::Left => "left",
                        Alignment::Right => "right",
                        Alignment::Center => "center",
                        Alignment::None => "none",
                    })
                    .collect();
                format!("table({})", cols.join(", "))
            }
            Tag::TableRow => "row".into(),
            Tag::TableCell => "cell".into(),
            Tag::Admonition { kind } => format!("admonition({})", kind.name()),
            Tag::Verse => "verse".into(),
            Tag::VerseCouplet => "couplet".into(),
            Tag::VerseLine => "hemistich".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub children: Vec<Node>,
}

/// One node of the owned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn element(tag: Tag, children: Vec<Node>) -> Self {
        Node::Element(Element { tag, children })
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.as_element().map(|el| &el.tag)
    }

    /// Concatenated text of every leaf below this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    pub fn is_empty_paragraph(&self) -> bool {
        matches!(self, Node::Element(Element { tag: Tag::Paragraph, children }) if children.iter().all(|c| matches!(c, Node::Text(t) if t.is_empty())))
    }
}

/// Drops empty paragraphs, recursively, except the placeholder an empty
/// admonition keeps. Two trees that serialize identically compare equal
/// after this pass.
pub fn canonical(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .filter(|n| !n.is_empty_paragraph())
        .map(|n| match n {
            Node::Text(_) => n.clone(),
            Node::Element(el) => {
                let mut children = canonical(&el.children);
                if matches!(el.tag, Tag::Admonition { .. }) && children.is_empty() {
                    children.push(Node::element(Tag::Paragraph, vec![]));
                }
                Node::element(el.tag.clone(), children)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("note", Some(AdmonitionKind::Note))]
    #[case("NOTE", Some(AdmonitionKind::Note))]
    #[case("هشدار", Some(AdmonitionKind::Warning))]
    #[case("احتیاط", Some(AdmonitionKind::Caution))]
    #[case("شعر", None)]
    fn test_admonition_keywords(#[case] keyword: &str, #[case] expected: Option<AdmonitionKind>) {
        assert_eq!(AdmonitionKind::from_keyword(keyword), expected);
    }

    #[test]
    fn test_text_content_flattens_leaves() {
        let node = Node::element(
            Tag::Paragraph,
            vec![
                Node::text("Hello "),
                Node::element(Tag::Strong, vec![Node::text("world")]),
            ],
        );
        assert_eq!(node.text_content(), "Hello world");
    }

    #[test]
    fn test_canonical_drops_empty_paragraphs_but_keeps_admonition_placeholder() {
        let tree = vec![
            Node::element(Tag::Paragraph, vec![]),
            Node::element(
                Tag::Admonition {
                    kind: AdmonitionKind::Tip,
                },
                vec![
                    Node::element(Tag::Paragraph, vec![Node::text("")]),
                    Node::element(Tag::Paragraph, vec![]),
                ],
            ),
        ];
        assert_eq!(
            canonical(&tree),
            vec![Node::element(
                Tag::Admonition {
                    kind: AdmonitionKind::Tip
                },
                vec![Node::element(Tag::Paragraph, vec![])]
            )]
        );
    }

    #[test]
    fn test_revealable_tags() {
        assert!(Tag::Strong.is_revealable());
        assert!(Tag::Heading { level: 2 }.is_revealable());
        assert!(!Tag::Paragraph.is_revealable());
        assert!(!Tag::CodeFence { lang: String::new() }.is_revealable());
    }
}
