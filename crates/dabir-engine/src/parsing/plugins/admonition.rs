use crate::{
    options::LabelLocale,
    parsing::Markdown,
    tree::{AdmonitionKind, Element, Node, Tag},
};

use super::{BlockPlugin, Consumed, FENCE, fence_keyword, fenced_region};

/// Callout blocks: `...kind`, content lines, `...`.
///
/// Content is parsed with the full parser, so it may hold lists, tables or
/// quotes. An empty callout keeps one empty paragraph to type into.
pub struct AdmonitionPlugin {
    labels: LabelLocale,
}

impl AdmonitionPlugin {
    pub fn new(labels: LabelLocale) -> Self {
        Self { labels }
    }

    fn label(&self, kind: AdmonitionKind) -> &'static str {
        match self.labels {
            LabelLocale::Persian => kind.persian(),
            LabelLocale::English => kind.name(),
        }
    }
}

impl BlockPlugin for AdmonitionPlugin {
    fn name(&self) -> &'static str {
        "admonition"
    }

    fn matches(&self, lines: &[&str], at: usize) -> bool {
        lines
            .get(at)
            .and_then(|l| fence_keyword(l))
            .and_then(AdmonitionKind::from_keyword)
            .is_some()
    }

    fn consume(&self, lines: &[&str], at: usize, md: &Markdown) -> Option<Consumed> {
        let kind = AdmonitionKind::from_keyword(fence_keyword(lines.get(at)?)?)?;
        let (content, last, terminated) = fenced_region(lines, at);
        let mut children = md.parse_lines(content);
        if children.is_empty() {
            children.push(Node::element(Tag::Paragraph, vec![]));
        }
        Some(Consumed {
            nodes: vec![Node::element(Tag::Admonition { kind }, children)],
            last,
            terminated,
        })
    }

    fn serialize(&self, element: &Element, md: &Markdown) -> Option<String> {
        let Tag::Admonition { kind } = element.tag else {
            return None;
        };
        Some(format!(
            "{FENCE}{}\n{}\n{FENCE}\n\n",
            self.label(kind),
            md.serialize(&element.children)
        ))
    }
}
