use crate::tree::{Node, Tag};

use super::{
    kinds::{CodeSpan, Emphasis, Highlight, Strikethrough, Strong},
    offset_map::{OffsetMap, Segment},
};

/// Markdown source of one inline node (or a heading line).
pub fn to_markdown(node: &Node) -> String {
    to_markdown_all(std::slice::from_ref(node))
}

/// Markdown source of a run of inline nodes.
pub fn to_markdown_all(nodes: &[Node]) -> String {
    to_markdown_mapped(nodes).0
}

/// Markdown source plus the offset map recorded while emitting it.
pub fn to_markdown_mapped(nodes: &[Node]) -> (String, OffsetMap) {
    let mut w = MarkdownWriter::default();
    w.write_nodes(nodes);
    w.map.source_len = w.source;
    (w.out, w.map)
}

/// Opening and closing markers for a tag's single-line source form.
fn markers(tag: &Tag) -> (String, String) {
    match tag {
        Tag::Strong => (Strong::DELIM.into(), Strong::DELIM.into()),
        Tag::Emphasis => {
            let d = char::from(Emphasis::DELIM).to_string();
            (d.clone(), d)
        }
        Tag::Strikethrough => (Strikethrough::DELIM.into(), Strikethrough::DELIM.into()),
        Tag::Highlight => (Highlight::DELIM.into(), Highlight::DELIM.into()),
        Tag::InlineCode => (CodeSpan::TICK.into(), CodeSpan::TICK.into()),
        Tag::Link { href } => ("[".into(), format!("]({href})")),
        Tag::Heading { level } => (format!("{} ", "#".repeat(usize::from(*level))), String::new()),
        _ => (String::new(), String::new()),
    }
}

#[derive(Default)]
struct MarkdownWriter {
    out: String,
    /// Characters of source written so far.
    source: usize,
    /// Characters of rendered text seen so far.
    rendered: usize,
    path: Vec<usize>,
    map: OffsetMap,
}

impl MarkdownWriter {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
        self.source += s.chars().count();
    }

    fn write_nodes(&mut self, nodes: &[Node]) {
        for (i, node) in nodes.iter().enumerate() {
            self.path.push(i);
            let start = self.source;
            self.write_node(node);
            if self.path.len() == 1 && matches!(node, Node::Element(_)) {
                self.map.element_spans.push(start..self.source);
            }
            self.path.pop();
        }
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Text(t) => {
                let len = t.chars().count();
                self.map.segments.push(Segment {
                    leaf: self.path.clone(),
                    rendered: self.rendered,
                    source: self.source,
                    len,
                });
                self.push(t);
                self.rendered += len;
            }
            Node::Element(el) => {
                if let Tag::Image { src, alt } = &el.tag {
                    self.push(&format!("![{alt}]({src})"));
                    return;
                }
                let (open, close) = markers(&el.tag);
                self.push(&open);
                self.write_nodes(&el.children);
                self.push(&close);
            }
        }
    }
}
