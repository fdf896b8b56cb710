use crate::tree::{Element, Node, Tag};

use super::{
    Markdown,
    blocks::kinds::{CodeFence, Heading, Image, ListItem, Rule},
    inline,
};

/// Walks block nodes and emits Markdown. Plugins get the first say for
/// every element.
pub struct Serializer<'m> {
    md: &'m Markdown,
}

impl<'m> Serializer<'m> {
    pub fn new(md: &'m Markdown) -> Self {
        Self { md }
    }

    /// Canonical Markdown for a block sequence.
    pub fn serialize(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.write_block(node, &mut out);
        }
        canonicalize(&out)
    }

    pub fn write_block(&self, node: &Node, out: &mut String) {
        let el = match node {
            Node::Text(t) => {
                out.push_str(t);
                out.push_str("\n\n");
                return;
            }
            Node::Element(el) => el,
        };
        if let Some(text) = self.md.registry().serialize(el, self.md) {
            out.push_str(&text);
            return;
        }
        match &el.tag {
            Tag::Heading { level } => {
                out.push_str(&Heading::prefix(*level));
                out.push_str(&inline::to_markdown_all(&el.children));
                out.push_str("\n\n");
            }
            Tag::HorizontalRule => {
                out.push_str(Rule::MARKER);
                out.push_str("\n\n");
            }
            Tag::Image { src, alt } => {
                out.push_str(&Image::source(alt, src));
                out.push_str("\n\n");
            }
            Tag::Blockquote => {
                let lines: Vec<String> = el
                    .children
                    .iter()
                    .map(|line| match line {
                        Node::Element(l) => format!("> {}", inline::to_markdown_all(&l.children)),
                        Node::Text(t) => format!("> {t}"),
                    })
                    .collect();
                out.push_str(&lines.join("\n"));
                out.push_str("\n\n");
            }
            tag if tag.is_list() => {
                self.write_list(el, 0, out);
                out.push('\n');
            }
            Tag::CodeFence { lang } => {
                out.push_str(CodeFence::BACKTICKS);
                out.push_str(lang);
                out.push('\n');
                out.push_str(&node.text_content());
                out.push('\n');
                out.push_str(CodeFence::BACKTICKS);
                out.push_str("\n\n");
            }
            _ => {
                out.push_str(&inline::to_markdown_all(&el.children));
                out.push_str("\n\n");
            }
        }
    }

    /// One line per item, nested lists right after their item's line.
    fn write_list(&self, list: &Element, depth: usize, out: &mut String) {
        for (index, item) in list.children.iter().enumerate() {
            let Node::Element(item) = item else {
                continue;
            };
            out.push_str(&ListItem::INDENT.repeat(depth));
            match list.tag {
                Tag::OrderedList { start } => {
                    out.push_str(&format!("{}. ", start as usize + index));
                }
                _ => out.push_str(ListItem::BULLET),
            }
            if let Tag::ListItem {
                checked: Some(checked),
            } = item.tag
            {
                out.push_str(ListItem::checkbox(checked));
            }

            let (nested, content): (Vec<&Node>, Vec<&Node>) = item
                .children
                .iter()
                .partition(|c| c.tag().is_some_and(Tag::is_list));
            let content: Vec<Node> = content.into_iter().cloned().collect();
            out.push_str(&inline::to_markdown_all(&content));
            out.push('\n');

            for child in nested {
                if let Node::Element(sub) = child {
                    self.write_list(sub, depth + 1, out);
                }
            }
        }
    }
}

/// Collapses every run of three or more newlines to two and drops blank
/// lines at either end. Spaces on content lines stay: `- ` is an empty list
/// item, `-` is a paragraph.
pub fn canonicalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    let lines: Vec<&str> = out.split('\n').collect();
    let blank = |line: &&str| line.trim().is_empty();
    let Some(first) = lines.iter().position(|l| !blank(l)) else {
        return String::new();
    };
    let last = lines.iter().rposition(|l| !blank(l)).unwrap_or(first);
    lines[first..=last].join("\n")
}
