use crate::{
    parsing::inline,
    tree::{Node, Tag},
};

use super::{
    classify::LineClass,
    kinds::CodeFence,
    list::ListBuilder,
    open::BlockOpen,
};

#[derive(Debug)]
enum LeafState<'a> {
    None,
    Paragraph { lines: Vec<&'a str> },
    Quote { lines: Vec<&'a str> },
    List(ListBuilder),
    Fence { lang: &'a str, lines: Vec<&'a str> },
}

/// Phase 2 of block parsing: turns classified lines into block nodes.
///
/// Paragraph, blockquote and list runs stay open across lines until a line
/// that cannot continue them arrives; fences swallow every line up to their
/// closer.
pub struct BlockBuilder<'a> {
    leaf: LeafState<'a>,
    out: Vec<Node>,
    /// The previous line was blank.
    after_blank: bool,
}

impl<'a> BlockBuilder<'a> {
    pub fn new() -> Self {
        Self {
            leaf: LeafState::None,
            out: vec![],
            after_blank: false,
        }
    }

    pub fn push(&mut self, c: &LineClass<'a>) {
        if self.in_fence() {
            self.consume_fence_line(c.text);
            return;
        }

        if c.is_blank {
            if matches!(self.leaf, LeafState::None) {
                // the first blank after a block only separates it
                if self.after_blank {
                    self.out.push(Node::element(Tag::Paragraph, vec![]));
                }
            } else {
                self.flush();
            }
            self.after_blank = true;
            return;
        }
        self.after_blank = false;

        match c.open {
            Some(BlockOpen::Quote { content }) => {
                if !matches!(self.leaf, LeafState::Quote { .. }) {
                    self.flush();
                    self.leaf = LeafState::Quote { lines: vec![] };
                }
                if let LeafState::Quote { lines } = &mut self.leaf {
                    lines.push(content);
                }
            }
            Some(BlockOpen::ListItem(item)) => {
                if !matches!(self.leaf, LeafState::List(_)) {
                    self.flush();
                    self.leaf = LeafState::List(ListBuilder::new());
                }
                if let LeafState::List(list) = &mut self.leaf {
                    list.push(&item);
                }
            }
            Some(BlockOpen::FencedCode { lang }) => {
                self.flush();
                self.leaf = LeafState::Fence { lang, lines: vec![] };
            }
            Some(BlockOpen::Heading { level, content }) => {
                self.flush();
                self.out.push(Node::element(
                    Tag::Heading { level },
                    inline::render(content),
                ));
            }
            Some(BlockOpen::Rule) => {
                self.flush();
                self.out.push(Node::element(Tag::HorizontalRule, vec![]));
            }
            Some(BlockOpen::Image { alt, src }) => {
                self.flush();
                self.out.push(Node::element(
                    Tag::Image {
                        src: src.to_string(),
                        alt: alt.to_string(),
                    },
                    vec![],
                ));
            }
            None => {
                if let LeafState::Paragraph { lines } = &mut self.leaf {
                    lines.push(c.text);
                } else {
                    self.flush();
                    self.leaf = LeafState::Paragraph {
                        lines: vec![c.text],
                    };
                }
            }
        }
    }

    /// Whether `c` extends the open blockquote, list or fence run. Block
    /// plugins are not consulted for such lines.
    pub fn continues(&self, c: &LineClass<'_>) -> bool {
        match self.leaf {
            LeafState::Fence { .. } => true,
            LeafState::Quote { .. } => c.is_quote(),
            LeafState::List(_) => c.is_list_item(),
            LeafState::None | LeafState::Paragraph { .. } => false,
        }
    }

    /// Appends blocks produced outside the builder, closing any open run.
    pub fn emit(&mut self, nodes: Vec<Node>) {
        self.flush();
        self.out.extend(nodes);
        self.after_blank = false;
    }

    pub fn finish(mut self) -> Vec<Node> {
        // an unterminated fence keeps what it has
        self.flush();
        self.out
    }

    pub fn in_fence(&self) -> bool {
        matches!(self.leaf, LeafState::Fence { .. })
    }

    fn consume_fence_line(&mut self, line: &'a str) {
        if CodeFence::closes(line) {
            self.flush();
        } else if let LeafState::Fence { lines, .. } = &mut self.leaf {
            lines.push(line);
        }
    }

    fn flush(&mut self) {
        let node = match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => return,
            LeafState::Paragraph { lines } => {
                Node::element(Tag::Paragraph, inline::render(&lines.join("\n")))
            }
            LeafState::Quote { lines } => Node::element(
                Tag::Blockquote,
                lines
                    .into_iter()
                    .map(|l| Node::element(Tag::BlockquoteLine, inline::render(l)))
                    .collect(),
            ),
            LeafState::List(list) => {
                self.out.extend(list.finish());
                return;
            }
            LeafState::Fence { lang, lines } => Node::element(
                Tag::CodeFence {
                    lang: lang.to_string(),
                },
                vec![Node::text(lines.join("\n"))],
            ),
        };
        self.out.push(node);
    }
}

impl Default for BlockBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
