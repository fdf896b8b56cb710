use crate::surface::{NodeId, NodeKind, Position, Selection, Surface};

use super::{Node, Tag};

#[derive(Debug, Clone)]
enum Data {
    Root,
    Text(String),
    Element(Tag),
}

#[derive(Debug, Clone)]
struct Slot {
    data: Data,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory editing surface.
///
/// Nodes live in an arena of slots addressed by [`NodeId`]. Parent links are
/// maintained only by the mutation primitives. Detached nodes keep their
/// slot so a moved node keeps its id.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    selection: Selection,
}

impl Document {
    /// A document holding one empty line.
    pub fn new() -> Self {
        Self::from_nodes(&[])
    }

    /// Builds a document from parsed blocks. An empty block list yields a
    /// single empty paragraph so there is always a line to type on.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut doc = Self {
            slots: vec![Slot {
                data: Data::Root,
                parent: None,
                children: vec![],
            }],
            selection: Selection::None,
        };
        let root = doc.root();
        if nodes.is_empty() {
            let line = doc.create_element(Tag::Paragraph);
            doc.append_child(root, line);
        }
        for node in nodes {
            let id = doc.build(node);
            doc.append_child(root, id);
        }
        doc
    }

    /// Owned copy of the top-level blocks.
    pub fn to_nodes(&self) -> Vec<Node> {
        self.snapshot_blocks()
    }

    /// Sets a range selection.
    pub fn select(&mut self, anchor: Position, focus: Position) {
        self.selection = if anchor == focus {
            Selection::Caret(anchor)
        } else {
            Selection::Range { anchor, focus }
        };
    }

    /// First attached text leaf whose content contains `needle`.
    pub fn find_text(&self, needle: &str) -> Option<NodeId> {
        self.text_leaves(self.root())
            .into_iter()
            .find(|id| matches!(self.node(*id), Some(NodeKind::Text(t)) if t.contains(needle)))
    }

    /// First attached element with the given tag, in document order.
    pub fn find_element(&self, pred: impl Fn(&Tag) -> bool) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|id| self.tag(*id).is_some_and(&pred))
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        for child in self.children(id) {
            out.push(child);
            out.extend(self.descendants(child));
        }
        out
    }

    /// Inserts text at the caret, as a host does for ordinary typing.
    ///
    /// A caret resting on an element with no text leaf gets a fresh leaf.
    pub fn type_text(&mut self, text: &str) {
        let Some(pos) = self.caret() else {
            return;
        };
        let (leaf, offset) = match self.node(pos.node) {
            Some(NodeKind::Text(_)) => (pos.node, pos.offset),
            Some(_) => {
                let leaf = self.create_text("");
                self.append_child(pos.node, leaf);
                (leaf, 0)
            }
            None => return,
        };
        let mut content = self.read_text(leaf);
        let at = byte_index(&content, offset);
        content.insert_str(at, text);
        self.set_text(leaf, &content);
        self.selection = Selection::Caret(Position::new(leaf, offset + text.chars().count()));
    }

    /// Deletes the character before the caret inside its leaf.
    pub fn delete_backward(&mut self) {
        let Some(pos) = self.caret() else {
            return;
        };
        if pos.offset == 0 || !self.is_text(pos.node) {
            return;
        }
        let mut content = self.read_text(pos.node);
        let start = byte_index(&content, pos.offset - 1);
        let end = byte_index(&content, pos.offset);
        content.replace_range(start..end, "");
        self.set_text(pos.node, &content);
        self.selection = Selection::Caret(Position::new(pos.node, pos.offset - 1));
    }

    /// Splits the caret's line, as a host does for Enter.
    ///
    /// A list item is cut into a sibling item of the same kind, an unchecked
    /// one in a checklist. A paragraph is cut at the caret. Any other block
    /// gets an empty paragraph after it. The caret moves to the start of the
    /// new line.
    pub fn split_line(&mut self) {
        let Some(pos) = self.caret() else {
            return;
        };
        let Some(block) = self.block_of(pos.node) else {
            return;
        };
        if let Some(item) = self.closest(pos.node, |t| matches!(t, Tag::ListItem { .. })) {
            let checked = match self.tag(item) {
                Some(Tag::ListItem { checked: Some(_) }) => Some(false),
                _ => None,
            };
            let next = self.create_element(Tag::ListItem { checked });
            self.cut_into(item, pos, next);
            self.insert_after(item, next);
        } else if self.tag(block) == Some(&Tag::Paragraph) && self.is_text(pos.node) {
            let line = self.create_element(Tag::Paragraph);
            self.cut_into(block, pos, line);
            self.insert_after(block, line);
        } else {
            let line = self.create_element(Tag::Paragraph);
            self.insert_after(block, line);
            self.selection = Selection::Caret(Position::new(line, 0));
        }
    }

    /// Moves everything in `from` after `pos` into the empty element `to`:
    /// the tail of the caret's leaf becomes `to`'s first leaf, followed by
    /// the children after the one holding the caret. A caret on `from`
    /// itself moves only its nested lists.
    fn cut_into(&mut self, from: NodeId, pos: Position, to: NodeId) {
        let (tail, moved): (String, Vec<NodeId>) = if self.is_text(pos.node) {
            let content = self.read_text(pos.node);
            let (head, tail) = content.split_at(byte_index(&content, pos.offset));
            let tail = tail.to_string();
            self.set_text(pos.node, head);
            let moved = self
                .children(from)
                .into_iter()
                .skip_while(|c| !self.contains(*c, pos.node))
                .skip(1)
                .collect();
            (tail, moved)
        } else {
            let moved = self
                .children(from)
                .into_iter()
                .filter(|c| self.tag(*c).is_some_and(Tag::is_list))
                .collect();
            (String::new(), moved)
        };
        let first = self.create_text(&tail);
        self.append_child(to, first);
        for id in moved {
            self.append_child(to, id);
        }
        self.selection = Selection::Caret(Position::new(first, 0));
    }

    /// Collapses the caret onto a node without normalization.
    pub fn place_caret(&mut self, pos: Position) {
        self.selection = Selection::Caret(pos);
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.0)
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.slots.get(id.0).and_then(|s| s.parent) {
            self.slots[parent.0].children.retain(|c| *c != id);
        }
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.parent = None;
        }
    }

    fn push_slot(&mut self, data: Data) -> NodeId {
        self.slots.push(Slot {
            data,
            parent: None,
            children: vec![],
        });
        NodeId(self.slots.len() - 1)
    }
}

impl Surface for Document {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> Option<NodeKind<'_>> {
        self.slot(id).map(|s| match &s.data {
            Data::Root => NodeKind::Root,
            Data::Text(t) => NodeKind::Text(t),
            Data::Element(tag) => NodeKind::Element(tag),
        })
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.slot(id).map(|s| s.children.clone()).unwrap_or_default()
    }

    fn read_text(&self, id: NodeId) -> String {
        match self.slot(id).map(|s| &s.data) {
            Some(Data::Text(t)) => t.clone(),
            Some(_) => self
                .children(id)
                .into_iter()
                .map(|c| self.read_text(c))
                .collect(),
            None => String::new(),
        }
    }

    fn create_text(&mut self, content: &str) -> NodeId {
        self.push_slot(Data::Text(content.to_string()))
    }

    fn create_element(&mut self, tag: Tag) -> NodeId {
        self.push_slot(Data::Element(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.slots.len() || child.0 >= self.slots.len() || parent == child {
            return;
        }
        self.detach(child);
        self.slots[parent.0].children.push(child);
        self.slots[child.0].parent = Some(parent);
    }

    fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        let Some(parent) = self.parent(old) else {
            return;
        };
        self.detach(new);
        if let Some(index) = self.slots[parent.0].children.iter().position(|c| *c == old) {
            self.slots[parent.0].children[index] = new;
            self.slots[new.0].parent = Some(parent);
            self.slots[old.0].parent = None;
        }
    }

    fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    fn insert_after(&mut self, anchor: NodeId, id: NodeId) {
        if anchor == id || id.0 >= self.slots.len() {
            return;
        }
        let Some(parent) = self.parent(anchor) else {
            return;
        };
        self.detach(id);
        if let Some(index) = self.slots[parent.0].children.iter().position(|c| *c == anchor) {
            self.slots[parent.0].children.insert(index + 1, id);
            self.slots[id.0].parent = Some(parent);
        }
    }

    fn set_text(&mut self, id: NodeId, content: &str) {
        if let Some(Slot {
            data: Data::Text(t),
            ..
        }) = self.slots.get_mut(id.0)
        {
            *t = content.to_string();
        }
    }

    fn set_tag(&mut self, id: NodeId, tag: Tag) {
        if let Some(Slot {
            data: Data::Element(t),
            ..
        }) = self.slots.get_mut(id.0)
        {
            *t = tag;
        }
    }

    fn cursor(&self) -> Selection {
        self.selection
    }

    fn set_cursor(&mut self, id: NodeId, offset: usize) {
        let mut before = 0;
        for leaf in self.text_leaves(id) {
            let len = self.text_len(leaf);
            if offset <= before + len {
                self.selection = Selection::Caret(Position::new(leaf, offset - before));
                return;
            }
            before += len;
        }
        let last = self.text_leaves(id).last().copied();
        self.selection = match last {
            Some(leaf) => Selection::Caret(Position::new(leaf, self.text_len(leaf))),
            None => Selection::Caret(Position::new(id, 0)),
        };
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hello_world() -> Document {
        Document::from_nodes(&[Node::element(
            Tag::Paragraph,
            vec![
                Node::text("Hello "),
                Node::element(Tag::Strong, vec![Node::text("world")]),
            ],
        )])
    }

    #[test]
    fn test_build_and_snapshot_round_trip() {
        let doc = hello_world();
        assert_eq!(
            doc.to_nodes(),
            vec![Node::element(
                Tag::Paragraph,
                vec![
                    Node::text("Hello "),
                    Node::element(Tag::Strong, vec![Node::text("world")]),
                ],
            )]
        );
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let doc = Document::new();
        assert_eq!(doc.to_nodes(), vec![Node::element(Tag::Paragraph, vec![])]);
    }

    #[test]
    fn test_parent_links_follow_mutations() {
        let mut doc = hello_world();
        let strong = doc.find_element(|t| *t == Tag::Strong).unwrap();
        let leaf = doc.find_text("world").unwrap();
        assert_eq!(doc.parent(leaf), Some(strong));

        let raw = doc.create_text("**world**");
        doc.replace(strong, raw);

        assert!(!doc.is_attached(strong));
        assert!(doc.is_attached(raw));
        // detached subtree keeps its own links
        assert_eq!(doc.parent(leaf), Some(strong));
        assert_eq!(doc.read_text(doc.root()), "Hello **world**");
    }

    #[test]
    fn test_set_cursor_descends_into_leaves() {
        let mut doc = hello_world();
        let block = doc.children(doc.root())[0];
        doc.set_cursor(block, 8);
        let world = doc.find_text("world").unwrap();
        assert_eq!(doc.caret(), Some(Position::new(world, 2)));

        // boundary offsets land in the earlier leaf
        doc.set_cursor(block, 6);
        let hello = doc.find_text("Hello").unwrap();
        assert_eq!(doc.caret(), Some(Position::new(hello, 6)));
    }

    #[test]
    fn test_type_and_delete_count_characters() {
        let mut doc = Document::from_nodes(&[Node::element(
            Tag::Paragraph,
            vec![Node::text("سلام")],
        )]);
        let leaf = doc.find_text("سلام").unwrap();
        doc.set_cursor(leaf, 4);
        doc.type_text(" دنیا");
        assert_eq!(doc.read_text(leaf), "سلام دنیا");
        assert_eq!(doc.caret(), Some(Position::new(leaf, 9)));

        doc.delete_backward();
        assert_eq!(doc.read_text(leaf), "سلام دنی");
    }

    #[test]
    fn test_type_on_empty_line_creates_leaf() {
        let mut doc = Document::new();
        let line = doc.children(doc.root())[0];
        doc.set_cursor(line, 0);
        doc.type_text("x");
        assert_eq!(doc.read_text(line), "x");
    }

    #[test]
    fn test_split_line_moves_tail_and_following_nodes() {
        let mut doc = hello_world();
        let hello = doc.find_text("Hello").unwrap();
        doc.set_cursor(hello, 2);
        doc.split_line();

        assert_eq!(
            doc.to_nodes(),
            vec![
                Node::element(Tag::Paragraph, vec![Node::text("He")]),
                Node::element(
                    Tag::Paragraph,
                    vec![
                        Node::text("llo "),
                        Node::element(Tag::Strong, vec![Node::text("world")]),
                    ],
                ),
            ]
        );
        let caret = doc.caret().unwrap();
        assert_eq!(doc.read_text(caret.node), "llo ");
        assert_eq!(caret.offset, 0);
    }

    #[test]
    fn test_split_list_item_makes_sibling_item() {
        // Given a caret inside a checked item with a nested list
        let mut doc = Document::from_nodes(&[Node::element(
            Tag::Checklist,
            vec![Node::element(
                Tag::ListItem {
                    checked: Some(true),
                },
                vec![
                    Node::text("abcd"),
                    Node::element(
                        Tag::Checklist,
                        vec![Node::element(
                            Tag::ListItem {
                                checked: Some(true),
                            },
                            vec![Node::text("sub")],
                        )],
                    ),
                ],
            )],
        )]);
        let leaf = doc.find_text("abcd").unwrap();
        doc.set_cursor(leaf, 2);

        // When the line is split
        doc.split_line();

        // Then the tail and the nested list move to a new unchecked item
        let sub = Node::element(
            Tag::Checklist,
            vec![Node::element(
                Tag::ListItem {
                    checked: Some(true),
                },
                vec![Node::text("sub")],
            )],
        );
        assert_eq!(
            doc.to_nodes(),
            vec![Node::element(
                Tag::Checklist,
                vec![
                    Node::element(
                        Tag::ListItem {
                            checked: Some(true)
                        },
                        vec![Node::text("ab")]
                    ),
                    Node::element(
                        Tag::ListItem {
                            checked: Some(false)
                        },
                        vec![Node::text("cd"), sub]
                    ),
                ]
            )]
        );
        let caret = doc.caret().unwrap();
        assert_eq!(doc.read_text(caret.node), "cd");
        assert_eq!(caret.offset, 0);
    }

    #[test]
    fn test_split_at_end_of_plain_item_adds_empty_item() {
        let mut doc = Document::from_nodes(&[Node::element(
            Tag::UnorderedList,
            vec![Node::element(
                Tag::ListItem { checked: None },
                vec![Node::text("a")],
            )],
        )]);
        let leaf = doc.find_text("a").unwrap();
        doc.set_cursor(leaf, 1);

        doc.split_line();

        let list = doc.children(doc.root())[0];
        assert_eq!(doc.children(list).len(), 2);
        let caret = doc.caret().unwrap();
        assert_eq!(doc.tag(doc.parent(caret.node).unwrap()), Some(&Tag::ListItem { checked: None }));
    }

    #[test]
    fn test_select_collapses_equal_ends() {
        let mut doc = hello_world();
        let hello = doc.find_text("Hello").unwrap();
        doc.select(Position::new(hello, 1), Position::new(hello, 1));
        assert!(doc.is_collapsed());
        doc.select(Position::new(hello, 1), Position::new(hello, 3));
        assert!(!doc.is_collapsed());
    }

    #[test]
    fn test_replace_with_splices_in_order() {
        let mut doc = Document::from_nodes(&[Node::element(
            Tag::Paragraph,
            vec![Node::text("a **b** c")],
        )]);
        let leaf = doc.find_text("a **b** c").unwrap();
        let ids = doc.replace_with(
            leaf,
            &[
                Node::text("a "),
                Node::element(Tag::Strong, vec![Node::text("b")]),
                Node::text(" c"),
            ],
        );
        assert_eq!(ids.len(), 3);
        let block = doc.children(doc.root())[0];
        assert_eq!(doc.children(block), ids);
        assert_eq!(doc.resolve_path(&ids, &[1, 0]), doc.find_text("b"));
    }
}
