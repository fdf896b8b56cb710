//! # Editing Surface
//!
//! The seam between the editing core and whatever hosts the live tree. The
//! host owns rendering, input delivery and selection; the core only reads
//! and mutates the tree through these primitives.
//!
//! Offsets are counted in characters, never bytes.

use crate::tree::{Node, Tag};

/// Stable handle to a node in a live tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Read-only view of one live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Root,
    Text(&'a str),
    Element(&'a Tag),
}

/// A caret position: a node plus a character offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Caret(Position),
    Range {
        anchor: Position,
        focus: Position,
    },
}

/// Primitives a host editing surface provides.
///
/// Removing a node detaches it; its id stays valid for reinsertion, but
/// [`Surface::is_attached`] reports `false` until it is reattached.
pub trait Surface {
    fn root(&self) -> NodeId;
    fn node(&self, id: NodeId) -> Option<NodeKind<'_>>;
    fn parent(&self, id: NodeId) -> Option<NodeId>;
    fn children(&self, id: NodeId) -> Vec<NodeId>;
    /// Text of a leaf, or the concatenated text of an element's leaves.
    fn read_text(&self, id: NodeId) -> String;

    fn create_text(&mut self, content: &str) -> NodeId;
    fn create_element(&mut self, tag: Tag) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    /// Puts `new` where `old` is and detaches `old`.
    fn replace(&mut self, old: NodeId, new: NodeId);
    fn remove(&mut self, id: NodeId);
    fn insert_after(&mut self, anchor: NodeId, id: NodeId);
    fn set_text(&mut self, id: NodeId, content: &str);
    fn set_tag(&mut self, id: NodeId, tag: Tag);

    fn cursor(&self) -> Selection;
    /// Places a collapsed caret. Implementations descend into the deepest
    /// text leaf holding `offset` when `id` is an element.
    fn set_cursor(&mut self, id: NodeId, offset: usize);

    fn is_collapsed(&self) -> bool {
        matches!(self.cursor(), Selection::Caret(_))
    }

    fn caret(&self) -> Option<Position> {
        match self.cursor() {
            Selection::Caret(pos) => Some(pos),
            _ => None,
        }
    }

    fn tag(&self, id: NodeId) -> Option<&Tag> {
        match self.node(id)? {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id), Some(NodeKind::Text(_)))
    }

    /// Inclusive ancestor chain, innermost first, ending at the root if the
    /// node is attached.
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some() && self.ancestors(id).last() == Some(&self.root())
    }

    fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Innermost element (inclusive) whose tag satisfies `pred`.
    fn closest(&self, id: NodeId, pred: impl Fn(&Tag) -> bool) -> Option<NodeId>
    where
        Self: Sized,
    {
        self.ancestors(id)
            .into_iter()
            .find(|a| self.tag(*a).is_some_and(&pred))
    }

    /// The top-level block (a child of the root) holding `id`.
    fn block_of(&self, id: NodeId) -> Option<NodeId> {
        let root = self.root();
        self.ancestors(id)
            .into_iter()
            .find(|a| self.parent(*a) == Some(root))
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| *c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| *c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Text leaves below `id` in document order (`id` itself if it is one).
    fn text_leaves(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Some(NodeKind::Text(_)) => vec![id],
            Some(_) => self
                .children(id)
                .into_iter()
                .flat_map(|c| self.text_leaves(c))
                .collect(),
            None => vec![],
        }
    }

    fn text_len(&self, id: NodeId) -> usize {
        self.read_text(id).chars().count()
    }

    /// Character offset of `pos` within the flattened text of `container`.
    fn flat_offset(&self, container: NodeId, pos: Position) -> Option<usize> {
        let mut before = 0;
        for leaf in self.text_leaves(container) {
            if leaf == pos.node {
                return Some(before + pos.offset);
            }
            before += self.text_len(leaf);
        }
        (pos.node == container).then_some(pos.offset)
    }

    /// Materializes an owned subtree, returning its detached root.
    fn build(&mut self, node: &Node) -> NodeId {
        match node {
            Node::Text(t) => self.create_text(t),
            Node::Element(el) => {
                let id = self.create_element(el.tag.clone());
                for child in &el.children {
                    let c = self.build(child);
                    self.append_child(id, c);
                }
                id
            }
        }
    }

    /// Owned copy of a live subtree.
    fn snapshot(&self, id: NodeId) -> Node {
        match self.node(id) {
            Some(NodeKind::Text(t)) => Node::text(t),
            Some(NodeKind::Element(tag)) => Node::element(
                tag.clone(),
                self.children(id)
                    .into_iter()
                    .map(|c| self.snapshot(c))
                    .collect(),
            ),
            Some(NodeKind::Root) | None => Node::element(Tag::Paragraph, vec![]),
        }
    }

    /// Snapshot of every top-level block.
    fn snapshot_blocks(&self) -> Vec<Node> {
        self.children(self.root())
            .into_iter()
            .map(|c| self.snapshot(c))
            .collect()
    }

    /// Replaces `old` with freshly built `nodes`, in order, and returns the
    /// new ids. An empty slice just removes `old`.
    fn replace_with(&mut self, old: NodeId, nodes: &[Node]) -> Vec<NodeId> {
        let ids: Vec<NodeId> = nodes.iter().map(|n| self.build(n)).collect();
        match ids.first() {
            None => self.remove(old),
            Some(first) => {
                self.replace(old, *first);
                for pair in ids.windows(2) {
                    self.insert_after(pair[0], pair[1]);
                }
            }
        }
        ids
    }

    /// Follows a child-index path from a list of sibling ids.
    fn resolve_path(&self, tops: &[NodeId], path: &[usize]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut current = *tops.get(*first)?;
        for index in rest {
            current = *self.children(current).get(*index)?;
        }
        Some(current)
    }
}
