use crate::{
    parsing::{
        Markdown,
        blocks::kinds::{BlockQuote, Heading},
        inline,
    },
    surface::{NodeId, Position, Selection, Surface},
    tree::{Node, Tag},
};

/// What a raw leaf stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Inline formatting; the leaf replaced the element in place.
    Inline,
    /// A heading; the leaf sits in a paragraph that replaced the heading.
    Heading,
    /// A blockquote or admonition unwrapped by Backspace; the leaf holds
    /// every line of it and sits in a paragraph that replaced the block.
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Idle,
    Raw { node: NodeId, origin: Origin },
}

/// Swaps rendered formatting for its Markdown source while the caret is
/// inside it, and back once the caret leaves.
///
/// At most one raw leaf exists at a time and the state always names it.
#[derive(Debug, Default)]
pub struct RevealCommit {
    state: RevealState,
    /// Caret parked by an explicit commit; no reveal until it moves.
    suppressed_at: Option<Position>,
}

impl RevealCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// The raw leaf, if one is active.
    pub fn active(&self) -> Option<NodeId> {
        match self.state {
            RevealState::Raw { node, .. } => Some(node),
            RevealState::Idle => None,
        }
    }

    pub fn is_raw(&self, id: NodeId) -> bool {
        self.active() == Some(id)
    }

    /// Clears the slot when the host removed the raw leaf behind our back.
    pub fn sync<S: Surface>(&mut self, s: &S) {
        if let Some(node) = self.active()
            && !s.is_attached(node)
        {
            log::debug!("raw node {node:?} removed by host");
            self.state = RevealState::Idle;
        }
    }

    /// Reacts to a caret or selection move. Commits a raw leaf the caret
    /// left, then reveals the node the caret entered. Returns the nodes that
    /// were created.
    pub fn on_selection_change<S: Surface>(&mut self, s: &mut S, md: &Markdown) -> Vec<NodeId> {
        self.sync(s);
        let pos = match s.cursor() {
            Selection::Caret(pos) => pos,
            Selection::Range { .. } => return self.commit(s, md),
            Selection::None => return vec![],
        };
        if self.suppressed_at == Some(pos) {
            return vec![];
        }
        self.suppressed_at = None;

        let mut changed = vec![];
        if let RevealState::Raw { node, origin } = self.state {
            if s.contains(self.region(s, node, origin), pos.node) {
                return vec![];
            }
            changed = self.commit(s, md);
        }
        if let Some(target) = revealable_at(s, pos.node) {
            changed.extend(self.reveal(s, target, pos));
        }
        changed
    }

    /// Focus left the surface.
    pub fn on_blur<S: Surface>(&mut self, s: &mut S, md: &Markdown) -> Vec<NodeId> {
        self.sync(s);
        self.commit(s, md)
    }

    /// Explicit commit (Escape). The caret stays inside the re-rendered
    /// node and is not revealed again until it moves.
    pub fn cancel<S: Surface>(&mut self, s: &mut S, md: &Markdown) -> Vec<NodeId> {
        self.sync(s);
        if self.active().is_none() {
            return vec![];
        }
        let changed = self.commit(s, md);
        self.suppressed_at = s.caret();
        changed
    }

    /// Replaces `target` with a raw leaf holding its Markdown source and
    /// maps the caret into it.
    pub fn reveal<S: Surface>(&mut self, s: &mut S, target: NodeId, caret: Position) -> Option<NodeId> {
        let tag = s.tag(target)?.clone();
        if !tag.is_revealable() {
            return None;
        }
        let snapshot = s.snapshot(target);
        let (source, map) = inline::to_markdown_mapped(std::slice::from_ref(&snapshot));
        let rendered = s.flat_offset(target, caret).unwrap_or(0);
        let offset = map.to_source(rendered);

        let raw = s.create_text(&source);
        let origin = if matches!(tag, Tag::Heading { .. }) {
            let line = s.create_element(Tag::Paragraph);
            s.append_child(line, raw);
            s.replace(target, line);
            Origin::Heading
        } else {
            s.replace(target, raw);
            Origin::Inline
        };
        s.set_cursor(raw, offset);
        log::debug!("reveal {} as {source:?}", tag.label());
        self.state = RevealState::Raw { node: raw, origin };
        Some(raw)
    }

    /// Shows a blockquote or admonition as one raw leaf holding all its
    /// lines, so its markers can be edited away. A blockquote loses the
    /// space after its first `>` and the caret sits after that `>`; an
    /// admonition keeps its text and the caret sits at the start.
    pub fn unwrap_block<S: Surface>(&mut self, s: &mut S, md: &Markdown, block: NodeId) -> Option<NodeId> {
        let tag = s.tag(block)?.clone();
        let mut source = md.serialize(&[s.snapshot(block)]);
        let caret = match tag {
            Tag::Blockquote => {
                if let Some(rest) = source.strip_prefix(BlockQuote::PREFIX) {
                    source = format!(">{rest}");
                }
                1
            }
            Tag::Admonition { .. } => 0,
            _ => return None,
        };
        self.commit(s, md);
        self.suppressed_at = None;

        let raw = s.create_text(&source);
        let line = s.create_element(Tag::Paragraph);
        s.append_child(line, raw);
        s.replace(block, line);
        s.set_cursor(raw, caret);
        log::debug!("unwrap {} as {source:?}", tag.label());
        self.state = RevealState::Raw {
            node: raw,
            origin: Origin::Block,
        };
        Some(raw)
    }

    /// Re-renders the raw leaf and clears the slot. Empty source removes the
    /// leaf. A caret inside the leaf is mapped into the new nodes.
    pub fn commit<S: Surface>(&mut self, s: &mut S, md: &Markdown) -> Vec<NodeId> {
        let RevealState::Raw { node, origin } = std::mem::take(&mut self.state) else {
            return vec![];
        };
        if !s.is_attached(node) {
            return vec![];
        }
        let text = s.read_text(node);
        let caret = s.caret().filter(|p| p.node == node).map(|p| p.offset);
        let line = s.parent(node);

        if text.trim().is_empty() {
            log::debug!("commit empty raw node {node:?}");
            s.remove(node);
            if let (Origin::Heading | Origin::Block, Some(line), Some(_)) = (origin, line, caret) {
                s.set_cursor(line, 0);
            }
            return vec![];
        }

        let nodes = match origin {
            Origin::Inline => inline::render(&text),
            Origin::Heading => vec![heading_line(&text)],
            Origin::Block => md.parse(&spaced_quote_markers(&text)),
        };
        let (target, unchanged) = match origin {
            Origin::Inline => (node, nodes == [Node::text(&text)]),
            Origin::Heading | Origin::Block => (
                line.unwrap_or(node),
                nodes == [Node::element(Tag::Paragraph, vec![Node::text(&text)])],
            ),
        };
        if unchanged {
            log::debug!("commit {text:?} as literal text");
            return vec![];
        }

        let tops = s.replace_with(target, &nodes);
        if origin == Origin::Block {
            if caret.is_some()
                && let Some(first) = tops.first()
            {
                s.set_cursor(*first, 0);
            }
        } else if let Some(offset) = caret {
            let (_, map) = inline::to_markdown_mapped(&nodes);
            let located = map
                .locate(offset)
                .and_then(|(path, at)| Some((s.resolve_path(&tops, path)?, at)));
            match located {
                Some((leaf, at)) => s.set_cursor(leaf, at),
                None => {
                    if let Some(first) = tops.first() {
                        s.set_cursor(*first, 0);
                    }
                }
            }
        }
        log::debug!("commit {text:?} into {} nodes", tops.len());
        tops
    }

    /// The subtree the raw source occupies.
    fn region<S: Surface>(&self, s: &S, node: NodeId, origin: Origin) -> NodeId {
        match origin {
            Origin::Inline => node,
            Origin::Heading | Origin::Block => s.parent(node).unwrap_or(node),
        }
    }
}

/// Gives every line opened by a bare `>` the space a quoted line needs.
fn spaced_quote_markers(text: &str) -> String {
    text.split('\n')
        .map(|line| match line.strip_prefix('>') {
            Some(rest) if !rest.starts_with(' ') => format!("{}{rest}", BlockQuote::PREFIX),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The outermost revealable element holding `id`, unless it sits in a
/// code fence, table, blockquote or admonition.
fn revealable_at<S: Surface>(s: &S, id: NodeId) -> Option<NodeId> {
    let chain = s.ancestors(id);
    if chain
        .iter()
        .any(|a| s.tag(*a).is_some_and(Tag::is_opaque_container))
    {
        return None;
    }
    chain
        .into_iter()
        .filter(|a| s.tag(*a).is_some_and(Tag::is_revealable))
        .last()
}

/// A committed heading line: still a heading when the marker survived,
/// otherwise a paragraph with inline content.
fn heading_line(text: &str) -> Node {
    match Heading::parse(text) {
        Some((level, content)) => Node::element(Tag::Heading { level }, inline::render(content)),
        None => Node::element(Tag::Paragraph, inline::render(text)),
    }
}
