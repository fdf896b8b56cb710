use crate::{
    parsing::{Markdown, blocks::kinds::ListItem, inline},
    surface::{NodeId, Surface},
    tree::{Node, Tag},
};

/// The boundary that scheduled a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A word boundary on the caret's block.
    Space,
    /// A line boundary; the block is the line before the new one.
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub block: NodeId,
    pub trigger: Trigger,
}

/// Converts typed Markdown into rendered nodes once a boundary is reached.
///
/// Passes are deferred: the host applies its own edit first, then calls
/// [`Detector::run_pending`]. Only the latest trigger is kept.
#[derive(Debug, Default)]
pub struct Detector {
    pending: Option<Pending>,
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn schedule(&mut self, block: NodeId, trigger: Trigger) {
        let next = Pending { block, trigger };
        match self.pending.replace(next) {
            Some(old) if old.block == block => log::trace!("pass on {block:?} superseded"),
            Some(old) => log::trace!("pass on {:?} cancelled for {block:?}", old.block),
            None => log::trace!("pass scheduled on {block:?} for {trigger:?}"),
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Runs and clears the pending pass. `raw` is the leaf currently shown
    /// as source, which is never converted. Returns the nodes created.
    pub fn run_pending<S: Surface>(
        &mut self,
        s: &mut S,
        md: &Markdown,
        raw: Option<NodeId>,
    ) -> Vec<NodeId> {
        let Some(Pending { block, trigger }) = self.pending.take() else {
            return vec![];
        };
        if !s.is_attached(block) {
            log::trace!("pass on {block:?} dropped: block removed");
            return vec![];
        }
        match trigger {
            Trigger::Space => on_space(s, md, block, raw),
            Trigger::Enter => on_enter(s, md, block, raw),
        }
    }
}

fn on_space<S: Surface>(s: &mut S, md: &Markdown, block: NodeId, raw: Option<NodeId>) -> Vec<NodeId> {
    let holds_raw = raw.is_some_and(|r| s.contains(block, r));
    if s.tag(block) == Some(&Tag::Paragraph) && !holds_raw {
        let source = paragraph_source(s, block);
        if !source.contains('\n')
            && let Some(node) = md.parse_line(&source)
        {
            return convert_line(s, block, node);
        }
    }
    if let Some(item) = checkbox_prefix(s, block) {
        return vec![item];
    }
    scan_block(s, block, raw)
}

fn on_enter<S: Surface>(s: &mut S, md: &Markdown, target: NodeId, raw: Option<NodeId>) -> Vec<NodeId> {
    if s.tag(target) == Some(&Tag::Paragraph) && !raw.is_some_and(|r| s.contains(target, r)) {
        if let Some(ids) = lookbehind(s, md, target) {
            return ids;
        }
        let source = paragraph_source(s, target);
        if !source.contains('\n')
            && let Some(node) = md.parse_line(&source)
        {
            return convert_previous_line(s, target, node);
        }
    }
    scan_block(s, target, raw)
}

/// The Markdown a paragraph was typed as.
fn paragraph_source<S: Surface>(s: &S, block: NodeId) -> String {
    let children: Vec<Node> = s.children(block).into_iter().map(|c| s.snapshot(c)).collect();
    inline::to_markdown_all(&children)
}

/// Replaces the caret's line with a parsed block and puts the caret at the
/// end of its editable text.
fn convert_line<S: Surface>(s: &mut S, block: NodeId, node: Node) -> Vec<NodeId> {
    let mut ids = s.replace_with(block, std::slice::from_ref(&node));
    let Some(new) = ids.first().copied() else {
        return ids;
    };
    log::debug!("line became {}", node.tag().map(Tag::label).unwrap_or_default());
    let target = match node.tag() {
        Some(tag) if tag.is_list() || *tag == Tag::Blockquote => {
            s.children(new).first().copied().unwrap_or(new)
        }
        Some(Tag::HorizontalRule | Tag::Image { .. }) => {
            let line = s.create_element(Tag::Paragraph);
            s.insert_after(new, line);
            ids.push(line);
            line
        }
        _ => new,
    };
    let end = s.text_len(target);
    s.set_cursor(target, end);
    ids
}

/// Replaces the line before the caret's new line. A fence opener also
/// takes over the new line: the caret moves into the fence.
fn convert_previous_line<S: Surface>(s: &mut S, target: NodeId, node: Node) -> Vec<NodeId> {
    let is_fence = matches!(node.tag(), Some(Tag::CodeFence { .. }));
    let ids = s.replace_with(target, std::slice::from_ref(&node));
    let Some(new) = ids.first().copied() else {
        return ids;
    };
    log::debug!("line became {}", node.tag().map(Tag::label).unwrap_or_default());
    if is_fence {
        if let Some(next) = s.next_sibling(new)
            && s.tag(next) == Some(&Tag::Paragraph)
            && s.text_len(next) == 0
        {
            s.remove(next);
        }
        s.set_cursor(new, 0);
    }
    ids
}

/// Re-offers the paragraph lines ending at `target` to the block plugins.
/// A closed construct whose last line is `target` replaces those lines.
fn lookbehind<S: Surface>(s: &mut S, md: &Markdown, target: NodeId) -> Option<Vec<NodeId>> {
    let mut run = vec![target];
    let mut current = target;
    while run.len() < md.options().lookbehind
        && let Some(prev) = s.previous_sibling(current)
        && s.tag(prev) == Some(&Tag::Paragraph)
    {
        run.push(prev);
        current = prev;
    }
    run.reverse();

    let mut lines: Vec<String> = vec![];
    let mut starts = vec![];
    for paragraph in &run {
        starts.push(lines.len());
        lines.extend(
            paragraph_source(s, *paragraph)
                .split('\n')
                .map(str::to_string),
        );
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    for (i, start) in starts.iter().enumerate() {
        let Some(consumed) = md.registry().recognize(&refs, *start, md) else {
            continue;
        };
        if !consumed.terminated || consumed.last + 1 != refs.len() {
            continue;
        }
        for paragraph in &run[i + 1..] {
            s.remove(*paragraph);
        }
        log::debug!(
            "lines {}..{} became a block of {} nodes",
            start,
            refs.len(),
            consumed.nodes.len()
        );
        return Some(s.replace_with(run[i], &consumed.nodes));
    }
    None
}

/// `- [ ] ` typed on a plain bullet turns the item into a checklist item.
fn checkbox_prefix<S: Surface>(s: &mut S, block: NodeId) -> Option<NodeId> {
    let caret = s.caret()?;
    if !s.contains(block, caret.node) || !s.is_text(caret.node) {
        return None;
    }
    let item = s.closest(caret.node, |t| matches!(t, Tag::ListItem { checked: None }))?;
    let leaf = *s.children(item).first()?;
    if leaf != caret.node {
        return None;
    }
    let text = s.read_text(leaf);
    let (checked, rest) = ListItem::split_checkbox(&text);
    let checked = checked?;
    let prefix = text.len() - rest.len();
    if !text[..prefix].ends_with(' ') {
        return None;
    }

    let rest = rest.to_string();
    let prefix_chars = text[..prefix].chars().count();
    s.set_text(leaf, &rest);
    s.set_tag(item, Tag::ListItem { checked: Some(checked) });
    s.set_cursor(leaf, caret.offset.saturating_sub(prefix_chars));

    if let Some(list) = s.parent(item)
        && s.tag(list) == Some(&Tag::UnorderedList)
        && s
            .children(list)
            .into_iter()
            .all(|i| matches!(s.tag(i), Some(Tag::ListItem { checked: Some(_) })))
    {
        s.set_tag(list, Tag::Checklist);
    }
    log::debug!("item became a checklist item");
    Some(item)
}

/// Leaves the inline transcoder may rewrite: not raw and not already inside
/// formatting or code.
fn eligible<S: Surface>(s: &S, leaf: NodeId, raw: Option<NodeId>) -> bool {
    raw != Some(leaf)
        && !s.ancestors(leaf).into_iter().any(|a| {
            s.tag(a)
                .is_some_and(|t| t.is_inline() || matches!(t, Tag::CodeFence { .. }))
        })
}

/// Renders every eligible text run of `block` that holds complete inline
/// Markdown. A run whose match the caret is still inside is left alone.
fn scan_block<S: Surface>(s: &mut S, block: NodeId, raw: Option<NodeId>) -> Vec<NodeId> {
    let caret = s.caret();
    let mut changed = vec![];
    for leaf in s.text_leaves(block) {
        if !eligible(s, leaf, raw) {
            continue;
        }
        let text = s.read_text(leaf);
        let mut nodes = inline::render(&text);
        if !nodes.iter().any(|n| matches!(n, Node::Element(_))) {
            continue;
        }
        let (_, map) = inline::to_markdown_mapped(&nodes);
        let at = caret.filter(|p| p.node == leaf).map(|p| p.offset);
        if at.is_some_and(|o| map.inside_markup(o)) {
            continue;
        }
        let anchor = at == Some(map.source_len()) && matches!(nodes.last(), Some(Node::Element(_)));
        if anchor {
            nodes.push(Node::text(""));
        }

        let tops = s.replace_with(leaf, &nodes);
        log::debug!("rendered {text:?} into {} nodes", tops.len());
        if let Some(offset) = at {
            if anchor {
                if let Some(last) = tops.last() {
                    s.set_cursor(*last, 0);
                }
            } else {
                let located = map
                    .locate(offset)
                    .and_then(|(path, o)| Some((s.resolve_path(&tops, path)?, o)));
                if let Some((target, o)) = located {
                    s.set_cursor(target, o);
                }
            }
        }
        changed.extend(tops);
    }
    changed
}
