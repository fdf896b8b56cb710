use crate::{
    parsing::{Markdown, inline},
    surface::{NodeId, Position, Selection, Surface},
    tree::{Node, Tag},
};

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Inserts `text` verbatim at the caret.
fn insert_literal<S: Surface>(s: &mut S, pos: Position, text: &str) {
    let (leaf, offset) = if s.is_text(pos.node) {
        (pos.node, pos.offset)
    } else {
        let leaf = s.create_text("");
        s.append_child(pos.node, leaf);
        (leaf, 0)
    };
    let mut content = s.read_text(leaf);
    content.insert_str(byte_index(&content, offset), text);
    s.set_text(leaf, &content);
    s.set_cursor(leaf, offset + text.chars().count());
}

/// Cuts the caret's leaf in two and returns the leaf holding the tail,
/// placed right after the head. A caret on an element gets a fresh empty
/// leaf at its end.
fn split_leaf<S: Surface>(s: &mut S, pos: Position) -> NodeId {
    if !s.is_text(pos.node) {
        let leaf = s.create_text("");
        s.append_child(pos.node, leaf);
        return leaf;
    }
    let content = s.read_text(pos.node);
    let (head, tail) = content.split_at(byte_index(&content, pos.offset));
    let tail = s.create_text(tail);
    s.set_text(pos.node, head);
    s.insert_after(pos.node, tail);
    tail
}

/// Splits a paragraph at `pos` and returns the paragraph holding what
/// followed the caret, inserted after `block`. A caret inside formatting
/// splits after the formatted run.
fn split_paragraph<S: Surface>(s: &mut S, block: NodeId, pos: Position) -> NodeId {
    let tail = if s.parent(pos.node) == Some(block) {
        split_leaf(s, pos)
    } else {
        let leaf = s.create_text("");
        match s.children(block).into_iter().find(|c| s.contains(*c, pos.node)) {
            Some(run) => s.insert_after(run, leaf),
            None => s.append_child(block, leaf),
        }
        leaf
    };
    let moved: Vec<NodeId> = s
        .children(block)
        .into_iter()
        .skip_while(|c| !s.contains(*c, tail))
        .collect();
    let line = s.create_element(Tag::Paragraph);
    for id in moved {
        s.append_child(line, id);
    }
    s.insert_after(block, line);
    line
}

/// Drops the single-leaf range a paste replaces and returns the caret left
/// behind. Ranges spanning several nodes collapse to their focus.
fn collapse<S: Surface>(s: &mut S) -> Option<Position> {
    match s.cursor() {
        Selection::Caret(pos) => Some(pos),
        Selection::Range { anchor, focus } if anchor.node == focus.node && s.is_text(focus.node) => {
            let (start, end) = (anchor.offset.min(focus.offset), anchor.offset.max(focus.offset));
            let mut content = s.read_text(focus.node);
            content.replace_range(byte_index(&content, start)..byte_index(&content, end), "");
            s.set_text(focus.node, &content);
            s.set_cursor(focus.node, start);
            Some(Position::new(focus.node, start))
        }
        Selection::Range { focus, .. } => {
            s.set_cursor(focus.node, focus.offset);
            Some(focus)
        }
        Selection::None => None,
    }
}

/// Pastes plain text at the caret.
///
/// Inside a code fence or the raw leaf `raw` the text goes in verbatim.
/// Otherwise it is parsed: a single paragraph is spliced into the caret's
/// line, anything else becomes blocks after it, cutting a paragraph at the
/// caret. Returns the nodes created.
pub fn paste<S: Surface>(s: &mut S, md: &Markdown, text: &str, raw: Option<NodeId>) -> Vec<NodeId> {
    let Some(pos) = collapse(s) else {
        return vec![];
    };
    let literal = raw == Some(pos.node)
        || s.closest(pos.node, |t| matches!(t, Tag::CodeFence { .. })).is_some();
    if literal {
        insert_literal(s, pos, text);
        return vec![];
    }

    let blocks = md.parse(text);
    if let [Node::Element(el)] = blocks.as_slice()
        && el.tag == Tag::Paragraph
    {
        let tail = split_leaf(s, pos);
        let mut anchor = s.previous_sibling(tail);
        let mut ids = vec![];
        for node in &el.children {
            let id = s.build(node);
            match anchor {
                Some(a) => s.insert_after(a, id),
                None => {
                    s.replace(tail, id);
                    s.insert_after(id, tail);
                }
            }
            anchor = Some(id);
            ids.push(id);
        }
        s.set_cursor(tail, 0);
        log::debug!("pasted {} inline nodes", ids.len());
        return ids;
    }
    if blocks.is_empty() {
        return vec![];
    }

    let Some(block) = s.block_of(pos.node) else {
        return vec![];
    };
    let mut emptied = None;
    if s.tag(block) == Some(&Tag::Paragraph) {
        let tail = split_paragraph(s, block, pos);
        if s.text_len(tail) == 0 {
            s.remove(tail);
        }
        if s.text_len(block) == 0 {
            emptied = Some(block);
        }
    }
    let mut anchor = block;
    let mut ids = vec![];
    for node in &blocks {
        let id = s.build(node);
        s.insert_after(anchor, id);
        anchor = id;
        ids.push(id);
    }
    if let Some(line) = emptied {
        s.remove(line);
    }
    let end = s.text_len(anchor);
    s.set_cursor(anchor, end);
    log::debug!("pasted {} blocks", ids.len());
    ids
}

/// Inline nodes covering rendered characters `start..end` of `nodes`.
fn slice_inline(nodes: &[Node], start: usize, end: usize) -> Vec<Node> {
    let mut out = vec![];
    let mut at = 0;
    for node in nodes {
        let len = node.text_content().chars().count();
        let (from, to) = (start.max(at), end.min(at + len));
        if from < to || (len == 0 && start <= at && at < end) {
            match node {
                Node::Text(t) => {
                    out.push(Node::text(t.chars().skip(from - at).take(to - from).collect::<String>()))
                }
                Node::Element(el) => {
                    let children = slice_inline(&el.children, from - at, to - at);
                    out.push(Node::element(el.tag.clone(), children));
                }
            }
        }
        at += len;
    }
    out
}

/// Markdown of the selected content, or `None` for a collapsed caret.
///
/// Part of one paragraph or heading copies as inline Markdown. A selection
/// covering a whole block, or reaching across blocks, copies every block
/// it touches.
pub fn copy<S: Surface>(s: &S, md: &Markdown) -> Option<String> {
    let Selection::Range { anchor, focus } = s.cursor() else {
        return None;
    };
    let first = s.block_of(anchor.node)?;
    let last = s.block_of(focus.node)?;

    if first == last {
        let inline_block = matches!(s.tag(first), Some(Tag::Paragraph | Tag::Heading { .. }));
        let a = s.flat_offset(first, anchor)?;
        let f = s.flat_offset(first, focus)?;
        let (start, end) = (a.min(f), a.max(f));
        if inline_block && (start > 0 || end < s.text_len(first)) {
            let children: Vec<Node> = s.children(first).into_iter().map(|c| s.snapshot(c)).collect();
            return Some(inline::to_markdown_all(&slice_inline(&children, start, end)));
        }
        return Some(md.serialize(&[s.snapshot(first)]));
    }

    let tops = s.children(s.root());
    let i = tops.iter().position(|b| *b == first)?;
    let j = tops.iter().position(|b| *b == last)?;
    let blocks: Vec<Node> = tops[i.min(j)..=i.max(j)]
        .iter()
        .map(|b| s.snapshot(*b))
        .collect();
    Some(md.serialize(&blocks))
}
