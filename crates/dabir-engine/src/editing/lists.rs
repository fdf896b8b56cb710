use crate::{
    options::EditorOptions,
    surface::{NodeId, Surface},
    tree::Tag,
};

fn is_item<S: Surface>(s: &S, id: NodeId) -> bool {
    matches!(s.tag(id), Some(Tag::ListItem { .. }))
}

fn is_list<S: Surface>(s: &S, id: NodeId) -> bool {
    s.tag(id).is_some_and(Tag::is_list)
}

/// Number of lists enclosing `item`; 1 for a top-level item.
pub fn item_depth<S: Surface>(s: &S, item: NodeId) -> usize {
    s.ancestors(item)
        .into_iter()
        .filter(|a| is_list(s, *a))
        .count()
}

/// Levels of nested lists below `item`.
fn subtree_depth<S: Surface>(s: &S, item: NodeId) -> usize {
    s.children(item)
        .into_iter()
        .filter(|c| is_list(s, *c))
        .map(|list| {
            1 + s
                .children(list)
                .into_iter()
                .map(|i| subtree_depth(s, i))
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

fn depth_limit(list: &Tag, options: &EditorOptions) -> usize {
    match list {
        Tag::OrderedList { .. } => options.max_ordered_depth,
        _ => options.max_unordered_depth,
    }
}

/// The list nested directly in `item`, if any.
fn nested_list<S: Surface>(s: &S, item: NodeId) -> Option<NodeId> {
    s.children(item).into_iter().rev().find(|c| is_list(s, *c))
}

/// A fresh list of the same kind as `tag`; ordered lists restart at 1.
fn same_kind(tag: &Tag) -> Tag {
    match tag {
        Tag::OrderedList { .. } => Tag::OrderedList { start: 1 },
        other => other.clone(),
    }
}

/// Moves `item` into the nested list of its previous sibling, creating that
/// list with the parent list's kind when absent.
///
/// No-op without a previous sibling or when the move would take the item
/// (or its own nested items) past the depth limit. Returns whether the
/// tree changed.
pub fn indent<S: Surface>(s: &mut S, item: NodeId, options: &EditorOptions) -> bool {
    if !is_item(s, item) {
        return false;
    }
    let Some(list_tag) = s.parent(item).and_then(|l| s.tag(l)).cloned() else {
        return false;
    };
    let Some(prev) = s.previous_sibling(item) else {
        return false;
    };
    let target = nested_list(s, prev);
    let target_tag = target
        .and_then(|t| s.tag(t))
        .cloned()
        .unwrap_or_else(|| same_kind(&list_tag));
    let new_depth = item_depth(s, item) + 1 + subtree_depth(s, item);
    if new_depth > depth_limit(&target_tag, options) {
        log::trace!("indent refused at depth {new_depth}");
        return false;
    }

    let target = match target {
        Some(t) => t,
        None => {
            let list = s.create_element(target_tag);
            s.append_child(prev, list);
            list
        }
    };
    s.append_child(target, item);
    true
}

/// Moves `item` out of its nested list to just after the item that owns
/// the list. Items that followed it move along, nested under it, so the
/// reading order is unchanged. The old list is removed once empty.
pub fn outdent<S: Surface>(s: &mut S, item: NodeId) -> bool {
    if !is_item(s, item) {
        return false;
    }
    let Some(list) = s.parent(item) else {
        return false;
    };
    let Some(owner) = s.parent(list).filter(|o| is_item(s, *o)) else {
        return false;
    };
    let Some(list_tag) = s.tag(list).cloned() else {
        return false;
    };

    let following: Vec<NodeId> = s
        .children(list)
        .into_iter()
        .skip_while(|c| *c != item)
        .skip(1)
        .collect();
    s.insert_after(owner, item);
    if !following.is_empty() {
        let tail = match nested_list(s, item) {
            Some(existing) => existing,
            None => {
                let fresh = s.create_element(same_kind(&list_tag));
                s.append_child(item, fresh);
                fresh
            }
        };
        for id in following {
            s.append_child(tail, id);
        }
    }
    if s.children(list).is_empty() {
        s.remove(list);
    }
    true
}

/// Children of `item` other than its nested lists.
fn content<S: Surface>(s: &S, item: NodeId) -> Vec<NodeId> {
    s.children(item)
        .into_iter()
        .filter(|c| !is_list(s, *c))
        .collect()
}

fn content_len<S: Surface>(s: &S, item: NodeId) -> usize {
    content(s, item).into_iter().map(|c| s.text_len(c)).sum()
}

/// Whether `item` and everything nested in it hold only whitespace.
pub fn is_blank_item<S: Surface>(s: &S, item: NodeId) -> bool {
    s.read_text(item).trim().is_empty()
}

/// The item shown on the line just above the first line of `item`'s
/// following sibling: `item` itself or its deepest last nested item.
fn last_line<S: Surface>(s: &S, item: NodeId) -> NodeId {
    let mut current = item;
    while let Some(last) = nested_list(s, current).and_then(|l| s.children(l).last().copied()) {
        current = last;
    }
    current
}

fn caret_to_content_end<S: Surface>(s: &mut S, item: NodeId) {
    let end = content_len(s, item);
    s.set_cursor(item, end);
}

/// Puts `id` right before `anchor`.
fn insert_before<S: Surface>(s: &mut S, anchor: NodeId, id: NodeId) {
    match s.previous_sibling(anchor) {
        Some(prev) => s.insert_after(prev, id),
        None => {
            s.replace(anchor, id);
            s.insert_after(id, anchor);
        }
    }
}

/// Enter on a blank item. A nested item moves out one level. A top-level
/// item leaves the list as an empty line; items after it continue in a
/// list of the same kind below that line. Returns the node holding the
/// caret.
pub fn leave_blank<S: Surface>(s: &mut S, item: NodeId) -> Option<NodeId> {
    if !is_item(s, item) {
        return None;
    }
    if outdent(s, item) {
        s.set_cursor(item, 0);
        return Some(item);
    }
    let list = s.parent(item)?;
    let list_tag = s.tag(list)?.clone();
    let index = s.index_in_parent(item)?;
    let following: Vec<NodeId> = s.children(list).into_iter().skip(index + 1).collect();

    let line = s.create_element(Tag::Paragraph);
    s.insert_after(list, line);
    s.remove(item);
    if !following.is_empty() {
        let rest_tag = match list_tag {
            Tag::OrderedList { start } => Tag::OrderedList {
                start: start + index as u32 + 1,
            },
            other => other,
        };
        let rest = s.create_element(rest_tag);
        s.insert_after(line, rest);
        for id in following {
            s.append_child(rest, id);
        }
    }
    if s.children(list).is_empty() {
        s.remove(list);
    }
    s.set_cursor(line, 0);
    log::debug!("blank item {item:?} left its list");
    Some(line)
}

/// Backspace with the caret at the start of `item`'s text.
///
/// A blank item is removed and the caret goes to the line above: the
/// previous item, the owning item of a nested list, or a fresh empty line
/// before a top-level list. A non-blank first item of a top-level list
/// becomes a paragraph before the list. Any other non-blank item joins the
/// line above, separated by a space. Returns the node holding the caret,
/// or `None` when the item is a non-blank first nested item.
pub fn backspace_at_start<S: Surface>(s: &mut S, item: NodeId) -> Option<NodeId> {
    if !is_item(s, item) {
        return None;
    }
    let list = s.parent(item)?;
    let owner = s.parent(list).filter(|o| is_item(s, *o));
    let prev = s.previous_sibling(item);

    if is_blank_item(s, item) {
        s.remove(item);
        let target = match (prev, owner) {
            (Some(prev), _) => last_line(s, prev),
            (None, Some(owner)) => owner,
            (None, None) => {
                let line = s.create_element(Tag::Paragraph);
                insert_before(s, list, line);
                line
            }
        };
        if s.children(list).is_empty() {
            s.remove(list);
        }
        caret_to_content_end(s, target);
        log::debug!("blank item {item:?} removed");
        return Some(target);
    }

    match (prev, owner) {
        (None, Some(_)) => None,
        (None, None) => {
            let line = s.create_element(Tag::Paragraph);
            insert_before(s, list, line);
            for id in content(s, item) {
                s.append_child(line, id);
            }
            // nested items move up into the list the item leaves
            let mut anchor = None;
            for nested in s.children(item) {
                for sub in s.children(nested) {
                    match anchor {
                        Some(a) => s.insert_after(a, sub),
                        None => insert_before(s, item, sub),
                    }
                    anchor = Some(sub);
                }
            }
            s.remove(item);
            if s.children(list).is_empty() {
                s.remove(list);
            }
            s.set_cursor(line, 0);
            log::debug!("first item {item:?} became a paragraph");
            Some(line)
        }
        (Some(prev), _) => {
            let target = last_line(s, prev);
            let mut join = content_len(s, target);
            let ends_blank = s.read_text(target).chars().last().is_none_or(char::is_whitespace);
            if !ends_blank {
                let space = s.create_text(" ");
                match content(s, target).last().copied() {
                    Some(last) => s.insert_after(last, space),
                    None => s.append_child(target, space),
                }
                join += 1;
            }
            let anchor = content(s, target).last().copied();
            let mut after = anchor;
            for id in content(s, item) {
                match after {
                    Some(a) => s.insert_after(a, id),
                    None => s.append_child(target, id),
                }
                after = Some(id);
            }
            for nested in s.children(item) {
                s.append_child(target, nested);
            }
            s.remove(item);
            s.set_cursor(target, join);
            log::debug!("item {item:?} joined {target:?}");
            Some(target)
        }
    }
}

/// Flips a checklist item and gives every checklist item below it the same
/// state. Items without a checkbox are left alone.
pub fn toggle_checked<S: Surface>(s: &mut S, item: NodeId) -> bool {
    let Some(Tag::ListItem {
        checked: Some(current),
    }) = s.tag(item).cloned()
    else {
        return false;
    };
    let value = !current;
    s.set_tag(
        item,
        Tag::ListItem {
            checked: Some(value),
        },
    );
    cascade(s, item, value);
    true
}

fn cascade<S: Surface>(s: &mut S, id: NodeId, value: bool) {
    for child in s.children(id) {
        if matches!(s.tag(child), Some(Tag::ListItem { checked: Some(_) })) {
            s.set_tag(
                child,
                Tag::ListItem {
                    checked: Some(value),
                },
            );
        }
        cascade(s, child, value);
    }
}
