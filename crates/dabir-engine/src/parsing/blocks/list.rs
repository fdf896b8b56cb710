use crate::{
    parsing::inline,
    tree::{Element, Node, Tag},
};

use super::kinds::{ListLine, ListMarker};

/// One open list on the nesting stack.
#[derive(Debug)]
struct Frame {
    indent: usize,
    marker: ListMarker,
    tag: Tag,
    items: Vec<Element>,
}

impl Frame {
    fn open(line: &ListLine<'_>) -> Self {
        let tag = match line.marker {
            ListMarker::Bullet if line.checked.is_some() => Tag::Checklist,
            ListMarker::Bullet => Tag::UnorderedList,
            ListMarker::Ordered(start) => Tag::OrderedList { start },
        };
        Self {
            indent: line.indent,
            marker: line.marker,
            tag,
            items: vec![],
        }
    }

    fn into_node(self) -> Node {
        Node::element(self.tag, self.items.into_iter().map(Node::Element).collect())
    }
}

/// Builds nested lists from consecutive list lines.
///
/// Deeper indentation opens a child list under the previous item, shallower
/// indentation closes lists down to the matching level, and a marker-type
/// change at the same level closes the list and opens a sibling one.
#[derive(Debug, Default)]
pub struct ListBuilder {
    stack: Vec<Frame>,
    done: Vec<Node>,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &ListLine<'_>) {
        while self.stack.last().is_some_and(|top| line.indent < top.indent) {
            self.close_top();
        }

        let (opens_child, switches_kind) = match self.stack.last() {
            None => (false, false),
            Some(top) => (
                line.indent > top.indent,
                line.indent == top.indent && !top.marker.same_kind(line.marker),
            ),
        };
        if switches_kind {
            self.close_top();
        }
        if self.stack.is_empty() || opens_child || switches_kind {
            let frame = self.resume_nested(line).unwrap_or_else(|| Frame::open(line));
            self.stack.push(frame);
        }

        if let Some(top) = self.stack.last_mut() {
            top.items.push(Element {
                tag: Tag::ListItem {
                    checked: line.checked,
                },
                children: inline::render(line.content),
            });
        }
    }

    /// Lists built so far plus every still-open one.
    pub fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.done
    }

    /// Reopens the list already nested in the parent's last item when a
    /// dedent lands between two levels, so siblings stay in one list.
    fn resume_nested(&mut self, line: &ListLine<'_>) -> Option<Frame> {
        let parent = self.stack.last_mut()?;
        let item = parent.items.last_mut()?;
        let Some(Node::Element(nested)) = item.children.last() else {
            return None;
        };
        let resumable = nested.tag.is_list()
            && match line.marker {
                ListMarker::Bullet => !matches!(nested.tag, Tag::OrderedList { .. }),
                ListMarker::Ordered(_) => matches!(nested.tag, Tag::OrderedList { .. }),
            };
        if !resumable {
            return None;
        }
        let Some(Node::Element(nested)) = item.children.pop() else {
            return None;
        };
        Some(Frame {
            indent: line.indent,
            marker: line.marker,
            tag: nested.tag,
            items: nested
                .children
                .into_iter()
                .filter_map(|n| match n {
                    Node::Element(el) => Some(el),
                    Node::Text(_) => None,
                })
                .collect(),
        })
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = frame.into_node();
        match self.stack.last_mut().and_then(|p| p.items.last_mut()) {
            Some(item) => item.children.push(node),
            None => self.done.push(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::ListItem;
    use pretty_assertions::assert_eq;

    fn build(lines: &[&str]) -> Vec<Node> {
        let mut b = ListBuilder::new();
        for line in lines {
            b.push(&ListItem::parse(line).unwrap());
        }
        b.finish()
    }

    fn item(text: &str, nested: Vec<Node>) -> Node {
        let mut children = vec![Node::text(text)];
        children.extend(nested);
        Node::element(Tag::ListItem { checked: None }, children)
    }

    #[test]
    fn test_nested_bullets() {
        assert_eq!(
            build(&["- a", "  - b", "- c"]),
            vec![Node::element(
                Tag::UnorderedList,
                vec![
                    item("a", vec![Node::element(Tag::UnorderedList, vec![item("b", vec![])])]),
                    item("c", vec![]),
                ],
            )]
        );
    }

    #[test]
    fn test_marker_change_at_same_indent_opens_sibling_list() {
        assert_eq!(
            build(&["- a", "1. b"]),
            vec![
                Node::element(Tag::UnorderedList, vec![item("a", vec![])]),
                Node::element(Tag::OrderedList { start: 1 }, vec![item("b", vec![])]),
            ]
        );
    }

    #[test]
    fn test_ordered_child_under_bullet_nests() {
        assert_eq!(
            build(&["- a", "  3. b"]),
            vec![Node::element(
                Tag::UnorderedList,
                vec![item(
                    "a",
                    vec![Node::element(Tag::OrderedList { start: 3 }, vec![item("b", vec![])])]
                )],
            )]
        );
    }

    #[test]
    fn test_dedent_between_levels_joins_existing_child_list() {
        assert_eq!(
            build(&["- a", "    - b", "  - c"]),
            vec![Node::element(
                Tag::UnorderedList,
                vec![item(
                    "a",
                    vec![Node::element(
                        Tag::UnorderedList,
                        vec![item("b", vec![]), item("c", vec![])]
                    )]
                )],
            )]
        );
    }

    #[test]
    fn test_checklist_opened_by_checkbox_item() {
        let lists = build(&["- [ ] x", "- [x] y"]);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].tag(), Some(&Tag::Checklist));
        let items = &lists[0].as_element().unwrap().children;
        assert_eq!(items[1].tag(), Some(&Tag::ListItem { checked: Some(true) }));
    }
}
