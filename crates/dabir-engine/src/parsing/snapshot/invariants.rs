use crate::tree::{Element, Node, Tag};

/// Panics with a description of the first structural violation found.
pub fn check(nodes: &[Node]) {
    for node in nodes {
        if let Node::Element(el) = node {
            check_element(el);
        }
    }
}

fn check_element(el: &Element) {
    match &el.tag {
        Tag::Heading { level } => {
            assert!((1..=4).contains(level), "heading level out of range: {level}");
        }
        Tag::Table { alignments } => {
            for row in &el.children {
                let row = row.as_element().expect("table child is not a row");
                assert_eq!(row.tag, Tag::TableRow, "table child is not a row");
                assert_eq!(
                    row.children.len(),
                    alignments.len(),
                    "row cell count differs from column count"
                );
            }
        }
        tag if tag.is_list() => {
            assert!(!el.children.is_empty(), "empty list");
            for item in &el.children {
                assert!(
                    matches!(item.tag(), Some(Tag::ListItem { .. })),
                    "list child is not an item: {item:?}"
                );
                if *tag == Tag::Checklist {
                    assert!(
                        matches!(item.tag(), Some(Tag::ListItem { checked: Some(_) })),
                        "checklist item without a checkbox"
                    );
                }
            }
        }
        Tag::VerseCouplet => {
            assert_eq!(el.children.len(), 2, "couplet must hold two hemistichs");
        }
        Tag::Admonition { .. } => {
            assert!(!el.children.is_empty(), "admonition without content");
        }
        _ => {}
    }
    check(&el.children);
}
