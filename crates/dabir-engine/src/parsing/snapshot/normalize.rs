use crate::tree::Node;

/// One line per node, two spaces of indent per depth. Text leaves are shown
/// quoted so whitespace is visible.
pub fn outline(nodes: &[Node]) -> String {
    let mut lines = vec![];
    for node in nodes {
        write(node, 0, &mut lines);
    }
    lines.join("\n")
}

fn write(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Text(t) => lines.push(format!("{indent}{t:?}")),
        Node::Element(el) => {
            lines.push(format!("{indent}{}", el.tag.label()));
            for child in &el.children {
                write(child, depth + 1, lines);
            }
        }
    }
}
