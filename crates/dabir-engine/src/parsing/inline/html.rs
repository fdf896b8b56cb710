use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::tree::{Node, Tag};

/// HTML fragment for a run of inline nodes. Text and attribute values are
/// escaped; links open in a new tab.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_html(node, &mut out);
    }
    out
}

fn write_html(node: &Node, out: &mut String) {
    let el = match node {
        Node::Text(t) => {
            out.push_str(&encode_text(t));
            return;
        }
        Node::Element(el) => el,
    };
    let (open, close) = match &el.tag {
        Tag::Strong => ("<strong>".to_string(), "</strong>"),
        Tag::Emphasis => ("<em>".to_string(), "</em>"),
        Tag::Strikethrough => ("<del>".to_string(), "</del>"),
        Tag::Highlight => ("<mark>".to_string(), "</mark>"),
        Tag::InlineCode => ("<code>".to_string(), "</code>"),
        Tag::Link { href } => (
            format!(
                "<a href=\"{}\" target=\"_blank\">",
                encode_double_quoted_attribute(href)
            ),
            "</a>",
        ),
        Tag::Image { src, alt } => {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">",
                encode_double_quoted_attribute(src),
                encode_double_quoted_attribute(alt)
            ));
            return;
        }
        _ => (String::new(), ""),
    };
    out.push_str(&open);
    for child in &el.children {
        write_html(child, out);
    }
    out.push_str(close);
}
