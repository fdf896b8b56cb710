use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::tree::{Alignment, Element, Node, Tag};

use super::inline;

/// Writing direction of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr => "ltr",
        }
    }
}

/// Direction of `text` from its first Latin or Arabic-script letter;
/// right-to-left when it has neither.
pub fn direction(text: &str) -> Direction {
    let arabic = |c: char| ('\u{0600}'..='\u{06FF}').contains(&c);
    match text.chars().find(|c| c.is_ascii_alphabetic() || arabic(*c)) {
        Some(c) if c.is_ascii_alphabetic() => Direction::Ltr,
        _ => Direction::Rtl,
    }
}

/// ` dir="…"` for an element's text.
fn dir_attr(node: &Node) -> String {
    format!(" dir=\"{}\"", direction(&node.text_content()).as_str())
}

/// HTML rendering of a block sequence, the shape a rich-text host shows.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_block(node, &mut out);
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn write_children(el: &Element, out: &mut String) {
    for child in &el.children {
        write_block(child, out);
    }
}

fn write_block(node: &Node, out: &mut String) {
    let el = match node {
        Node::Text(t) => {
            out.push_str(&encode_text(t));
            return;
        }
        Node::Element(el) if el.tag.is_inline() => {
            out.push_str(&inline::to_html(std::slice::from_ref(node)));
            return;
        }
        Node::Element(el) => el,
    };
    let dir = dir_attr(node);
    match &el.tag {
        Tag::Heading { level } => {
            out.push_str(&format!(
                "<h{level}{dir}>{}</h{level}>",
                inline::to_html(&el.children)
            ));
        }
        Tag::Paragraph | Tag::BlockquoteLine => {
            if el.children.is_empty() {
                out.push_str(&format!("<div{dir}><br></div>"));
            } else {
                out.push_str(&format!("<div{dir}>"));
                out.push_str(&inline::to_html(&el.children).replace('\n', "<br>"));
                out.push_str("</div>");
            }
        }
        Tag::HorizontalRule => out.push_str("<hr>"),
        Tag::Image { .. } => {
            out.push_str("<figure>");
            out.push_str(&inline::to_html(std::slice::from_ref(node)));
            out.push_str("</figure>");
        }
        Tag::Blockquote => {
            out.push_str(&format!("<blockquote{dir}>"));
            write_children(el, out);
            out.push_str("</blockquote>");
        }
        Tag::OrderedList { start } => {
            out.push_str(&format!("<ol start=\"{start}\">"));
            write_children(el, out);
            out.push_str("</ol>");
        }
        Tag::UnorderedList => {
            out.push_str("<ul>");
            write_children(el, out);
            out.push_str("</ul>");
        }
        Tag::Checklist => {
            out.push_str("<ul class=\"checklist\">");
            write_children(el, out);
            out.push_str("</ul>");
        }
        Tag::ListItem { checked } => {
            out.push_str(&format!("<li{dir}>"));
            if let Some(checked) = checked {
                let state = if *checked { " checked" } else { "" };
                out.push_str(&format!("<input type=\"checkbox\"{state}> "));
            }
            write_children(el, out);
            out.push_str("</li>");
        }
        Tag::CodeFence { lang } => {
            let class = if lang.is_empty() {
                String::new()
            } else {
                format!(" class=\"language-{}\"", encode_double_quoted_attribute(lang))
            };
            out.push_str(&format!(
                "<pre><code{class}>{}</code></pre>",
                encode_text(&node.text_content())
            ));
        }
        Tag::Table { alignments } => {
            out.push_str("<table>");
            for (r, row) in el.children.iter().filter_map(Node::as_element).enumerate() {
                let cell_tag = if r == 0 { "th" } else { "td" };
                out.push_str("<tr>");
                for (c, cell) in row.children.iter().filter_map(Node::as_element).enumerate() {
                    let align = match alignments.get(c).copied().unwrap_or_default() {
                        Alignment::Left => " style=\"text-align: left\"",
                        Alignment::Right => " style=\"text-align: right\"",
                        Alignment::Center => " style=\"text-align: center\"",
                        Alignment::None => "",
                    };
                    let text: String = cell.children.iter().map(Node::text_content).collect();
                    out.push_str(&format!(
                        "<{cell_tag}{align} dir=\"{}\">{}</{cell_tag}>",
                        direction(&text).as_str(),
                        inline::to_html(&cell.children)
                    ));
                }
                out.push_str("</tr>");
            }
            out.push_str("</table>");
        }
        Tag::Admonition { kind } => {
            out.push_str(&format!(
                "<div class=\"admonition {}\"{dir}><div class=\"admonition-title\">{}</div>",
                kind.name(),
                kind.persian()
            ));
            write_children(el, out);
            out.push_str("</div>");
        }
        Tag::Verse => {
            out.push_str(&format!("<div class=\"verse\"{dir}>"));
            write_children(el, out);
            out.push_str("</div>");
        }
        Tag::VerseCouplet => {
            out.push_str(&format!("<div class=\"couplet\"{dir}>"));
            write_children(el, out);
            out.push_str("</div>");
        }
        Tag::VerseLine => {
            out.push_str(&format!(
                "<span class=\"hemistich\">{}</span>",
                inline::to_html(&el.children)
            ));
        }
        _ => out.push_str(&inline::to_html(&el.children)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Markdown;

    use rstest::rstest;

    #[test]
    fn test_paragraphs_and_headings() {
        let md = Markdown::default();
        assert_eq!(
            md.to_html(&md.parse("# Title\n\nHello **world**")),
            "<h1 dir=\"ltr\">Title</h1>\n<div dir=\"ltr\">Hello <strong>world</strong></div>"
        );
    }

    #[test]
    fn test_checklist_items_get_checkboxes() {
        let md = Markdown::default();
        assert_eq!(
            md.to_html(&md.parse("- [x] done")),
            "<ul class=\"checklist\"><li dir=\"ltr\"><input type=\"checkbox\" checked> done</li></ul>"
        );
    }

    #[rstest]
    #[case("سلام world", Direction::Rtl)]
    #[case("1. hello سلام", Direction::Ltr)]
    #[case("۱۲۳ ...", Direction::Rtl)]
    #[case("", Direction::Rtl)]
    fn test_direction_follows_first_letter(#[case] text: &str, #[case] expected: Direction) {
        assert_eq!(direction(text), expected);
    }

    #[test]
    fn test_each_block_gets_its_own_direction() {
        let md = Markdown::default();
        let html = md.to_html(&md.parse("## عنوان\n\n| a | ب |\n| --- | --- |\n| 1 | 2 |"));
        assert!(html.starts_with("<h2 dir=\"rtl\">"));
        assert!(html.contains("<th dir=\"ltr\">a</th><th dir=\"rtl\">ب</th>"));
    }

    #[test]
    fn test_fence_content_is_escaped() {
        let md = Markdown::default();
        assert_eq!(
            md.to_html(&md.parse("```html\n<b>\n```")),
            "<pre><code class=\"language-html\">&lt;b&gt;</code></pre>"
        );
    }
}
