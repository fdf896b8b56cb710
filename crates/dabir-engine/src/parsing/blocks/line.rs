use crate::{
    parsing::inline,
    tree::{Node, Tag},
};

use super::kinds::{BlockQuote, CodeFence, Heading, Image, ListItem, ListMarker, Rule};

/// Single-line block rules applied to a line being typed.
///
/// Tries heading, rule, image, list item, blockquote and fence opener, in
/// that order. The fence opener is the strict ```` ```lang ```` form.
pub fn parse_line(line: &str) -> Option<Node> {
    if let Some((level, content)) = Heading::parse(line) {
        return Some(Node::element(
            Tag::Heading { level },
            inline::render(content),
        ));
    }
    if Rule::matches(line) {
        return Some(Node::element(Tag::HorizontalRule, vec![]));
    }
    if let Some((alt, src)) = Image::parse(line) {
        return Some(Node::element(
            Tag::Image {
                src: src.to_string(),
                alt: alt.to_string(),
            },
            vec![],
        ));
    }
    if let Some(item) = ListItem::parse(line) {
        let list = match item.marker {
            ListMarker::Bullet if item.checked.is_some() => Tag::Checklist,
            ListMarker::Bullet => Tag::UnorderedList,
            ListMarker::Ordered(start) => Tag::OrderedList { start },
        };
        return Some(Node::element(
            list,
            vec![Node::element(
                Tag::ListItem {
                    checked: item.checked,
                },
                inline::render(item.content),
            )],
        ));
    }
    if let Some(content) = BlockQuote::strip(line) {
        return Some(Node::element(
            Tag::Blockquote,
            vec![Node::element(Tag::BlockquoteLine, inline::render(content))],
        ));
    }
    CodeFence::live_opens(line).map(|lang| {
        Node::element(
            Tag::CodeFence {
                lang: lang.to_string(),
            },
            vec![Node::text("")],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_keeps_trailing_space() {
        assert_eq!(
            parse_line("## Title "),
            Some(Node::element(
                Tag::Heading { level: 2 },
                vec![Node::text("Title ")]
            ))
        );
    }

    #[test]
    fn test_empty_bullet_opens_list() {
        assert_eq!(
            parse_line("- "),
            Some(Node::element(
                Tag::UnorderedList,
                vec![Node::element(Tag::ListItem { checked: None }, vec![])]
            ))
        );
    }

    #[test]
    fn test_checklist_item() {
        assert_eq!(
            parse_line("- [ ] buy milk"),
            Some(Node::element(
                Tag::Checklist,
                vec![Node::element(
                    Tag::ListItem {
                        checked: Some(false)
                    },
                    vec![Node::text("buy milk")]
                )]
            ))
        );
    }

    #[test]
    fn test_ordered_item_keeps_start() {
        let node = parse_line("۳. سه").unwrap();
        assert_eq!(node.tag(), Some(&Tag::OrderedList { start: 3 }));
    }

    #[test]
    fn test_quote_line() {
        assert_eq!(
            parse_line("> **said**"),
            Some(Node::element(
                Tag::Blockquote,
                vec![Node::element(
                    Tag::BlockquoteLine,
                    vec![Node::element(Tag::Strong, vec![Node::text("said")])]
                )]
            ))
        );
    }

    #[test]
    fn test_fence_opener() {
        assert_eq!(
            parse_line("```rust"),
            Some(Node::element(
                Tag::CodeFence {
                    lang: "rust".into()
                },
                vec![Node::text("")]
            ))
        );
        assert_eq!(parse_line("```rust fn"), None);
    }

    #[test]
    fn test_plain_text_is_no_match() {
        assert_eq!(parse_line("hello **world**"), None);
    }
}
