use super::kinds::{BlockQuote, CodeFence, Heading, Image, ListItem, ListLine, Rule};

/// A block a single line opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOpen<'a> {
    Heading { level: u8, content: &'a str },
    Rule,
    Quote { content: &'a str },
    Image { alt: &'a str, src: &'a str },
    ListItem(ListLine<'a>),
    FencedCode { lang: &'a str },
}

/// Tries each opener in precedence order: heading, rule, blockquote,
/// image, list item, fence.
pub fn try_open_leaf(line: &str) -> Option<BlockOpen<'_>> {
    if let Some((level, content)) = Heading::parse(line) {
        return Some(BlockOpen::Heading { level, content });
    }
    if Rule::matches(line) {
        return Some(BlockOpen::Rule);
    }
    if let Some(content) = BlockQuote::strip(line) {
        return Some(BlockOpen::Quote { content });
    }
    if let Some((alt, src)) = Image::parse(line) {
        return Some(BlockOpen::Image { alt, src });
    }
    if let Some(item) = ListItem::parse(line) {
        return Some(BlockOpen::ListItem(item));
    }
    CodeFence::opens(line).map(|lang| BlockOpen::FencedCode { lang })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::ListMarker;

    #[test]
    fn test_heading_beats_everything() {
        assert_eq!(
            try_open_leaf("# - not a list"),
            Some(BlockOpen::Heading {
                level: 1,
                content: "- not a list"
            })
        );
    }

    #[test]
    fn test_rule_is_not_a_list() {
        assert_eq!(try_open_leaf(" --- "), Some(BlockOpen::Rule));
    }

    #[test]
    fn test_quote_beats_list() {
        assert_eq!(
            try_open_leaf("> - quoted"),
            Some(BlockOpen::Quote {
                content: "- quoted"
            })
        );
    }

    #[test]
    fn test_list_item_opens() {
        assert!(matches!(
            try_open_leaf("2. two"),
            Some(BlockOpen::ListItem(ListLine {
                marker: ListMarker::Ordered(2),
                ..
            }))
        ));
    }

    #[test]
    fn test_fence_opens_with_language() {
        assert_eq!(
            try_open_leaf("```python"),
            Some(BlockOpen::FencedCode { lang: "python" })
        );
    }

    #[test]
    fn test_plain_text_opens_nothing() {
        assert_eq!(try_open_leaf("just text"), None);
    }
}
