use super::open::{BlockOpen, try_open_leaf};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone, Copy)]
pub struct LineClass<'a> {
    /// The line without its terminator.
    pub text: &'a str,
    /// Whether the line is whitespace only.
    pub is_blank: bool,
    /// The block this line would open outside any run.
    pub open: Option<BlockOpen<'a>>,
}

impl LineClass<'_> {
    pub fn is_quote(&self) -> bool {
        matches!(self.open, Some(BlockOpen::Quote { .. }))
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.open, Some(BlockOpen::ListItem(_)))
    }
}

/// Classifies individual lines for the block parsing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let text = line.trim_end_matches(['\r', '\n']);
        let is_blank = text.trim().is_empty();
        LineClass {
            text,
            is_blank,
            open: if is_blank { None } else { try_open_leaf(text) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_carriage_return() {
        let c = MarkdownLineClassifier.classify("# Title\r");
        assert_eq!(c.text, "# Title");
        assert!(matches!(
            c.open,
            Some(BlockOpen::Heading {
                level: 1,
                content: "Title"
            })
        ));
    }

    #[test]
    fn test_whitespace_line_is_blank() {
        let c = MarkdownLineClassifier.classify("   \t");
        assert!(c.is_blank);
        assert!(c.open.is_none());
    }

    #[test]
    fn test_run_membership() {
        assert!(MarkdownLineClassifier.classify("> q").is_quote());
        assert!(MarkdownLineClassifier.classify("  - item").is_list_item());
        assert!(!MarkdownLineClassifier.classify("text").is_list_item());
    }
}
