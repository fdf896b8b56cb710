/// Blockquote block type with owned delimiter constant.
pub struct BlockQuote;

impl BlockQuote {
    /// Every quoted line starts with this prefix.
    pub const PREFIX: &'static str = "> ";

    /// Content of a quoted line, or `None` when the line is not quoted.
    pub fn strip(line: &str) -> Option<&str> {
        line.strip_prefix(Self::PREFIX)
    }
}
