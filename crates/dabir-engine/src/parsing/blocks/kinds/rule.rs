/// Horizontal rule.
pub struct Rule;

impl Rule {
    pub const MARKER: &'static str = "---";

    pub fn matches(line: &str) -> bool {
        line.trim() == Self::MARKER
    }
}
