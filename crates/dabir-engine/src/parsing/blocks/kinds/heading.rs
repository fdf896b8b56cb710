/// ATX heading, levels one to four.
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: u8 = 4;

    /// `(level, content)` when `line` is `#…# content`.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let level = line.chars().take_while(|c| *c == Self::MARKER).count();
        if level == 0 || level > usize::from(Self::MAX_LEVEL) {
            return None;
        }
        let content = line[level..].strip_prefix(' ')?;
        Some((level as u8, content))
    }

    pub fn prefix(level: u8) -> String {
        format!("{} ", Self::MARKER.to_string().repeat(usize::from(level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", Some((1, "Title")))]
    #[case("#### Deep", Some((4, "Deep")))]
    #[case("##### Too deep", None)]
    #[case("#NoSpace", None)]
    #[case("## ", Some((2, "")))]
    #[case("  # indented", None)]
    fn test_parse_heading(#[case] line: &str, #[case] expected: Option<(u8, &str)>) {
        assert_eq!(Heading::parse(line), expected);
    }

    #[test]
    fn test_prefix_repeats_marker() {
        assert_eq!(Heading::prefix(3), "### ");
    }
}
