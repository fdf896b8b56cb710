/// Image on a line of its own: `![alt](src)`.
pub struct Image;

impl Image {
    pub const OPEN: &'static str = "![";
    pub const SRC_OPEN: &'static str = "](";
    pub const CLOSE: char = ')';

    /// `(alt, src)` when the whole line is one image.
    pub fn parse(line: &str) -> Option<(&str, &str)> {
        let rest = line.strip_prefix(Self::OPEN)?;
        let alt_end = rest.find(']')?;
        let alt = &rest[..alt_end];
        let rest = rest[alt_end..].strip_prefix(Self::SRC_OPEN)?;
        let src_end = rest.find(Self::CLOSE)?;
        let src = &rest[..src_end];
        if src.is_empty() || src_end + 1 != rest.len() {
            return None;
        }
        Some((alt, src))
    }

    pub fn source(alt: &str, src: &str) -> String {
        format!("{}{alt}{}{src}{}", Self::OPEN, Self::SRC_OPEN, Self::CLOSE)
    }
}
