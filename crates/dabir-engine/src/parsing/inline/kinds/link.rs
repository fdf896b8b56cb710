pub struct Link;

impl Link {
    pub const OPEN: u8 = b'[';
    pub const LABEL_CLOSE: u8 = b']';
    /// Separator between label and target.
    pub const HREF_OPEN: &'static str = "](";
    pub const HREF_CLOSE: u8 = b')';
    /// A `[` right after this byte starts an image, not a link.
    pub const IMAGE_BANG: u8 = b'!';
}
