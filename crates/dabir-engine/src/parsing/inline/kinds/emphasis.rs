/// Bold. Content runs to the first closing pair, so single `*` may appear
/// inside.
pub struct Strong;

impl Strong {
    pub const DELIM: &'static str = "**";
}

/// Italic. The marker must not touch another `*` on either side.
pub struct Emphasis;

impl Emphasis {
    pub const DELIM: u8 = b'*';
}
