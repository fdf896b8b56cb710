pub struct Strikethrough;

impl Strikethrough {
    pub const DELIM: &'static str = "~~";
}

pub struct Highlight;

impl Highlight {
    pub const DELIM: &'static str = "==";
}
