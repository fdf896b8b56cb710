/// Inline code. Its content is never re-scanned.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: &'static str = "`";
}
