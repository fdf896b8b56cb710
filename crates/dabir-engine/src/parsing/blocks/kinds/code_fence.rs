use std::sync::OnceLock;

use regex::Regex;

/// Fenced code block with owned delimiter constant.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";

    /// Language tag when `line` opens a fence.
    pub fn opens(line: &str) -> Option<&str> {
        line.trim()
            .strip_prefix(Self::BACKTICKS)
            .map(str::trim)
    }

    /// Any fence-looking line closes an open fence.
    pub fn closes(line: &str) -> bool {
        line.trim().starts_with(Self::BACKTICKS)
    }

    /// Stricter opener used while typing: the backticks plus an optional
    /// word, nothing else on the line.
    pub fn live_opens(line: &str) -> Option<&str> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^```(\w*)$").expect("Invalid fence regex"));
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_fence_with_language() {
        assert_eq!(CodeFence::opens("```rust"), Some("rust"));
    }

    #[test]
    fn test_detect_bare_fence() {
        assert_eq!(CodeFence::opens("  ```  "), Some(""));
    }

    #[test]
    fn test_no_fence() {
        assert_eq!(CodeFence::opens("hello"), None);
    }

    #[test]
    fn test_closes_on_any_fence_line() {
        assert!(CodeFence::closes("```"));
        assert!(CodeFence::closes("  ```text"));
        assert!(!CodeFence::closes("code"));
    }

    #[test]
    fn test_live_opener_rejects_trailing_text() {
        assert_eq!(CodeFence::live_opens("```js"), Some("js"));
        assert_eq!(CodeFence::live_opens("```"), Some(""));
        assert_eq!(CodeFence::live_opens("```js and more"), None);
    }
}
