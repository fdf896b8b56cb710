use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    /// Ordered item carrying its number, digits normalized to ASCII.
    Ordered(u32),
}

impl ListMarker {
    /// Bullets and numbers never share a list.
    pub fn same_kind(self, other: ListMarker) -> bool {
        matches!(
            (self, other),
            (ListMarker::Bullet, ListMarker::Bullet) | (ListMarker::Ordered(_), ListMarker::Ordered(_))
        )
    }
}

/// One list line, split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLine<'a> {
    /// Leading whitespace, in characters.
    pub indent: usize,
    pub marker: ListMarker,
    /// `Some` for checklist items.
    pub checked: Option<bool>,
    pub content: &'a str,
}

/// List item block type with owned marker constants.
pub struct ListItem;

impl ListItem {
    pub const BULLET: &'static str = "- ";
    pub const UNCHECKED: &'static str = "[ ]";
    pub const CHECKED: &'static str = "[x]";
    /// Spaces per nesting level when serializing.
    pub const INDENT: &'static str = "  ";

    /// Splits a list line. The number may use Persian digits.
    pub fn parse(line: &str) -> Option<ListLine<'_>> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(\s*)([-*]|[0-9۰-۹]+\.) (.*)$").expect("Invalid list item regex")
        });
        let caps = re.captures(line)?;
        let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
        let marker = match caps.get(2).map(|m| m.as_str())? {
            "-" | "*" => ListMarker::Bullet,
            number => ListMarker::Ordered(normalize_number(number.trim_end_matches('.'))),
        };
        let content = caps.get(3).map_or("", |m| m.as_str());
        let (checked, content) = Self::split_checkbox(content);
        Some(ListLine {
            indent,
            marker,
            checked,
            content,
        })
    }

    /// Strips a leading `[ ]` / `[x]` (any case), which must be followed by a
    /// space or end the content.
    pub fn split_checkbox(content: &str) -> (Option<bool>, &str) {
        let Some(head) = content.get(..3) else {
            return (None, content);
        };
        let checked = if head == Self::UNCHECKED {
            false
        } else if head.eq_ignore_ascii_case(Self::CHECKED) {
            true
        } else {
            return (None, content);
        };
        let rest = &content[3..];
        if rest.is_empty() {
            return (Some(checked), rest);
        }
        match rest.strip_prefix(' ') {
            Some(rest) => (Some(checked), rest),
            None => (None, content),
        }
    }

    pub fn checkbox(checked: bool) -> &'static str {
        if checked { "[x] " } else { "[ ] " }
    }
}

/// Parses a run of ASCII or Persian digits.
fn normalize_number(digits: &str) -> u32 {
    digits
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => c.to_digit(10),
            '۰'..='۹' => Some(c as u32 - '۰' as u32),
            _ => None,
        })
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}
