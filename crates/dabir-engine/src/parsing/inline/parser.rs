use crate::tree::Node;

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, Highlight, Link, Strikethrough, Strong},
    types::{InlineKind, InlineMatch},
};

/// Renders a plain-text run into inline nodes.
///
/// Scans left to right trying [`InlineKind::PRECEDENCE`] at each position.
/// Link, bold and italic content is scanned once more for the remaining
/// kinds; anything deeper stays literal. Unmatched markers are kept as
/// text. Nothing is escaped.
pub fn render(text: &str) -> Vec<Node> {
    build(text, &InlineKind::PRECEDENCE, true)
}

/// Top-level matches of a run, in order.
pub fn find_matches(text: &str) -> Vec<InlineMatch> {
    scan(text, &InlineKind::PRECEDENCE)
}

fn build(s: &str, kinds: &[InlineKind], rescan: bool) -> Vec<Node> {
    let mut out = vec![];
    let mut text_start = 0;

    fn flush_text(out: &mut Vec<Node>, text: &str) {
        if !text.is_empty() {
            out.push(Node::text(text));
        }
    }

    for m in scan(s, kinds) {
        flush_text(&mut out, &s[text_start..m.full.start]);
        let inner = &s[m.inner.clone()];
        let children = if rescan && m.kind.rescans() {
            let rest: Vec<InlineKind> = kinds.iter().copied().filter(|k| *k != m.kind).collect();
            build(inner, &rest, false)
        } else {
            vec![Node::text(inner)]
        };
        out.push(Node::element(m.tag(s), children));
        text_start = m.full.end;
    }

    flush_text(&mut out, &s[text_start..]);
    out
}

fn scan(s: &str, kinds: &[InlineKind]) -> Vec<InlineMatch> {
    let mut cur = Cursor::new(s);
    let mut out = vec![];

    while !cur.eof() {
        let found = kinds.iter().find_map(|kind| match kind {
            InlineKind::Link => attempt(&mut cur, try_parse_link),
            InlineKind::Strong => attempt(&mut cur, try_parse_strong),
            InlineKind::Emphasis => attempt(&mut cur, try_parse_emphasis),
            InlineKind::Strikethrough => attempt(&mut cur, |c| {
                try_parse_wrapped(c, InlineKind::Strikethrough, Strikethrough::DELIM)
            }),
            InlineKind::Highlight => attempt(&mut cur, |c| {
                try_parse_wrapped(c, InlineKind::Highlight, Highlight::DELIM)
            }),
            InlineKind::Code => attempt(&mut cur, |c| {
                try_parse_wrapped(c, InlineKind::Code, CodeSpan::TICK)
            }),
        });
        match found {
            Some(m) => out.push(m),
            None => cur.bump_char(),
        }
    }
    out
}

/// Runs one `try_parse_*`, restoring the cursor when it fails.
fn attempt<'a>(
    cur: &mut Cursor<'a>,
    f: impl FnOnce(&mut Cursor<'a>) -> Option<InlineMatch>,
) -> Option<InlineMatch> {
    let saved = cur.clone();
    let m = f(cur);
    if m.is_none() {
        *cur = saved;
    }
    m
}

fn try_parse_link(cur: &mut Cursor<'_>) -> Option<InlineMatch> {
    if cur.peek() != Some(Link::OPEN) || cur.prev() == Some(Link::IMAGE_BANG) {
        return None;
    }
    let start = cur.pos();
    cur.bump_n(1);
    let label_start = cur.pos();
    if !cur.skip_to(Link::LABEL_CLOSE) || cur.pos() == label_start {
        return None;
    }
    let label_end = cur.pos();
    if !cur.starts_with(Link::HREF_OPEN) {
        return None;
    }
    cur.bump_n(Link::HREF_OPEN.len());
    let href_start = cur.pos();
    if !cur.skip_to(Link::HREF_CLOSE) || cur.pos() == href_start {
        return None;
    }
    let href_end = cur.pos();
    cur.bump_n(1);

    Some(InlineMatch {
        kind: InlineKind::Link,
        full: start..cur.pos(),
        inner: label_start..label_end,
        href: Some(href_start..href_end),
    })
}

fn try_parse_strong(cur: &mut Cursor<'_>) -> Option<InlineMatch> {
    if !cur.starts_with(Strong::DELIM) {
        return None;
    }
    let start = cur.pos();
    cur.bump_n(Strong::DELIM.len());
    let inner_start = cur.pos();
    if !cur.skip_to_str(Strong::DELIM) || cur.pos() == inner_start {
        return None;
    }
    let inner_end = cur.pos();
    cur.bump_n(Strong::DELIM.len());

    Some(InlineMatch {
        kind: InlineKind::Strong,
        full: start..cur.pos(),
        inner: inner_start..inner_end,
        href: None,
    })
}

fn try_parse_emphasis(cur: &mut Cursor<'_>) -> Option<InlineMatch> {
    if cur.peek() != Some(Emphasis::DELIM) || cur.prev() == Some(Emphasis::DELIM) {
        return None;
    }
    let start = cur.pos();
    cur.bump_n(1);
    let inner_start = cur.pos();
    if !cur.skip_to(Emphasis::DELIM) || cur.pos() == inner_start {
        return None;
    }
    let inner_end = cur.pos();
    cur.bump_n(1);
    if cur.peek() == Some(Emphasis::DELIM) {
        return None;
    }

    Some(InlineMatch {
        kind: InlineKind::Emphasis,
        full: start..cur.pos(),
        inner: inner_start..inner_end,
        href: None,
    })
}

/// Symmetric delimiters whose content may not contain the delimiter's
/// first byte: strikethrough, highlight and code.
fn try_parse_wrapped(cur: &mut Cursor<'_>, kind: InlineKind, delim: &str) -> Option<InlineMatch> {
    if !cur.starts_with(delim) {
        return None;
    }
    let start = cur.pos();
    cur.bump_n(delim.len());
    let inner_start = cur.pos();
    if !cur.skip_to(delim.as_bytes()[0]) || cur.pos() == inner_start {
        return None;
    }
    let inner_end = cur.pos();
    if !cur.starts_with(delim) {
        return None;
    }
    cur.bump_n(delim.len());

    Some(InlineMatch {
        kind,
        full: start..cur.pos(),
        inner: inner_start..inner_end,
        href: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tag;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn el(tag: Tag, text: &str) -> Node {
        Node::element(tag, vec![Node::text(text)])
    }

    #[test]
    fn test_plain_text_is_one_leaf() {
        assert_eq!(render("just words"), vec![Node::text("just words")]);
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(render(""), vec![]);
    }

    #[test]
    fn test_bold_holds_rescanned_italic() {
        assert_eq!(
            render("**a*b*c**"),
            vec![Node::element(
                Tag::Strong,
                vec![Node::text("a"), el(Tag::Emphasis, "b"), Node::text("c")],
            )]
        );
    }

    #[rstest]
    #[case("*x*", Tag::Emphasis, "x")]
    #[case("~~x~~", Tag::Strikethrough, "x")]
    #[case("==x==", Tag::Highlight, "x")]
    #[case("`x`", Tag::InlineCode, "x")]
    #[case("**x**", Tag::Strong, "x")]
    fn test_single_construct(#[case] input: &str, #[case] tag: Tag, #[case] content: &str) {
        assert_eq!(render(input), vec![el(tag, content)]);
    }

    #[test]
    fn test_link_with_formatted_label() {
        assert_eq!(
            render("see [**docs**](https://x.io) now"),
            vec![
                Node::text("see "),
                Node::element(
                    Tag::Link {
                        href: "https://x.io".into()
                    },
                    vec![el(Tag::Strong, "docs")],
                ),
                Node::text(" now"),
            ]
        );
    }

    #[test]
    fn test_bang_prefixed_bracket_is_not_a_link() {
        assert_eq!(render("![alt](pic.png)"), vec![Node::text("![alt](pic.png)")]);
    }

    #[test]
    fn test_code_content_stays_literal() {
        assert_eq!(render("`**no**`"), vec![el(Tag::InlineCode, "**no**")]);
    }

    #[test]
    fn test_strikethrough_content_is_not_rescanned() {
        assert_eq!(render("~~*a*~~"), vec![el(Tag::Strikethrough, "*a*")]);
    }

    #[test]
    fn test_only_one_level_of_rescan() {
        // the link inside bold keeps its italic label literal
        assert_eq!(
            render("**[*a*](u)**"),
            vec![Node::element(
                Tag::Strong,
                vec![el(Tag::Link { href: "u".into() }, "*a*")],
            )]
        );
    }

    #[rstest]
    #[case("**open")]
    #[case("*open")]
    #[case("[label](")]
    #[case("[](empty)")]
    #[case("~~~~")]
    #[case("a ** b")]
    fn test_unmatched_markers_stay_literal(#[case] input: &str) {
        assert_eq!(render(input), vec![Node::text(input)]);
    }

    #[test]
    fn test_italic_never_touches_another_star() {
        assert_eq!(render("*a**"), vec![Node::text("*a**")]);
    }

    #[test]
    fn test_multibyte_text_around_markers() {
        assert_eq!(
            render("سلام **دنیا** خوب"),
            vec![
                Node::text("سلام "),
                el(Tag::Strong, "دنیا"),
                Node::text(" خوب"),
            ]
        );
    }

    #[test]
    fn test_find_matches_reports_top_level_ranges() {
        let found = find_matches("a **b** [c](d)");
        let ranges: Vec<_> = found.iter().map(|m| m.full.clone()).collect();
        assert_eq!(ranges, vec![2..7, 8..14]);
    }
}
