//! Block parser tests over whole documents.
//!
//! Fixture outlines live in the crate's `tests/` directory; these cover the
//! line-level rules one at a time.


use pretty_assertions::assert_eq;

use crate::{
    parsing::Markdown,
    tree::{AdmonitionKind, Node, Tag, canonical},
};

fn parse(text: &str) -> Vec<Node> {
    Markdown::default().parse(text)
}

fn para(children: Vec<Node>) -> Node {
    Node::element(Tag::Paragraph, children)
}

fn text_para(text: &str) -> Node {
    para(vec![Node::text(text)])
}

// ============ Headings and paragraphs ============

#[test]
fn test_heading_then_paragraph_with_bold() {
    assert_eq!(
        parse("# Title\n\nHello **world**"),
        vec![
            Node::element(Tag::Heading { level: 1 }, vec![Node::text("Title")]),
            para(vec![
                Node::text("Hello "),
                Node::element(Tag::Strong, vec![Node::text("world")]),
            ]),
        ]
    );
}

#[test]
fn test_consecutive_lines_share_one_paragraph() {
    assert_eq!(parse("one\ntwo"), vec![text_para("one\ntwo")]);
}

#[test]
fn test_heading_interrupts_paragraph() {
    assert_eq!(
        parse("text\n## Sub"),
        vec![
            text_para("text"),
            Node::element(Tag::Heading { level: 2 }, vec![Node::text("Sub")]),
        ]
    );
}

// ============ Blank lines ============

#[test]
fn test_empty_document() {
    assert!(parse("").is_empty());
}

#[test]
fn test_single_blank_line_only_separates() {
    assert_eq!(parse("a\n\nb"), vec![text_para("a"), text_para("b")]);
}

#[test]
fn test_extra_blank_lines_become_empty_paragraphs() {
    assert_eq!(
        parse("a\n\n\n\nb"),
        vec![text_para("a"), para(vec![]), para(vec![]), text_para("b")]
    );
}

#[test]
fn test_blank_lines_only_canonicalize_to_nothing() {
    let nodes = parse("\n\n\n");
    assert!(nodes.iter().all(Node::is_empty_paragraph));
    assert!(canonical(&nodes).is_empty());
}

// ============ Simple blocks ============

#[test]
fn test_rule_and_image() {
    assert_eq!(
        parse("---\n![map](map.png)"),
        vec![
            Node::element(Tag::HorizontalRule, vec![]),
            Node::element(
                Tag::Image {
                    src: "map.png".into(),
                    alt: "map".into()
                },
                vec![]
            ),
        ]
    );
}

#[test]
fn test_consecutive_quote_lines_form_one_blockquote() {
    assert_eq!(
        parse("> first\n> *second*\nafter"),
        vec![
            Node::element(
                Tag::Blockquote,
                vec![
                    Node::element(Tag::BlockquoteLine, vec![Node::text("first")]),
                    Node::element(
                        Tag::BlockquoteLine,
                        vec![Node::element(Tag::Emphasis, vec![Node::text("second")])]
                    ),
                ]
            ),
            text_para("after"),
        ]
    );
}

// ============ Code fences ============

#[test]
fn test_fence_content_is_not_parsed() {
    assert_eq!(
        parse("```md\n# not a heading\n\n- nor a list\n```\nafter"),
        vec![
            Node::element(
                Tag::CodeFence { lang: "md".into() },
                vec![Node::text("# not a heading\n\n- nor a list")]
            ),
            text_para("after"),
        ]
    );
}

#[test]
fn test_unterminated_fence_runs_to_end() {
    assert_eq!(
        parse("```\nlet a = 1;\nlet b = 2;"),
        vec![Node::element(
            Tag::CodeFence {
                lang: String::new()
            },
            vec![Node::text("let a = 1;\nlet b = 2;")]
        )]
    );
}

// ============ Plugins ============

#[test]
fn test_plugin_interrupts_paragraph_run() {
    let nodes = parse("intro\n| a |\n|---|\n| 1 |");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0], text_para("intro"));
    assert!(matches!(nodes[1].tag(), Some(Tag::Table { .. })));
}

#[test]
fn test_quote_run_is_not_offered_to_plugins() {
    assert_eq!(
        parse("> a\n> | b |\n|---|"),
        vec![
            Node::element(
                Tag::Blockquote,
                vec![
                    Node::element(Tag::BlockquoteLine, vec![Node::text("a")]),
                    Node::element(Tag::BlockquoteLine, vec![Node::text("| b |")]),
                ]
            ),
            text_para("|---|"),
        ]
    );
}

#[test]
fn test_unterminated_admonition_consumes_to_end() {
    assert_eq!(
        parse("...caution\nhot\n\nvery hot"),
        vec![Node::element(
            Tag::Admonition {
                kind: AdmonitionKind::Caution
            },
            vec![text_para("hot"), text_para("very hot")]
        )]
    );
}

#[test]
fn test_text_after_admonition_is_a_new_block() {
    let nodes = parse("...توجه\ninside\n...\noutside");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1], text_para("outside"));
}

// ============ Lists ============

#[test]
fn test_list_then_paragraph() {
    assert_eq!(
        parse("- a\n- b\nafter"),
        vec![
            Node::element(
                Tag::UnorderedList,
                vec![
                    Node::element(Tag::ListItem { checked: None }, vec![Node::text("a")]),
                    Node::element(Tag::ListItem { checked: None }, vec![Node::text("b")]),
                ]
            ),
            text_para("after"),
        ]
    );
}

#[test]
fn test_blank_line_ends_list() {
    let nodes = parse("- a\n\n- b");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.tag() == Some(&Tag::UnorderedList)));
}
