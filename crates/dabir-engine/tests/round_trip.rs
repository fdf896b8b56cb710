use dabir_engine::{
    Markdown, Node, Tag,
    parsing::inline::render,
    tree::canonical,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

/// parse(serialize(T)) == T once empty paragraphs are dropped, and a second
/// serialization is byte-identical to the first.
fn assert_round_trip(md: &Markdown, text: &str) {
    let tree = md.parse(text);
    let once = md.serialize(&tree);
    let reparsed = md.parse(&once);
    assert_eq!(canonical(&reparsed), canonical(&tree));
    assert_eq!(md.serialize(&reparsed), once);
}

#[rstest]
#[case("notes")]
#[case("blocks")]
#[case("unterminated")]
fn test_fixtures_round_trip(#[case] name: &str) {
    assert_round_trip(&Markdown::default(), &fixture(name));
}

#[rstest]
#[case("# Title\n\nHello **world**")]
#[case("a\n\n\n\n\nb")]
#[case("- a\n    - deep\n  - mid\n- b")]
#[case("1. one\n  - [ ] sub\n2. two")]
#[case("...caution\n...")]
#[case("...verse\na\nb\nc\n...")]
#[case("> **a** [b](c)\n> ~~d~~")]
#[case("```\nraw **text**\n\n# kept\n```")]
#[case("#### Four\n\n##### five is text")]
#[case("- ")]
#[case("# ")]
#[case("> ")]
#[case("- a\n- ")]
#[case("  a")]
fn test_documents_round_trip(#[case] text: &str) {
    assert_round_trip(&Markdown::default(), text);
}

#[rstest]
#[case("- ")]
#[case("# ")]
#[case("> ")]
#[case("- a\n- ")]
#[case("  a")]
#[case("- [ ] ")]
fn test_empty_markers_keep_their_space(#[case] text: &str) {
    // Given a block whose content is empty or starts with spaces
    let md = Markdown::default();

    // When it is parsed and written back
    let out = md.serialize(&md.parse(text));

    // Then the text is unchanged
    assert_eq!(out, text);
}

#[test]
fn test_heading_and_bold_reproduce_text() {
    let md = Markdown::default();
    let text = "# Title\n\nHello **world**";
    let tree = md.parse(text);
    assert_eq!(
        tree,
        vec![
            Node::element(Tag::Heading { level: 1 }, vec![Node::text("Title")]),
            Node::element(
                Tag::Paragraph,
                vec![
                    Node::text("Hello "),
                    Node::element(Tag::Strong, vec![Node::text("world")]),
                ]
            ),
        ]
    );
    assert_eq!(md.serialize(&tree), text);
}

#[test]
fn test_aligned_table_reproduces_text() {
    let md = Markdown::default();
    let text = "| a | b |\n| :---: | --- |\n| 1 | 2 |";
    assert_eq!(md.serialize(&md.parse(text)), text);
}

#[test]
fn test_bold_holds_nested_italic() {
    assert_eq!(
        render("**a*b*c**"),
        vec![Node::element(
            Tag::Strong,
            vec![
                Node::text("a"),
                Node::element(Tag::Emphasis, vec![Node::text("b")]),
                Node::text("c"),
            ]
        )]
    );
}

#[test]
fn test_english_labels_round_trip() {
    let md = Markdown::new(dabir_engine::EditorOptions {
        admonition_labels: dabir_engine::LabelLocale::English,
        ..Default::default()
    });
    let text = "...important\nread me\n...\n\n...verse\nline one\nline two\n...";
    assert_eq!(md.serialize(&md.parse(text)), text);
}
