use crate::{
    options::LabelLocale,
    parsing::{Markdown, inline},
    tree::{Element, Node, Tag},
};

use super::{BlockPlugin, Consumed, FENCE, fence_keyword, fenced_region};

/// Poems: `...شعر`, hemistich lines, `...`.
///
/// Blank lines split stanzas; inside a stanza lines pair up into couplets,
/// a lone trailing line getting an empty second hemistich.
pub struct VersePlugin {
    labels: LabelLocale,
}

impl VersePlugin {
    pub const KEYWORD: &'static str = "شعر";
    pub const ENGLISH_KEYWORD: &'static str = "verse";

    pub fn new(labels: LabelLocale) -> Self {
        Self { labels }
    }

    fn is_opener(line: &str) -> bool {
        fence_keyword(line)
            .is_some_and(|k| k == Self::KEYWORD || k.eq_ignore_ascii_case(Self::ENGLISH_KEYWORD))
    }

    fn hemistich(text: &str) -> Node {
        Node::element(Tag::VerseLine, inline::render(text.trim()))
    }
}

impl BlockPlugin for VersePlugin {
    fn name(&self) -> &'static str {
        "verse"
    }

    fn matches(&self, lines: &[&str], at: usize) -> bool {
        lines.get(at).is_some_and(|l| Self::is_opener(l))
    }

    fn consume(&self, lines: &[&str], at: usize, _md: &Markdown) -> Option<Consumed> {
        if !Self::is_opener(lines.get(at)?) {
            return None;
        }
        let (content, last, terminated) = fenced_region(lines, at);

        let mut couplets = vec![];
        for stanza in content.split(|l| l.trim().is_empty()) {
            for pair in stanza.chunks(2) {
                let second = pair.get(1).copied().unwrap_or("");
                couplets.push(Node::element(
                    Tag::VerseCouplet,
                    vec![Self::hemistich(pair[0]), Self::hemistich(second)],
                ));
            }
        }

        Some(Consumed {
            nodes: vec![Node::element(Tag::Verse, couplets)],
            last,
            terminated,
        })
    }

    fn serialize(&self, element: &Element, _md: &Markdown) -> Option<String> {
        if element.tag != Tag::Verse {
            return None;
        }
        let couplets: Vec<String> = element
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|couplet| {
                couplet
                    .children
                    .iter()
                    .filter_map(Node::as_element)
                    .map(|line| inline::to_markdown_all(&line.children))
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();
        let label = match self.labels {
            LabelLocale::Persian => Self::KEYWORD,
            LabelLocale::English => Self::ENGLISH_KEYWORD,
        };
        Some(format!(
            "{FENCE}{label}\n{}\n{FENCE}\n\n",
            couplets.join("\n\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn couplet(a: &str, b: &str) -> Node {
        let line = |t: &str| {
            Node::element(
                Tag::VerseLine,
                if t.is_empty() { vec![] } else { vec![Node::text(t)] },
            )
        };
        Node::element(Tag::VerseCouplet, vec![line(a), line(b)])
    }

    #[test]
    fn test_stanzas_pair_independently() {
        let md = Markdown::default();
        let lines = ["...شعر", "a", "b", "c", "", "d", "e", "..."];
        let consumed = VersePlugin::new(LabelLocale::Persian)
            .consume(&lines, 0, &md)
            .unwrap();
        assert_eq!(
            consumed.nodes,
            vec![Node::element(
                Tag::Verse,
                vec![couplet("a", "b"), couplet("c", ""), couplet("d", "e")]
            )]
        );
    }

    #[test]
    fn test_english_keyword_opens_verse() {
        let plugin = VersePlugin::new(LabelLocale::Persian);
        assert!(plugin.matches(&["...Verse"], 0));
        assert!(!plugin.matches(&["...note"], 0));
    }

    #[test]
    fn test_serialization_separates_couplets_with_blank_lines() {
        let md = Markdown::default();
        let verse = Element {
            tag: Tag::Verse,
            children: vec![couplet("a", "b"), couplet("c", "")],
        };
        assert_eq!(
            VersePlugin::new(LabelLocale::Persian).serialize(&verse, &md),
            Some("...شعر\na\nb\n\nc\n...\n\n".to_string())
        );
    }
}
