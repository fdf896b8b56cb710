use std::sync::OnceLock;

use regex::Regex;

use crate::{
    parsing::{Markdown, inline},
    tree::{Alignment, Element, Node, Tag},
};

use super::{BlockPlugin, Consumed};

/// Pipe tables: a header row, an alignment row, then data rows.
pub struct TablePlugin {
    default_alignment: Alignment,
}

impl TablePlugin {
    pub const PIPE: char = '|';

    pub fn new(default_alignment: Alignment) -> Self {
        Self { default_alignment }
    }

    fn is_separator(line: &str) -> bool {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^\|(?:\s*:?-+:?\s*\|)+$").expect("Invalid table separator regex")
        });
        re.is_match(line.trim())
    }

    fn alignment(&self, cell: &str) -> Alignment {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => self.default_alignment,
        }
    }

    fn separator_cell(alignment: Alignment) -> &'static str {
        match alignment {
            Alignment::Center => ":---:",
            Alignment::Left => ":---",
            Alignment::Right => "---:",
            Alignment::None => "---",
        }
    }

    fn row(cells: &[String], columns: usize) -> Node {
        let mut children: Vec<Node> = cells
            .iter()
            .take(columns)
            .map(|c| Node::element(Tag::TableCell, inline::render(c)))
            .collect();
        children.resize_with(columns, || Node::element(Tag::TableCell, vec![]));
        Node::element(Tag::TableRow, children)
    }

    fn format_row(cells: &[String]) -> String {
        format!("| {} |", cells.join(" | "))
    }
}

/// Cells between the outer pipes, trimmed. A line without both outer pipes
/// yields no cells.
fn split_row(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.trim().split(TablePlugin::PIPE).collect();
    if parts.len() < 3 {
        return vec![];
    }
    parts[1..parts.len() - 1]
        .iter()
        .map(|c| c.trim().to_string())
        .collect()
}

impl BlockPlugin for TablePlugin {
    fn name(&self) -> &'static str {
        "table"
    }

    fn matches(&self, lines: &[&str], at: usize) -> bool {
        lines.get(at).is_some_and(|l| l.contains(Self::PIPE))
            && lines.get(at + 1).is_some_and(|l| Self::is_separator(l))
    }

    fn consume(&self, lines: &[&str], at: usize, _md: &Markdown) -> Option<Consumed> {
        let header = split_row(lines.get(at)?);
        if header.is_empty() {
            return None;
        }
        let columns = header.len();
        let mut alignments: Vec<Alignment> = split_row(lines.get(at + 1)?)
            .iter()
            .map(|c| self.alignment(c))
            .collect();
        alignments.resize(columns, self.default_alignment);

        let mut rows = vec![Self::row(&header, columns)];
        let mut last = at + 1;
        while let Some(line) = lines.get(last + 1) {
            if line.trim().is_empty() || !line.contains(Self::PIPE) {
                break;
            }
            rows.push(Self::row(&split_row(line), columns));
            last += 1;
        }
        if rows.len() == 1 {
            rows.push(Self::row(&[], columns));
        }

        Some(Consumed {
            nodes: vec![Node::element(Tag::Table { alignments }, rows)],
            last,
            terminated: true,
        })
    }

    fn serialize(&self, element: &Element, _md: &Markdown) -> Option<String> {
        let Tag::Table { alignments } = &element.tag else {
            return None;
        };
        let rows: Vec<Vec<String>> = element
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|row| {
                row.children
                    .iter()
                    .map(|cell| match cell {
                        Node::Element(c) => inline::to_markdown_all(&c.children),
                        Node::Text(t) => t.clone(),
                    })
                    .collect()
            })
            .collect();

        let mut lines = vec![];
        if let Some((header, body)) = rows.split_first() {
            lines.push(Self::format_row(header));
            let separator: Vec<String> = alignments
                .iter()
                .map(|a| Self::separator_cell(*a).to_string())
                .collect();
            lines.push(Self::format_row(&separator));
            lines.extend(body.iter().map(|r| Self::format_row(r)));
        }
        Some(format!("{}\n\n", lines.join("\n")))
    }
}
