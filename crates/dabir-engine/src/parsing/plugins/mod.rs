//! # Block Plugins
//!
//! Multi-line block recognizers consulted before the built-in block rules.
//! A plugin owns its syntax both ways: it consumes a region of lines into
//! nodes and serializes its own tag back.
//!
//! ## Modules
//!
//! - **`admonition`**: `...kind` … `...` callouts with recursively parsed content
//! - **`verse`**: `...شعر` … `...` poems paired into couplets
//! - **`table`**: pipe tables with an alignment row

pub mod admonition;
pub mod table;
pub mod verse;

pub use admonition::AdmonitionPlugin;
pub use table::TablePlugin;
pub use verse::VersePlugin;

use crate::{
    options::EditorOptions,
    parsing::Markdown,
    tree::{Element, Node},
};

/// Result of a plugin consuming lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumed {
    pub nodes: Vec<Node>,
    /// Index of the last line consumed.
    pub last: usize,
    /// Whether the construct saw its closing delimiter before input ran out.
    pub terminated: bool,
}

pub trait BlockPlugin {
    fn name(&self) -> &'static str;

    /// Cheap predicate on the current line plus lookahead.
    fn matches(&self, lines: &[&str], at: usize) -> bool;

    /// Consumes the region starting at `at`. `None` declines the match.
    fn consume(&self, lines: &[&str], at: usize, md: &Markdown) -> Option<Consumed>;

    /// Markdown for an element this plugin owns, `None` for anything else.
    fn serialize(&self, element: &Element, md: &Markdown) -> Option<String>;
}

/// Ordered plugin list. The first plugin that matches and consumes wins.
#[derive(Default)]
pub struct Registry {
    plugins: Vec<Box<dyn BlockPlugin>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admonition, verse and table, configured from `options`.
    pub fn with_defaults(options: &EditorOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AdmonitionPlugin::new(options.admonition_labels)));
        registry.register(Box::new(VersePlugin::new(options.admonition_labels)));
        registry.register(Box::new(TablePlugin::new(options.table_default_alignment)));
        registry
    }

    pub fn register(&mut self, plugin: Box<dyn BlockPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn recognize(&self, lines: &[&str], at: usize, md: &Markdown) -> Option<Consumed> {
        self.plugins
            .iter()
            .filter(|p| p.matches(lines, at))
            .find_map(|p| {
                let consumed = p.consume(lines, at, md)?;
                log::trace!(
                    "plugin {} consumed lines {}..={}",
                    p.name(),
                    at,
                    consumed.last
                );
                Some(consumed)
            })
    }

    pub fn serialize(&self, element: &Element, md: &Markdown) -> Option<String> {
        self.plugins.iter().find_map(|p| p.serialize(element, md))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Marker shared by the `...kind` fences.
pub const FENCE: &str = "...";

/// Keyword after `...` when `line` opens a custom fence.
pub fn fence_keyword(line: &str) -> Option<&str> {
    let keyword = line.trim().strip_prefix(FENCE)?.trim();
    (!keyword.is_empty()).then_some(keyword)
}

/// Content lines of a custom fence opened at `at`, the index of the closing
/// line (or of the last line when unterminated), and whether it closed.
pub fn fenced_region<'l, 'a>(lines: &'l [&'a str], at: usize) -> (&'l [&'a str], usize, bool) {
    let start = at + 1;
    match lines
        .iter()
        .skip(start)
        .position(|l| l.trim() == FENCE)
    {
        Some(offset) => (&lines[start..start + offset], start + offset, true),
        None => (
            lines.get(start..).unwrap_or(&[]),
            lines.len().saturating_sub(1).max(at),
            false,
        ),
    }
}
