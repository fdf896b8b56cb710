//! # Parsing
//!
//! Text ⇄ tree conversion.
//!
//! ## Modules
//!
//! - **`inline`**: inline transcoder and offset maps
//! - **`blocks`**: line classification and block construction
//! - **`plugins`**: multi-line block recognizers (admonition, verse, table)
//! - **`serialize`**: block serializer and canonicalization
//! - **`html`**: HTML rendering of a parsed tree
//! - **`snapshot`**: outline and invariant helpers for tests

pub mod blocks;
pub mod html;
pub mod inline;
pub mod plugins;
pub mod serialize;
pub mod snapshot;

#[cfg(test)]
mod tests;

use blocks::{BlockBuilder, MarkdownLineClassifier};
use plugins::Registry;
use serialize::Serializer;

use crate::{options::EditorOptions, tree::Node};

/// The Markdown codec: block parser plus serializer sharing one plugin
/// registry.
#[derive(Debug)]
pub struct Markdown {
    registry: Registry,
    options: EditorOptions,
}

impl Markdown {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            registry: Registry::with_defaults(&options),
            options,
        }
    }

    /// A codec with a caller-built registry.
    pub fn with_registry(registry: Registry, options: EditorOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Parses a document into block nodes.
    pub fn parse(&self, text: &str) -> Vec<Node> {
        let lines: Vec<&str> = text.split('\n').collect();
        self.parse_lines(&lines)
    }

    /// Parses pre-split lines. Plugins are offered every line that does not
    /// continue a blockquote, list or fence run.
    pub fn parse_lines(&self, lines: &[&str]) -> Vec<Node> {
        let classifier = MarkdownLineClassifier;
        let mut builder = BlockBuilder::new();
        let mut i = 0;

        while i < lines.len() {
            let c = classifier.classify(lines[i]);
            if !c.is_blank
                && !builder.continues(&c)
                && let Some(consumed) = self.registry.recognize(lines, i, self)
            {
                builder.emit(consumed.nodes);
                i = consumed.last.max(i) + 1;
                continue;
            }
            builder.push(&c);
            i += 1;
        }

        builder.finish()
    }

    /// Single-line block rules used by live conversion.
    pub fn parse_line(&self, line: &str) -> Option<Node> {
        blocks::parse_line(line)
    }

    /// Canonical Markdown for a block sequence.
    pub fn serialize(&self, nodes: &[Node]) -> String {
        Serializer::new(self).serialize(nodes)
    }

    pub fn to_html(&self, nodes: &[Node]) -> String {
        html::to_html(nodes)
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}
