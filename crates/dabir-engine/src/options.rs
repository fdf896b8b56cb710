use serde::{Deserialize, Serialize};

use crate::tree::Alignment;

/// Which keyword set admonition and verse fences are written with.
/// Both sets are always accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLocale {
    #[default]
    Persian,
    English,
}

/// Tunables shared by the parser, the serializer and the editing core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Deepest nesting for bullet lists and checklists.
    pub max_unordered_depth: usize,
    pub max_ordered_depth: usize,
    /// Alignment for separator cells with no colon.
    pub table_default_alignment: Alignment,
    pub admonition_labels: LabelLocale,
    /// Paragraph lines re-offered to block plugins on Enter.
    pub lookbehind: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            max_unordered_depth: 4,
            max_ordered_depth: 3,
            table_default_alignment: Alignment::None,
            admonition_labels: LabelLocale::Persian,
            lookbehind: 20,
        }
    }
}
