use crate::surface::NodeId;

/// Keys the editing core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Backspace,
    Tab,
    ShiftTab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

/// Input delivered by the host, before its own default edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Char(char),
    Key(Key),
    Blur,
    /// The caret or selection moved.
    SelectionChanged,
    /// A checklist checkbox was clicked.
    ToggleChecklist(NodeId),
}

impl EditorEvent {
    /// Characters that end a word and schedule inline conversion.
    pub fn is_word_boundary(&self) -> bool {
        matches!(self, EditorEvent::Char(c) if c.is_whitespace())
    }
}
