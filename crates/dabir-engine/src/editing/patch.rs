use crate::surface::NodeId;

/// Result of handling an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    /// Nodes created or moved by the event
    pub changed: Vec<NodeId>,
    /// The host must skip its own default edit
    pub handled: bool,
    /// Incremented whenever the tree changes
    pub version: u64,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Folds a later patch into this one.
    pub fn merge(&mut self, later: Patch) {
        self.changed.extend(later.changed);
        self.handled |= later.handled;
        self.version = self.version.max(later.version);
    }
}
