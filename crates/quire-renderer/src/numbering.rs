use quire_common::BlockKind;

/// Ordinal counter for numbered list items.
///
/// There is no notion of list identity or depth: any block that is not a
/// numbered list item resets the count, so the next numbered item is `1.`
/// again. One tracker lives for exactly one document build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListNumbering {
    counter: usize,
}

impl ListNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset unless `kind` is a numbered list item. Called once per visited block.
    pub fn observe(&mut self, kind: &BlockKind) {
        if !matches!(kind, BlockKind::NumberedListItem { .. }) {
            self.counter = 0;
        }
    }

    /// Advance and return the ordinal for the next numbered item
    pub fn next_ordinal(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }

    pub fn current(&self) -> usize {
        self.counter
    }
}
