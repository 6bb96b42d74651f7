//! Undo/redo stacks of whole-state snapshots.

/// Undo/redo history over owned snapshots of type `T`.
///
/// A new edit pushes the pre-edit state and invalidates redo. Undo and redo
/// move the current state onto the opposite stack and never clear it.
#[derive(Clone, Debug)]
pub struct EditHistory<T> {
    undo: Vec<T>,
    redo: Vec<T>,
    /// Oldest undo entries are dropped beyond this many
    limit: Option<usize>,
}

impl<T: Clone> EditHistory<T> {
    /// Unbounded history
    pub fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: None,
        }
    }

    /// History that keeps at most `limit` undo snapshots
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    /// Record the state before an edit. Clears redo.
    pub fn record(&mut self, current: &T) {
        self.undo.push(current.clone());
        self.redo.clear();

        if let Some(limit) = self.limit {
            if self.undo.len() > limit {
                let excess = self.undo.len() - limit;
                self.undo.drain(..excess);
            }
        }
    }

    /// Step back. Returns the state to restore, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &T) -> Option<T> {
        let previous = self.undo.pop()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Step forward after an undo.
    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Forget everything (new image)
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T: Clone> Default for EditHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}
