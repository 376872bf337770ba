//! Snapshot-based undo/redo for pixel buffers.
//!
//! [`ChangeHistory`] is an optional transaction log attached to a
//! [`PixelBuffer`]. Edit operations demarcate one logical mutation with a
//! [`begin`](ChangeHistory::begin)/[`end`](ChangeHistory::end) bracket; the
//! outermost `begin` captures a full deep snapshot of the buffer, so one
//! bracket is one undo/redo unit regardless of how many pixels it touches.
//! Nested brackets coalesce into the outermost one.
//!
//! Mutations performed outside a bracket are invisible to the history.

use std::collections::VecDeque;

use crate::buffer::PixelBuffer;

/// Default cap on retained snapshots.
pub const DEFAULT_MAX_SNAPSHOTS: usize = 64;

/// An undo/redo log of full buffer snapshots.
///
/// Disabled by default; enabling it starts recording from the next bracket.
/// While disabled both stacks are empty.
#[derive(Debug, Clone)]
pub struct ChangeHistory {
    enabled: bool,
    undo_stack: VecDeque<PixelBuffer>,
    redo_stack: VecDeque<PixelBuffer>,
    /// Open-bracket depth; nested begin calls coalesce into the outermost.
    depth: usize,
    /// Oldest snapshot is dropped once the undo stack reaches this size.
    max_snapshots: usize,
}

impl ChangeHistory {
    /// Create a disabled history with the default snapshot cap.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SNAPSHOTS)
    }

    /// Create a disabled history retaining at most `max_snapshots` undo
    /// snapshots.
    pub fn with_capacity(max_snapshots: usize) -> Self {
        Self {
            enabled: false,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            depth: 0,
            max_snapshots: max_snapshots.max(1),
        }
    }

    /// Whether the history is currently recording brackets.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable recording. Both directions clear all snapshots.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.depth = 0;
    }

    /// Number of undo steps currently available.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps currently available.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Open a mutation bracket.
    ///
    /// The outermost bracket captures a snapshot of `buffer` onto the undo
    /// stack; nested calls only increase the bracket depth. The redo stack
    /// is left untouched here and cleared when the bracket completes.
    pub fn begin(&mut self, buffer: &PixelBuffer) {
        if !self.enabled {
            return;
        }
        if self.depth == 0 {
            if self.undo_stack.len() == self.max_snapshots {
                self.undo_stack.pop_front();
            }
            self.undo_stack.push_back(buffer.clone());
        }
        self.depth += 1;
    }

    /// Close a mutation bracket.
    ///
    /// Closing the outermost bracket invalidates the redo stack: the
    /// completed mutation forked the edit timeline.
    pub fn end(&mut self) {
        if !self.enabled {
            return;
        }
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.redo_stack.clear();
        }
    }

    /// Restore the most recent undo snapshot into `buffer`.
    ///
    /// The buffer's current state is pushed onto the redo stack. Returns
    /// whether an undo occurred.
    pub fn undo(&mut self, buffer: &mut PixelBuffer) -> bool {
        match self.undo_stack.pop_back() {
            Some(snapshot) => {
                let current = std::mem::replace(buffer, snapshot);
                self.redo_stack.push_back(current);
                true
            }
            None => false,
        }
    }

    /// Restore the most recent redo snapshot into `buffer`.
    ///
    /// The buffer's current state is pushed back onto the undo stack.
    /// Returns whether a redo occurred.
    pub fn redo(&mut self, buffer: &mut PixelBuffer) -> bool {
        match self.redo_stack.pop_back() {
            Some(snapshot) => {
                let current = std::mem::replace(buffer, snapshot);
                self.undo_stack.push_back(current);
                true
            }
            None => false,
        }
    }
}

impl Default for ChangeHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::format::PixelFormat;

    fn buffer(color: Color) -> PixelBuffer {
        PixelBuffer::filled(2, 2, PixelFormat::Rgba64F, color).unwrap()
    }

    #[test]
    fn test_disabled_records_nothing() {
        let mut history = ChangeHistory::new();
        let mut buf = buffer(Color::WHITE);
        history.begin(&buf);
        buf.fill(Color::RED);
        history.end();
        assert_eq!(history.undo_depth(), 0);
        assert!(!history.undo(&mut buf));
        assert_eq!(buf.get(0, 0), Color::RED);
    }

    #[test]
    fn test_undo_restores_pre_mutation_state() {
        let mut history = ChangeHistory::new();
        history.set_enabled(true);
        let mut buf = buffer(Color::WHITE);
        let pristine = buf.clone();

        history.begin(&buf);
        buf.fill(Color::RED);
        history.end();

        assert!(history.undo(&mut buf));
        assert_eq!(buf, pristine);
    }

    #[test]
    fn test_redo_restores_mutated_state() {
        let mut history = ChangeHistory::new();
        history.set_enabled(true);
        let mut buf = buffer(Color::WHITE);

        history.begin(&buf);
        buf.fill(Color::RED);
        history.end();
        let mutated = buf.clone();

        assert!(history.undo(&mut buf));
        assert!(history.redo(&mut buf));
        assert_eq!(buf, mutated);
        assert!(!history.redo(&mut buf));
    }

    #[test]
    fn test_completed_bracket_clears_redo() {
        let mut history = ChangeHistory::new();
        history.set_enabled(true);
        let mut buf = buffer(Color::WHITE);

        history.begin(&buf);
        buf.fill(Color::RED);
        history.end();
        history.undo(&mut buf);
        assert_eq!(history.redo_depth(), 1);

        history.begin(&buf);
        buf.fill(Color::BLUE);
        history.end();
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_nested_brackets_coalesce() {
        let mut history = ChangeHistory::new();
        history.set_enabled(true);
        let mut buf = buffer(Color::WHITE);

        history.begin(&buf);
        buf.fill(Color::RED);
        history.begin(&buf);
        buf.fill(Color::BLUE);
        history.end();
        history.end();

        assert_eq!(history.undo_depth(), 1);
        assert!(history.undo(&mut buf));
        assert_eq!(buf.get(0, 0), Color::WHITE);
    }

    #[test]
    fn test_set_enabled_clears_both_stacks() {
        let mut history = ChangeHistory::new();
        history.set_enabled(true);
        let mut buf = buffer(Color::WHITE);

        history.begin(&buf);
        buf.fill(Color::RED);
        history.end();
        history.undo(&mut buf);
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 1);

        history.set_enabled(false);
        assert_eq!(history.redo_depth(), 0);
        history.set_enabled(true);
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_snapshot_cap_drops_oldest() {
        let mut history = ChangeHistory::with_capacity(2);
        history.set_enabled(true);
        let mut buf = buffer(Color::WHITE);

        for color in [Color::RED, Color::GREEN, Color::BLUE] {
            history.begin(&buf);
            buf.fill(color);
            history.end();
        }
        assert_eq!(history.undo_depth(), 2);

        // The oldest (all-white) snapshot was dropped; two undos land on
        // the red state, not the original white one.
        assert!(history.undo(&mut buf));
        assert!(history.undo(&mut buf));
        assert_eq!(buf.get(0, 0), Color::RED);
        assert!(!history.undo(&mut buf));
    }
}
