//! Undo functionality
//!
//! There is no redo: an undone action is dropped, not kept aside.

use super::SceneState;
use crate::state::action::Action;
use crate::state::events::EditorEvent;

/// LIFO of applied actions
#[derive(Debug, Default)]
pub struct UndoStack {
    actions: Vec<Action>,
}

impl UndoStack {
    /// Append an applied action
    pub(crate) fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub(crate) fn pop(&mut self) -> Option<Action> {
        self.actions.pop()
    }

    /// Most recently applied action
    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in application order
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Drop every entry without reverting anything
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl SceneState {
    /// Pop the most recent action and revert it. No-op on an empty stack.
    /// Returns true if something was undone.
    pub fn undo_last(&mut self) -> bool {
        let Some(action) = self.history.pop() else {
            tracing::debug!("Undo requested with an empty history");
            return false;
        };

        let kind = action.kind();
        action.undo(self);
        self.emit(EditorEvent::ActionUndone { kind });
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Forget the history while leaving the world as it is
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
