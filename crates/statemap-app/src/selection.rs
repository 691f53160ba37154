//! Selected statement plus highlighted connections, and the toggle rule
//! applied when a statement is activated.

use statemap_core::{ConnectionId, StatementId};
use statemap_graph::{ConnectionIndex, Renderable, VisibilityController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Same statement with connections showing: everything cleared.
    Deselected,
    /// Same statement with nothing showing: its connections were shown again.
    Reshown { shown: usize },
    /// A different (or no) statement was selected before.
    Selected { shown: usize },
}

#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<StatementId>,
    visibility: VisibilityController,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&StatementId> {
        self.selected.as_ref()
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn has_highlights(&self) -> bool {
        self.visibility.has_highlights()
    }

    /// Whether `statement` is selected with its connections on screen.
    pub fn connections_visible_for(&self, statement: &StatementId) -> bool {
        self.selected.as_ref() == Some(statement) && self.has_highlights()
    }

    /// Apply the activation rule for `statement` (marker click or panel toggle).
    pub fn toggle_statement<R: Renderable + ?Sized>(
        &mut self,
        statement: &StatementId,
        index: &mut ConnectionIndex,
        canvas: &mut R,
    ) -> ToggleOutcome {
        let outcome = if self.selected.as_ref() == Some(statement) {
            if self.has_highlights() {
                self.reset(index, canvas);
                ToggleOutcome::Deselected
            } else {
                let shown = self
                    .visibility
                    .highlight_all_for_statement(statement, index, canvas);
                ToggleOutcome::Reshown { shown }
            }
        } else {
            let shown = self.select_and_highlight(statement, index, canvas);
            ToggleOutcome::Selected { shown }
        };
        tracing::debug!(statement = %statement, ?outcome, "Toggled statement");
        outcome
    }

    /// Select `statement` unconditionally and show all of its connections.
    pub fn select_and_highlight<R: Renderable + ?Sized>(
        &mut self,
        statement: &StatementId,
        index: &mut ConnectionIndex,
        canvas: &mut R,
    ) -> usize {
        self.selected = Some(statement.clone());
        self.visibility
            .highlight_all_for_statement(statement, index, canvas)
    }

    /// Add one connection to the highlights. Selection is left alone.
    pub fn highlight_connection<R: Renderable + ?Sized>(
        &mut self,
        id: &ConnectionId,
        index: &mut ConnectionIndex,
        canvas: &mut R,
    ) -> bool {
        self.visibility.highlight_one(id, index, canvas)
    }

    /// Hide every connection but keep the selection.
    pub fn clear_connections<R: Renderable + ?Sized>(
        &mut self,
        index: &mut ConnectionIndex,
        canvas: &mut R,
    ) {
        self.visibility.clear_all(index, canvas);
    }

    /// Hide every connection and deselect.
    pub fn reset<R: Renderable + ?Sized>(&mut self, index: &mut ConnectionIndex, canvas: &mut R) {
        self.visibility.clear_all(index, canvas);
        self.selected = None;
    }
}
