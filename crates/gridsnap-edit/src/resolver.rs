//! Snap resolution: align selected elements to their snap targets in one
//! undoable batch.

use crate::command::{Command, CommandError, CompoundCommand};
use crate::element::MovableElement;
use crate::stack::CommandStack;
use gridsnap_core::{Diagram, SnapAxes, SnapRequest};
use thiserror::Error;

/// Errors raised before any snap computation takes place.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapError {
    /// The selection contains no elements.
    #[error("snap selection is empty")]
    EmptySelection,
    /// The selection mixes elements from different mapping contexts.
    #[error("snap selection mixes coordinate mapping contexts")]
    MixedMapMode,
}

/// Outcome of executing a snap batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// All member moves were applied as one undoable step.
    Applied(usize),
    /// The batch was empty or not executable; nothing changed.
    Skipped,
}

/// An ordered, all-or-nothing batch of move commands produced by
/// [`resolve_snap`].
pub struct SnapBatch {
    commands: CompoundCommand,
}

impl std::fmt::Debug for SnapBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapBatch")
            .field("len", &self.commands.len())
            .finish()
    }
}

impl SnapBatch {
    /// Number of move commands in the batch.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if no element contributed a move command.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Execute the batch through the command stack as one undoable step.
    ///
    /// The batch runs only if every member command is executable against
    /// the current diagram state; otherwise it is discarded and
    /// [`BatchOutcome::Skipped`] is reported. A partially snappable
    /// selection degrades to a no-op rather than an error.
    pub fn execute(
        self,
        diagram: &mut Diagram,
        stack: &mut CommandStack,
    ) -> Result<BatchOutcome, CommandError> {
        if !self.commands.can_execute(diagram) {
            log::debug!(
                "snap batch of {} command(s) not executable, skipping",
                self.commands.len()
            );
            return Ok(BatchOutcome::Skipped);
        }
        let count = self.commands.len();
        stack.execute(Box::new(self.commands), diagram)?;
        Ok(BatchOutcome::Applied(count))
    }
}

/// Compute one atomic batch of move commands aligning each selected element
/// to its nearest snap target.
///
/// Elements keep their input order in the batch. An element without a
/// stored layout constraint contributes no command; an element without a
/// snap provider keeps its raw reconciling delta; relative positions are
/// preserved wherever no snap target applies.
///
/// All elements must come from the same diagram: the selection is rejected
/// when it is empty or when mapping contexts differ between elements.
pub fn resolve_snap(elements: &[&dyn MovableElement]) -> Result<SnapBatch, SnapError> {
    let first = elements.first().ok_or(SnapError::EmptySelection)?;
    let map = first.map_mode();
    if elements.iter().any(|element| element.map_mode() != map) {
        return Err(SnapError::MixedMapMode);
    }
    log::debug!("resolving snap for {} element(s)", elements.len());

    let mut batch = CompoundCommand::new("Snap to Grid");
    for element in elements {
        // Computed positions have nothing to snap.
        let Some(stored) = element.layout_origin() else {
            log::trace!("skipping element without a stored layout constraint");
            continue;
        };

        // The rendered position may lag behind the stored layout; this
        // delta simulates a drag from the rendered position to the stored
        // one, and the snap result is based on the rendered bounds.
        let rendered = element.rendered_bounds();
        let delta = map.point_to_device(stored) - rendered.origin();

        let base = element.handle_bounds().unwrap_or(rendered);
        let request = SnapRequest {
            rect: base + delta,
            delta,
            axes: SnapAxes::BOTH,
        };
        let refined = match element.snap_provider() {
            Some(provider) => provider.snap(&request).delta,
            None => delta,
        };

        match element.move_command(refined) {
            Some(command) => batch.push(command),
            None => log::trace!("element declined to produce a move command"),
        }
    }
    Ok(SnapBatch { commands: batch })
}
