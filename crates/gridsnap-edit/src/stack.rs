//! Command stack with undo/redo history.

use crate::command::{Command, CommandError};
use gridsnap_core::Diagram;

/// Maximum number of commands kept in the undo history.
const MAX_UNDO_HISTORY: usize = 50;

/// Executes commands and keeps undo/redo history.
///
/// Commands pass through this stack so that every mutation of the diagram
/// is revertible. A compound command occupies a single history slot and
/// undoes as one step.
#[derive(Default)]
pub struct CommandStack {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandStack {
    /// Create an empty command stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and push it onto the undo stack.
    ///
    /// Clears the redo stack; history is capped at a fixed maximum.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        diagram: &mut Diagram,
    ) -> Result<(), CommandError> {
        command.execute(diagram)?;
        log::debug!("executed command: {}", command.label());

        self.redo_stack.clear();
        self.undo_stack.push(command);
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
        Ok(())
    }

    /// Undo the last executed command.
    /// Returns Ok(false) if there is nothing to undo.
    pub fn undo(&mut self, diagram: &mut Diagram) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        // A command that fails to revert is dropped; its state can no
        // longer be trusted for redo.
        command.undo(diagram)?;
        log::debug!("undid command: {}", command.label());
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Re-execute the last undone command.
    /// Returns Ok(false) if there is nothing to redo.
    pub fn redo(&mut self, diagram: &mut Diagram) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        command.execute(diagram)?;
        log::debug!("redid command: {}", command.label());
        self.undo_stack.push(command);
        Ok(true)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CompoundCommand, MoveNodeCommand};
    use gridsnap_core::Node;
    use kurbo::{Rect, Vec2};

    #[test]
    fn test_execute_undo_redo_roundtrip() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::new("n", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut stack = CommandStack::new();

        stack
            .execute(
                Box::new(MoveNodeCommand::new(id, Vec2::new(5.0, 5.0))),
                &mut diagram,
            )
            .unwrap();
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        assert!(stack.undo(&mut diagram).unwrap());
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(0.0, 0.0, 10.0, 10.0)
        );
        assert!(stack.can_redo());

        assert!(stack.redo(&mut diagram).unwrap());
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(5.0, 5.0, 15.0, 15.0)
        );
    }

    #[test]
    fn test_undo_empty_stack_is_noop() {
        let mut diagram = Diagram::new();
        let mut stack = CommandStack::new();
        assert!(!stack.undo(&mut diagram).unwrap());
        assert!(!stack.redo(&mut diagram).unwrap());
    }

    #[test]
    fn test_execute_clears_redo() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::new("n", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut stack = CommandStack::new();

        stack
            .execute(
                Box::new(MoveNodeCommand::new(id, Vec2::new(1.0, 0.0))),
                &mut diagram,
            )
            .unwrap();
        stack.undo(&mut diagram).unwrap();
        assert!(stack.can_redo());

        stack
            .execute(
                Box::new(MoveNodeCommand::new(id, Vec2::new(0.0, 1.0))),
                &mut diagram,
            )
            .unwrap();
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_compound_undoes_as_single_step() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(Node::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = diagram.add_node(Node::new("b", Rect::new(20.0, 0.0, 30.0, 10.0)));
        let mut stack = CommandStack::new();

        let mut compound = CompoundCommand::new("move both");
        compound.push(Box::new(MoveNodeCommand::new(a, Vec2::new(2.0, 0.0))));
        compound.push(Box::new(MoveNodeCommand::new(b, Vec2::new(2.0, 0.0))));
        stack.execute(Box::new(compound), &mut diagram).unwrap();

        assert!(stack.undo(&mut diagram).unwrap());
        assert_eq!(
            diagram.get_node(a).unwrap().layout_bounds.unwrap(),
            Rect::new(0.0, 0.0, 10.0, 10.0)
        );
        assert_eq!(
            diagram.get_node(b).unwrap().layout_bounds.unwrap(),
            Rect::new(20.0, 0.0, 30.0, 10.0)
        );
        // One history slot, now spent.
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_history_is_capped() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::new("n", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut stack = CommandStack::new();

        for _ in 0..60 {
            stack
                .execute(
                    Box::new(MoveNodeCommand::new(id, Vec2::new(1.0, 0.0))),
                    &mut diagram,
                )
                .unwrap();
        }
        let mut undone = 0;
        while stack.undo(&mut diagram).unwrap() {
            undone += 1;
        }
        assert_eq!(undone, 50);
    }
}
