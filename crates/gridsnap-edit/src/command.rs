//! Undoable edit commands for the diagram model.

use gridsnap_core::{Diagram, NodeId};
use kurbo::{Point, Rect, Vec2};
use thiserror::Error;

/// Errors raised while executing or undoing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The target node is no longer part of the diagram.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// The target node has no stored layout bounds to move.
    #[error("node {0} has no stored layout bounds")]
    Unplaced(NodeId),
    /// Undo was requested before the command executed.
    #[error("command has not been executed")]
    NotExecuted,
}

/// An undoable mutation of a diagram.
///
/// Callers check `can_execute` against the current diagram state before
/// calling `execute`; `execute` may still fail if the state changed in
/// between.
pub trait Command {
    /// Short human-readable label (for undo menus and logs).
    fn label(&self) -> &str;

    /// True if the command can run against the current diagram state.
    fn can_execute(&self, diagram: &Diagram) -> bool;

    /// Apply the command.
    fn execute(&mut self, diagram: &mut Diagram) -> Result<(), CommandError>;

    /// Revert a previously executed command.
    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), CommandError>;
}

/// Translates a node's stored layout bounds by a logical-unit delta.
#[derive(Debug)]
pub struct MoveNodeCommand {
    node: NodeId,
    delta: Vec2,
    /// Bounds before the move, captured on execute.
    previous: Option<Rect>,
}

impl MoveNodeCommand {
    /// Create a move command. `delta` is in logical units.
    pub fn new(node: NodeId, delta: Vec2) -> Self {
        Self {
            node,
            delta,
            previous: None,
        }
    }

    /// The translation this command applies, logical units.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// The node this command targets.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Command for MoveNodeCommand {
    fn label(&self) -> &str {
        "Move Node"
    }

    fn can_execute(&self, diagram: &Diagram) -> bool {
        diagram
            .get_node(self.node)
            .is_some_and(|node| node.layout_bounds.is_some())
    }

    fn execute(&mut self, diagram: &mut Diagram) -> Result<(), CommandError> {
        let node = diagram
            .get_node_mut(self.node)
            .ok_or(CommandError::UnknownNode(self.node))?;
        let previous = node
            .layout_bounds
            .ok_or(CommandError::Unplaced(self.node))?;
        self.previous = Some(previous);
        node.layout_bounds = Some(previous + self.delta);
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), CommandError> {
        let previous = self.previous.take().ok_or(CommandError::NotExecuted)?;
        let node = diagram
            .get_node_mut(self.node)
            .ok_or(CommandError::UnknownNode(self.node))?;
        node.layout_bounds = Some(previous);
        Ok(())
    }
}

/// Moves a node's stored layout bounds to an absolute logical-unit origin,
/// preserving its size.
///
/// This is the command behind interactive moves: the new origin is computed
/// from the rendered position plus a drag/snap delta, so a stale rendered
/// position reconciles to where the element is actually shown.
#[derive(Debug)]
pub struct SetNodeOriginCommand {
    node: NodeId,
    origin: Point,
    /// Bounds before the move, captured on execute.
    previous: Option<Rect>,
}

impl SetNodeOriginCommand {
    /// Create a command placing the node's origin at `origin`, logical units.
    pub fn new(node: NodeId, origin: Point) -> Self {
        Self {
            node,
            origin,
            previous: None,
        }
    }

    /// The origin this command moves the node to, logical units.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The node this command targets.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Command for SetNodeOriginCommand {
    fn label(&self) -> &str {
        "Move Node"
    }

    fn can_execute(&self, diagram: &Diagram) -> bool {
        diagram
            .get_node(self.node)
            .is_some_and(|node| node.layout_bounds.is_some())
    }

    fn execute(&mut self, diagram: &mut Diagram) -> Result<(), CommandError> {
        let node = diagram
            .get_node_mut(self.node)
            .ok_or(CommandError::UnknownNode(self.node))?;
        let previous = node
            .layout_bounds
            .ok_or(CommandError::Unplaced(self.node))?;
        self.previous = Some(previous);
        node.layout_bounds = Some(Rect::from_origin_size(self.origin, previous.size()));
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), CommandError> {
        let previous = self.previous.take().ok_or(CommandError::NotExecuted)?;
        let node = diagram
            .get_node_mut(self.node)
            .ok_or(CommandError::UnknownNode(self.node))?;
        node.layout_bounds = Some(previous);
        Ok(())
    }
}

/// An ordered group of commands executed and undone as one unit.
///
/// Executable only when non-empty and every member is executable. Members
/// execute in order and undo in reverse order.
pub struct CompoundCommand {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl CompoundCommand {
    /// Create an empty compound command.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    /// Append a member command.
    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    /// Number of member commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if there are no member commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for CompoundCommand {
    fn label(&self) -> &str {
        &self.label
    }

    fn can_execute(&self, diagram: &Diagram) -> bool {
        !self.commands.is_empty() && self.commands.iter().all(|c| c.can_execute(diagram))
    }

    fn execute(&mut self, diagram: &mut Diagram) -> Result<(), CommandError> {
        for command in &mut self.commands {
            command.execute(diagram)?;
        }
        Ok(())
    }

    fn undo(&mut self, diagram: &mut Diagram) -> Result<(), CommandError> {
        for command in self.commands.iter_mut().rev() {
            command.undo(diagram)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsnap_core::Node;

    fn diagram_with_node(bounds: Rect) -> (Diagram, NodeId) {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::new("n", bounds));
        (diagram, id)
    }

    #[test]
    fn test_move_execute_and_undo() {
        let (mut diagram, id) = diagram_with_node(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut command = MoveNodeCommand::new(id, Vec2::new(5.0, 5.0));
        assert!(command.can_execute(&diagram));

        command.execute(&mut diagram).unwrap();
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(5.0, 5.0, 15.0, 15.0)
        );

        command.undo(&mut diagram).unwrap();
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(0.0, 0.0, 10.0, 10.0)
        );
    }

    #[test]
    fn test_move_unknown_node_not_executable() {
        let diagram = Diagram::new();
        let command = MoveNodeCommand::new(NodeId::new_v4(), Vec2::new(1.0, 1.0));
        assert!(!command.can_execute(&diagram));
    }

    #[test]
    fn test_move_unplaced_node_not_executable() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::unplaced("label"));
        let command = MoveNodeCommand::new(id, Vec2::new(1.0, 1.0));
        assert!(!command.can_execute(&diagram));
    }

    #[test]
    fn test_undo_before_execute_fails() {
        let (mut diagram, id) = diagram_with_node(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut command = MoveNodeCommand::new(id, Vec2::new(1.0, 1.0));
        assert!(matches!(
            command.undo(&mut diagram),
            Err(CommandError::NotExecuted)
        ));
    }

    #[test]
    fn test_set_origin_preserves_size_and_undoes() {
        let (mut diagram, id) = diagram_with_node(Rect::new(5.0, 5.0, 25.0, 45.0));
        let mut command = SetNodeOriginCommand::new(id, Point::new(0.0, 20.0));

        command.execute(&mut diagram).unwrap();
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(0.0, 20.0, 20.0, 60.0)
        );

        command.undo(&mut diagram).unwrap();
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(5.0, 5.0, 25.0, 45.0)
        );
    }

    #[test]
    fn test_set_origin_requires_placed_node() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::unplaced("label"));
        let command = SetNodeOriginCommand::new(id, Point::ZERO);
        assert!(!command.can_execute(&diagram));
    }

    #[test]
    fn test_compound_requires_all_members_executable() {
        let (mut diagram, a) = diagram_with_node(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = diagram.add_node(Node::new("b", Rect::new(20.0, 0.0, 30.0, 10.0)));

        let mut compound = CompoundCommand::new("move both");
        compound.push(Box::new(MoveNodeCommand::new(a, Vec2::new(1.0, 0.0))));
        compound.push(Box::new(MoveNodeCommand::new(b, Vec2::new(1.0, 0.0))));
        assert!(compound.can_execute(&diagram));

        diagram.remove_node(b);
        assert!(!compound.can_execute(&diagram));
    }

    #[test]
    fn test_empty_compound_not_executable() {
        let diagram = Diagram::new();
        let compound = CompoundCommand::new("empty");
        assert!(!compound.can_execute(&diagram));
    }

    #[test]
    fn test_compound_executes_in_order_and_undoes_in_reverse() {
        let (mut diagram, id) = diagram_with_node(Rect::new(0.0, 0.0, 10.0, 10.0));

        // Two moves of the same node compose; undo must restore the start.
        let mut compound = CompoundCommand::new("move twice");
        compound.push(Box::new(MoveNodeCommand::new(id, Vec2::new(5.0, 0.0))));
        compound.push(Box::new(MoveNodeCommand::new(id, Vec2::new(0.0, 7.0))));

        compound.execute(&mut diagram).unwrap();
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(5.0, 7.0, 15.0, 17.0)
        );

        compound.undo(&mut diagram).unwrap();
        assert_eq!(
            diagram.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(0.0, 0.0, 10.0, 10.0)
        );
    }
}
