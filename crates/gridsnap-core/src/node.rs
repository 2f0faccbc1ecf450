//! Diagram node model.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = Uuid;

/// A diagram element with an optional stored layout constraint.
///
/// Layout bounds are in logical units. A node without layout bounds has its
/// position computed by its container and cannot be moved or snapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    /// Display name.
    pub name: String,
    /// Stored layout bounds in logical units (None = computed position).
    pub layout_bounds: Option<Rect>,
}

impl Node {
    /// Create a new node with stored layout bounds.
    pub fn new(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layout_bounds: Some(bounds),
        }
    }

    /// Create a node whose position is computed rather than stored.
    pub fn unplaced(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layout_bounds: None,
        }
    }

    /// Get the unique identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Stored logical-space origin, if the node has layout bounds.
    pub fn origin(&self) -> Option<Point> {
        self.layout_bounds.map(|bounds| bounds.origin())
    }

    /// Translate the stored layout bounds by a logical-unit delta.
    /// Returns false if the node has no layout bounds.
    pub fn translate(&mut self, delta: Vec2) -> bool {
        match &mut self.layout_bounds {
            Some(bounds) => {
                *bounds = *bounds + delta;
                true
            }
            None => false,
        }
    }
}
