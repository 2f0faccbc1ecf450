//! Movable-element capabilities for snap resolution.

use crate::command::{Command, SetNodeOriginCommand};
use gridsnap_core::{Diagram, MapMode, NodeId, SnapProvider};
use kurbo::{Point, Rect, Vec2};
use std::sync::Arc;

/// A selected diagram element, as seen by the snap resolver.
///
/// Capabilities are optional where the underlying element may lack them: a
/// stored layout constraint, a tighter handle rectangle, a snap provider,
/// or a move command for a given request. The resolver only reads; it never
/// mutates an element.
pub trait MovableElement {
    /// Stored logical-space origin, if the element's position is stored.
    fn layout_origin(&self) -> Option<Point>;

    /// Current on-screen bounds in absolute device units.
    fn rendered_bounds(&self) -> Rect;

    /// Tighter interaction rectangle preferred for snapping, device units.
    fn handle_bounds(&self) -> Option<Rect> {
        None
    }

    /// The element's root coordinate-mapping context.
    fn map_mode(&self) -> MapMode;

    /// Registered snap capability, if any.
    fn snap_provider(&self) -> Option<&dyn SnapProvider> {
        None
    }

    /// Produce a move command for a device-unit delta, or decline.
    fn move_command(&self, delta: Vec2) -> Option<Box<dyn Command>>;
}

/// Snapshot of a diagram node plus the bounds the renderer last drew it at.
///
/// The snapshot decouples resolution from the diagram borrow: the stored
/// origin and mapping context are captured up front, and the produced move
/// commands are applied to the diagram afterwards.
pub struct SelectedNode {
    node: NodeId,
    layout_origin: Option<Point>,
    rendered_bounds: Rect,
    handle_bounds: Option<Rect>,
    map_mode: MapMode,
    snap_provider: Option<Arc<dyn SnapProvider>>,
}

impl SelectedNode {
    /// Capture a node's stored state together with its rendered device
    /// bounds. Returns None if the node is not in the diagram.
    pub fn capture(diagram: &Diagram, node: NodeId, rendered_bounds: Rect) -> Option<Self> {
        let stored = diagram.get_node(node)?;
        Some(Self {
            node,
            layout_origin: stored.origin(),
            rendered_bounds,
            handle_bounds: None,
            map_mode: diagram.map_mode,
            snap_provider: None,
        })
    }

    /// Use a tighter rectangle for snap queries, device units.
    pub fn with_handle_bounds(mut self, bounds: Rect) -> Self {
        self.handle_bounds = Some(bounds);
        self
    }

    /// Attach a snap provider.
    pub fn with_snap_provider(mut self, provider: Arc<dyn SnapProvider>) -> Self {
        self.snap_provider = Some(provider);
        self
    }

    /// The captured node's ID.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl MovableElement for SelectedNode {
    fn layout_origin(&self) -> Option<Point> {
        self.layout_origin
    }

    fn rendered_bounds(&self) -> Rect {
        self.rendered_bounds
    }

    fn handle_bounds(&self) -> Option<Rect> {
        self.handle_bounds
    }

    fn map_mode(&self) -> MapMode {
        self.map_mode
    }

    fn snap_provider(&self) -> Option<&dyn SnapProvider> {
        self.snap_provider.as_deref()
    }

    fn move_command(&self, delta: Vec2) -> Option<Box<dyn Command>> {
        // The delta applies to the rendered position, so a stale rendered
        // position reconciles to where the element is actually shown.
        // Persisted bounds are logical; the delta arrives in device units.
        let rendered = self.map_mode.point_to_logical(self.rendered_bounds.origin());
        let origin = rendered + self.map_mode.vec_to_logical(delta);
        Some(Box::new(SetNodeOriginCommand::new(self.node, origin)))
    }
}
