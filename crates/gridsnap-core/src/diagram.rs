//! Diagram document and persistence.

use crate::mapmode::MapMode;
use crate::node::{Node, NodeId};
use crate::snap::{GridSettings, GuideSet};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while saving or loading a diagram.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A diagram document containing all nodes and layout state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All nodes in the diagram, keyed by ID.
    pub nodes: HashMap<NodeId, Node>,
    /// Z-order of nodes (back to front).
    pub z_order: Vec<NodeId>,
    /// Coordinate mapping between logical and device units.
    pub map_mode: MapMode,
    /// Grid configuration, device units.
    pub grid: GridSettings,
    /// Alignment guides, device units.
    pub guides: GuideSet,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// Create a new empty diagram.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            nodes: HashMap::new(),
            z_order: Vec::new(),
            map_mode: MapMode::Identity,
            grid: GridSettings::default(),
            guides: GuideSet::default(),
        }
    }

    /// Add a node to the diagram.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.z_order.push(id);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node from the diagram.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        self.z_order.retain(|&node_id| node_id != id);
        self.nodes.remove(&id)
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Get nodes in z-order (back to front).
    pub fn nodes_ordered(&self) -> impl Iterator<Item = &Node> {
        self.z_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Get the bounding box of all placed nodes, in logical units.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for node in self.nodes.values() {
            let Some(bounds) = node.layout_bounds else {
                continue;
            };
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Check if the diagram is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Serialize the diagram to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a diagram from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save the diagram as JSON at the given path.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), DiagramError> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("saved diagram to: {:?}", path.as_ref());
        Ok(())
    }

    /// Load a diagram from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let diagram = Self::from_json(&json)?;
        log::info!("loaded diagram from: {:?}", path.as_ref());
        Ok(diagram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_and_get_node() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(diagram.len(), 1);
        assert_eq!(diagram.get_node(id).unwrap().name, "a");
    }

    #[test]
    fn test_remove_node() {
        let mut diagram = Diagram::new();
        let id = diagram.add_node(Node::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let removed = diagram.remove_node(id);
        assert!(removed.is_some());
        assert!(diagram.is_empty());
        assert!(diagram.z_order.is_empty());
    }

    #[test]
    fn test_nodes_ordered_follows_insertion() {
        let mut diagram = Diagram::new();
        let a = diagram.add_node(Node::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = diagram.add_node(Node::new("b", Rect::new(20.0, 0.0, 30.0, 10.0)));
        let order: Vec<NodeId> = diagram.nodes_ordered().map(|n| n.id()).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_bounds_skips_unplaced() {
        let mut diagram = Diagram::new();
        diagram.add_node(Node::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        diagram.add_node(Node::new("b", Rect::new(20.0, 20.0, 40.0, 40.0)));
        diagram.add_node(Node::unplaced("c"));
        assert_eq!(diagram.bounds().unwrap(), Rect::new(0.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Diagram::new().bounds().is_none());
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let mut diagram = Diagram::new();
        diagram.name = "circuit".to_string();
        diagram.map_mode = MapMode::Scaled(2.0);
        let id = diagram.add_node(Node::new("a", Rect::new(5.0, 5.0, 25.0, 25.0)));

        let dir = tempdir().unwrap();
        let path = dir.path().join("circuit.json");
        diagram.save_to_file(&path).unwrap();

        let loaded = Diagram::load_from_file(&path).unwrap();
        assert_eq!(loaded.name, "circuit");
        assert_eq!(loaded.map_mode, MapMode::Scaled(2.0));
        assert_eq!(
            loaded.get_node(id).unwrap().layout_bounds.unwrap(),
            Rect::new(5.0, 5.0, 25.0, 25.0)
        );
        assert_eq!(loaded.z_order, diagram.z_order);
    }
}
