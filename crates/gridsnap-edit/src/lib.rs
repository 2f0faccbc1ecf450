//! GridSnap Editing Layer
//!
//! Undoable commands, the command stack, movable-element capabilities, and
//! the snap resolver.

pub mod command;
pub mod element;
pub mod resolver;
pub mod stack;

pub use command::{Command, CommandError, CompoundCommand, MoveNodeCommand, SetNodeOriginCommand};
pub use element::{MovableElement, SelectedNode};
pub use resolver::{BatchOutcome, SnapBatch, SnapError, resolve_snap};
pub use stack::CommandStack;
