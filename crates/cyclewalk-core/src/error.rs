//! Error types for traversal.
//!
//! Two kinds of failure exist during a walk:
//!
//! - **Cycle signal** ([`CycleDetected`]): raised when a node re-enters the
//!   active path. It is consumed one frame above the point of detection and
//!   never reaches the caller of [`Walker::walk`](crate::walker::Walker::walk).
//! - **Callback failure**: whatever error the mutator returns. It aborts the
//!   traversal and reaches the caller unchanged.
//!
//! [`MutateError`] is a ready-made error for mutators that have no error type
//! of their own.

use thiserror::Error;

use crate::node::{Node, NodeId};

// ============================================================================
// Cycle Signal
// ============================================================================

/// A node's identity was already on the active path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cycle detected: {node} re-entered at depth {depth} (visit {visit})")]
pub struct CycleDetected {
    /// Node that closed the cycle.
    pub node: NodeId,
    /// Visit counter at detection time.
    pub visit: usize,
    /// Depth at which the repeat was attempted.
    pub depth: usize,
}

/// Outcome of a failed descent into one node.
///
/// Internal to the walker: `Cycle` is intercepted by the parent frame,
/// `Failed` is unwrapped before leaving [`Walker::walk`](crate::walker::Walker::walk).
#[derive(Debug)]
pub(crate) enum Descent<E> {
    Cycle(CycleDetected),
    Failed(E),
}

impl<E> From<CycleDetected> for Descent<E> {
    fn from(signal: CycleDetected) -> Self {
        Descent::Cycle(signal)
    }
}

// ============================================================================
// Mutator Error
// ============================================================================

/// General-purpose error for mutator callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutateError {
    /// Failure not tied to a particular node.
    #[error("{message}")]
    Message { message: String },

    /// Failure while mutating a specific node.
    #[error("mutation failed on '{name}' ({node}): {message}")]
    Node {
        node: NodeId,
        name: String,
        message: String,
    },
}

impl MutateError {
    /// Create an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        MutateError::Message {
            message: message.into(),
        }
    }

    /// Create an error attributed to `node`.
    pub fn at(node: &Node, message: impl Into<String>) -> Self {
        MutateError::Node {
            node: node.id(),
            name: node.name.clone(),
            message: message.into(),
        }
    }

    /// The human-readable message, without node attribution.
    pub fn message(&self) -> &str {
        match self {
            MutateError::Message { message } | MutateError::Node { message, .. } => message,
        }
    }
}
