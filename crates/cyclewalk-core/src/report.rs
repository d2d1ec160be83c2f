//! Serializable traversal summaries.

use serde::{Deserialize, Serialize};

// ============================================================================
// Cycle Record
// ============================================================================

/// One entry of the cycle log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Visit counter when the cycle was detected.
    pub visit: usize,
    /// Depth at which the repeated node was about to be entered.
    pub depth: usize,
}

// ============================================================================
// Summary
// ============================================================================

/// Outcome of the most recent walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkSummary {
    /// Number of nodes entered.
    pub visits: usize,
    /// Cycle log in detection order.
    pub cycles: Vec<Cycle>,
}

impl WalkSummary {
    /// Whether any cycle was detected.
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}
