//! Walker configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Walker`](crate::walker::Walker).
///
/// # Example
///
/// ```
/// use cyclewalk_core::config::WalkerConfig;
///
/// let config = WalkerConfig::default().with_trace_visits(true);
/// assert!(config.trace_visits);
/// assert!(config.mark_cycling);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Emit a `trace` event for every node entered.
    pub trace_visits: bool,
    /// Set `cycling` on the node that re-entered the active path.
    ///
    /// The cycle log is recorded either way.
    pub mark_cycling: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        WalkerConfig {
            trace_visits: false,
            mark_cycling: true,
        }
    }
}

impl WalkerConfig {
    /// Enable or disable per-node trace events.
    #[must_use]
    pub fn with_trace_visits(mut self, enabled: bool) -> Self {
        self.trace_visits = enabled;
        self
    }

    /// Enable or disable setting the `cycling` flag.
    #[must_use]
    pub fn with_mark_cycling(mut self, enabled: bool) -> Self {
        self.mark_cycling = enabled;
        self
    }
}
