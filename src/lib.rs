//! cyclewalk: post-order graph traversal with cycle detection
//!
//! Walks a rooted node graph whose shared edges may alias and loop back,
//! applying a mutator to every node after its subtree, and records each point
//! where a reference cycle was cut short.

// Core infrastructure - re-exported from cyclewalk-core
pub use cyclewalk_core::config;
pub use cyclewalk_core::error;
pub use cyclewalk_core::node;
pub use cyclewalk_core::report;
pub use cyclewalk_core::walker;

// Common entry points
pub use cyclewalk_core::config::WalkerConfig;
pub use cyclewalk_core::error::MutateError;
pub use cyclewalk_core::node::{Node, NodeId, NodeRef};
pub use cyclewalk_core::walker::{Mutator, Walker};
