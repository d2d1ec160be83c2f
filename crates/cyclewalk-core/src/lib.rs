//! Core infrastructure for cyclewalk.
//!
//! This crate provides the traversal engine:
//! - Node graph with shared (`children`) and owned (`cousins`) edges
//! - Walker with post-order callbacks and cycle detection
//! - Error types for the cycle signal and callback failures
//! - Walker configuration
//! - Serializable traversal summaries

pub mod config;
pub mod error;
pub mod node;
pub mod report;
pub mod walker;
