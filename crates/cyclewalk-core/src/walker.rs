//! Depth-first traversal with post-order mutation and cycle detection.
//!
//! # Traversal Order
//!
//! - **Depth-first**, children in sequence order, then cousin groups in key
//!   order (entries in index order)
//! - **Post-order** for [`Mutator::mutate`]: a node is mutated only after its
//!   whole subtree has been processed
//!
//! # Cycles
//!
//! The walker keeps an identity table of the nodes on the active path, each
//! with the depth it was entered at. Entries at or below the current depth are
//! pruned on every entry, since they belong to subtrees that have already been
//! left. A node whose identity is still in the table closes a cycle: the
//! attempt is logged (see [`Walker::cycles`]), the node is flagged `cycling`
//! by its parent, and traversal continues with the next sibling.
//!
//! # Control Flow
//!
//! - `Ok(())` from the mutator - continue
//! - `Err(e)` from the mutator - halt immediately; remaining siblings, cousins
//!   and ancestors are not mutated, and `e` is returned from [`Walker::walk`]
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use cyclewalk_core::error::MutateError;
//! use cyclewalk_core::node::{Node, NodeRef};
//! use cyclewalk_core::walker::Walker;
//!
//! let root: NodeRef = Node::new("root").as_root().into_ref();
//! let child = Node::shared("child");
//! root.borrow_mut().add_child(Rc::clone(&child));
//! child.borrow_mut().add_child(Rc::clone(&root));
//!
//! let mut walker = Walker::new();
//! walker
//!     .walk(&root, &mut |node: &mut Node| -> Result<(), MutateError> {
//!         node.visit_count += 1;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(walker.visits(), 2);
//! assert_eq!(walker.cycles().len(), 1);
//! assert!(root.borrow().cycling);
//! ```

use std::collections::HashMap;

use tracing::{debug, debug_span, trace};

use crate::config::WalkerConfig;
use crate::error::{CycleDetected, Descent};
use crate::node::{CousinGroups, Node, NodeId, NodeRef};
use crate::report::{Cycle, WalkSummary};

// ============================================================================
// Mutator
// ============================================================================

/// Callback applied to every node the walker enters, in post-order.
///
/// Implemented for any `FnMut(&mut Node) -> Result<(), E>`.
pub trait Mutator {
    /// Error that aborts the traversal.
    type Error;

    /// Mutate `node`. Returning an error stops the walk.
    ///
    /// When `node` is reached through a shared handle, that handle is mutably
    /// borrowed for the duration of the call. A node that lists itself among
    /// its own children must be inspected with `try_borrow`; `borrow` on it
    /// panics.
    fn mutate(&mut self, node: &mut Node) -> Result<(), Self::Error>;
}

impl<F, E> Mutator for F
where
    F: FnMut(&mut Node) -> Result<(), E>,
{
    type Error = E;

    fn mutate(&mut self, node: &mut Node) -> Result<(), E> {
        self(node)
    }
}

// ============================================================================
// Walker
// ============================================================================

/// Per-traversal state.
///
/// A walker describes one traversal at a time: each call to [`walk`](Self::walk)
/// starts from a clean state, and the accessors report on the most recent call.
#[derive(Debug, Default)]
pub struct Walker {
    config: WalkerConfig,
    visits: usize,
    depth: usize,
    active: HashMap<NodeId, usize>,
    cycles: Vec<Cycle>,
}

impl Walker {
    /// Create a walker with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker with the given configuration.
    pub fn with_config(config: WalkerConfig) -> Self {
        Walker {
            config,
            ..Default::default()
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Number of nodes entered by the most recent walk.
    ///
    /// Nodes short-circuited by cycle detection are not counted.
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Cycle log of the most recent walk, in detection order.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Snapshot of the most recent walk.
    pub fn summary(&self) -> WalkSummary {
        WalkSummary {
            visits: self.visits,
            cycles: self.cycles.clone(),
        }
    }

    /// Walk the graph under `root`, mutating every entered node in post-order.
    ///
    /// `root` is entered at depth 0 whatever its `is_root` flag says. The first
    /// mutator error is returned unchanged; nodes mutated before it keep their
    /// changes.
    ///
    /// The mutator sees each node through a mutable borrow of its handle; see
    /// [`Mutator::mutate`]. While a cousin entry's own subtree is walked, its
    /// slot holds a stand-in with the same id and name and no edges. The entry
    /// is written back over the stand-in afterwards, so writes made to the
    /// stand-in are dropped; every other slot and group stays in place.
    pub fn walk<M: Mutator>(&mut self, root: &NodeRef, mutator: &mut M) -> Result<(), M::Error> {
        self.reset();

        let span = debug_span!("walk", root = %root.borrow().name);
        let _guard = span.enter();

        match self.visit_shared(root, mutator) {
            Ok(()) => {}
            Err(Descent::Failed(err)) => return Err(err),
            // The root starts with an empty identity table and cannot close a cycle.
            Err(Descent::Cycle(_)) => {}
        }

        debug!(
            visits = self.visits,
            cycles = self.cycles.len(),
            "walk complete"
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.visits = 0;
        self.depth = 0;
        self.active.clear();
        self.cycles.clear();
    }

    /// Register `node` on the active path at the current depth.
    fn enter(&mut self, node: NodeId) -> Result<(), CycleDetected> {
        let depth = self.depth;
        self.active.retain(|_, seen| *seen < depth);

        if self.active.contains_key(&node) {
            let signal = CycleDetected {
                node,
                visit: self.visits,
                depth,
            };
            self.cycles.push(Cycle {
                visit: signal.visit,
                depth: signal.depth,
            });
            return Err(signal);
        }

        self.active.insert(node, depth);
        self.visits += 1;
        Ok(())
    }

    fn trace_enter(&self, node: &Node) {
        if self.config.trace_visits {
            trace!(
                node = %node.id(),
                name = %node.name,
                depth = self.depth,
                visit = self.visits,
                "enter"
            );
        }
    }

    /// Visit a node reached through a reference edge.
    ///
    /// No borrow of `node` is held while its subtree is walked, so aliases of
    /// it further down can still be inspected and flagged.
    fn visit_shared<M: Mutator>(
        &mut self,
        node: &NodeRef,
        mutator: &mut M,
    ) -> Result<(), Descent<M::Error>> {
        let id = node.borrow().id();
        self.enter(id)?;

        let children = {
            let mut entered = node.borrow_mut();
            entered.set_depth_at_visit(self.depth);
            self.trace_enter(&entered);
            entered.children.clone()
        };

        self.depth += 1;
        let mut outcome = self.visit_children(&children, mutator);
        if outcome.is_ok() {
            outcome = self.visit_shared_cousins(node, mutator);
        }
        if outcome.is_ok() {
            outcome = Self::apply(&mut node.borrow_mut(), mutator);
        }
        self.depth -= 1;
        outcome
    }

    /// Visit a cousin entry as a standalone subtree.
    fn visit_owned<M: Mutator>(
        &mut self,
        node: &mut Node,
        mutator: &mut M,
    ) -> Result<(), Descent<M::Error>> {
        self.enter(node.id())?;
        node.set_depth_at_visit(self.depth);
        self.trace_enter(node);

        self.depth += 1;
        let mut outcome = self.visit_children(&node.children, mutator);
        if outcome.is_ok() {
            outcome = self.visit_owned_cousins(&mut node.cousins, mutator);
        }
        if outcome.is_ok() {
            outcome = Self::apply(node, mutator);
        }
        self.depth -= 1;
        outcome
    }

    /// Walk reference edges in order.
    fn visit_children<M: Mutator>(
        &mut self,
        children: &[NodeRef],
        mutator: &mut M,
    ) -> Result<(), Descent<M::Error>> {
        for child in children {
            match self.visit_shared(child, mutator) {
                Err(Descent::Cycle(signal)) => {
                    let mut repeated = child.borrow_mut();
                    debug!(name = %repeated.name, "{}", signal);
                    if self.config.mark_cycling {
                        repeated.cycling = true;
                    }
                }
                other => other?,
            }
        }
        Ok(())
    }

    /// Walk the cousins of a shared node one entry at a time.
    ///
    /// Slots are listed once the children are done. Each entry is moved out
    /// for its own subtree and committed back afterwards, so the rest of the
    /// node stays readable and writable by mutators further down.
    fn visit_shared_cousins<M: Mutator>(
        &mut self,
        node: &NodeRef,
        mutator: &mut M,
    ) -> Result<(), Descent<M::Error>> {
        let slots: Vec<(String, usize)> = node
            .borrow()
            .cousins
            .iter()
            .flat_map(|(key, group)| (0..group.len()).map(move |index| (key.clone(), index)))
            .collect();

        for (key, index) in slots {
            let taken = node.borrow_mut().take_cousin(&key, index);
            let Some(mut entry) = taken else {
                continue;
            };

            let outcome = self.visit_owned(&mut entry, mutator);
            let outcome = self.settle_cousin(&mut entry, outcome);
            node.borrow_mut().restore_cousin(key, entry);
            outcome?;
        }
        Ok(())
    }

    /// Walk the cousins of a cousin entry in place.
    fn visit_owned_cousins<M: Mutator>(
        &mut self,
        cousins: &mut CousinGroups,
        mutator: &mut M,
    ) -> Result<(), Descent<M::Error>> {
        for group in cousins.values_mut() {
            for entry in group.iter_mut() {
                let outcome = self.visit_owned(entry, mutator);
                self.settle_cousin(entry, outcome)?;
            }
        }
        Ok(())
    }

    /// Absorb a cycle signal from a cousin entry into its `cycling` flag.
    fn settle_cousin<E>(
        &self,
        entry: &mut Node,
        outcome: Result<(), Descent<E>>,
    ) -> Result<(), Descent<E>> {
        match outcome {
            Err(Descent::Cycle(signal)) => {
                debug!(name = %entry.name, "{}", signal);
                if self.config.mark_cycling {
                    entry.cycling = true;
                }
                Ok(())
            }
            other => other,
        }
    }

    fn apply<M: Mutator>(node: &mut Node, mutator: &mut M) -> Result<(), Descent<M::Error>> {
        match mutator.mutate(node) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(node = %node.id(), name = %node.name, "mutator failed");
                Err(Descent::Failed(err))
            }
        }
    }
}
