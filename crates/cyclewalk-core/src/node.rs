//! Graph vertices for traversal.
//!
//! A [`Node`] carries two kinds of outgoing edges:
//!
//! - **Reference edges** (`children`): shared [`NodeRef`] handles. The same
//!   node may appear under many parents, including its own descendants, and a
//!   mutation through any handle is visible through all of them.
//! - **Copy edges** (`cousins`): named groups of owned [`Node`] values. Each
//!   entry is its own storage. A cousin's `children` are still reference
//!   edges, so cycles can re-enter the shared graph through a cousin.
//!
//! Identity is the [`NodeId`] issued when a node is constructed (or cloned),
//! never structural equality.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Shared handle to a node reachable through a reference edge.
pub type NodeRef = Rc<RefCell<Node>>;

/// Named groups of owned cousin nodes.
pub type CousinGroups = BTreeMap<String, Vec<Node>>;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// NodeId
// ============================================================================

/// Stable identity of a node's storage.
///
/// Issued from a process-wide counter, so two live nodes never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// ============================================================================
// Node
// ============================================================================

/// A vertex in the traversal graph.
pub struct Node {
    id: NodeId,
    /// Set on the node a traversal starts from. Informational only.
    pub is_root: bool,
    /// Opaque label.
    pub name: String,
    /// Set by the walker when this node closed a cycle on the active path.
    pub cycling: bool,
    /// Caller-owned counter; the walker never touches it.
    pub visit_count: usize,
    depth_at_visit: Option<usize>,
    /// Reference edges, visited in order.
    pub children: Vec<NodeRef>,
    /// Copy edges, grouped by key.
    pub cousins: CousinGroups,
}

impl Node {
    /// Create a detached node with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            id: NodeId::next(),
            is_root: false,
            name: name.into(),
            cycling: false,
            visit_count: 0,
            depth_at_visit: None,
            children: Vec::new(),
            cousins: CousinGroups::new(),
        }
    }

    /// Create a node and wrap it in a shared handle.
    pub fn shared(name: impl Into<String>) -> NodeRef {
        Node::new(name).into_ref()
    }

    /// Wrap this node in a shared handle. Identity is preserved.
    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    /// Mark this node as a traversal root.
    #[must_use]
    pub fn as_root(mut self) -> Self {
        self.mark_root();
        self
    }

    /// Mark this node as a traversal root in place.
    pub fn mark_root(&mut self) {
        self.is_root = true;
    }

    /// Identity of this node's storage.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Depth at which the walker last entered this node, if ever.
    pub fn depth_at_visit(&self) -> Option<usize> {
        self.depth_at_visit
    }

    pub(crate) fn set_depth_at_visit(&mut self, depth: usize) {
        self.depth_at_visit = Some(depth);
    }

    /// Append a reference edge.
    pub fn add_child(&mut self, child: NodeRef) {
        self.children.push(child);
    }

    /// Append an owned cousin under `key`, returning its index in the group.
    pub fn add_cousin(&mut self, key: impl Into<String>, cousin: Node) -> usize {
        let group = self.cousins.entry(key.into()).or_default();
        group.push(cousin);
        group.len() - 1
    }

    /// Cousin group stored under `key`.
    pub fn cousin_group(&self, key: &str) -> Option<&[Node]> {
        self.cousins.get(key).map(Vec::as_slice)
    }

    /// Mutable cousin group stored under `key`.
    pub fn cousin_group_mut(&mut self, key: &str) -> Option<&mut Vec<Node>> {
        self.cousins.get_mut(key)
    }

    /// Move the cousin at `key[index]` out, leaving a stand-in that keeps its
    /// id and name but has no edges.
    pub(crate) fn take_cousin(&mut self, key: &str, index: usize) -> Option<Node> {
        let slot = self.cousins.get_mut(key)?.get_mut(index)?;
        let stand_in = slot.stand_in();
        Some(std::mem::replace(slot, stand_in))
    }

    /// Commit a cousin taken with [`take_cousin`](Self::take_cousin) back over
    /// its stand-in. If the stand-in is gone, the cousin is appended to `key`.
    pub(crate) fn restore_cousin(&mut self, key: String, cousin: Node) {
        let group = self.cousins.entry(key).or_default();
        match group.iter_mut().find(|slot| slot.id == cousin.id) {
            Some(slot) => *slot = cousin,
            None => group.push(cousin),
        }
    }

    fn stand_in(&self) -> Node {
        Node {
            id: self.id,
            is_root: self.is_root,
            name: self.name.clone(),
            cycling: self.cycling,
            visit_count: self.visit_count,
            depth_at_visit: self.depth_at_visit,
            children: Vec::new(),
            cousins: CousinGroups::new(),
        }
    }
}

/// Cloning produces new storage, so the clone gets its own [`NodeId`].
///
/// Children stay shared handles; cousin groups are copied entry by entry,
/// each copy with a fresh identity as well.
impl Clone for Node {
    fn clone(&self) -> Self {
        Node {
            id: NodeId::next(),
            is_root: self.is_root,
            name: self.name.clone(),
            cycling: self.cycling,
            visit_count: self.visit_count,
            depth_at_visit: self.depth_at_visit,
            children: self.children.clone(),
            cousins: self.cousins.clone(),
        }
    }
}

/// Children are listed by id; following them could recurse forever.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self
            .children
            .iter()
            .map(|child| match child.try_borrow() {
                Ok(child) => child.id().to_string(),
                Err(_) => "<borrowed>".to_string(),
            })
            .collect();

        f.debug_struct("Node")
            .field("id", &self.id)
            .field("is_root", &self.is_root)
            .field("name", &self.name)
            .field("cycling", &self.cycling)
            .field("visit_count", &self.visit_count)
            .field("depth_at_visit", &self.depth_at_visit)
            .field("children", &children)
            .field("cousins", &self.cousins)
            .finish()
    }
}
