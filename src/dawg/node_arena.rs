//! An index arena for DAWG nodes.
//!
//! Nodes are appended once and never moved or freed individually; the whole
//! arena is dropped as a unit after packing. Edges refer to nodes by
//! [`NodeId`], so a node may have any number of parents.

use std::fmt;
use std::ops::Index;

use super::children::DawgNode;

/// Index of a node inside a [`NodeArena`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the id as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A growable vector of node records addressed by [`NodeId`].
#[derive(Default, Debug)]
pub(crate) struct NodeArena {
    nodes: Vec<DawgNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Stores a node and returns its id. Ids are handed out in ascending order.
    pub fn alloc(&mut self, node: DawgNode) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("more than u32::MAX DAWG nodes");
        self.nodes.push(node);
        NodeId(id)
    }

    /// Returns the number of nodes allocated in this arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over all nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DawgNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Iterates mutably over all nodes in allocation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DawgNode> {
        self.nodes.iter_mut()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = DawgNode;

    #[inline]
    fn index(&self, id: NodeId) -> &DawgNode {
        &self.nodes[id.index()]
    }
}
