use smallvec::SmallVec;

use super::node_arena::NodeId;

/// Canonical byte signature of a node: its final flag followed by every
/// `(label, child id)` pair. Two canonical nodes are mergeable iff their
/// signatures are equal.
pub(crate) type Signature = SmallVec<[u8; 24]>;

/// A compact representation of the children of a DawgNode that doesn't allocate until
/// there are at least three children.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Children {
    /// No children.
    None,
    /// Exactly one child (label, node).
    One((u8, NodeId)),
    /// Exactly two children (label1, node1, label2, node2).
    Two((u8, NodeId, u8, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(u8, NodeId)>),
}

impl Children {
    /// Gets the child at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(u8, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }
}

/// An iterator over the children of a DawgNode.
#[derive(Clone)]
pub struct ChildIter<'a> {
    children: &'a Children,
    index: usize,
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next_child = self.children.get(self.index)?;
        self.index += 1;
        Some(next_child)
    }

    /// Since we know the exact size, we can do better than the default implementation.
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

/// A node in the directed acyclic word graph.
///
/// `count` is the number of final nodes reachable from this node, itself
/// included, counted once per path. It is filled in when the builder
/// finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DawgNode {
    children: Children,
    is_final: bool,
    count: Option<u64>,
}

impl DawgNode {
    /// Creates a new DAWG node.
    ///
    /// # Arguments
    ///
    /// * `is_final` - Whether some key ends at this node
    pub fn new(is_final: bool) -> Self {
        DawgNode {
            children: Children::None,
            is_final,
            count: None,
        }
    }

    /// Returns the node that label's edge leads to, or None if no such edge exists.
    #[inline]
    pub fn get(&self, label: u8) -> Option<NodeId> {
        match &self.children {
            Children::None => None,
            Children::One((ch, node)) => (*ch == label).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if label == *c1 {
                    Some(*n1)
                } else if label == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => children
                .binary_search_by_key(&label, |&(ch, _)| ch)
                .ok()
                .map(|i| children[i].1),
        }
    }

    /// True if a key ends at this node.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub(crate) fn set_final(&mut self) {
        self.is_final = true;
    }

    /// Inserts a child edge. Labels must be inserted in ascending order.
    pub fn insert(&mut self, label: u8, child: NodeId) {
        debug_assert!(self.children().all(|(ch, _)| ch < label));
        let c = (label, child);
        match &mut self.children {
            Children::None => self.children = Children::One(c),
            Children::One((c1, n1)) => self.children = Children::Two((*c1, *n1, c.0, c.1)),
            Children::Two((c1, n1, c2, n2)) => {
                self.children = Children::Many(vec![(*c1, *n1), (*c2, *n2), c])
            }
            Children::Many(children) => children.push(c),
        };
    }

    /// Returns an iterator over all children of this node, sorted by label.
    #[inline]
    pub fn children(&self) -> ChildIter<'_> {
        ChildIter {
            children: &self.children,
            index: 0,
        }
    }

    /// Returns the number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of keys ending at or below this node, or `None` before the
    /// builder has finished.
    #[inline]
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub(crate) fn set_count(&mut self, count: u64) {
        self.count = Some(count);
    }

    /// Computes the canonical signature. Only meaningful once every child is
    /// canonical, since children are compared by id rather than by structure.
    pub(crate) fn signature(&self) -> Signature {
        let mut sig = Signature::new();
        sig.push(self.is_final as u8);
        for (label, child) in self.children() {
            sig.push(label);
            sig.extend_from_slice(&child.to_le_bytes());
        }
        sig
    }
}
