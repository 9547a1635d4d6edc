//! Collapses chains of single-edge nodes into multi-byte edge labels.
//!
//! A node is folded into the edge that reaches it when it is not final, has
//! exactly one outgoing edge, and exactly one incoming edge. Folded nodes are
//! never serialized.

use smallvec::SmallVec;
use tracing::debug;

use super::builder::FinishedDawg;
use super::node_arena::NodeId;

/// An edge whose label may span several elided nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearEdge {
    /// Non-empty label bytes.
    pub label: SmallVec<[u8; 8]>,
    /// The node at the end of the chain.
    pub target: NodeId,
}

impl LinearEdge {
    /// True if the label is a single byte, stored inline without a length.
    #[inline]
    pub fn is_single_byte(&self) -> bool {
        self.label.len() == 1
    }
}

/// The edges of every node of a [`FinishedDawg`], relabeled.
#[derive(Debug)]
pub struct LinearDawg<'a> {
    dawg: &'a FinishedDawg,
    edges: Vec<SmallVec<[LinearEdge; 2]>>,
}

impl<'a> LinearDawg<'a> {
    /// The graph these edges were derived from.
    pub fn dawg(&self) -> &'a FinishedDawg {
        self.dawg
    }

    /// Returns the linear edges of a node, in first-byte order.
    pub fn edges(&self, id: NodeId) -> &[LinearEdge] {
        &self.edges[id.index()]
    }
}

/// Computes linear edges for every node of `dawg`.
pub fn linearize(dawg: &FinishedDawg) -> LinearDawg<'_> {
    let mut in_degree = vec![0u32; dawg.node_count()];
    for (_, node) in dawg.nodes() {
        for (_, child) in node.children() {
            in_degree[child.index()] += 1;
        }
    }

    let foldable = |id: NodeId| {
        let node = dawg.node(id);
        !node.is_final() && node.child_count() == 1 && in_degree[id.index()] == 1
    };

    let mut collapsed = 0usize;
    let edges: Vec<SmallVec<[LinearEdge; 2]>> = dawg
        .nodes()
        .map(|(_, node)| {
            node.children()
                .map(|(first, mut target)| {
                    let mut label: SmallVec<[u8; 8]> = SmallVec::from_slice(&[first]);
                    while foldable(target) {
                        let (next, grandchild) = dawg
                            .node(target)
                            .children()
                            .next()
                            .expect("foldable node has exactly one child");
                        label.push(next);
                        target = grandchild;
                        collapsed += 1;
                    }
                    LinearEdge { label, target }
                })
                .collect()
        })
        .collect();

    debug!(collapsed, "dawg linearized");
    LinearDawg { dawg, edges }
}

#[cfg(test)]
mod test {
    use super::super::builder::build_dawg;
    use super::*;

    fn labels(linear: &LinearDawg<'_>, id: NodeId) -> Vec<String> {
        linear
            .edges(id)
            .iter()
            .map(|e| String::from_utf8(e.label.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn single_key_collapses_to_one_edge() {
        let dawg = build_dawg([("hello", 1)]).unwrap();
        let linear = linearize(&dawg);
        assert_eq!(labels(&linear, dawg.root()), ["hello"]);
        let target = linear.edges(dawg.root())[0].target;
        assert!(dawg.node(target).is_final());
        assert!(!linear.edges(dawg.root())[0].is_single_byte());
    }

    #[test]
    fn final_nodes_stop_extension() {
        let dawg = build_dawg([
            ("a", -4),
            ("c", -2),
            ("cat", -1),
            ("catarr", 0),
            ("catnip", 1),
            ("zcatnip", 5),
        ])
        .unwrap();
        let linear = linearize(&dawg);
        assert_eq!(labels(&linear, dawg.root()), ["a", "c", "zcatn"]);

        let c = dawg.walk(b"c").unwrap();
        assert_eq!(labels(&linear, c), ["at"]);

        let cat = dawg.walk(b"cat").unwrap();
        assert_eq!(labels(&linear, cat), ["arr", "n"]);

        // Shared node has two parents, so neither edge swallows it.
        let catn = dawg.walk(b"catn").unwrap();
        assert_eq!(linear.edges(cat)[1].target, catn);
        assert_eq!(linear.edges(dawg.root())[2].target, catn);
        assert_eq!(labels(&linear, catn), ["ip"]);
    }

    #[test]
    fn counts_are_untouched() {
        let dawg = build_dawg([("ab", 1), ("abcd", 2), ("x", 3)]).unwrap();
        let before: Vec<_> = dawg.nodes().map(|(_, n)| n.count()).collect();
        let linear = linearize(&dawg);
        let after: Vec<_> = linear.dawg().nodes().map(|(_, n)| n.count()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn edges_keep_byte_order() {
        let dawg = build_dawg([("a", 0), ("b", 1), ("c", 2), ("d", 3)]).unwrap();
        let linear = linearize(&dawg);
        assert_eq!(labels(&linear, dawg.root()), ["a", "b", "c", "d"]);
        assert!(linear.edges(dawg.root()).iter().all(LinearEdge::is_single_byte));
    }
}
