//! Serialization of a linearized DAWG into one byte buffer.
//!
//! Layout, per node in depth-first discovery order (root first, at offset 0):
//!
//! ```text
//! node  := uvarint((count << 1) | final) edge*
//! edge  := svarint((delta << 2) | (single_byte << 1) | last)
//!          [svarint(label_len) if !single_byte] label_bytes
//! ```
//!
//! `delta` is the target offset minus the previous edge's target offset; the
//! first edge of a node is relative to the start of its edge list. A node has
//! edges iff `count > final`, which holds for every node but a final leaf and
//! the root of an empty DAWG.
//!
//! Edge widths depend on target offsets and offsets depend on edge widths, so
//! the layout is repeated until a pass reproduces the previous pass's bytes.

use tracing::{debug, trace, warn};

use super::error::{DawgError, Result};
use super::linearize::LinearDawg;
use super::node_arena::NodeId;
use super::varint::{encode_signed, encode_unsigned};

/// Tunables for [`pack`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackOptions {
    /// Maximum number of layout passes before giving up.
    pub max_iterations: usize,
    /// Offset every node is assumed to have before the first pass. Must not
    /// exceed `i64::MAX`.
    pub initial_offset: u64,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            max_iterations: 64,
            initial_offset: 1 << 32,
        }
    }
}

/// Returns every node reachable from the root over linear edges, in
/// depth-first discovery order. Each node appears once.
pub fn node_order(linear: &LinearDawg<'_>) -> Vec<NodeId> {
    let dawg = linear.dawg();
    let mut visited = vec![false; dawg.node_count()];
    let mut order = Vec::new();
    let mut stack = vec![dawg.root()];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut visited[id.index()], true) {
            continue;
        }
        order.push(id);
        // Reversed so the first edge is popped first.
        stack.extend(linear.edges(id).iter().rev().map(|edge| edge.target));
    }
    order
}

/// Packs `linear` into its byte representation.
///
/// # Errors
///
/// Returns [`DawgError::PackingConvergence`] if the layout does not settle
/// within `options.max_iterations` passes, or [`DawgError::InvalidOptions`]
/// if `options.initial_offset` does not fit in an `i64`.
pub fn pack(linear: &LinearDawg<'_>, options: &PackOptions) -> Result<Vec<u8>> {
    let initial_offset = i64::try_from(options.initial_offset)
        .map_err(|_| DawgError::InvalidOptions("initial_offset exceeds i64::MAX"))?;
    let order = node_order(linear);
    let mut offsets = vec![initial_offset; linear.dawg().node_count()];
    let mut previous = Vec::new();
    for iteration in 1..=options.max_iterations {
        let (bytes, new_offsets) = pack_pass(linear, &order, &offsets);
        trace!(iteration, bytes = bytes.len(), "dawg packing pass");
        if bytes == previous {
            debug!(
                nodes = order.len(),
                bytes = bytes.len(),
                iterations = iteration,
                "dawg packed"
            );
            return Ok(bytes);
        }
        previous = bytes;
        offsets = new_offsets;
    }
    warn!(
        max_iterations = options.max_iterations,
        "dawg packing did not converge"
    );
    Err(DawgError::PackingConvergence {
        iterations: options.max_iterations,
    })
}

/// Lays out every node once using `offsets` for edge targets. Returns the
/// bytes and the offsets the nodes actually landed on.
fn pack_pass(linear: &LinearDawg<'_>, order: &[NodeId], offsets: &[i64]) -> (Vec<u8>, Vec<i64>) {
    let dawg = linear.dawg();
    let mut out = Vec::new();
    let mut new_offsets = offsets.to_vec();
    for &id in order {
        new_offsets[id.index()] = out.len() as i64;
        let node = dawg.node(id);
        encode_unsigned((dawg.count(id) << 1) | node.is_final() as u64, &mut out);

        let edges = linear.edges(id);
        let mut previous_child = out.len() as i64;
        for (i, edge) in edges.iter().enumerate() {
            let child = offsets[edge.target.index()];
            let delta = child - previous_child;
            previous_child = child;
            let single = edge.is_single_byte();
            let last = i + 1 == edges.len();
            encode_signed((delta << 2) | ((single as i64) << 1) | last as i64, &mut out);
            if !single {
                encode_signed(edge.label.len() as i64, &mut out);
            }
            out.extend_from_slice(&edge.label);
        }
    }
    (out, new_offsets)
}

#[cfg(test)]
mod test {
    use super::super::builder::build_dawg;
    use super::super::linearize::linearize;
    use super::super::lookup::lookup;
    use super::super::varint::{decode_signed, decode_unsigned};
    use super::*;

    #[test]
    fn single_key_layout() {
        let dawg = build_dawg([("ab", 7)]).unwrap();
        let bytes = pack(&linearize(&dawg), &PackOptions::default()).unwrap();
        // root: count 1, not final; one edge "ab" to the leaf at offset 5.
        // leaf: count 1, final.
        let (header, next) = decode_unsigned(&bytes, 0).unwrap();
        assert_eq!(header, 1 << 1);
        let (edge, next) = decode_signed(&bytes, next).unwrap();
        assert_eq!(edge & 0b11, 0b01);
        let (len, next) = decode_signed(&bytes, next).unwrap();
        assert_eq!(len, 2);
        assert_eq!(&bytes[next..next + 2], b"ab");
        let leaf = next + 2;
        assert_eq!((edge >> 2) as usize, leaf - 1);
        assert_eq!(decode_unsigned(&bytes, leaf).unwrap(), (0b11, bytes.len()));
    }

    #[test]
    fn empty_dawg_is_one_header() {
        let dawg = build_dawg(Vec::<(&str, i64)>::new()).unwrap();
        let bytes = pack(&linearize(&dawg), &PackOptions::default()).unwrap();
        assert_eq!(bytes, [0]);
    }

    #[test]
    fn order_starts_at_root_and_skips_elided_nodes() {
        let dawg = build_dawg([("hello", 1), ("help", 2)]).unwrap();
        let linear = linearize(&dawg);
        let order = node_order(&linear);
        assert_eq!(order[0], dawg.root());
        // root, the branch after "hel", and the shared final leaf.
        assert_eq!(order.len(), 3);
        assert!(order.iter().all(|id| Some(*id) != dawg.walk(b"h")));
    }

    #[test]
    fn packing_is_deterministic() {
        let pairs = [("alpha", 3), ("alphabet", 1), ("beta", 2), ("gamma", -9)];
        let first = pack(&linearize(&build_dawg(pairs).unwrap()), &PackOptions::default()).unwrap();
        let second = pack(&linearize(&build_dawg(pairs).unwrap()), &PackOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let dawg = build_dawg([("a", 1), ("b", 2)]).unwrap();
        let options = PackOptions {
            max_iterations: 1,
            ..PackOptions::default()
        };
        let err = pack(&linearize(&dawg), &options).unwrap_err();
        assert!(matches!(err, DawgError::PackingConvergence { iterations: 1 }));
    }

    #[test]
    fn initial_offset_must_fit_in_i64() {
        let dawg = build_dawg([("a", 1), ("b", 2)]).unwrap();
        let linear = linearize(&dawg);
        let options = PackOptions {
            initial_offset: 1 << 63,
            ..PackOptions::default()
        };
        let err = pack(&linear, &options).unwrap_err();
        assert!(matches!(err, DawgError::InvalidOptions(_)));

        let options = PackOptions {
            initial_offset: i64::MAX as u64,
            ..PackOptions::default()
        };
        let bytes = pack(&linear, &options).unwrap();
        assert_eq!(lookup(&bytes, dawg.data(), b"b").unwrap(), Some(2));
    }
}
