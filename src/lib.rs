//! # packed-dawg
//!
//! Builds a minimal [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph) that maps byte-string keys to distinct `i64`
//! values, and packs it into one dense byte buffer that is queried in place.
//!
//! Construction follows the incremental algorithm of
//! [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1): keys arrive in
//! sorted order and equal suffixes are merged as soon as they can no longer
//! change. Chains of single-edge nodes are then folded into multi-byte edge
//! labels, and the graph is written out with variable-length integers.
//!
//! ## Features
//!
//! - **Compact**: suffix sharing, folded edge chains and varint offsets
//! - **No deserialization**: lookups walk the packed bytes directly
//! - **Both directions**: key to value, and value back to key via key ranks
//! - **Thread-safe**: a [`PackedDawg`](dawg::PackedDawg) is immutable and `Send + Sync`
//!
//! ## Quick Start
//!
//! ```
//! use packed_dawg::dawg::build;
//!
//! let dawg = build([
//!     ("a", -4),
//!     ("c", -2),
//!     ("cat", -1),
//!     ("catarr", 0),
//!     ("catnip", 1),
//!     ("zcatnip", 5),
//! ])
//! .unwrap();
//!
//! assert_eq!(dawg.lookup("cat").unwrap(), Some(-1));
//! assert_eq!(dawg.lookup("zzz").unwrap(), None);
//! assert_eq!(dawg.inverse_lookup(5).unwrap().as_deref(), Some(&b"zcatnip"[..]));
//! ```
//!
//! ## Step by Step
//!
//! The stages can also be driven separately, for example to inspect the
//! minimized graph before it is packed:
//!
//! ```
//! use packed_dawg::dawg::{linearize, lookup, pack, DawgBuilder, PackOptions};
//!
//! let mut builder = DawgBuilder::new();
//! builder.insert("BAKE", 10).unwrap();
//! builder.insert("CAKE", 20).unwrap();
//! let dawg = builder.finish();
//! assert!(dawg.walk(b"BA").is_some());
//!
//! let packed = pack(&linearize(&dawg), &PackOptions::default()).unwrap();
//! assert_eq!(lookup(&packed, dawg.data(), b"CAKE").unwrap(), Some(20));
//! ```

#![warn(missing_docs)]

/// Core DAWG data structures: builder, packer and lookups.
pub mod dawg;
