/// Incremental DAWG construction from sorted keys.
pub mod builder;
/// Compact node and edge storage used during construction.
pub mod children;
/// Error type shared by construction, packing and lookups.
pub mod error;
/// Lookups across a stack of DAWGs.
pub mod layered;
/// Folding of single-edge chains into multi-byte labels.
pub mod linearize;
/// Queries that run directly on packed bytes.
pub mod lookup;
/// Internal index arena for nodes.
pub(crate) mod node_arena;
/// Packed DAWG that owns its bytes and lookup tables.
pub mod owned;
/// Byte serialization of a linearized DAWG.
pub mod pack;
/// LEB128-style variable-length integers.
pub mod varint;

#[cfg(test)]
mod proptests;

pub use builder::{build_dawg, DawgBuilder, FinishedDawg, IntoKey, InverseIndex};
pub use children::DawgNode;
pub use error::{DawgError, Result};
pub use layered::LayeredDawg;
pub use linearize::{linearize, LinearDawg, LinearEdge};
pub use lookup::{inverse_lookup, key_at, lookup};
pub use node_arena::NodeId;
pub use owned::{build, build_from_file, build_with_options, PackedDawg};
pub use pack::{pack, PackOptions};
