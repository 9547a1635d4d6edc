use hashbrown::HashMap;
use itertools::{Itertools, Position};
use smallvec::SmallVec;
use tracing::debug;

use super::children::{DawgNode, Signature};
use super::error::{DawgError, Result};
use super::node_arena::{NodeArena, NodeId};

/// Maps each data value to the rank of its key among all inserted keys.
pub type InverseIndex = HashMap<i64, usize>;

/// Trait for types that can be used as a key when building a DAWG.
///
/// Implemented for common string and byte sequence types so that
/// [`DawgBuilder::insert`] and [`build`](super::owned::build) accept them
/// directly without manual conversion. Strings contribute their UTF-8 bytes.
pub trait IntoKey {
    /// Collects this key into a byte buffer.
    fn collect_key(self) -> SmallVec<[u8; 32]>;
}

impl IntoKey for &str {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for &&str {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for String {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for &String {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for &[u8] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

impl IntoKey for Vec<u8> {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_vec(self)
    }
}

impl IntoKey for &Vec<u8> {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

impl<const N: usize> IntoKey for [u8; N] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(&self)
    }
}

impl<const N: usize> IntoKey for &[u8; N] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

/// A builder for constructing a minimal DAWG incrementally.
///
/// Keys must be inserted in strictly ascending byte order, each with a data
/// value that has not been used before. After every insertion the part of the
/// previous key's path that can no longer change is canonicalized against a
/// register of already-unique nodes, so equal suffixes end up shared.
///
/// The builder is consumed by [`finish`](DawgBuilder::finish), which yields
/// the read-only [`FinishedDawg`].
pub struct DawgBuilder {
    arena: NodeArena,
    /// Path of the previously inserted key. Entry 0 is the root; every later
    /// entry holds the label leading into its node. None of these nodes are
    /// in the arena yet.
    build_state: Vec<BuildState>,
    register: HashMap<Signature, NodeId>,
    data: Vec<i64>,
    inverse: InverseIndex,
}

struct BuildState {
    label: u8,
    node: DawgNode,
}

impl Default for DawgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DawgBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        DawgBuilder {
            arena: NodeArena::new(),
            build_state: vec![BuildState {
                label: 0,
                node: DawgNode::new(false),
            }],
            register: HashMap::new(),
            data: Vec::new(),
            inverse: InverseIndex::new(),
        }
    }

    /// Number of keys inserted so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no key has been inserted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Adds a key with its data value.
    ///
    /// The key can be any type that implements [`IntoKey`], including `&str`,
    /// `String`, `&[u8]`, `Vec<u8>`, or fixed-size byte arrays. The empty key
    /// is only accepted as the very first key.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::Order`] if the key is not strictly greater than the
    /// previously inserted key, and [`DawgError::DuplicateData`] if `data` was
    /// already used. Both indicate misuse of the builder; the rejected key is
    /// not added.
    pub fn insert(&mut self, key: impl IntoKey, data: i64) -> Result<()> {
        let key = key.collect_key();
        self.insert_slice(&key, data)
    }

    fn insert_slice(&mut self, key: &[u8], data: i64) -> Result<()> {
        let prefix_length = self.prefix_length(key)?;
        if self.inverse.contains_key(&data) {
            return Err(DawgError::DuplicateData(data));
        }

        self.canonicalize_suffix(prefix_length);
        if key.is_empty() {
            self.build_state[0].node.set_final();
        }
        self.build_state.extend(
            key[prefix_length..]
                .iter()
                .copied()
                .with_position()
                .map(|(position, label)| BuildState {
                    label,
                    node: DawgNode::new(matches!(position, Position::Last | Position::Only)),
                }),
        );

        self.inverse.insert(data, self.data.len());
        self.data.push(data);
        Ok(())
    }

    /// Length of the common prefix with the previous key, after checking that
    /// `key` sorts strictly after it.
    fn prefix_length(&self, key: &[u8]) -> Result<usize> {
        let previous = &self.build_state[1..];
        let prefix_len = previous
            .iter()
            .zip(key)
            .take_while(|(state, ch)| state.label == **ch)
            .count();
        if self.data.is_empty() {
            return Ok(prefix_len);
        }
        let in_order = match (key.get(prefix_len), previous.get(prefix_len)) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(&ch), Some(prev)) => ch > prev.label,
        };
        if in_order {
            Ok(prefix_len)
        } else {
            Err(DawgError::Order {
                previous: self.previous_key(),
                current: key.to_vec(),
            })
        }
    }

    fn previous_key(&self) -> Vec<u8> {
        self.build_state[1..].iter().map(|e| e.label).collect()
    }

    /// Canonicalizes the nodes of the previous key deeper than `target_length`,
    /// deepest first, attaching each canonical node to its parent.
    fn canonicalize_suffix(&mut self, target_length: usize) {
        let target_length = target_length + 1;
        while self.build_state.len() > target_length {
            let state = self.pop_build_state();
            let child = self.canonicalize(state.node);
            self.add_build_state_child(state.label, child);
        }
    }

    fn pop_build_state(&mut self) -> BuildState {
        self.build_state
            .pop()
            .expect("Build state will always have at least one entry")
    }

    fn add_build_state_child(&mut self, label: u8, node: NodeId) {
        self.build_state
            .last_mut()
            .expect("Build state will always have at least one entry")
            .node
            .insert(label, node)
    }

    /// Returns the id of an existing node equal to `node`, or registers `node`
    /// as a new canonical node.
    fn canonicalize(&mut self, node: DawgNode) -> NodeId {
        let signature = node.signature();
        if let Some(&existing) = self.register.get(&signature) {
            existing
        } else {
            let id = self.arena.alloc(node);
            self.register.insert(signature, id);
            id
        }
    }

    /// Finalizes construction: canonicalizes the last key's path and the root,
    /// then caches the reachable-final count of every node.
    pub fn finish(mut self) -> FinishedDawg {
        self.canonicalize_suffix(0);
        let root_node = self.pop_build_state().node;
        let root = self.canonicalize(root_node);
        compute_counts(&mut self.arena);
        debug!(
            keys = self.data.len(),
            nodes = self.arena.len(),
            "dawg construction finished"
        );
        FinishedDawg {
            arena: self.arena,
            root,
            data: self.data,
            inverse: self.inverse,
        }
    }
}

/// Fills in `count` for every node. Children are always allocated before
/// their parents, so a single pass in id order sees every child count first.
fn compute_counts(arena: &mut NodeArena) {
    let mut counts: Vec<u64> = Vec::with_capacity(arena.len());
    for node in arena.iter_mut() {
        let below: u64 = node.children().map(|(_, child)| counts[child.index()]).sum();
        let count = below + node.is_final() as u64;
        node.set_count(count);
        counts.push(count);
    }
}

/// A minimized DAWG whose construction is complete.
///
/// Node counts are cached and no more keys can be added. This is the input to
/// [`linearize`](super::linearize::linearize) and [`pack`](super::pack::pack).
#[derive(Debug)]
pub struct FinishedDawg {
    arena: NodeArena,
    root: NodeId,
    data: Vec<i64>,
    inverse: InverseIndex,
}

impl FinishedDawg {
    /// Returns the id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: NodeId) -> &DawgNode {
        &self.arena[id]
    }

    /// Follows the edge labeled `label` out of `id`.
    pub fn get(&self, id: NodeId, label: u8) -> Option<NodeId> {
        self.arena[id].get(label)
    }

    /// Follows `path` from the root.
    pub fn walk(&self, path: &[u8]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |node, &label| self.get(node, label))
    }

    /// Returns the cached reachable-final count of a node.
    pub fn count(&self, id: NodeId) -> u64 {
        self.arena[id].count().unwrap_or_default()
    }

    /// Returns the number of unique nodes in the DAWG.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Iterates over every node in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DawgNode)> {
        self.arena.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the DAWG holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Data values in key order.
    pub fn data(&self) -> &[i64] {
        &self.data
    }

    /// Map from data value to key rank.
    pub fn inverse_index(&self) -> &InverseIndex {
        &self.inverse
    }

    pub(crate) fn into_parts(self) -> (Vec<i64>, InverseIndex) {
        (self.data, self.inverse)
    }
}

/// Builds a finished DAWG from `(key, data)` pairs in ascending key order.
pub fn build_dawg<K: IntoKey>(pairs: impl IntoIterator<Item = (K, i64)>) -> Result<FinishedDawg> {
    let mut builder = DawgBuilder::new();
    for (key, data) in pairs {
        builder.insert(key, data)?;
    }
    Ok(builder.finish())
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
