//! Queries that walk the packed bytes directly, without rebuilding a graph.
//!
//! Keys are ranked in byte order. Forward lookup accumulates the rank of the
//! matched key while it walks and indexes the data array with it; inverse
//! lookup spends a rank on the way down to choose which edge to follow.

use super::builder::InverseIndex;
use super::error::{DawgError, Result};
use super::varint::{decode_signed, decode_unsigned};

/// A decoded node header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeHeader {
    count: u64,
    is_final: bool,
    edges_start: usize,
}

impl NodeHeader {
    fn decode(packed: &[u8], offset: usize) -> Result<Self> {
        let (value, edges_start) = decode_unsigned(packed, offset)?;
        Ok(NodeHeader {
            count: value >> 1,
            is_final: value & 1 == 1,
            edges_start,
        })
    }

    fn has_edges(&self) -> bool {
        self.count > self.is_final as u64
    }

    fn edges<'p>(&self, packed: &'p [u8]) -> EdgeReader<'p> {
        EdgeReader {
            packed,
            pos: self.edges_start,
            previous_child: self.edges_start as i64,
            done: !self.has_edges(),
        }
    }
}

/// One decoded edge.
#[derive(Copy, Clone, Debug)]
struct Edge<'p> {
    label: &'p [u8],
    target: usize,
}

/// Reads the edge list of one node, resolving target deltas as it goes.
struct EdgeReader<'p> {
    packed: &'p [u8],
    pos: usize,
    previous_child: i64,
    done: bool,
}

impl<'p> EdgeReader<'p> {
    fn read(&mut self) -> Result<Edge<'p>> {
        let start = self.pos;
        let (value, mut pos) = decode_signed(self.packed, start)?;
        let single = value & 0b10 != 0;
        self.done = value & 0b01 != 0;

        let target = self
            .previous_child
            .checked_add(value >> 2)
            .filter(|&t| t >= 0 && (t as usize) < self.packed.len())
            .ok_or_else(|| DawgError::corrupt(start, "edge target out of bounds"))?;
        self.previous_child = target;

        let len = if single {
            1
        } else {
            let (len, next) = decode_signed(self.packed, pos)?;
            pos = next;
            usize::try_from(len)
                .ok()
                .filter(|&len| len > 1)
                .ok_or_else(|| DawgError::corrupt(start, "invalid label length"))?
        };
        let label = self
            .packed
            .get(pos..pos + len)
            .ok_or_else(|| DawgError::corrupt(pos, "label past end of buffer"))?;
        self.pos = pos + len;
        Ok(Edge {
            label,
            target: target as usize,
        })
    }
}

impl<'p> Iterator for EdgeReader<'p> {
    type Item = Result<Edge<'p>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let edge = self.read();
        if edge.is_err() {
            self.done = true;
        }
        Some(edge)
    }
}

/// Looks up the data value stored for `key`.
///
/// Returns `Ok(None)` if the key is absent.
///
/// # Errors
///
/// Returns [`DawgError::Corrupt`] if `packed` does not decode consistently or
/// the matched rank is past the end of `data`.
pub fn lookup(packed: &[u8], data: &[i64], key: &[u8]) -> Result<Option<i64>> {
    let mut node_offset = 0;
    let mut skipped: u64 = 0;
    let mut string_pos = 0;

    'outer: while string_pos < key.len() {
        let header = NodeHeader::decode(packed, node_offset)?;
        let rest = &key[string_pos..];
        for edge in header.edges(packed) {
            let edge = edge?;
            if edge.label[0] != rest[0] {
                let count = NodeHeader::decode(packed, edge.target)?.count;
                skipped = skipped
                    .checked_add(count)
                    .ok_or_else(|| DawgError::corrupt(edge.target, "key rank overflow"))?;
                continue;
            }
            if !rest.starts_with(edge.label) {
                return Ok(None);
            }
            if header.is_final {
                skipped = skipped
                    .checked_add(1)
                    .ok_or_else(|| DawgError::corrupt(node_offset, "key rank overflow"))?;
            }
            string_pos += edge.label.len();
            node_offset = edge.target;
            continue 'outer;
        }
        return Ok(None);
    }

    let header = NodeHeader::decode(packed, node_offset)?;
    if !header.is_final {
        return Ok(None);
    }
    usize::try_from(skipped)
        .ok()
        .and_then(|rank| data.get(rank))
        .copied()
        .map(Some)
        .ok_or_else(|| DawgError::corrupt(node_offset, "key rank past end of data"))
}

/// Reconstructs the key whose data value is `value`.
///
/// Returns `Ok(None)` if `value` was never inserted.
///
/// # Errors
///
/// Returns [`DawgError::Corrupt`] if `packed` does not agree with `inverse`.
pub fn inverse_lookup(packed: &[u8], inverse: &InverseIndex, value: i64) -> Result<Option<Vec<u8>>> {
    match inverse.get(&value) {
        Some(&position) => key_at(packed, position).map(Some),
        None => Ok(None),
    }
}

/// Reconstructs the key of the given rank (0-based, in key order).
///
/// # Errors
///
/// Returns [`DawgError::Corrupt`] if `position` is not less than the number of
/// keys in `packed`, or the buffer does not decode consistently.
pub fn key_at(packed: &[u8], position: usize) -> Result<Vec<u8>> {
    let mut key = Vec::new();
    let mut node_offset = 0;
    let mut pos = position as u64;

    // Every descent consumes at least one node, so a well-formed walk is
    // shorter than the buffer.
    for _ in 0..=packed.len() {
        let header = NodeHeader::decode(packed, node_offset)?;
        if header.is_final {
            if pos == 0 {
                return Ok(key);
            }
            pos -= 1;
        }
        let mut descended = false;
        for edge in header.edges(packed) {
            let edge = edge?;
            let child_count = NodeHeader::decode(packed, edge.target)?.count;
            if pos < child_count {
                key.extend_from_slice(edge.label);
                node_offset = edge.target;
                descended = true;
                break;
            }
            pos -= child_count;
        }
        if !descended {
            return Err(DawgError::corrupt(node_offset, "rank not found below node"));
        }
    }
    Err(DawgError::corrupt(node_offset, "walk longer than buffer"))
}

/// Number of keys stored in `packed`, read from the root header.
pub fn key_count(packed: &[u8]) -> Result<u64> {
    Ok(NodeHeader::decode(packed, 0)?.count)
}
