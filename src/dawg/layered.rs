//! Lookups over a stack of DAWGs, where each layer only stores the entries
//! that differ from the layers below it.

use smallvec::SmallVec;

use super::error::Result;
use super::owned::PackedDawg;

/// An ordered stack of [`PackedDawg`]s queried top to bottom.
///
/// A small delta DAWG can be layered over a large base so that only changed
/// or added entries are packed again. The first layer that knows a key (or a
/// value) answers for it.
///
/// # Examples
///
/// ```
/// use packed_dawg::dawg::layered::LayeredDawg;
/// use packed_dawg::dawg::owned::build;
///
/// let base = build([("ALPHA", 1), ("BETA", 2)]).unwrap();
/// let delta = build([("GAMMA", 3)]).unwrap();
/// let names = LayeredDawg::new(&delta).with_base(&base);
///
/// assert_eq!(names.lookup("GAMMA").unwrap(), Some(3));
/// assert_eq!(names.lookup("ALPHA").unwrap(), Some(1));
/// assert_eq!(names.lookup("DELTA").unwrap(), None);
/// ```
#[derive(Clone, Debug)]
pub struct LayeredDawg<'a> {
    layers: SmallVec<[&'a PackedDawg; 2]>,
}

impl<'a> LayeredDawg<'a> {
    /// Creates a stack with a single layer.
    pub fn new(top: &'a PackedDawg) -> Self {
        LayeredDawg {
            layers: SmallVec::from_slice(&[top]),
        }
    }

    /// Adds `base` below every existing layer.
    pub fn with_base(mut self, base: &'a PackedDawg) -> Self {
        self.layers.push(base);
        self
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Returns the data value of `key` from the topmost layer that has it.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<Option<i64>> {
        let key = key.as_ref();
        for layer in &self.layers {
            if let Some(value) = layer.lookup(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Returns the key of `value` from the topmost layer that has it.
    pub fn inverse_lookup(&self, value: i64) -> Result<Option<Vec<u8>>> {
        for layer in &self.layers {
            if let Some(key) = layer.inverse_lookup(value)? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}
