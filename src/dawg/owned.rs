use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::builder::{build_dawg, is_comment, DawgBuilder, FinishedDawg, IntoKey, InverseIndex};
use super::error::{DawgError, Result};
use super::linearize::linearize;
use super::lookup::{inverse_lookup, key_at, lookup};
use super::pack::{pack, PackOptions};

/// A packed DAWG together with the tables needed to query it.
///
/// Holds the packed byte buffer, the data values in key order, and the map
/// from data value to key rank. The value is immutable and owns all of its
/// storage, so it can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use packed_dawg::dawg::owned::build;
///
/// let dawg = build([("BAKE", 1), ("CAKE", 2), ("FAKE", 3), ("LAKE", 4), ("MAKE", 5)]).unwrap();
///
/// assert_eq!(dawg.lookup("CAKE").unwrap(), Some(2));
/// assert_eq!(dawg.lookup("AKE").unwrap(), None);
/// assert_eq!(dawg.inverse_lookup(4).unwrap().as_deref(), Some(&b"LAKE"[..]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedDawg {
    packed: Vec<u8>,
    data: Vec<i64>,
    inverse: InverseIndex,
}

impl PackedDawg {
    /// Assembles a DAWG from previously packed parts.
    ///
    /// The parts are not validated; a mismatch surfaces as
    /// [`DawgError::Corrupt`] from later queries.
    pub fn from_parts(packed: Vec<u8>, data: Vec<i64>) -> Self {
        let inverse = data.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        PackedDawg {
            packed,
            data,
            inverse,
        }
    }

    /// Returns the data value stored for `key`, or `None` if it is absent.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<Option<i64>> {
        lookup(&self.packed, &self.data, key.as_ref())
    }

    /// Returns the key stored with `value`, or `None` if no key has it.
    pub fn inverse_lookup(&self, value: i64) -> Result<Option<Vec<u8>>> {
        inverse_lookup(&self.packed, &self.inverse, value)
    }

    /// True if `key` is present.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        Ok(self.lookup(key)?.is_some())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the DAWG holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.packed
    }

    /// Data values in key order.
    pub fn data(&self) -> &[i64] {
        &self.data
    }

    /// Map from data value to key rank.
    pub fn inverse_index(&self) -> &InverseIndex {
        &self.inverse
    }

    /// Splits into the packed bytes and the data array.
    pub fn into_parts(self) -> (Vec<u8>, Vec<i64>) {
        (self.packed, self.data)
    }

    /// Iterates over `(key, data)` pairs in key order, decoding each key from
    /// the packed bytes.
    pub fn iter(&self) -> impl Iterator<Item = Result<(Vec<u8>, i64)>> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(rank, &value)| key_at(&self.packed, rank).map(|key| (key, value)))
    }
}

/// Builds and packs a DAWG from `(key, data)` pairs in ascending key order.
///
/// # Errors
///
/// Returns [`DawgError::Order`] or [`DawgError::DuplicateData`] if the input
/// violates the ordering or uniqueness requirements, in which case nothing is
/// built.
pub fn build<K: IntoKey>(pairs: impl IntoIterator<Item = (K, i64)>) -> Result<PackedDawg> {
    build_with_options(pairs, &PackOptions::default())
}

/// Like [`build`], with explicit packing options.
pub fn build_with_options<K: IntoKey>(
    pairs: impl IntoIterator<Item = (K, i64)>,
    options: &PackOptions,
) -> Result<PackedDawg> {
    finish(build_dawg(pairs)?, options)
}

fn finish(dawg: FinishedDawg, options: &PackOptions) -> Result<PackedDawg> {
    let packed = pack(&linearize(&dawg), options)?;
    let (data, inverse) = dawg.into_parts();
    Ok(PackedDawg {
        packed,
        data,
        inverse,
    })
}

/// Builds a DAWG from a key list file.
///
/// Each line holds a key and an integer separated by a tab. Lines must be in
/// sorted key order. Lines starting with '#' are treated as comments and
/// ignored. Empty lines are skipped.
///
/// # Examples
///
/// ```no_run
/// use packed_dawg::dawg::owned::build_from_file;
///
/// let dawg = build_from_file("names.tsv").unwrap();
/// ```
pub fn build_from_file(filename: impl AsRef<Path>) -> Result<PackedDawg> {
    let mut builder = DawgBuilder::new();
    let file = File::open(filename)?;
    let mut reader = BufReader::new(file);

    // Reuse one line buffer instead of allocating a String per line.
    let mut buf = String::with_capacity(80);
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(&['\n', '\r'][..]);
        if line.trim().is_empty() || is_comment(line) {
            continue;
        }
        let (key, value) = parse_line(line, line_no)?;
        builder.insert(key, value)?;
    }
    finish(builder.finish(), &PackOptions::default())
}

fn parse_line(line: &str, line_no: usize) -> Result<(&str, i64)> {
    let (key, value) = line.rsplit_once('\t').ok_or_else(|| DawgError::Parse {
        line: line_no,
        reason: "expected <key>\\t<integer>".to_string(),
    })?;
    let value = value.trim().parse().map_err(|e| DawgError::Parse {
        line: line_no,
        reason: format!("bad integer {value:?}: {e}"),
    })?;
    Ok((key, value))
}

#[cfg(test)]
mod test {
    use super::*;

    fn catnip() -> PackedDawg {
        build([
            ("a", -4),
            ("c", -2),
            ("cat", -1),
            ("catarr", 0),
            ("catnip", 1),
            ("zcatnip", 5),
        ])
        .unwrap()
    }

    #[test]
    fn basic_lookup() {
        let dawg = catnip();
        assert_eq!(dawg.lookup("cat").unwrap(), Some(-1));
        assert_eq!(dawg.lookup(b"catnip").unwrap(), Some(1));
        assert!(dawg.contains("zcatnip").unwrap());
        assert!(!dawg.contains("zcat").unwrap());
        assert_eq!(dawg.len(), 6);
        assert!(!dawg.is_empty());
    }

    #[test]
    fn sorted_input_required() {
        let res = build([("b", 1), ("a", 2)]);
        assert!(matches!(res, Err(DawgError::Order { .. })));
    }

    #[test]
    fn duplicate_data_rejected() {
        let res = build([("a", 1), ("b", 1)]);
        assert!(matches!(res, Err(DawgError::DuplicateData(1))));
    }

    #[test]
    fn iter_yields_keys_in_order() {
        let dawg = catnip();
        let pairs: Vec<(String, i64)> = dawg
            .iter()
            .map(|r| r.map(|(k, v)| (String::from_utf8(k).unwrap(), v)))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            pairs,
            [
                ("a".to_string(), -4),
                ("c".to_string(), -2),
                ("cat".to_string(), -1),
                ("catarr".to_string(), 0),
                ("catnip".to_string(), 1),
                ("zcatnip".to_string(), 5),
            ]
        );
    }

    #[test]
    fn from_parts_restores_queries() {
        let dawg = catnip();
        let (packed, data) = dawg.clone().into_parts();
        let restored = PackedDawg::from_parts(packed, data);
        assert_eq!(restored, dawg);
        assert_eq!(restored.inverse_lookup(5).unwrap(), Some(b"zcatnip".to_vec()));
    }

    #[test]
    fn packed_dawg_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PackedDawg>();
    }

    #[test]
    fn concurrent_readers() {
        let dawg = catnip();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(dawg.lookup("catarr").unwrap(), Some(0));
                        assert_eq!(dawg.inverse_lookup(-2).unwrap(), Some(b"c".to_vec()));
                    }
                });
            }
        });
    }

    #[test]
    fn build_from_file_reads_tab_separated_lines() {
        let path = std::env::temp_dir().join(format!("packed-dawg-{}.tsv", std::process::id()));
        std::fs::write(
            &path,
            "# names\nALPHA\t1\n\nBRAVO CHARLIE\t-2\r\nDELTA\t30\n",
        )
        .unwrap();
        let dawg = build_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(dawg.lookup("ALPHA").unwrap(), Some(1));
        assert_eq!(dawg.lookup("BRAVO CHARLIE").unwrap(), Some(-2));
        assert_eq!(dawg.inverse_lookup(30).unwrap(), Some(b"DELTA".to_vec()));
        assert_eq!(dawg.len(), 3);
    }

    #[test]
    fn build_from_missing_file_is_io_error() {
        let res = build_from_file("/nonexistent/packed-dawg/keys.tsv");
        assert!(matches!(res, Err(DawgError::Io(_))));
    }

    #[test]
    fn parse_line_errors() {
        assert!(matches!(
            parse_line("no tab here", 4),
            Err(DawgError::Parse { line: 4, .. })
        ));
        assert!(matches!(
            parse_line("KEY\tNaN", 7),
            Err(DawgError::Parse { line: 7, .. })
        ));
        assert_eq!(parse_line("KEY\t-12", 1).unwrap(), ("KEY", -12));
    }
}
