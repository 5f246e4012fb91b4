//! The preprocessing source: a finite, positional supply of correlated
//! randomness (zero-shares, random shares, bit-shares, Beaver triples, cube
//! triples and double sharings) consumed strictly in order.
//!
//! Two sources are provided: [InMemorySource], a deterministic in-memory
//! supply for tests, and [FileSource], which reads pre-generated elements
//! from the on-disk layout `<kind>_<n>_<t>/<my_id>.dat` and persists its
//! read position alongside each file so a process restart resumes where it
//! left off.

use crate::beaver::BeaverTriple;
use math_lib::GF;
use serde::{Deserialize, Serialize};
use serde_files_utils::{binary, json};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The kinds of correlated randomness the online protocol consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A share of `0`.
    Zero,
    /// A share of a uniformly random field element.
    Rand,
    /// A share of a uniformly random bit (`0` or `1`).
    Bit,
    /// A Beaver triple `(a, b, ab)`.
    Triple,
    /// A cube triple `(a, a^2, a^3)`.
    Cube,
    /// A degree-reduction pair `([r]_t, [r]_{2t})`.
    DoubleShare,
}

impl ElementKind {
    /// How many consecutive scalars on disk make up one element of this kind.
    fn arity(self) -> usize {
        match self {
            ElementKind::Zero | ElementKind::Rand | ElementKind::Bit => 1,
            ElementKind::Triple | ElementKind::Cube => 3,
            ElementKind::DoubleShare => 2,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Zero => "zero",
            ElementKind::Rand => "rand",
            ElementKind::Bit => "bit",
            ElementKind::Triple => "triple",
            ElementKind::Cube => "cube",
            ElementKind::DoubleShare => "double_share",
        };
        write!(f, "{name}")
    }
}

/// A cube triple: shares of `(a, a^2, a^3)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CubeTriple {
    /// Share of `a`.
    pub value: GF,
    /// Share of `a^2`.
    pub square: GF,
    /// Share of `a^3`.
    pub cube: GF,
}

/// A degree-reduction pair: the same secret shared at degree `t` and at degree `2t`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoubleShare {
    /// The degree-`t` share.
    pub low: GF,
    /// The degree-`2t` share.
    pub high: GF,
}

/// The preprocessing source ran out of elements of the requested kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("preprocessing source for {0} exhausted")]
pub struct PreprocessingExhausted(pub ElementKind);

/// Failure opening or reading a preprocessing file.
#[derive(Error, Debug, Clone)]
#[error("preprocessing I/O error: {0}")]
pub struct PreprocessingIoError(pub String);

/// A finite, positional supply of one [ElementKind] of correlated randomness.
pub trait ElementSource {
    /// Consumes and returns the next zero-share.
    fn next_zero(&mut self) -> Result<GF, PreprocessingExhausted>;
    /// Consumes and returns the next random share.
    fn next_rand(&mut self) -> Result<GF, PreprocessingExhausted>;
    /// Consumes and returns the next random bit-share.
    fn next_bit(&mut self) -> Result<GF, PreprocessingExhausted>;
    /// Consumes and returns the next Beaver triple.
    fn next_triple(&mut self) -> Result<BeaverTriple, PreprocessingExhausted>;
    /// Consumes and returns the next cube triple.
    fn next_cube(&mut self) -> Result<CubeTriple, PreprocessingExhausted>;
    /// Consumes and returns the next degree-reduction pair.
    fn next_double_share(&mut self) -> Result<DoubleShare, PreprocessingExhausted>;
}

/// A deterministic, in-memory preprocessing source, built directly from pre-generated
/// element lists. Used in tests and by the fake-preprocessing CLI mode.
#[derive(Default)]
pub struct InMemorySource {
    zero: Vec<GF>,
    rand: Vec<GF>,
    bit: Vec<GF>,
    triple: Vec<BeaverTriple>,
    cube: Vec<CubeTriple>,
    double_share: Vec<DoubleShare>,
}

impl InMemorySource {
    /// Builds an empty source; elements are added with the `with_*` builders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends zero-shares to the source.
    pub fn with_zeros(mut self, values: impl IntoIterator<Item = GF>) -> Self {
        self.zero.extend(values);
        self
    }

    /// Appends random shares to the source.
    pub fn with_rands(mut self, values: impl IntoIterator<Item = GF>) -> Self {
        self.rand.extend(values);
        self
    }

    /// Appends random bit-shares to the source.
    pub fn with_bits(mut self, values: impl IntoIterator<Item = GF>) -> Self {
        self.bit.extend(values);
        self
    }

    /// Appends Beaver triples to the source.
    pub fn with_triples(mut self, values: impl IntoIterator<Item = BeaverTriple>) -> Self {
        self.triple.extend(values);
        self
    }

    /// Appends cube triples to the source.
    pub fn with_cubes(mut self, values: impl IntoIterator<Item = CubeTriple>) -> Self {
        self.cube.extend(values);
        self
    }

    /// Appends degree-reduction pairs to the source.
    pub fn with_double_shares(mut self, values: impl IntoIterator<Item = DoubleShare>) -> Self {
        self.double_share.extend(values);
        self
    }
}

fn pop_front<T>(queue: &mut Vec<T>, kind: ElementKind) -> Result<T, PreprocessingExhausted> {
    if queue.is_empty() {
        return Err(PreprocessingExhausted(kind));
    }
    Ok(queue.remove(0))
}

impl ElementSource for InMemorySource {
    fn next_zero(&mut self) -> Result<GF, PreprocessingExhausted> {
        pop_front(&mut self.zero, ElementKind::Zero)
    }

    fn next_rand(&mut self) -> Result<GF, PreprocessingExhausted> {
        pop_front(&mut self.rand, ElementKind::Rand)
    }

    fn next_bit(&mut self) -> Result<GF, PreprocessingExhausted> {
        pop_front(&mut self.bit, ElementKind::Bit)
    }

    fn next_triple(&mut self) -> Result<BeaverTriple, PreprocessingExhausted> {
        pop_front(&mut self.triple, ElementKind::Triple)
    }

    fn next_cube(&mut self) -> Result<CubeTriple, PreprocessingExhausted> {
        pop_front(&mut self.cube, ElementKind::Cube)
    }

    fn next_double_share(&mut self) -> Result<DoubleShare, PreprocessingExhausted> {
        pop_front(&mut self.double_share, ElementKind::DoubleShare)
    }
}

/// On-disk encoding of a preprocessing file: a flat, length-prefixed list of encoded scalars,
/// consumed `arity()` at a time.
#[derive(Serialize, Deserialize)]
struct ScalarFile(Vec<[u8; math_lib::ENCODED_LEN]>);

#[derive(Serialize, Deserialize, Default)]
struct CursorState {
    position: usize,
}

/// A single preprocessing file's read cursor, with its position persisted alongside it so a
/// restarted process resumes from where it left off rather than re-consuming elements.
struct FileCursor {
    kind: ElementKind,
    scalars: Vec<GF>,
    position: usize,
    position_path: PathBuf,
}

impl FileCursor {
    fn open(dir: &Path, kind: ElementKind, n: usize, t: usize, my_id: usize) -> Result<Self, PreprocessingIoError> {
        let kind_dir = dir.join(format!("{kind}_{n}_{t}"));
        let data_path = kind_dir.join(format!("{my_id}.dat"));
        let position_path = kind_dir.join(format!("{my_id}.pos"));
        let file: ScalarFile = binary::read_bin(&data_path).map_err(|e| PreprocessingIoError(e.to_string()))?;
        let scalars = file.0.iter().map(GF::from_bytes).collect();
        let position = if position_path.exists() {
            json::read_json::<_, CursorState>(&position_path).map_err(|e| PreprocessingIoError(e.to_string()))?.position
        } else {
            0
        };
        Ok(Self { kind, scalars, position, position_path })
    }

    fn take(&mut self, arity: usize) -> Result<Vec<GF>, PreprocessingExhausted> {
        let end = self.position.saturating_add(arity);
        let Some(slice) = self.scalars.get(self.position..end) else {
            return Err(PreprocessingExhausted(self.kind));
        };
        let elements = slice.to_vec();
        self.position = end;
        if let Err(error) = json::write_json(&self.position_path, &CursorState { position: self.position }) {
            tracing::warn!(kind = %self.kind, %error, "failed to persist preprocessing cursor position");
        }
        Ok(elements)
    }
}

/// Reads correlated randomness from the on-disk preprocessing layout, one file per kind per party.
pub struct FileSource {
    zero: FileCursor,
    rand: FileCursor,
    bit: FileCursor,
    triple: FileCursor,
    cube: FileCursor,
    double_share: FileCursor,
}

impl FileSource {
    /// Opens the preprocessing directory `dir` (laid out as `<dir>/<kind>_<n>_<t>/<my_id>.dat`,
    /// per the persisted state layout) for party `my_id` of an `n`-party, `t`-threshold run.
    pub fn open(dir: &Path, n: usize, t: usize, my_id: usize) -> Result<Self, PreprocessingIoError> {
        Ok(Self {
            zero: FileCursor::open(dir, ElementKind::Zero, n, t, my_id)?,
            rand: FileCursor::open(dir, ElementKind::Rand, n, t, my_id)?,
            bit: FileCursor::open(dir, ElementKind::Bit, n, t, my_id)?,
            triple: FileCursor::open(dir, ElementKind::Triple, n, t, my_id)?,
            cube: FileCursor::open(dir, ElementKind::Cube, n, t, my_id)?,
            double_share: FileCursor::open(dir, ElementKind::DoubleShare, n, t, my_id)?,
        })
    }
}

impl ElementSource for FileSource {
    fn next_zero(&mut self) -> Result<GF, PreprocessingExhausted> {
        Ok(self.zero.take(ElementKind::Zero.arity())?.remove(0))
    }

    fn next_rand(&mut self) -> Result<GF, PreprocessingExhausted> {
        Ok(self.rand.take(ElementKind::Rand.arity())?.remove(0))
    }

    fn next_bit(&mut self) -> Result<GF, PreprocessingExhausted> {
        Ok(self.bit.take(ElementKind::Bit.arity())?.remove(0))
    }

    fn next_triple(&mut self) -> Result<BeaverTriple, PreprocessingExhausted> {
        let v = self.triple.take(ElementKind::Triple.arity())?;
        Ok(BeaverTriple::new(v[0].clone(), v[1].clone(), v[2].clone()))
    }

    fn next_cube(&mut self) -> Result<CubeTriple, PreprocessingExhausted> {
        let v = self.cube.take(ElementKind::Cube.arity())?;
        Ok(CubeTriple { value: v[0].clone(), square: v[1].clone(), cube: v[2].clone() })
    }

    fn next_double_share(&mut self) -> Result<DoubleShare, PreprocessingExhausted> {
        let v = self.double_share.take(ElementKind::DoubleShare.arity())?;
        Ok(DoubleShare { low: v[0].clone(), high: v[1].clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_is_positional() {
        let mut source = InMemorySource::new().with_zeros([GF::from_u64(1), GF::from_u64(2)]);
        assert_eq!(source.next_zero().unwrap(), GF::from_u64(1));
        assert_eq!(source.next_zero().unwrap(), GF::from_u64(2));
        assert_eq!(source.next_zero().unwrap_err(), PreprocessingExhausted(ElementKind::Zero));
    }

    #[test]
    fn in_memory_source_triples_round_trip() {
        let triple = BeaverTriple::new(GF::from_u64(2), GF::from_u64(3), GF::from_u64(6));
        let mut source = InMemorySource::new().with_triples([triple.clone()]);
        assert_eq!(source.next_triple().unwrap(), triple);
    }

    #[test]
    fn file_source_round_trips_and_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let (n, t) = (4, 1);
        let kind_dir = dir.path().join(format!("{}_{n}_{t}", ElementKind::Zero));
        std::fs::create_dir_all(&kind_dir).unwrap();
        let scalars: Vec<_> = (1..=4u64).map(|v| GF::from_u64(v).to_bytes()).collect();
        binary::write_bin(kind_dir.join("0.dat"), ScalarFile(scalars)).unwrap();
        for kind in [ElementKind::Rand, ElementKind::Bit, ElementKind::Triple, ElementKind::Cube, ElementKind::DoubleShare]
        {
            let empty_dir = dir.path().join(format!("{kind}_{n}_{t}"));
            std::fs::create_dir_all(&empty_dir).unwrap();
            binary::write_bin(empty_dir.join("0.dat"), ScalarFile(Vec::new())).unwrap();
        }

        let mut source = FileSource::open(dir.path(), n, t, 0).unwrap();
        assert_eq!(source.next_zero().unwrap(), GF::from_u64(1));
        assert_eq!(source.next_zero().unwrap(), GF::from_u64(2));
        drop(source);

        // Reopening resumes from the persisted position rather than restarting at 0.
        let mut resumed = FileSource::open(dir.path(), n, t, 0).unwrap();
        assert_eq!(resumed.next_zero().unwrap(), GF::from_u64(3));
        assert_eq!(resumed.next_zero().unwrap(), GF::from_u64(4));
        assert_eq!(resumed.next_zero().unwrap_err(), PreprocessingExhausted(ElementKind::Zero));
    }
}
