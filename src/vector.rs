//! Fixed-length numeric vector over the k-mer index space, with two
//! interchangeable representations behind one type: a sparse ascending map of
//! non-zero cells, or a dense array.
//!
//! Conventions
//! - Sparse form never stores a value within [`ZERO_TOL`] of zero; absent
//!   cells read as zero.
//! - The two forms are observably equivalent: `get`, `len`, `sum`,
//!   `iter_nonzero` order, entropy, and equality agree for equal content.
//! - Binary ops require equal lengths; scalar ops touch occupied (non-zero)
//!   cells only, which keeps the forms in agreement.
//! - Division always yields `f64` cells and maps a zero divisor to a zero
//!   cell, never NaN.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Absolute tolerance below which a floating cell counts as zero.
pub const ZERO_TOL: f64 = 1e-12;

/// Numeric cell type: integer counts or floating frequencies.
pub trait CellValue:
    Copy
    + PartialEq
    + PartialOrd
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Dtype name recorded in the portable form.
    const DTYPE: &'static str;

    fn zero() -> Self;
    /// True when the value is within tolerance of zero.
    fn is_zero(self) -> bool;
    fn to_f64(self) -> f64;
}

impl CellValue for i64 {
    const DTYPE: &'static str = "int64";

    #[inline]
    fn zero() -> Self {
        0
    }
    #[inline]
    fn is_zero(self) -> bool {
        self == 0
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl CellValue for f64 {
    const DTYPE: &'static str = "float64";

    #[inline]
    fn zero() -> Self {
        0.0
    }
    #[inline]
    fn is_zero(self) -> bool {
        self.abs() < ZERO_TOL
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Raw k-mer counts.
pub type CountVector = KmerVector<i64>;
/// Normalized k-mer frequencies.
pub type FreqVector = KmerVector<f64>;

#[derive(Debug, Clone)]
enum VectorData<T> {
    Sparse(BTreeMap<u64, T>),
    Dense(Vec<T>),
}

/// A `vector_length`-cell numeric vector indexed `0..vector_length`.
#[derive(Debug, Clone)]
pub struct KmerVector<T: CellValue> {
    length: u64,
    data: VectorData<T>,
    source: Option<String>,
    name: Option<String>,
}

impl<T: CellValue> KmerVector<T> {
    /// All-zero dense vector.
    pub fn zeros(length: u64) -> Result<Self, EngineError> {
        let cells = Self::dense_len(length)?;
        Ok(KmerVector {
            length,
            data: VectorData::Dense(vec![T::zero(); cells]),
            source: None,
            name: None,
        })
    }

    /// Dense vector from a prebuilt cell array.
    pub fn from_dense(cells: Vec<T>, length: u64) -> Result<Self, EngineError> {
        check_length(length)?;
        if cells.len() as u64 != length {
            return Err(EngineError::InvalidShape {
                expected: length,
                got: cells.len() as u64,
            });
        }
        Ok(KmerVector {
            length,
            data: VectorData::Dense(cells),
            source: None,
            name: None,
        })
    }

    /// Sparse vector from `(index, value)` entries. Near-zero entries are
    /// dropped; a repeated index keeps the last value.
    pub fn from_sparse<I>(length: u64, entries: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (u64, T)>,
    {
        check_length(length)?;
        let mut map = BTreeMap::new();
        for (index, value) in entries {
            if index >= length {
                return Err(EngineError::IndexOutOfRange { index, len: length });
            }
            if value.is_zero() {
                map.remove(&index);
            } else {
                map.insert(index, value);
            }
        }
        Ok(KmerVector {
            length,
            data: VectorData::Sparse(map),
            source: None,
            name: None,
        })
    }

    /// Attach a provenance source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a provenance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of cells (`num_states^k` for k-mer vectors).
    #[inline]
    pub fn len(&self) -> u64 {
        self.length
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        matches!(self.data, VectorData::Sparse(_))
    }

    /// Read one cell.
    pub fn get(&self, index: u64) -> Result<T, EngineError> {
        self.check_index(index)?;
        Ok(match &self.data {
            VectorData::Sparse(map) => map.get(&index).copied().unwrap_or_else(T::zero),
            VectorData::Dense(cells) => cells[index as usize],
        })
    }

    /// Write one cell. On the sparse form a near-zero write removes the key.
    pub fn set(&mut self, index: u64, value: T) -> Result<(), EngineError> {
        self.check_index(index)?;
        self.store(index, value);
        Ok(())
    }

    /// Copy with guaranteed O(1) indexed access.
    pub fn to_dense(&self) -> Result<Self, EngineError> {
        match &self.data {
            VectorData::Dense(_) => Ok(self.clone()),
            VectorData::Sparse(map) => {
                let cells = Self::dense_len(self.length)?;
                let mut dense = vec![T::zero(); cells];
                for (&index, &value) in map {
                    dense[index as usize] = value;
                }
                Ok(KmerVector {
                    length: self.length,
                    data: VectorData::Dense(dense),
                    source: self.source.clone(),
                    name: self.name.clone(),
                })
            }
        }
    }

    /// Copy holding only the non-zero cells.
    pub fn to_sparse(&self) -> Self {
        match &self.data {
            VectorData::Sparse(_) => self.clone(),
            VectorData::Dense(_) => KmerVector {
                length: self.length,
                data: VectorData::Sparse(self.iter_nonzero().collect()),
                source: self.source.clone(),
                name: self.name.clone(),
            },
        }
    }

    /// Total of all cells.
    pub fn sum(&self) -> T {
        match &self.data {
            VectorData::Sparse(map) => map.values().fold(T::zero(), |acc, &v| acc + v),
            VectorData::Dense(cells) => cells.iter().fold(T::zero(), |acc, &v| acc + v),
        }
    }

    /// Non-zero cells as `(index, value)` pairs in ascending index order.
    /// Lazy and restartable.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u64, T)> + '_ {
        let iter: Box<dyn Iterator<Item = (u64, T)> + '_> = match &self.data {
            VectorData::Sparse(map) => Box::new(map.iter().map(|(&i, &v)| (i, v))),
            VectorData::Dense(cells) => Box::new(
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_zero())
                    .map(|(i, &v)| (i as u64, v)),
            ),
        };
        iter
    }

    /// Shannon entropy in bits of the distribution obtained by normalizing
    /// the non-zero cells by `sum()`. An all-zero vector has entropy 0; the
    /// sign is clamped to absorb floating round-off.
    pub fn entropy(&self) -> f64 {
        let total = self.sum().to_f64();
        if total.abs() < ZERO_TOL {
            return 0.0;
        }
        let mut bits = 0.0;
        for (_, value) in self.iter_nonzero() {
            let p = value.to_f64() / total;
            bits -= p * p.log2();
        }
        bits.max(0.0)
    }

    /// Elementwise sum with a vector of the same length.
    pub fn add(&self, other: &Self) -> Result<Self, EngineError> {
        let mut out = self.clone();
        out.add_in_place(other)?;
        Ok(out)
    }

    /// In-place elementwise sum.
    pub fn add_in_place(&mut self, other: &Self) -> Result<(), EngineError> {
        self.check_shape(other)?;
        for (index, value) in other.iter_nonzero() {
            let current = self.get(index)?;
            self.store(index, current + value);
        }
        Ok(())
    }

    /// Elementwise difference. Negative results are permitted; signed count
    /// differences feed divergence deltas downstream.
    pub fn sub(&self, other: &Self) -> Result<Self, EngineError> {
        let mut out = self.clone();
        out.sub_in_place(other)?;
        Ok(out)
    }

    /// In-place elementwise difference.
    pub fn sub_in_place(&mut self, other: &Self) -> Result<(), EngineError> {
        self.check_shape(other)?;
        for (index, value) in other.iter_nonzero() {
            let current = self.get(index)?;
            self.store(index, current - value);
        }
        Ok(())
    }

    /// Broadcast add over occupied cells; zero cells are untouched.
    pub fn add_scalar(&self, value: T) -> Self {
        let mut out = self.clone();
        out.add_scalar_in_place(value);
        out
    }

    /// In-place broadcast add over occupied cells.
    pub fn add_scalar_in_place(&mut self, value: T) {
        match &mut self.data {
            VectorData::Sparse(map) => {
                for v in map.values_mut() {
                    *v = *v + value;
                }
                map.retain(|_, v| !v.is_zero());
            }
            VectorData::Dense(cells) => {
                for v in cells.iter_mut() {
                    if !v.is_zero() {
                        *v = *v + value;
                    }
                }
            }
        }
    }

    /// Broadcast subtract over occupied cells; zero cells are untouched.
    pub fn sub_scalar(&self, value: T) -> Self {
        let mut out = self.clone();
        out.sub_scalar_in_place(value);
        out
    }

    /// In-place broadcast subtract over occupied cells.
    pub fn sub_scalar_in_place(&mut self, value: T) {
        match &mut self.data {
            VectorData::Sparse(map) => {
                for v in map.values_mut() {
                    *v = *v - value;
                }
                map.retain(|_, v| !v.is_zero());
            }
            VectorData::Dense(cells) => {
                for v in cells.iter_mut() {
                    if !v.is_zero() {
                        *v = *v - value;
                    }
                }
            }
        }
    }

    /// Elementwise division, promoting to `f64` cells. A zero divisor yields
    /// a zero cell.
    pub fn div(&self, other: &Self) -> Result<KmerVector<f64>, EngineError> {
        self.check_shape(other)?;
        let mut out = self.zeroed_f64();
        for (index, value) in self.iter_nonzero() {
            let divisor = other.get(index)?.to_f64();
            if divisor.abs() >= ZERO_TOL {
                out.store(index, value.to_f64() / divisor);
            }
        }
        Ok(out)
    }

    /// Division by a scalar, promoting to `f64` cells. A zero scalar yields
    /// an all-zero vector.
    pub fn div_scalar(&self, value: f64) -> KmerVector<f64> {
        let mut out = self.zeroed_f64();
        if value.abs() < ZERO_TOL {
            return out;
        }
        for (index, cell) in self.iter_nonzero() {
            out.store(index, cell.to_f64() / value);
        }
        out
    }

    /// Serialize to the portable, format-neutral structure.
    pub fn to_portable(&self) -> PortableVector<T> {
        PortableVector {
            vector_length: self.length,
            dtype: T::DTYPE.to_string(),
            source: self.source.clone(),
            name: self.name.clone(),
            data: self.iter_nonzero().collect(),
        }
    }

    /// Restore from the portable structure, verifying the dtype name. The
    /// result is sparse and observably equal to the serialized vector.
    pub fn from_portable(portable: PortableVector<T>) -> Result<Self, EngineError> {
        if portable.dtype != T::DTYPE {
            return Err(EngineError::InvalidArgument(format!(
                "dtype {:?} does not match cell type {:?}",
                portable.dtype,
                T::DTYPE
            )));
        }
        let mut vector = Self::from_sparse(portable.vector_length, portable.data)?;
        vector.source = portable.source;
        vector.name = portable.name;
        Ok(vector)
    }

    // Write for an index already validated against length.
    fn store(&mut self, index: u64, value: T) {
        debug_assert!(index < self.length);
        match &mut self.data {
            VectorData::Sparse(map) => {
                if value.is_zero() {
                    map.remove(&index);
                } else {
                    map.insert(index, value);
                }
            }
            VectorData::Dense(cells) => cells[index as usize] = value,
        }
    }

    // Same representation and provenance, all-zero f64 cells.
    fn zeroed_f64(&self) -> KmerVector<f64> {
        let data = match &self.data {
            VectorData::Sparse(_) => VectorData::Sparse(BTreeMap::new()),
            VectorData::Dense(cells) => VectorData::Dense(vec![0.0; cells.len()]),
        };
        KmerVector {
            length: self.length,
            data,
            source: self.source.clone(),
            name: self.name.clone(),
        }
    }

    fn dense_len(length: u64) -> Result<usize, EngineError> {
        check_length(length)?;
        usize::try_from(length).map_err(|_| {
            EngineError::CapacityExceeded(format!(
                "dense vector of length {length} is not addressable"
            ))
        })
    }

    #[inline]
    fn check_index(&self, index: u64) -> Result<(), EngineError> {
        if index >= self.length {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.length,
            });
        }
        Ok(())
    }

    #[inline]
    fn check_shape(&self, other: &Self) -> Result<(), EngineError> {
        if self.length != other.length {
            return Err(EngineError::InvalidShape {
                expected: self.length,
                got: other.length,
            });
        }
        Ok(())
    }
}

impl KmerVector<f64> {
    /// In-place elementwise division; a zero divisor yields a zero cell.
    pub fn div_in_place(&mut self, other: &Self) -> Result<(), EngineError> {
        *self = self.div(other)?;
        Ok(())
    }

    /// In-place division by a scalar.
    pub fn div_scalar_in_place(&mut self, value: f64) {
        *self = self.div_scalar(value);
    }
}

/// Equality is observable content: length plus non-zero cells, regardless of
/// representation. Provenance strings are excluded.
impl<T: CellValue> PartialEq for KmerVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter_nonzero().eq(other.iter_nonzero())
    }
}

/// Plain, language-neutral form of a vector: scalar metadata plus an ordered
/// list of `(index, value)` pairs. Suitable for any serde format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortableVector<T> {
    pub vector_length: u64,
    pub dtype: String,
    pub source: Option<String>,
    pub name: Option<String>,
    pub data: Vec<(u64, T)>,
}

fn check_length(length: u64) -> Result<(), EngineError> {
    if length == 0 {
        return Err(EngineError::InvalidArgument(
            "vector_length must be > 0".into(),
        ));
    }
    Ok(())
}
