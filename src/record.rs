//! SeqRecord: one sequence's identity bundled with its k-mer counts and the
//! statistics derived from them.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::codec::KmerCodec;
use crate::count::{self, CountStorage};
use crate::error::EngineError;
use crate::vector::{CountVector, FreqVector, PortableVector};

/// A single sequence reduced to k-mer composition.
///
/// Identity and ordering are deliberately split: equality and hashing consult
/// `(name, length)` only, while `Ord` consults `delta_jsd` only. Two records
/// with the same name and length therefore compare equal even when their
/// ranks differ, and `cmp` can return non-`Equal` for equal records. Sorted
/// containers must key on one of the two explicitly; plain slice sorts are
/// stable, so ties keep insertion order.
#[derive(Debug, Clone)]
pub struct SeqRecord {
    name: String,
    length: u64,
    k: usize,
    kcounts: CountVector,
    delta_jsd: f64,
}

impl SeqRecord {
    /// Wrap prebuilt counts. `name` must be non-empty, `length` positive, and
    /// `0 < k <= length`. `delta_jsd` starts at 0.0.
    pub fn new(
        name: impl Into<String>,
        length: u64,
        k: usize,
        kcounts: CountVector,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::InvalidArgument(
                "record name must not be empty".into(),
            ));
        }
        if length == 0 {
            return Err(EngineError::InvalidArgument(
                "sequence length must be > 0".into(),
            ));
        }
        if k == 0 {
            return Err(EngineError::InvalidArgument("k must be > 0".into()));
        }
        if k as u64 > length {
            return Err(EngineError::InvalidArgument(format!(
                "k={k} > length={length}"
            )));
        }
        Ok(SeqRecord {
            name,
            length,
            k,
            kcounts,
            delta_jsd: 0.0,
        })
    }

    /// Count k-mers in an encoded symbol array and wrap the result. With no
    /// ambiguous positions the counts total `length - k + 1`.
    pub fn from_encoded_seq(
        name: impl Into<String>,
        seq: &[u8],
        codec: &KmerCodec,
        storage: CountStorage,
    ) -> Result<Self, EngineError> {
        let kcounts = count::kmer_counts(seq, codec, storage)?;
        Self::new(name, seq.len() as u64, codec.k(), kcounts)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source sequence length.
    #[inline]
    pub fn length(&self) -> u64 {
        self.length
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Raw k-mer counts. The record owns these exclusively.
    #[inline]
    pub fn kcounts(&self) -> &CountVector {
        &self.kcounts
    }

    /// Counts normalized to sum 1.0. Derived on demand, never cached.
    pub fn kfreqs(&self) -> FreqVector {
        self.kcounts.div_scalar(self.kcounts.sum() as f64)
    }

    /// Shannon entropy in bits of the k-mer distribution.
    pub fn entropy(&self) -> f64 {
        self.kcounts.entropy()
    }

    /// Length of the counts vector, `num_states^k`.
    #[inline]
    pub fn size(&self) -> u64 {
        self.kcounts.len()
    }

    /// Divergence contribution assigned by the ranking pass. The only
    /// mutable field.
    #[inline]
    pub fn delta_jsd(&self) -> f64 {
        self.delta_jsd
    }

    #[inline]
    pub fn set_delta_jsd(&mut self, value: f64) {
        self.delta_jsd = value;
    }

    /// Serialize identity, rank, and raw counts. Derived values are
    /// recomputed on restore.
    pub fn to_portable(&self) -> PortableRecord {
        PortableRecord {
            name: self.name.clone(),
            length: self.length,
            k: self.k,
            delta_jsd: self.delta_jsd,
            kcounts: self.kcounts.to_portable(),
        }
    }

    /// Restore a record, re-running construction validation.
    pub fn from_portable(portable: PortableRecord) -> Result<Self, EngineError> {
        let kcounts = CountVector::from_portable(portable.kcounts)?;
        let mut record = Self::new(portable.name, portable.length, portable.k, kcounts)?;
        record.delta_jsd = portable.delta_jsd;
        Ok(record)
    }
}

/// Identity equality: `(name, length)`. Counts and rank are excluded so that
/// deduplication is stable while `delta_jsd` evolves.
impl PartialEq for SeqRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.length == other.length
    }
}

impl Eq for SeqRecord {}

impl Hash for SeqRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.length.hash(state);
    }
}

/// Rank ordering: ascending `delta_jsd` only. See the type-level note on the
/// identity/rank split.
impl PartialOrd for SeqRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeqRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.delta_jsd.total_cmp(&other.delta_jsd)
    }
}

/// Plain form of a record: identity, rank, and the counts vector's portable
/// form. `kfreqs`, `entropy`, and `size` are recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortableRecord {
    pub name: String,
    pub length: u64,
    pub k: usize,
    pub delta_jsd: f64,
    pub kcounts: PortableVector<i64>,
}
