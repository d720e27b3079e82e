//! Counting engine: slide a length-k window across an encoded symbol array
//! and emit the index of every window free of non-canonical positions.
//!
//! Exclusion uses a "skip until" cursor: when the trailing edge of the window
//! meets a non-canonical symbol at position `p`, every window starting before
//! `p + 1` is skipped. Each position is inspected once, so the scan stays
//! linear regardless of how ambiguity is distributed.

use std::collections::BTreeMap;

use crate::codec::KmerCodec;
use crate::error::EngineError;
use crate::vector::CountVector;

/// Storage strategy for a counts vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountStorage {
    /// Map of occupied cells only.
    Sparse,
    /// Flat array over the whole index space.
    Dense,
}

/// Indices of the included windows, in sequence order. A sequence shorter
/// than k yields no windows. Output length is at most `seq.len() - k + 1`.
pub fn kmer_indices(seq: &[u8], codec: &KmerCodec) -> Vec<u64> {
    let mut out = Vec::with_capacity((seq.len() + 1).saturating_sub(codec.k()));
    scan(seq, codec, |index| out.push(index));
    out
}

/// Counts vector of length `codec.capacity()` over the included windows.
/// Both storage modes produce observably equal vectors.
pub fn kmer_counts(
    seq: &[u8],
    codec: &KmerCodec,
    storage: CountStorage,
) -> Result<CountVector, EngineError> {
    match storage {
        CountStorage::Dense => {
            let cells = usize::try_from(codec.capacity()).map_err(|_| {
                EngineError::CapacityExceeded(format!(
                    "dense counts of length {} are not addressable",
                    codec.capacity()
                ))
            })?;
            let mut counts = vec![0i64; cells];
            scan(seq, codec, |index| counts[index as usize] += 1);
            CountVector::from_dense(counts, codec.capacity())
        }
        CountStorage::Sparse => {
            let mut counts = BTreeMap::<u64, i64>::new();
            scan(seq, codec, |index| *counts.entry(index).or_insert(0) += 1);
            CountVector::from_sparse(codec.capacity(), counts)
        }
    }
}

// Single pass over the symbol array; `emit` receives the index of every
// included window.
#[inline]
fn scan<F: FnMut(u64)>(seq: &[u8], codec: &KmerCodec, mut emit: F) {
    let k = codec.k();
    let num_states = codec.num_states();
    if seq.len() < k {
        return;
    }

    // Seed the cursor over the leading k-1 positions.
    let mut skip_until = 0usize;
    for (i, &symbol) in seq[..k - 1].iter().enumerate() {
        if symbol as usize >= num_states {
            skip_until = i + 1;
        }
    }

    for start in 0..=(seq.len() - k) {
        if seq[start + k - 1] as usize >= num_states {
            skip_until = start + k;
        }
        if start < skip_until {
            continue;
        }
        emit(codec.encode(&seq[start..start + k]));
    }
}
