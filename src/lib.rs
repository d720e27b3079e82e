//! K-mer frequency-vector engine for divergence-based sequence selection.
//!
//! Each sequence is reduced to a fixed-length vector of counts over all
//! `num_states^k` possible k-length words; downstream ranking reads the
//! derived frequencies and entropy off a [`SeqRecord`] and writes its
//! divergence contribution back as the record's sort key.
//!
//! Pieces:
//! - [`Alphabet`]: validated canonical symbol set + fast ASCII→index LUT
//! - [`KmerCodec`]: mixed-radix window ↔ index conversion with a 64-bit
//!   capacity guard
//! - counting ([`kmer_indices`], [`kmer_counts`]): linear skip-until window
//!   scan excluding ambiguous positions
//! - [`KmerVector`]: sparse or dense storage behind one type, elementwise
//!   arithmetic, entropy, serde-portable form
//! - [`Vectorizer`]: batch sequence→record conversion across rayon workers
//!
//! All operations are pure and synchronous; every vector and record is an
//! independent value, so callers may fan out freely.

mod alphabet;
mod builder;
mod codec;
mod count;
mod error;
mod record;
mod vector;

pub use alphabet::{Alphabet, NON_CANONICAL};
pub use builder::{VectorizeConfig, Vectorizer};
pub use codec::KmerCodec;
pub use count::{CountStorage, kmer_counts, kmer_indices};
pub use error::EngineError;
pub use record::{PortableRecord, SeqRecord};
pub use vector::{CellValue, CountVector, FreqVector, KmerVector, PortableVector, ZERO_TOL};
