//! Vectorizer: configuration plus batch conversion of raw sequences into
//! records. Converting many sequences is an embarrassingly parallel map with
//! no shared mutable state, so batches fan out across rayon workers.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::codec::KmerCodec;
use crate::count::CountStorage;
use crate::error::EngineError;
use crate::record::SeqRecord;

/// Largest index space for which the default picks dense counts.
const DENSE_AUTO_MAX: u64 = 1 << 22;

/// Vectorizer configuration.
#[derive(Clone, Debug, Default)]
pub struct VectorizeConfig {
    storage: Option<CountStorage>,
    threads: Option<usize>,
}

impl VectorizeConfig {
    /// Force a counts storage mode. Default: dense for small index spaces,
    /// sparse otherwise.
    pub fn storage(mut self, storage: CountStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Fix the number of rayon threads used by batch conversion.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }
}

/// Converts sequences of one molecular type into [`SeqRecord`]s for a fixed k.
pub struct Vectorizer {
    alphabet: Alphabet,
    codec: KmerCodec,
    storage: CountStorage,
}

impl Vectorizer {
    pub fn new(alphabet: Alphabet, k: usize, cfg: VectorizeConfig) -> Result<Self, EngineError> {
        let codec = KmerCodec::new(alphabet.num_states(), k)?;
        let storage = cfg.storage.unwrap_or_else(|| {
            if codec.capacity() <= DENSE_AUTO_MAX {
                CountStorage::Dense
            } else {
                CountStorage::Sparse
            }
        });
        if storage == CountStorage::Dense && codec.capacity() > DENSE_AUTO_MAX {
            warn!(
                capacity = codec.capacity(),
                "dense counts over a large index space"
            );
        }
        if let Some(n) = cfg.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build_global()
                .ok();
        }
        debug!(
            k,
            num_states = alphabet.num_states(),
            capacity = codec.capacity(),
            ?storage,
            "vectorizer ready"
        );
        Ok(Vectorizer {
            alphabet,
            codec,
            storage,
        })
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn codec(&self) -> &KmerCodec {
        &self.codec
    }

    #[inline]
    pub fn storage(&self) -> CountStorage {
        self.storage
    }

    /// One raw sequence to one record.
    pub fn record(&self, name: &str, raw_seq: &[u8]) -> Result<SeqRecord, EngineError> {
        let encoded = self.alphabet.encode_seq(raw_seq);
        self.record_from_encoded(name, &encoded)
    }

    /// One pre-encoded symbol array to one record.
    pub fn record_from_encoded(&self, name: &str, seq: &[u8]) -> Result<SeqRecord, EngineError> {
        SeqRecord::from_encoded_seq(name, seq, &self.codec, self.storage)
    }

    /// Batch conversion across rayon workers; output order matches input.
    pub fn records<N, S>(&self, seqs: &[(N, S)]) -> Result<Vec<SeqRecord>, EngineError>
    where
        N: AsRef<str> + Sync,
        S: AsRef<[u8]> + Sync,
    {
        seqs.par_iter()
            .map(|(name, seq)| self.record(name.as_ref(), seq.as_ref()))
            .collect()
    }
}
