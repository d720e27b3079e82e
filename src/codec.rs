//! K-mer coordinate codec: a length-k window of state indices is a
//! k-dimensional coordinate, converted to a single index in
//! `[0, num_states^k)` with positional weights `num_states^(k-1-i)`
//! (most-significant position first), and back by mixed-radix division.

use crate::alphabet::Alphabet;
use crate::error::EngineError;

/// Fixed conversion coefficients for one `(num_states, k)` pairing.
#[derive(Debug, Clone)]
pub struct KmerCodec {
    num_states: usize,
    k: usize,
    capacity: u64,
    coeffs: Vec<u64>,
}

impl KmerCodec {
    /// Build the coefficient table. Rejects `k == 0`, an empty alphabet, and
    /// any `num_states^k` that does not fit a 64-bit index.
    pub fn new(num_states: usize, k: usize) -> Result<Self, EngineError> {
        if k == 0 {
            return Err(EngineError::InvalidArgument("k must be > 0".into()));
        }
        if num_states == 0 {
            return Err(EngineError::InvalidAlphabet(
                "no canonical states".into(),
            ));
        }
        let n = num_states as u64;
        let exp = u32::try_from(k).map_err(|_| {
            EngineError::CapacityExceeded(format!("{num_states}^{k} overflows u64"))
        })?;
        let capacity = n.checked_pow(exp).ok_or_else(|| {
            EngineError::CapacityExceeded(format!("{num_states}^{k} overflows u64"))
        })?;
        let coeffs = (0..k).map(|i| n.pow((k - 1 - i) as u32)).collect();
        Ok(KmerCodec {
            num_states,
            k,
            capacity,
            coeffs,
        })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// `num_states^k`, the length of the index space.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Encode a window of k state indices into its 1D index.
    ///
    /// Callers guarantee every `window[i] < num_states` (the counting engine
    /// pre-filters windows touching a non-canonical position).
    #[inline]
    pub fn encode(&self, window: &[u8]) -> u64 {
        debug_assert_eq!(window.len(), self.k);
        let mut index = 0u64;
        for (&digit, &coeff) in window.iter().zip(&self.coeffs) {
            debug_assert!((digit as usize) < self.num_states);
            index += digit as u64 * coeff;
        }
        index
    }

    /// Decode a 1D index back into k state indices, most significant first.
    /// An index outside `[0, capacity)` was not produced by a valid encoding.
    pub fn decode(&self, index: u64) -> Result<Vec<u8>, EngineError> {
        if index >= self.capacity {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.capacity,
            });
        }
        let mut window = Vec::with_capacity(self.k);
        let mut remainder = index;
        for &coeff in &self.coeffs {
            let digit = remainder / coeff;
            remainder %= coeff;
            if digit as usize >= self.num_states {
                return Err(EngineError::IndexOutOfRange {
                    index,
                    len: self.capacity,
                });
            }
            window.push(digit as u8);
        }
        Ok(window)
    }

    /// Recover literal k-mer windows for a batch of indices, e.g. to report
    /// which words dominate a divergence signal.
    pub fn decode_to_symbols(
        &self,
        indices: &[u64],
        alphabet: &Alphabet,
    ) -> Result<Vec<Vec<u8>>, EngineError> {
        if alphabet.num_states() != self.num_states {
            return Err(EngineError::InvalidAlphabet(format!(
                "alphabet has {} states, codec expects {}",
                alphabet.num_states(),
                self.num_states
            )));
        }
        indices
            .iter()
            .map(|&index| {
                let window = self.decode(index)?;
                Ok(window
                    .iter()
                    .map(|&d| alphabet.states()[d as usize])
                    .collect())
            })
            .collect()
    }
}
