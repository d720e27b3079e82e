//! Canonical alphabet: an ordered symbol set plus a fast ASCII→index mapping.
//!
//! The symbol→index bijection is positional: the state at position `i` of the
//! ordered set maps to index `i`, so indices are sequential over
//! `0..num_states` by construction. Bytes outside the set map to
//! [`NON_CANONICAL`].

use crate::error::EngineError;

/// Sentinel emitted for bytes outside the canonical set (ambiguity codes,
/// gaps). Always `>= num_states`, so downstream window scans can test
/// canonicity with a single comparison.
pub const NON_CANONICAL: u8 = 0xFF;

/// Ordered canonical symbol set with a 256-entry lookup table.
#[derive(Debug, Clone)]
pub struct Alphabet {
    states: Vec<u8>,
    lut: [u8; 256],
}

impl Alphabet {
    /// Validate an ordered state set supplied by the alphabet provider.
    ///
    /// Rejects an empty set, duplicated symbols, and sets too large to leave
    /// the sentinel value free.
    pub fn new(ordered_states: &[u8]) -> Result<Self, EngineError> {
        if ordered_states.is_empty() {
            return Err(EngineError::InvalidAlphabet(
                "no canonical states".into(),
            ));
        }
        if ordered_states.len() >= NON_CANONICAL as usize {
            return Err(EngineError::InvalidAlphabet(format!(
                "{} states leave no room for the non-canonical sentinel",
                ordered_states.len()
            )));
        }

        let mut lut = [NON_CANONICAL; 256];
        for (i, &s) in ordered_states.iter().enumerate() {
            if lut[s as usize] != NON_CANONICAL {
                return Err(EngineError::InvalidAlphabet(format!(
                    "duplicated state {:?}",
                    s as char
                )));
            }
            lut[s as usize] = i as u8;
        }
        // Alias the other ASCII case when it is not itself a state.
        for (i, &s) in ordered_states.iter().enumerate() {
            if s.is_ascii_alphabetic() {
                let other = s ^ 0x20;
                if lut[other as usize] == NON_CANONICAL {
                    lut[other as usize] = i as u8;
                }
            }
        }

        Ok(Alphabet {
            states: ordered_states.to_vec(),
            lut,
        })
    }

    /// The canonical DNA alphabet (A, C, G, T).
    pub fn dna() -> Self {
        Self::new(b"ACGT").expect("ACGT is a valid state set")
    }

    /// Number of canonical states.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// The ordered state set.
    #[inline]
    pub fn states(&self) -> &[u8] {
        &self.states
    }

    /// Literal symbol for a state index, if in range.
    #[inline]
    pub fn symbol(&self, index: u8) -> Option<u8> {
        self.states.get(index as usize).copied()
    }

    /// State index for a byte, or `None` for a non-canonical byte.
    #[inline]
    pub fn index_of(&self, byte: u8) -> Option<u8> {
        let v = self.lut[byte as usize];
        (v != NON_CANONICAL).then_some(v)
    }

    /// Map a raw sequence to per-position state indices. Non-canonical bytes
    /// become [`NON_CANONICAL`]; output length equals input length.
    pub fn encode_seq(&self, seq: &[u8]) -> Vec<u8> {
        seq.iter().map(|&b| self.lut[b as usize]).collect()
    }
}
