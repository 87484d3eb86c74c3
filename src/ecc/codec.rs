//! Systematic encoder and step-by-step syndrome decoder.
//!
//! Encoding copies the message into the first `k` positions and appends
//! `m * G`. Decoding is a hill climb over single-bit flips guided by the
//! coset leader table: a flip is kept only when it strictly lowers the
//! leader weight of the syndrome, and the search stops at the first vector
//! with a zero syndrome.

use crate::ecc::bits::{self, BitVector};
use crate::ecc::code::CodeParameters;
use crate::ecc::syndrome_table::CosetLeaderTable;
use crate::ecc::{Error, Result};
use bitvec::prelude::*;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::Arc;

/// Encodes a `k`-bit message into an `n`-bit codeword.
///
/// # Arguments
///
/// * `message` - Message of exactly `k` bits
/// * `params` - Code to encode with
///
/// # Returns
///
/// The codeword `[message | message * G]`
pub fn encode(message: &BitSlice<u8, Msb0>, params: &CodeParameters) -> Result<BitVector> {
    params.check_length(message, params.k(), "Message")?;
    let codeword = params.encode_word(bits::pack(message));
    Ok(bits::unpack(codeword, params.n()))
}

/// Decodes a received `n`-bit vector to a vector with zero syndrome.
///
/// When the channel introduced at most `params.correction_radius()` errors
/// the result is the transmitted codeword. With more errors the result is
/// still a codeword, but possibly a different one.
///
/// # Errors
///
/// `InvalidInput` for a vector of the wrong length, `InvariantViolation` if
/// the table does not belong to the code or turns out to be incomplete.
pub fn decode(
    received: &BitSlice<u8, Msb0>,
    table: &CosetLeaderTable,
    params: &CodeParameters,
) -> Result<BitVector> {
    params.check_length(received, params.n(), "Received vector")?;
    check_table(table, params)?;
    let corrected = decode_word(bits::pack(received), table, params)?;
    Ok(bits::unpack(corrected, params.n()))
}

/// Syndrome of an `n`-bit vector, `[G^T | I] * v`.
pub fn syndrome_of(vector: &BitSlice<u8, Msb0>, params: &CodeParameters) -> Result<BitVector> {
    params.syndrome_of(vector)
}

/// The message part (first `k` bits) of a codeword.
pub fn message_of(codeword: &BitSlice<u8, Msb0>, params: &CodeParameters) -> Result<BitVector> {
    params.check_length(codeword, params.n(), "Codeword")?;
    Ok(codeword[..params.k()].to_bitvec())
}

fn check_table(table: &CosetLeaderTable, params: &CodeParameters) -> Result<()> {
    if table.n() != params.n() || table.redundancy() != params.redundancy() {
        return Err(Error::InvariantViolation(format!(
            "Decoding table for n={}, n-k={} used with a code of n={}, n-k={}",
            table.n(),
            table.redundancy(),
            params.n(),
            params.redundancy()
        )));
    }
    Ok(())
}

fn decode_word(mut word: u64, table: &CosetLeaderTable, params: &CodeParameters) -> Result<u64> {
    let mut best = table.weight_of(params.syndrome_word(word))?;
    if best == 0 {
        return Ok(word);
    }

    // Every accepted flip lowers the weight by one and takes at most n steps
    // to find, and the weight never exceeds n - k
    let n = params.n();
    let max_steps = n * n;
    let mut cursor = 0;

    for step in 0..max_steps {
        word ^= 1u64 << cursor;
        let weight = table.weight_of(params.syndrome_word(word))?;

        if weight == 0 {
            trace!("Decoded after {} steps", step + 1);
            return Ok(word);
        }

        if weight < best {
            best = weight;
        } else {
            word ^= 1u64 << cursor;
        }
        cursor = (cursor + 1) % n;
    }

    Err(Error::InvariantViolation(format!(
        "Decoding did not reach a codeword within {} steps (leader weight stuck at {})",
        max_steps, best
    )))
}

/// A code together with its decoding table.
///
/// Both halves are immutable and reference counted, so a `Codec` is cheap to
/// clone and can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct Codec {
    params: Arc<CodeParameters>,
    table: Arc<CosetLeaderTable>,
}

impl Codec {
    /// Builds the decoding table for `params` and wraps both.
    pub fn new(params: CodeParameters) -> Result<Self> {
        let table = Arc::new(CosetLeaderTable::build(&params)?);
        debug!(
            "Codec ready: [{}, {}] code, rate {:.3}, {} syndromes",
            params.n(),
            params.k(),
            params.rate(),
            table.len()
        );
        Ok(Codec {
            params: Arc::new(params),
            table,
        })
    }

    /// Pairs an existing table with its code.
    pub fn from_parts(params: Arc<CodeParameters>, table: Arc<CosetLeaderTable>) -> Result<Self> {
        check_table(&table, &params)?;
        Ok(Codec { params, table })
    }

    /// Code parameters
    pub fn params(&self) -> &Arc<CodeParameters> {
        &self.params
    }

    /// Decoding table
    pub fn table(&self) -> &Arc<CosetLeaderTable> {
        &self.table
    }

    /// Encodes a `k`-bit message
    pub fn encode(&self, message: &BitSlice<u8, Msb0>) -> Result<BitVector> {
        encode(message, &self.params)
    }

    /// Decodes an `n`-bit received vector
    pub fn decode(&self, received: &BitSlice<u8, Msb0>) -> Result<BitVector> {
        decode(received, &self.table, &self.params)
    }

    /// Syndrome of an `n`-bit vector
    pub fn syndrome_of(&self, vector: &BitSlice<u8, Msb0>) -> Result<BitVector> {
        self.params.syndrome_of(vector)
    }

    /// Message part of a decoded codeword
    pub fn message_of(&self, codeword: &BitSlice<u8, Msb0>) -> Result<BitVector> {
        message_of(codeword, &self.params)
    }

    /// Decodes many received vectors in parallel, preserving their order.
    pub fn decode_batch(&self, received: &[BitVector]) -> Result<Vec<BitVector>> {
        received.par_iter().map(|vector| self.decode(vector)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn example_codec() -> Codec {
        let params =
            CodeParameters::from_rows(3, 6, &[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]], 0.1)
                .unwrap();
        Codec::new(params).unwrap()
    }

    fn all_messages(k: usize) -> impl Iterator<Item = BitVector> {
        (0..(1u64 << k)).map(move |m| bits::unpack(m, k))
    }

    /// Every set of `weight` distinct positions below `n`.
    fn combinations_of_weight(n: usize, weight: usize) -> Vec<Vec<usize>> {
        (0..(1u64 << n))
            .filter(|w| w.count_ones() as usize == weight)
            .map(|w| (0..n).filter(|&i| (w >> i) & 1 == 1).collect())
            .collect()
    }

    #[test]
    fn test_encode_example() {
        let codec = example_codec();
        let codeword = codec.encode(&bitvec![u8, Msb0; 1, 0, 1]).unwrap();
        assert_eq!(codeword, bitvec![u8, Msb0; 1, 0, 1, 0, 1, 1]);
        assert_eq!(codec.message_of(&codeword).unwrap(), bitvec![u8, Msb0; 1, 0, 1]);
    }

    #[test]
    fn test_decode_example_single_error() {
        let codec = example_codec();
        let received = bitvec![u8, Msb0; 0, 0, 1, 0, 1, 1];
        assert_eq!(
            codec.decode(&received).unwrap(),
            bitvec![u8, Msb0; 1, 0, 1, 0, 1, 1]
        );
    }

    #[test]
    fn test_encoded_words_are_distinct_codewords() {
        let codec = example_codec();
        let codewords: Vec<BitVector> = all_messages(3)
            .map(|m| codec.encode(&m).unwrap())
            .collect();

        for (i, c) in codewords.iter().enumerate() {
            assert!(codec.syndrome_of(c).unwrap().not_any());
            assert!(codewords[i + 1..].iter().all(|other| other != c));
        }
    }

    #[test]
    fn test_decode_without_errors_is_identity() {
        let codec = example_codec();
        for message in all_messages(3) {
            let codeword = codec.encode(&message).unwrap();
            assert_eq!(codec.decode(&codeword).unwrap(), codeword);
        }
    }

    #[test]
    fn test_decode_corrects_within_radius() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        // Repetition code and a few random codes with radius >= 1
        let mut codes = vec![CodeParameters::from_rows(1, 7, &[vec![1; 6]], 0.1).unwrap()];
        while codes.len() < 4 {
            let candidate = CodeParameters::random(4, 11, 0.1, &mut rng).unwrap();
            if candidate.correction_radius() >= 1 {
                codes.push(candidate);
            }
        }

        for params in codes {
            let codec = Codec::new(params).unwrap();
            let n = codec.params().n();
            let k = codec.params().k();
            let radius = codec.params().correction_radius();

            for _ in 0..8 {
                let message = bits::unpack(rng.gen::<u64>(), k);
                let codeword = codec.encode(&message).unwrap();
                for weight in 1..=radius {
                    for positions in combinations_of_weight(n, weight) {
                        let mut received = codeword.clone();
                        for &p in &positions {
                            let flipped = !received[p];
                            received.set(p, flipped);
                        }
                        assert_eq!(codec.decode(&received).unwrap(), codeword);
                    }
                }
            }
        }
    }

    #[test]
    fn test_decode_always_reaches_a_codeword() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let params = CodeParameters::random(5, 12, 0.1, &mut rng).unwrap();
        let codec = Codec::new(params).unwrap();

        for word in 0..(1u64 << 12) {
            let received = bits::unpack(word, 12);
            let decoded = codec.decode(&received).unwrap();
            assert!(codec.syndrome_of(&decoded).unwrap().not_any());

            // The removed error pattern is a coset leader
            let syndrome = codec.syndrome_of(&received).unwrap();
            let distance = bits::hamming_distance(&received, &decoded).unwrap();
            assert_eq!(distance, codec.table().leader_weight(&syndrome).unwrap());
        }
    }

    #[test]
    fn test_foreign_table_hits_step_cap() {
        // A table of the right shape but for another code misguides the
        // climb; decoding must then end on a codeword or report the cap
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        let mut capped = 0;

        for _ in 0..10 {
            let own = CodeParameters::random(4, 10, 0.1, &mut rng).unwrap();
            let foreign = CodeParameters::random(4, 10, 0.1, &mut rng).unwrap();
            if own.generator() == foreign.generator() {
                continue;
            }
            let foreign_table = CosetLeaderTable::build(&foreign).unwrap();

            for word in 0..(1u64 << 10) {
                let received = bits::unpack(word, 10);
                match decode(&received, &foreign_table, &own) {
                    Ok(decoded) => assert!(own.is_codeword(&decoded).unwrap()),
                    Err(Error::InvariantViolation(_)) => capped += 1,
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
        }
        assert!(capped > 0);
    }

    #[test]
    fn test_decode_batch_matches_sequential() {
        let codec = example_codec();
        let received: Vec<BitVector> = (0..64u64).map(|w| bits::unpack(w, 6)).collect();
        let batch = codec.decode_batch(&received).unwrap();
        for (vector, decoded) in received.iter().zip(batch) {
            assert_eq!(codec.decode(vector).unwrap(), decoded);
        }
    }

    #[test]
    fn test_length_and_table_checks() {
        let codec = example_codec();
        assert!(matches!(
            codec.encode(&bitvec![u8, Msb0; 1, 0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            codec.decode(&bitvec![u8, Msb0; 1, 0, 1]),
            Err(Error::InvalidInput(_))
        ));

        let other = CodeParameters::from_rows(2, 6, &[vec![1, 1, 0, 1], vec![0, 1, 1, 1]], 0.1).unwrap();
        let received = bitvec![u8, Msb0; 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            decode(&received, codec.table(), &other),
            Err(Error::InvariantViolation(_))
        ));
        assert!(Codec::from_parts(Arc::new(other), codec.table().clone()).is_err());
    }
}
