//! Bit-vector helpers shared by the code, the channel and the simulation flows.
//!
//! Vectors are `BitVec<u8, Msb0>`. Inside the engine a vector of length
//! `n <= MAX_CODE_LENGTH` is also packed into a `u64` word where position `i`
//! of the vector is bit `i` of the word.

use crate::ecc::{Error, Result};
use bitvec::prelude::*;

/// A fixed-length vector over GF(2).
pub type BitVector = BitVec<u8, Msb0>;

/// Packs a vector into a word, position `i` becoming bit `i`.
///
/// Callers guarantee `bits.len() <= 64`.
pub fn pack(bits: &BitSlice<u8, Msb0>) -> u64 {
    bits.iter_ones().fold(0u64, |word, i| word | (1u64 << i))
}

/// Unpacks the low `len` bits of a word into a vector.
pub fn unpack(word: u64, len: usize) -> BitVector {
    (0..len).map(|i| (word >> i) & 1 == 1).collect()
}

/// Mask with the low `len` bits set.
pub(crate) fn low_mask(len: usize) -> u64 {
    if len >= 64 {
        u64::MAX
    } else {
        (1u64 << len) - 1
    }
}

/// Number of ones in the vector.
pub fn hamming_weight(bits: &BitSlice<u8, Msb0>) -> usize {
    bits.count_ones()
}

/// Number of positions at which two equally long vectors differ.
pub fn hamming_distance(a: &BitSlice<u8, Msb0>, b: &BitSlice<u8, Msb0>) -> Result<usize> {
    Ok(error_positions(a, b)?.len())
}

/// Positions (0-indexed) at which `received` differs from `sent`.
pub fn error_positions(sent: &BitSlice<u8, Msb0>, received: &BitSlice<u8, Msb0>) -> Result<Vec<usize>> {
    if sent.len() != received.len() {
        return Err(Error::InvalidInput(format!(
            "Vectors differ in length: {} and {}",
            sent.len(),
            received.len()
        )));
    }

    Ok(sent
        .iter()
        .zip(received.iter())
        .enumerate()
        .filter(|(_, (a, b))| **a != **b)
        .map(|(i, _)| i)
        .collect())
}

/// Parses a vector of exactly `len` symbols written with `0` and `1`.
///
/// Whitespace anywhere in the text is ignored, so `"1 0 1"` and `"101"` are
/// the same vector.
pub fn parse_bits(text: &str, len: usize) -> Result<BitVector> {
    let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if symbols.len() != len {
        return Err(Error::InvalidInput(format!(
            "Expected {} bits, got {}",
            len,
            symbols.len()
        )));
    }

    symbols
        .into_iter()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(Error::InvalidInput(format!(
                "Unexpected symbol '{}', only 0 and 1 are allowed",
                other
            ))),
        })
        .collect()
}

/// Renders a vector as a string of `0` and `1`.
pub fn format_bits(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

/// Expands bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> BitVector {
    BitVector::from_slice(bytes)
}

/// Packs bits into bytes, most significant bit first. A trailing partial
/// byte is zero-filled.
pub fn bits_to_bytes(bits: &BitSlice<u8, Msb0>) -> Vec<u8> {
    let mut owned = bits.to_bitvec();
    owned.set_uninitialized(false);
    owned.into_vec()
}
