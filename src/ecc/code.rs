//! Systematic binary linear code description.
//!
//! A code is given by its dimension `k`, length `n` and the non-identity part
//! `G` (k x (n-k)) of a systematic generator matrix `[I_k | G]`. The parity
//! data is `G` transposed, so the parity-check matrix is `[G^T | I_{n-k}]`
//! and every codeword `[m | mG]` has a zero syndrome.

use crate::ecc::bits::{self, BitVector};
use crate::ecc::{Error, Result};
use bitvec::prelude::*;
use ndarray::Array2;
use rand::Rng;

/// Largest supported codeword length. The decoding table enumerates up to
/// `2^n` vectors, so `n` is kept small.
pub const MAX_CODE_LENGTH: usize = 20;

/// Immutable description of a systematic `[n, k]` binary code.
#[derive(Debug, Clone)]
pub struct CodeParameters {
    /// Message dimension
    k: usize,
    /// Codeword length
    n: usize,
    /// Generator submatrix `G`, k rows and n-k columns
    generator: Array2<u8>,
    /// Parity submatrix `G^T`, n-k rows and k columns
    parity: Array2<u8>,
    /// Row `i` of `G` packed into a word (bit `j` is `G[i][j]`)
    generator_words: Vec<u64>,
    /// Row `i` of `G^T` packed into a word (bit `r` is `G^T[i][r]`)
    parity_words: Vec<u64>,
    /// Symbol error probability of the channel the code is designed for
    error_probability: f64,
}

impl CodeParameters {
    /// Creates a new code description.
    ///
    /// # Arguments
    ///
    /// * `k` - Message dimension, must be positive
    /// * `n` - Codeword length, `k <= n <= MAX_CODE_LENGTH`
    /// * `generator` - Generator submatrix of shape `(k, n - k)` with entries 0 or 1
    /// * `error_probability` - Channel error probability in `(0, 1)`
    ///
    /// # Returns
    ///
    /// A new `CodeParameters` instance or an error if the parameters are invalid
    pub fn new(k: usize, n: usize, generator: Array2<u8>, error_probability: f64) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidConfiguration(
                "Dimension k must be positive".to_string(),
            ));
        }

        if n < k {
            return Err(Error::InvalidConfiguration(format!(
                "Code length n ({}) must not be smaller than k ({})",
                n, k
            )));
        }

        if n > MAX_CODE_LENGTH {
            return Err(Error::InvalidConfiguration(format!(
                "Code length n ({}) exceeds the supported maximum of {}",
                n, MAX_CODE_LENGTH
            )));
        }

        if generator.dim() != (k, n - k) {
            return Err(Error::InvalidConfiguration(format!(
                "Generator submatrix must be {}x{}, got {}x{}",
                k,
                n - k,
                generator.nrows(),
                generator.ncols()
            )));
        }

        if generator.iter().any(|&entry| entry > 1) {
            return Err(Error::InvalidConfiguration(
                "Generator submatrix entries must be 0 or 1".to_string(),
            ));
        }

        if !(error_probability > 0.0 && error_probability < 1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "Error probability must lie in (0, 1), got {}",
                error_probability
            )));
        }

        let parity = generator.t().to_owned();
        let generator_words = generator
            .rows()
            .into_iter()
            .map(|row| pack_row(row.iter()))
            .collect();
        let parity_words = parity
            .rows()
            .into_iter()
            .map(|row| pack_row(row.iter()))
            .collect();

        Ok(CodeParameters {
            k,
            n,
            generator,
            parity,
            generator_words,
            parity_words,
            error_probability,
        })
    }

    /// Creates a code from generator submatrix rows.
    pub fn from_rows(k: usize, n: usize, rows: &[Vec<u8>], error_probability: f64) -> Result<Self> {
        if rows.len() != k {
            return Err(Error::InvalidConfiguration(format!(
                "Expected {} generator rows, got {}",
                k,
                rows.len()
            )));
        }

        let columns = n.saturating_sub(k);
        if let Some(row) = rows.iter().find(|row| row.len() != columns) {
            return Err(Error::InvalidConfiguration(format!(
                "Generator rows must have {} entries, got {}",
                columns,
                row.len()
            )));
        }

        let flat: Vec<u8> = rows.iter().flatten().copied().collect();
        let generator = Array2::from_shape_vec((k, columns), flat)
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;

        Self::new(k, n, generator, error_probability)
    }

    /// Creates a code with a uniformly random generator submatrix.
    pub fn random<R: Rng>(k: usize, n: usize, error_probability: f64, rng: &mut R) -> Result<Self> {
        let columns = n.saturating_sub(k);
        let generator = Array2::from_shape_fn((k, columns), |_| rng.gen_range(0..=1u8));
        Self::new(k, n, generator, error_probability)
    }

    /// Message dimension `k`
    pub fn k(&self) -> usize {
        self.k
    }

    /// Codeword length `n`
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of parity symbols, `n - k`
    pub fn redundancy(&self) -> usize {
        self.n - self.k
    }

    /// Code rate `k / n`
    pub fn rate(&self) -> f64 {
        self.k as f64 / self.n as f64
    }

    /// Generator submatrix `G`
    pub fn generator(&self) -> &Array2<u8> {
        &self.generator
    }

    /// Parity submatrix `G^T`
    pub fn parity(&self) -> &Array2<u8> {
        &self.parity
    }

    /// Channel error probability the code was configured with
    pub fn error_probability(&self) -> f64 {
        self.error_probability
    }

    /// Computes the syndrome of a length-`n` vector.
    ///
    /// For each parity row `i` this is `sum_r G^T[i][r] * v[r] + v[k + i]`
    /// modulo 2, i.e. `[G^T | I] * v`.
    pub fn syndrome_of(&self, vector: &BitSlice<u8, Msb0>) -> Result<BitVector> {
        self.check_length(vector, self.n, "Received vector")?;
        let syndrome = self.syndrome_word(bits::pack(vector));
        Ok(bits::unpack(syndrome, self.redundancy()))
    }

    /// Returns whether the vector has a zero syndrome.
    pub fn is_codeword(&self, vector: &BitSlice<u8, Msb0>) -> Result<bool> {
        self.check_length(vector, self.n, "Vector")?;
        Ok(self.syndrome_word(bits::pack(vector)) == 0)
    }

    /// Syndrome of a packed vector, packed the same way.
    pub(crate) fn syndrome_word(&self, word: u64) -> u64 {
        let message = word & bits::low_mask(self.k);
        self.parity_words
            .iter()
            .enumerate()
            .fold(0u64, |syndrome, (i, &row)| {
                let bit = ((row & message).count_ones() as u64 + (word >> (self.k + i))) & 1;
                syndrome | (bit << i)
            })
    }

    /// Systematic encoding of a packed message.
    pub(crate) fn encode_word(&self, message: u64) -> u64 {
        let message = message & bits::low_mask(self.k);
        let parity = self
            .generator_words
            .iter()
            .enumerate()
            .filter(|(i, _)| (message >> i) & 1 == 1)
            .fold(0u64, |acc, (_, &row)| acc ^ row);
        message | (parity << self.k)
    }

    /// Minimum Hamming weight over all non-zero codewords.
    ///
    /// For `n == k` every vector is a codeword and the distance is 1.
    pub fn minimum_distance(&self) -> usize {
        (1u64..(1u64 << self.k))
            .map(|message| self.encode_word(message).count_ones() as usize)
            .min()
            .unwrap_or(0)
    }

    /// Number of errors the code is guaranteed to correct, `(d - 1) / 2`.
    pub fn correction_radius(&self) -> usize {
        self.minimum_distance().saturating_sub(1) / 2
    }

    pub(crate) fn check_length(&self, vector: &BitSlice<u8, Msb0>, expected: usize, what: &str) -> Result<()> {
        if vector.len() != expected {
            return Err(Error::InvalidInput(format!(
                "{} must have {} bits, got {}",
                what,
                expected,
                vector.len()
            )));
        }
        Ok(())
    }
}

fn pack_row<'a>(row: impl Iterator<Item = &'a u8>) -> u64 {
    row.enumerate()
        .filter(|(_, entry)| **entry == 1)
        .fold(0u64, |word, (j, _)| word | (1u64 << j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn example_code() -> CodeParameters {
        CodeParameters::from_rows(3, 6, &[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]], 0.1).unwrap()
    }

    #[test]
    fn test_code_creation() {
        let code = example_code();
        assert_eq!(code.k(), 3);
        assert_eq!(code.n(), 6);
        assert_eq!(code.redundancy(), 3);
        assert!((code.rate() - 0.5).abs() < f64::EPSILON);
        assert_eq!(code.parity(), &array![[1, 0, 1], [1, 1, 0], [0, 1, 1]]);
    }

    #[test]
    fn test_invalid_parameters() {
        let rows = [vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]];

        // k must be positive
        assert!(CodeParameters::new(0, 3, Array2::zeros((0, 3)), 0.1).is_err());
        // n must not be smaller than k
        assert!(CodeParameters::new(3, 2, Array2::zeros((3, 0)), 0.1).is_err());
        // Shape mismatch
        assert!(CodeParameters::new(3, 6, Array2::zeros((3, 2)), 0.1).is_err());
        assert!(CodeParameters::from_rows(3, 6, &rows[..2], 0.1).is_err());
        assert!(CodeParameters::from_rows(2, 6, &[vec![1, 1], vec![0, 1]], 0.1).is_err());
        // Non-binary entry
        assert!(CodeParameters::from_rows(1, 3, &[vec![2, 0]], 0.1).is_err());
        // Probability outside (0, 1)
        assert!(CodeParameters::from_rows(3, 6, &rows, 0.0).is_err());
        assert!(CodeParameters::from_rows(3, 6, &rows, 1.0).is_err());
        assert!(CodeParameters::from_rows(3, 6, &rows, f64::NAN).is_err());
        // Too long for exhaustive enumeration
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(CodeParameters::random(4, MAX_CODE_LENGTH + 1, 0.1, &mut rng).is_err());
    }

    #[test]
    fn test_syndrome_of_codeword_is_zero() {
        let code = example_code();
        let codeword = bitvec![u8, Msb0; 1, 0, 1, 0, 1, 1];
        assert_eq!(code.syndrome_of(&codeword).unwrap(), bitvec![u8, Msb0; 0, 0, 0]);
        assert!(code.is_codeword(&codeword).unwrap());
    }

    #[test]
    fn test_syndrome_of_single_errors() {
        let code = example_code();

        // An error in message position r yields column r of G^T, i.e. row r of G
        let error = bitvec![u8, Msb0; 1, 0, 0, 0, 0, 0];
        assert_eq!(code.syndrome_of(&error).unwrap(), bitvec![u8, Msb0; 1, 1, 0]);

        // An error in parity position k + i yields the unit vector e_i
        let error = bitvec![u8, Msb0; 0, 0, 0, 0, 1, 0];
        assert_eq!(code.syndrome_of(&error).unwrap(), bitvec![u8, Msb0; 0, 1, 0]);

        let short = bitvec![u8, Msb0; 1, 0, 1];
        assert!(code.syndrome_of(&short).is_err());
    }

    #[test]
    fn test_every_encoded_word_has_zero_syndrome() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let code = CodeParameters::random(5, 11, 0.05, &mut rng).unwrap();
        for message in 0..(1u64 << code.k()) {
            assert_eq!(code.syndrome_word(code.encode_word(message)), 0);
        }
    }

    #[test]
    fn test_minimum_distance() {
        // Codewords: 100110, 010011, 001101, 110101, 101011, 011110, 111000
        let code = example_code();
        assert_eq!(code.minimum_distance(), 3);
        assert_eq!(code.correction_radius(), 1);

        // Repetition code of length 5
        let repetition = CodeParameters::from_rows(1, 5, &[vec![1, 1, 1, 1]], 0.1).unwrap();
        assert_eq!(repetition.minimum_distance(), 5);
        assert_eq!(repetition.correction_radius(), 2);

        // No redundancy at all
        let identity = CodeParameters::new(4, 4, Array2::zeros((4, 0)), 0.1).unwrap();
        assert_eq!(identity.minimum_distance(), 1);
        assert_eq!(identity.correction_radius(), 0);
    }

    #[test]
    fn test_random_generator_is_reproducible() {
        let mut a = ChaCha20Rng::seed_from_u64(42);
        let mut b = ChaCha20Rng::seed_from_u64(42);
        let first = CodeParameters::random(4, 9, 0.2, &mut a).unwrap();
        let second = CodeParameters::random(4, 9, 0.2, &mut b).unwrap();
        assert_eq!(first.generator(), second.generator());
        assert_eq!(first.generator().dim(), (4, 5));
    }
}
