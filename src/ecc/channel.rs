//! Binary symmetric channel.
//!
//! Every symbol is flipped independently with a fixed probability `p`. The
//! channel owns its random number generator, so a channel value must not be
//! shared between threads without external synchronization; give each
//! thread its own channel (e.g. seeded differently) instead.

use crate::ecc::bits::BitVector;
use crate::ecc::{Error, Result};
use bitvec::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Bernoulli, Distribution};

/// Memoryless channel flipping each bit with probability `p`.
#[derive(Debug, Clone)]
pub struct NoisyChannel<R: Rng = ChaCha20Rng> {
    /// Flip probability
    probability: f64,
    /// Flip decision per symbol
    flip: Bernoulli,
    /// Randomness source
    rng: R,
}

impl NoisyChannel<ChaCha20Rng> {
    /// Creates a channel seeded from system entropy.
    pub fn new(probability: f64) -> Result<Self> {
        Self::with_rng(probability, ChaCha20Rng::from_entropy())
    }

    /// Creates a channel with a reproducible noise sequence.
    pub fn with_seed(probability: f64, seed: u64) -> Result<Self> {
        Self::with_rng(probability, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoisyChannel<R> {
    /// Creates a channel drawing from the given generator.
    ///
    /// # Arguments
    ///
    /// * `probability` - Flip probability in `[0, 1]`
    /// * `rng` - Randomness source
    pub fn with_rng(probability: f64, rng: R) -> Result<Self> {
        let flip = Bernoulli::new(probability).map_err(|_| {
            Error::InvalidConfiguration(format!(
                "Channel error probability must lie in [0, 1], got {}",
                probability
            ))
        })?;

        Ok(NoisyChannel {
            probability,
            flip,
            rng,
        })
    }

    /// Flip probability of the channel
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Sends a vector through the channel, returning what arrives.
    pub fn transmit(&mut self, vector: &BitSlice<u8, Msb0>) -> BitVector {
        vector
            .iter()
            .map(|bit| *bit ^ self.flip.sample(&mut self.rng))
            .collect()
    }
}

/// Sends a vector through a fresh channel with flip probability `probability`.
pub fn transmit(vector: &BitSlice<u8, Msb0>, probability: f64) -> Result<BitVector> {
    let mut channel = NoisyChannel::new(probability)?;
    Ok(channel.transmit(vector))
}
