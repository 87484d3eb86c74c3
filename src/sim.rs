//! Demonstration flows driving the coding engine.
//!
//! The flows own everything the engine does not: splitting data into
//! message blocks, padding, comparing coded and uncoded transmission, and
//! talking to a user. The engine itself never performs I/O; the
//! interactive session reaches the outside world only through a `Console`.
//!
//! # Configuration
//!
//! `SimulationConfig` collects what a run needs. The default is the
//! `[6, 3]` code with generator rows `110`, `011`, `101` over a channel with
//! `p = 0.05`:
//!
//! ```rust
//! use syndrome_sim::sim::SimulationConfig;
//!
//! let config = SimulationConfig::default().with_seed(7);
//! let codec = config.build_codec().unwrap();
//! assert_eq!(codec.params().n(), 6);
//! ```

use crate::ecc::{Codec, CodeParameters, NoisyChannel, Result};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Interactive line-oriented front end
pub mod console;
pub use console::{Console, IoConsole, Session};

/// Image round trip
pub mod picture;
pub use picture::{comparison_paths, load_image, run_image, ImageReport};

/// Single vector round trip
pub mod round_trip;
pub use round_trip::{
    decode_transmission, run_vector_round_trip, transmit_vector, VectorRoundTrip,
    VectorTransmission,
};

/// Byte stream round trip (text and RGB pixel data)
pub mod stream;
pub use stream::{run_byte_stream, run_rgb, run_text, BlockStream, StreamOutcome, StreamReport};

/// Where the generator submatrix comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorSource {
    /// Rows given explicitly, `k` rows of `n - k` entries
    Explicit(Vec<Vec<u8>>),
    /// Uniformly random entries
    Random,
}

/// Everything needed to set up a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Message dimension
    pub k: usize,
    /// Codeword length
    pub n: usize,
    /// Generator submatrix source
    pub generator: GeneratorSource,
    /// Channel error probability
    pub error_probability: f64,
    /// Seed for the random generator submatrix and the channel noise
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            k: 3,
            n: 6,
            generator: GeneratorSource::Explicit(vec![vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]]),
            error_probability: 0.05,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Replace the code dimensions and generator
    pub fn with_code(mut self, k: usize, n: usize, generator: GeneratorSource) -> Self {
        self.k = k;
        self.n = n;
        self.generator = generator;
        self
    }

    /// Set the channel error probability
    pub fn with_error_probability(mut self, error_probability: f64) -> Self {
        self.error_probability = error_probability;
        self
    }

    /// Make random generator data and channel noise reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Creates the code parameters, drawing a random generator if asked to.
    pub fn build_parameters(&self) -> Result<CodeParameters> {
        match &self.generator {
            GeneratorSource::Explicit(rows) => {
                CodeParameters::from_rows(self.k, self.n, rows, self.error_probability)
            }
            GeneratorSource::Random => {
                let mut rng = self.rng(0);
                CodeParameters::random(self.k, self.n, self.error_probability, &mut rng)
            }
        }
    }

    /// Creates the code parameters and builds their decoding table.
    pub fn build_codec(&self) -> Result<Codec> {
        let params = self.build_parameters()?;
        info!(
            "Building decoding table for [{}, {}] code (p = {})",
            params.n(),
            params.k(),
            params.error_probability()
        );
        Codec::new(params)
    }

    /// Creates the channel the configured code is sent over.
    pub fn build_channel(&self) -> Result<NoisyChannel> {
        NoisyChannel::with_rng(self.error_probability, self.rng(1))
    }

    // Generator data and noise use separate streams of the same seed
    fn rng(&self, stream: u64) -> ChaCha20Rng {
        let mut rng = match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        rng.set_stream(stream);
        rng
    }
}
