//! Simulation of binary linear block codes over a noisy channel.
//!
//! - [`ecc`] holds the coding engine: code parameters, the coset leader
//!   table, the encoder/decoder and the binary symmetric channel.
//! - [`sim`] holds the demonstration flows and the interactive session.

pub mod ecc;
pub mod error;
pub mod sim;

pub use ecc::{
    build_decoding_table, decode, encode, syndrome_of, transmit, Codec, CodeParameters,
    CosetLeaderTable, NoisyChannel,
};
pub use error::{Error, Result};
