//! Binary linear block codes with syndrome-table decoding.
//!
//! This module provides the algebraic engine of the simulator:
//! - `CodeParameters`: a systematic code `[I_k | G]` and its parity relation
//! - `CosetLeaderTable`: minimal coset weight for every syndrome
//! - `Codec`: systematic encoding and step-by-step syndrome decoding
//! - `NoisyChannel`: a binary symmetric channel
//!
//! # Decoding
//!
//! The decoder never looks a full error pattern up. It flips one bit at a
//! time and keeps a flip only when the coset leader weight of the new
//! syndrome drops, stopping once the syndrome is zero. With a complete table
//! every error pattern within the correction radius is removed exactly.
//!
//! # Examples
//!
//! ```rust
//! use syndrome_sim::ecc::{bits, build_decoding_table, decode, encode, CodeParameters};
//!
//! let params = CodeParameters::from_rows(
//!     3,
//!     6,
//!     &[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]],
//!     0.1,
//! )
//! .unwrap();
//! let table = build_decoding_table(&params).unwrap();
//!
//! let codeword = encode(&bits::parse_bits("101", 3).unwrap(), &params).unwrap();
//! let mut received = codeword.clone();
//! let first = !received[0];
//! received.set(0, first);
//!
//! assert_eq!(decode(&received, &table, &params).unwrap(), codeword);
//! ```

pub use crate::error::{Error, Result};

/// Shared bit-vector helpers
pub mod bits;
pub use bits::BitVector;

/// Binary symmetric channel
pub mod channel;
pub use channel::{transmit, NoisyChannel};

/// Code description and parity relation
pub mod code;
pub use code::{CodeParameters, MAX_CODE_LENGTH};

/// Encoder and syndrome-guided decoder
pub mod codec;
pub use codec::{decode, encode, message_of, syndrome_of, Codec};

/// Coset leader weight table
pub mod syndrome_table;
pub use syndrome_table::{build_decoding_table, CosetLeaderTable};
