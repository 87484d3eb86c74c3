//! Encode, transmit and decode a single message vector.

use crate::ecc::bits::{self, BitVector};
use crate::ecc::{Codec, NoisyChannel, Result};
use bitvec::prelude::*;
use log::{info, warn};
use rand::Rng;

/// A message that has been encoded and sent, but not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorTransmission {
    /// Original `k`-bit message
    pub message: BitVector,
    /// Transmitted codeword
    pub codeword: BitVector,
    /// Vector that came out of the channel
    pub received: BitVector,
    /// Positions where the channel flipped a bit
    pub error_positions: Vec<usize>,
}

impl VectorTransmission {
    /// Number of bits flipped by the channel
    pub fn error_count(&self) -> usize {
        self.error_positions.len()
    }
}

/// Everything that happened to one message on its way through the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorRoundTrip {
    /// Original `k`-bit message
    pub message: BitVector,
    /// Transmitted codeword
    pub codeword: BitVector,
    /// Vector that came out of the channel
    pub received: BitVector,
    /// Positions where the channel flipped a bit
    pub error_positions: Vec<usize>,
    /// Vector handed to the decoder (the received one unless replaced)
    pub decoder_input: BitVector,
    /// Decoder output
    pub decoded: BitVector,
    /// Message part of the decoder output
    pub decoded_message: BitVector,
}

impl VectorRoundTrip {
    /// Number of bits flipped by the channel
    pub fn error_count(&self) -> usize {
        self.error_positions.len()
    }

    /// Whether the decoder recovered the transmitted codeword
    pub fn is_corrected(&self) -> bool {
        self.decoded == self.codeword
    }
}

/// Encodes a `k`-bit message and sends the codeword through the channel.
pub fn transmit_vector<R: Rng>(
    codec: &Codec,
    channel: &mut NoisyChannel<R>,
    message: &BitSlice<u8, Msb0>,
) -> Result<VectorTransmission> {
    let codeword = codec.encode(message)?;
    let received = channel.transmit(&codeword);
    let error_positions = bits::error_positions(&codeword, &received)?;
    Ok(VectorTransmission {
        message: message.to_bitvec(),
        codeword,
        received,
        error_positions,
    })
}

/// Decodes a transmission.
///
/// # Arguments
///
/// * `codec` - Code and decoding table
/// * `transmission` - Result of `transmit_vector`
/// * `replacement` - Optional `n`-bit vector decoded instead of what arrived,
///   for trying out hand-made corruptions
pub fn decode_transmission(
    codec: &Codec,
    transmission: VectorTransmission,
    replacement: Option<&BitSlice<u8, Msb0>>,
) -> Result<VectorRoundTrip> {
    let decoder_input = match replacement {
        Some(vector) => {
            codec.params().check_length(vector, codec.params().n(), "Replacement vector")?;
            vector.to_bitvec()
        }
        None => transmission.received.clone(),
    };
    let decoded = codec.decode(&decoder_input)?;
    let decoded_message = codec.message_of(&decoded)?;

    info!(
        "Sent {} as {}, received {} ({} errors), decoded {}",
        bits::format_bits(&transmission.message),
        bits::format_bits(&transmission.codeword),
        bits::format_bits(&transmission.received),
        transmission.error_count(),
        bits::format_bits(&decoded_message)
    );

    let VectorTransmission {
        message,
        codeword,
        received,
        error_positions,
    } = transmission;
    let round_trip = VectorRoundTrip {
        message,
        codeword,
        received,
        error_positions,
        decoder_input,
        decoded,
        decoded_message,
    };
    if !round_trip.is_corrected() {
        warn!(
            "Decoded to a different codeword {} than the one sent",
            bits::format_bits(&round_trip.decoded)
        );
    }
    Ok(round_trip)
}

/// Sends one message through the channel and decodes it.
///
/// # Arguments
///
/// * `codec` - Code and decoding table
/// * `channel` - Channel to send over
/// * `message` - `k`-bit message
/// * `replacement` - Optional `n`-bit vector decoded instead of what arrived
pub fn run_vector_round_trip<R: Rng>(
    codec: &Codec,
    channel: &mut NoisyChannel<R>,
    message: &BitSlice<u8, Msb0>,
    replacement: Option<&BitSlice<u8, Msb0>>,
) -> Result<VectorRoundTrip> {
    let transmission = transmit_vector(codec, channel, message)?;
    decode_transmission(codec, transmission, replacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::CodeParameters;

    fn example_codec() -> Codec {
        let params =
            CodeParameters::from_rows(3, 6, &[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]], 0.1)
                .unwrap();
        Codec::new(params).unwrap()
    }

    #[test]
    fn test_noiseless_round_trip() {
        let codec = example_codec();
        let mut channel = NoisyChannel::with_seed(0.0, 1).unwrap();
        let message = bitvec![u8, Msb0; 1, 0, 1];

        let result = run_vector_round_trip(&codec, &mut channel, &message, None).unwrap();
        assert_eq!(result.codeword, bitvec![u8, Msb0; 1, 0, 1, 0, 1, 1]);
        assert_eq!(result.received, result.codeword);
        assert_eq!(result.error_count(), 0);
        assert!(result.is_corrected());
        assert_eq!(result.decoded_message, message);
    }

    #[test]
    fn test_replacement_vector_is_decoded() {
        let codec = example_codec();
        let mut channel = NoisyChannel::with_seed(0.0, 1).unwrap();
        let message = bitvec![u8, Msb0; 1, 0, 1];
        let corrupted = bitvec![u8, Msb0; 0, 0, 1, 0, 1, 1];

        let result =
            run_vector_round_trip(&codec, &mut channel, &message, Some(&corrupted)).unwrap();
        assert_eq!(result.decoder_input, corrupted);
        assert_eq!(result.decoded, bitvec![u8, Msb0; 1, 0, 1, 0, 1, 1]);
        assert_eq!(result.decoded_message, message);
    }

    #[test]
    fn test_every_bit_flipped() {
        let codec = example_codec();
        let mut channel = NoisyChannel::with_seed(1.0, 1).unwrap();
        let message = bitvec![u8, Msb0; 1, 0, 1];

        let result = run_vector_round_trip(&codec, &mut channel, &message, None).unwrap();
        assert_eq!(result.error_positions, vec![0, 1, 2, 3, 4, 5]);
        // The complement of a codeword is not always a codeword, but decoding
        // still ends on one
        assert!(codec.syndrome_of(&result.decoded).unwrap().not_any());
    }

    #[test]
    fn test_two_step_flow_matches_single_call() {
        let codec = example_codec();
        let message = bitvec![u8, Msb0; 0, 1, 1];

        let mut channel = NoisyChannel::with_seed(0.3, 12).unwrap();
        let transmission = transmit_vector(&codec, &mut channel, &message).unwrap();
        assert_eq!(
            transmission.error_count(),
            bits::hamming_distance(&transmission.codeword, &transmission.received).unwrap()
        );
        let stepped = decode_transmission(&codec, transmission.clone(), None).unwrap();
        assert_eq!(stepped.received, transmission.received);
        assert_eq!(stepped.decoder_input, transmission.received);

        let mut channel = NoisyChannel::with_seed(0.3, 12).unwrap();
        let direct = run_vector_round_trip(&codec, &mut channel, &message, None).unwrap();
        assert_eq!(direct, stepped);
    }

    #[test]
    fn test_bad_lengths() {
        let codec = example_codec();
        let mut channel = NoisyChannel::with_seed(0.1, 1).unwrap();
        let message = bitvec![u8, Msb0; 1, 0];
        assert!(run_vector_round_trip(&codec, &mut channel, &message, None).is_err());

        let message = bitvec![u8, Msb0; 1, 0, 1];
        let replacement = bitvec![u8, Msb0; 1, 0, 1];
        assert!(
            run_vector_round_trip(&codec, &mut channel, &message, Some(&replacement)).is_err()
        );
    }
}
