//! Byte stream round trip.
//!
//! A byte stream is turned into bits (most significant bit first), cut into
//! `k`-bit message blocks and zero-padded to a whole number of blocks. The
//! pad count travels alongside the blocks and is stripped after reception.
//! The same blocks are sent once as they are and once encoded, through the
//! same channel, so the effect of the code can be compared.

use crate::ecc::bits::{self, BitVector};
use crate::ecc::{Codec, Error, NoisyChannel, Result};
use bitvec::prelude::*;
use log::info;
use rand::Rng;

/// A bit stream split into equally long blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStream {
    blocks: Vec<BitVector>,
    pad_bits: usize,
}

impl BlockStream {
    /// Splits a bit stream into `block_len`-bit blocks, zero-padding the last one.
    pub fn from_bits(stream: &BitSlice<u8, Msb0>, block_len: usize) -> Result<Self> {
        if block_len == 0 {
            return Err(Error::InvalidConfiguration(
                "Block length must be positive".to_string(),
            ));
        }

        let pad_bits = (block_len - stream.len() % block_len) % block_len;
        let blocks = stream
            .chunks(block_len)
            .map(|chunk| {
                let mut block = chunk.to_bitvec();
                block.resize(block_len, false);
                block
            })
            .collect();

        Ok(BlockStream { blocks, pad_bits })
    }

    /// Splits bytes into `block_len`-bit blocks.
    pub fn from_bytes(bytes: &[u8], block_len: usize) -> Result<Self> {
        Self::from_bits(&bits::bytes_to_bits(bytes), block_len)
    }

    /// The blocks, all of equal length
    pub fn blocks(&self) -> &[BitVector] {
        &self.blocks
    }

    /// Number of zero bits appended to the last block
    pub fn pad_bits(&self) -> usize {
        self.pad_bits
    }

    /// Joins received blocks and strips the padding.
    pub fn reassemble(&self, received: &[BitVector]) -> BitVector {
        let mut stream: BitVector = received.iter().flat_map(|b| b.iter().by_vals()).collect();
        let len = stream.len().saturating_sub(self.pad_bits);
        stream.truncate(len);
        stream
    }

    /// Sends every block through the channel unprotected.
    pub fn send_uncoded<R: Rng>(&self, channel: &mut NoisyChannel<R>) -> Vec<BitVector> {
        self.blocks.iter().map(|block| channel.transmit(block)).collect()
    }

    /// Encodes every block, sends it, and decodes what arrives.
    ///
    /// # Returns
    ///
    /// The decoded message blocks and the number of bits flipped by the channel
    pub fn send_coded<R: Rng>(
        &self,
        codec: &Codec,
        channel: &mut NoisyChannel<R>,
    ) -> Result<(Vec<BitVector>, usize)> {
        let mut received = Vec::with_capacity(self.blocks.len());
        let mut channel_errors = 0;
        for block in &self.blocks {
            let codeword = codec.encode(block)?;
            let arrived = channel.transmit(&codeword);
            channel_errors += bits::hamming_distance(&codeword, &arrived)?;
            received.push(arrived);
        }

        let decoded = codec
            .decode_batch(&received)?
            .iter()
            .map(|codeword| codec.message_of(codeword))
            .collect::<Result<Vec<_>>>()?;
        Ok((decoded, channel_errors))
    }
}

/// Result of one transmission of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// What arrived, padding removed
    pub bytes: Vec<u8>,
    /// Bit errors in the arrived data compared with the original
    pub bit_errors: usize,
}

/// Coded and uncoded transmission of the same stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamReport {
    /// Sent without coding
    pub uncoded: StreamOutcome,
    /// Sent encoded and decoded
    pub coded: StreamOutcome,
    /// Bits flipped by the channel during the coded transmission
    pub coded_channel_errors: usize,
    /// Padding appended to the last message block
    pub pad_bits: usize,
}

impl StreamReport {
    /// Decoded data, lossily interpreted as UTF-8
    pub fn coded_text(&self) -> String {
        String::from_utf8_lossy(&self.coded.bytes).into_owned()
    }

    /// Uncoded data, lossily interpreted as UTF-8
    pub fn uncoded_text(&self) -> String {
        String::from_utf8_lossy(&self.uncoded.bytes).into_owned()
    }
}

/// Sends a byte stream uncoded and coded through the same channel.
pub fn run_byte_stream<R: Rng>(
    data: &[u8],
    codec: &Codec,
    channel: &mut NoisyChannel<R>,
) -> Result<StreamReport> {
    let original = bits::bytes_to_bits(data);
    let stream = BlockStream::from_bits(&original, codec.params().k())?;

    let uncoded = stream.reassemble(&stream.send_uncoded(channel));
    let (decoded, coded_channel_errors) = stream.send_coded(codec, channel)?;
    let coded = stream.reassemble(&decoded);

    let report = StreamReport {
        uncoded: StreamOutcome {
            bit_errors: bits::hamming_distance(&original, &uncoded)?,
            bytes: bits::bits_to_bytes(&uncoded),
        },
        coded: StreamOutcome {
            bit_errors: bits::hamming_distance(&original, &coded)?,
            bytes: bits::bits_to_bytes(&coded),
        },
        coded_channel_errors,
        pad_bits: stream.pad_bits(),
    };

    info!(
        "Sent {} bytes in {} blocks: {} bit errors uncoded, {} of {} channel errors left after decoding",
        data.len(),
        stream.blocks().len(),
        report.uncoded.bit_errors,
        report.coded.bit_errors,
        report.coded_channel_errors
    );
    Ok(report)
}

/// Sends text uncoded and coded through the same channel.
pub fn run_text<R: Rng>(text: &str, codec: &Codec, channel: &mut NoisyChannel<R>) -> Result<StreamReport> {
    run_byte_stream(text.as_bytes(), codec, channel)
}

/// Sends raw RGB pixel data (three bytes per pixel) uncoded and coded.
pub fn run_rgb<R: Rng>(pixels: &[u8], codec: &Codec, channel: &mut NoisyChannel<R>) -> Result<StreamReport> {
    if pixels.len() % 3 != 0 {
        return Err(Error::InvalidInput(format!(
            "RGB data must hold three bytes per pixel, got {} bytes",
            pixels.len()
        )));
    }
    run_byte_stream(pixels, codec, channel)
}
