//! Coset leader table ("standard array" syndrome table).
//!
//! The table maps every syndrome of a code to the minimal Hamming weight of
//! an error pattern producing it, together with one such minimal pattern
//! (the coset leader).
//!
//! Construction walks the tree of subsets of bit positions, extending a
//! vector only with positions above its highest set bit, so every non-empty
//! subset is produced exactly once. The walk is breadth-first with an
//! explicit frontier, which yields vectors in order of increasing weight and
//! lets construction stop as soon as all `2^(n-k)` syndromes are covered.
//! A stored weight is only replaced by a strictly smaller one.

use crate::ecc::bits::{self, BitVector};
use crate::ecc::code::CodeParameters;
use crate::ecc::{Error, Result};
use bitvec::prelude::*;
use log::debug;
use std::collections::VecDeque;
use std::sync::Arc;

/// A coset leader and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CosetEntry {
    weight: usize,
    leader: u64,
}

/// Syndrome to minimal coset weight table for one code.
///
/// The table is read-only once built and can be shared between threads
/// through an `Arc`.
#[derive(Debug, Clone)]
pub struct CosetLeaderTable {
    /// Codeword length the table was built for
    n: usize,
    /// Syndrome length, `n - k`
    redundancy: usize,
    /// Entry for syndrome `s` at index `s`
    entries: Vec<CosetEntry>,
}

impl CosetLeaderTable {
    /// Builds the table for the given code by exhaustive enumeration.
    ///
    /// # Returns
    ///
    /// The complete table, or an error if some syndrome cannot be reached
    pub fn build(params: &CodeParameters) -> Result<Self> {
        let n = params.n();
        let redundancy = params.redundancy();
        let size = 1usize << redundancy;

        let mut slots: Vec<Option<CosetEntry>> = vec![None; size];
        slots[params.syndrome_word(0) as usize] = Some(CosetEntry {
            weight: 0,
            leader: 0,
        });
        let mut covered = 1;
        let mut evaluated = 1usize;

        let mut frontier = VecDeque::from([0u64]);
        'walk: while let Some(word) = frontier.pop_front() {
            // Only positions above the highest set bit extend this subset
            let start = (u64::BITS - word.leading_zeros()) as usize;
            for position in start..n {
                let next = word | (1u64 << position);
                let weight = next.count_ones() as usize;
                let syndrome = params.syndrome_word(next) as usize;
                evaluated += 1;

                let improves = match slots[syndrome] {
                    None => {
                        covered += 1;
                        true
                    }
                    Some(entry) => weight < entry.weight,
                };
                if improves {
                    slots[syndrome] = Some(CosetEntry {
                        weight,
                        leader: next,
                    });
                }

                if covered == size {
                    // Everything still queued is at least this heavy
                    break 'walk;
                }
                frontier.push_back(next);
            }
        }

        let entries = slots.into_iter().collect::<Option<Vec<_>>>().ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "Only {} of {} syndromes are reachable; the parity relation is rank deficient",
                covered, size
            ))
        })?;

        debug!(
            "Built coset leader table for [{}, {}] code: {} syndromes from {} vectors",
            n,
            params.k(),
            size,
            evaluated
        );

        Ok(CosetLeaderTable {
            n,
            redundancy,
            entries,
        })
    }

    /// Number of syndromes in the table, `2^(n-k)` once built.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codeword length the table was built for
    pub fn n(&self) -> usize {
        self.n
    }

    /// Syndrome length the table was built for
    pub fn redundancy(&self) -> usize {
        self.redundancy
    }

    /// Minimal coset weight for a packed syndrome.
    pub(crate) fn weight_of(&self, syndrome: u64) -> Result<usize> {
        self.entry(syndrome).map(|entry| entry.weight)
    }

    fn entry(&self, syndrome: u64) -> Result<&CosetEntry> {
        usize::try_from(syndrome)
            .ok()
            .and_then(|index| self.entries.get(index))
            .ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "Syndrome {:#b} is missing from the coset leader table",
                    syndrome
                ))
            })
    }

    /// Minimal weight of the error patterns producing `syndrome`.
    pub fn leader_weight(&self, syndrome: &BitSlice<u8, Msb0>) -> Result<usize> {
        self.check_syndrome(syndrome)?;
        self.weight_of(bits::pack(syndrome))
    }

    /// A minimum-weight error pattern producing `syndrome`.
    pub fn coset_leader(&self, syndrome: &BitSlice<u8, Msb0>) -> Result<BitVector> {
        self.check_syndrome(syndrome)?;
        let entry = self.entry(bits::pack(syndrome))?;
        Ok(bits::unpack(entry.leader, self.n))
    }

    /// Number of coset leaders of each weight; index `w` holds the count for weight `w`.
    pub fn weight_distribution(&self) -> Vec<usize> {
        let max = self.entries.iter().map(|e| e.weight).max().unwrap_or(0);
        let mut counts = vec![0; max + 1];
        for entry in &self.entries {
            counts[entry.weight] += 1;
        }
        counts
    }

    /// Iterates over `(syndrome, weight)` pairs in syndrome order.
    pub fn iter(&self) -> impl Iterator<Item = (BitVector, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(move |(s, e)| (bits::unpack(s as u64, self.redundancy), e.weight))
    }

    fn check_syndrome(&self, syndrome: &BitSlice<u8, Msb0>) -> Result<()> {
        if syndrome.len() != self.redundancy {
            return Err(Error::InvalidInput(format!(
                "Syndrome must have {} bits, got {}",
                self.redundancy,
                syndrome.len()
            )));
        }
        Ok(())
    }
}

/// Builds the decoding table for a code and publishes it for shared use.
pub fn build_decoding_table(params: &CodeParameters) -> Result<Arc<CosetLeaderTable>> {
    CosetLeaderTable::build(params).map(Arc::new)
}
