//! Haplotype sequence reconstruction.

use std::fmt;

use serde::Serialize;

use crate::{genotype::PLOIDY, Coordinate, SampleGenotypes};

/// Token for a base where no variant record was observed.
pub const MISSING_BASE: &str = "N";

/// The reference and haplotype sequences of a sample over a range.
///
/// The three sequences are aligned, with index `i` holding the allele at 1-based position
/// `start + i`. Alleles are kept whole, so an element may span several bases.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    /// Chromosome name.
    pub chrom: String,
    /// First 1-based position.
    pub start: usize,
    /// Last 1-based position.
    pub end: usize,
    /// Reference alleles.
    pub reference: Vec<String>,
    /// Alleles of the first haplotype.
    pub haplotype1: Vec<String>,
    /// Alleles of the second haplotype.
    pub haplotype2: Vec<String>,
}

impl Sequence {
    /// Reconstructs the sequences implied by the calls within `range`.
    ///
    /// Positions without a call are [`MISSING_BASE`] in all three sequences. Where several calls
    /// share a position, the last one wins.
    pub fn reconstruct(
        genotypes: &SampleGenotypes,
        range: &Coordinate,
    ) -> Result<Self, ReconstructError> {
        let length = range.len();

        let mut sequence = Self {
            chrom: range.chrom().to_string(),
            start: range.first_position(),
            end: range.last_position(),
            reference: vec![MISSING_BASE.to_string(); length],
            haplotype1: vec![MISSING_BASE.to_string(); length],
            haplotype2: vec![MISSING_BASE.to_string(); length],
        };

        for call in genotypes {
            if !range.contains(&call.chrom, call.position) {
                return Err(ReconstructError::OutOfRange {
                    chrom: call.chrom.clone(),
                    position: call.position,
                    range: range.clone(),
                });
            }

            let [first, second] = &call.alleles_called[..] else {
                return Err(ReconstructError::Ploidy {
                    position: call.position,
                    alleles: call.alleles_called.len(),
                });
            };

            let offset = call.position - range.first_position();

            sequence.reference[offset].clone_from(&call.reference_allele);
            sequence.haplotype1[offset].clone_from(first);
            sequence.haplotype2[offset].clone_from(second);
        }

        Ok(sequence)
    }

    /// Returns the number of positions.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// Returns `true` if there are no positions.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Returns the reference sequence as a string.
    pub fn reference_string(&self) -> String {
        self.reference.concat()
    }

    /// Returns the first haplotype as a string.
    pub fn haplotype1_string(&self) -> String {
        self.haplotype1.concat()
    }

    /// Returns the second haplotype as a string.
    pub fn haplotype2_string(&self) -> String {
        self.haplotype2.concat()
    }
}

/// An error associated with reconstructing a sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReconstructError {
    /// A call lies outside the reconstructed range.
    OutOfRange {
        /// Chromosome of the call.
        chrom: String,
        /// Position of the call.
        position: usize,
        /// The reconstructed range.
        range: Coordinate,
    },
    /// A call is not diploid.
    Ploidy {
        /// Position of the call.
        position: usize,
        /// Number of called alleles.
        alleles: usize,
    },
}

impl fmt::Display for ReconstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructError::OutOfRange {
                chrom,
                position,
                range,
            } => write!(f, "call at {chrom}:{position} lies outside region {range}"),
            ReconstructError::Ploidy { position, alleles } => write!(
                f,
                "call at position {position} has {alleles} allele(s), expected {PLOIDY}"
            ),
        }
    }
}

impl std::error::Error for ReconstructError {}
