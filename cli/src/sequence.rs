use std::path::PathBuf;

use anyhow::Error;

use clap::Parser;

use hapseq_core::{Coordinate, Resolver, Sequence as HaplotypeSequence};

use crate::input::{OutputArgs, SampleArgs};

/// Reconstruct the reference and haplotype sequences of a sample over a region.
#[derive(Debug, Parser)]
pub struct Sequence {
    /// Input bgzipped VCF.
    ///
    /// The file must be indexed, with a tabix or CSI index next to it.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    #[command(flatten)]
    sample: SampleArgs,

    /// Region to reconstruct.
    ///
    /// The region is given as 'chrom:start-end', where 'start' is the base before the first base
    /// included. Bases without a variant record are output as 'N'.
    #[arg(short = 'r', long, value_name = "REGION")]
    region: Coordinate,

    #[command(flatten)]
    output: OutputArgs,
}

impl Sequence {
    pub fn run(self) -> Result<(), Error> {
        let (mut index, sample_index) = self.sample.open(&self.input)?;

        let genotypes = Resolver::default()
            .set_policy(self.output.policy())
            .resolve(&mut index, sample_index, std::slice::from_ref(&self.region))?;

        let sequence = HaplotypeSequence::reconstruct(&genotypes, &self.region)?;

        self.output.write(&sequence)
    }
}
