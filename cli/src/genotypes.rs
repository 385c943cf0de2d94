use std::{fs::File, io, path::PathBuf};

use anyhow::{bail, Context, Error};

use clap::Parser;

use hapseq_core::{coordinate::read_coordinates, Coordinate, Resolver};

use crate::input::{OutputArgs, SampleArgs};

/// Extract genotype calls of a sample.
#[derive(Debug, Parser)]
pub struct Genotypes {
    /// Input bgzipped VCF.
    ///
    /// The file must be indexed, with a tabix or CSI index next to it.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    #[command(flatten)]
    sample: SampleArgs,

    /// Region to query.
    ///
    /// Regions are given as 'chrom:start-end', where 'start' is the base before the first base
    /// included. The flag can be given multiple times, and calls will be output in the order the
    /// regions are provided.
    #[arg(
        short = 'r',
        long = "region",
        required_unless_present = "regions_file",
        value_name = "REGION"
    )]
    regions: Vec<Coordinate>,

    /// Regions file.
    ///
    /// Each line should contain a tab-separated chromosome, start, and end, as in a BED file.
    #[arg(short = 'R', long, conflicts_with = "regions", value_name = "FILE")]
    regions_file: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

impl Genotypes {
    pub fn run(self) -> Result<(), Error> {
        let regions = self.regions()?;

        let (mut index, sample_index) = self.sample.open(&self.input)?;

        let genotypes = Resolver::default()
            .set_policy(self.output.policy())
            .resolve(&mut index, sample_index, &regions)?;

        self.output.write(&genotypes)
    }

    fn regions(&self) -> Result<Vec<Coordinate>, Error> {
        let regions = if let Some(path) = &self.regions_file {
            File::open(path)
                .map(io::BufReader::new)
                .and_then(read_coordinates)
                .with_context(|| format!("Failed to read regions from '{}'", path.display()))?
        } else {
            self.regions.clone()
        };

        if regions.is_empty() {
            bail!("no regions provided");
        }

        Ok(regions)
    }
}
