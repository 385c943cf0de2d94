use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Error};

use clap::Args;
use serde::Serialize;

use hapseq_core::{index::IndexedVcf, resolve, Policy};

/// Sample selection, by position or by name.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SampleArgs {
    /// Zero-based index of the sample in the input header.
    #[arg(short = 'i', long, value_name = "INT")]
    pub sample_index: Option<usize>,

    /// Name of the sample in the input header.
    #[arg(short = 'n', long, value_name = "NAME")]
    pub sample_name: Option<String>,
}

impl SampleArgs {
    /// Opens the indexed input and finds the selected sample in it.
    pub fn open<P>(&self, path: P) -> Result<(IndexedVcf, usize), Error>
    where
        P: AsRef<Path>,
    {
        let index = resolve::open(path)?;

        let sample_index = match (self.sample_index, &self.sample_name) {
            (Some(sample_index), _) => sample_index,
            (None, Some(name)) => resolve::find_sample(&index, name)?,
            (None, None) => bail!("no sample selected"),
        };

        Ok((index, sample_index))
    }
}

/// Resolution and output options.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Require exactly one record per region.
    ///
    /// By default, every record overlapping a region is used, and regions without records are
    /// skipped. Using this flag, only the first record in each region is used, and a region
    /// without records is an error.
    #[arg(long)]
    pub strict: bool,

    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,

    /// Output path.
    ///
    /// If no path is given, output will be written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    pub fn policy(&self) -> Policy {
        if self.strict {
            Policy::Strict
        } else {
            Policy::Tolerant
        }
    }

    pub fn write<T>(&self, value: &T) -> Result<(), Error>
    where
        T: Serialize,
    {
        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(io::BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file '{}'", path.display())
            })?)),
            None => Box::new(io::stdout().lock()),
        };

        write_json(writer, value, self.compact)
    }
}

fn write_json<W, T>(mut writer: W, value: &T, compact: bool) -> Result<(), Error>
where
    W: Write,
    T: Serialize,
{
    if compact {
        serde_json::to_writer(&mut writer, value)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, value)?;
    }

    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
