//! Indexed VCF adapter backed by noodles.

use std::{fs::File, io, iter, path::Path};

use noodles::{
    bgzf,
    core::{Position, Region},
    csi::BinningIndex,
    vcf,
};
use vcf::variant::record::samples::{keys::key, series::Value, Sample as VcfSample};

use crate::{genotype::PLOIDY, Coordinate};

use super::{RawGenotype, RawRecord, Records, Sample, VariantIndex};

/// A bgzipped VCF with an associated tabix or CSI index.
pub struct IndexedVcf {
    inner: vcf::io::IndexedReader<bgzf::Reader<File>>,
    header: vcf::Header,
    samples: Vec<Sample>,
}

impl IndexedVcf {
    /// Opens an indexed VCF, reading the index from the associated `.tbi` or `.csi` file.
    pub fn open<P>(path: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut inner = vcf::io::indexed_reader::Builder::default().build_from_path(path)?;

        let header = inner.read_header()?;
        let samples = header
            .sample_names()
            .iter()
            .cloned()
            .map(Sample::from)
            .collect();

        Ok(Self {
            inner,
            header,
            samples,
        })
    }

    fn has_indexed_contig(&self, chrom: &str) -> bool {
        match BinningIndex::header(self.inner.index()) {
            // Contigs without records are absent from the index, even if declared in the header
            Some(header) => header.reference_sequence_names().contains(chrom.as_bytes()),
            None => true,
        }
    }
}

impl VariantIndex for IndexedVcf {
    fn samples(&self) -> &[Sample] {
        &self.samples
    }

    fn query(&mut self, coordinate: &Coordinate) -> io::Result<Records<'_>> {
        if coordinate.is_empty() || !self.has_indexed_contig(coordinate.chrom()) {
            log::debug!("No indexed bases for region {coordinate}");

            return Ok(Box::new(iter::empty()));
        }

        let region = region(coordinate)?;

        let Self { inner, header, .. } = self;
        let header = &*header;

        let query = inner.query(header, &region)?;

        Ok(Box::new(query.map(move |result| {
            result.and_then(|record| raw_record(header, &record))
        })))
    }
}

fn region(coordinate: &Coordinate) -> io::Result<Region> {
    let start = Position::try_from(coordinate.first_position())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let end = Position::try_from(coordinate.last_position())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    Ok(Region::new(coordinate.chrom(), start..=end))
}

fn raw_record(header: &vcf::Header, record: &vcf::Record) -> io::Result<RawRecord> {
    let chrom = record.reference_sequence_name().to_string();

    let start = record
        .variant_start()
        .transpose()?
        .map(usize::from)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("missing position for record on '{chrom}'"),
            )
        })?;

    let reference = to_owned_str(record.reference_bases());
    let end = start + reference.len().max(1) - 1;

    let id = match to_owned_str(record.ids()) {
        id if id.is_empty() => String::from("."),
        id => id,
    };

    let alternates = match to_owned_str(record.alternate_bases()) {
        alternates if alternates.is_empty() => Vec::new(),
        alternates => alternates.split(',').map(String::from).collect(),
    };

    let genotypes = record
        .samples()
        .iter()
        .map(|sample| raw_genotype(header, &sample))
        .collect::<io::Result<Vec<_>>>()?;

    Ok(RawRecord {
        chrom,
        end,
        id,
        reference,
        alternates,
        genotypes,
    })
}

fn raw_genotype<S>(header: &vcf::Header, sample: &S) -> io::Result<RawGenotype>
where
    S: VcfSample,
{
    let value = match sample.get(header, key::GENOTYPE).transpose()? {
        Some(Some(value)) => value,
        // Absent GT field, or an absent value
        Some(None) | None => return Ok(RawGenotype::missing(PLOIDY)),
    };

    let indices = match value {
        Value::Genotype(genotype) => genotype
            .iter()
            .map(|result| result.map(|(position, _phasing)| position))
            .collect::<io::Result<Vec<_>>>()?,
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "GT field is not a genotype",
            ))
        }
    };

    // A bare '.' stands for a missing genotype of unknown ploidy
    match &indices[..] {
        [None] => Ok(RawGenotype::missing(PLOIDY)),
        _ => Ok(RawGenotype(indices)),
    }
}

fn to_owned_str<S>(s: S) -> String
where
    S: AsRef<str>,
{
    s.as_ref().to_string()
}
