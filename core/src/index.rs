//! Variant index adapters.
//!
//! A [`VariantIndex`] answers positional queries against a variant file, yielding one
//! [`RawRecord`] per overlapping variant. The resolver only depends on this trait, so resolution
//! is independent of the on-disk format. The noodles-backed adapter for bgzipped, indexed VCF
//! lives in [`vcf`].

use std::io;

use crate::Coordinate;

pub mod vcf;
pub use vcf::IndexedVcf;

/// A lazy sequence of records returned by a query.
pub type Records<'a> = Box<dyn Iterator<Item = io::Result<RawRecord>> + 'a>;

/// An indexed source of variant records.
///
/// The handle is released when dropped.
pub trait VariantIndex {
    /// Returns the samples in file order.
    fn samples(&self) -> &[Sample];

    /// Returns the records overlapping the coordinate.
    fn query(&mut self, coordinate: &Coordinate) -> io::Result<Records<'_>>;
}

/// A sample name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Sample(String);

impl<S> From<S> for Sample
where
    S: ToString,
{
    fn from(sample: S) -> Self {
        Self(sample.to_string())
    }
}

impl AsRef<str> for Sample {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The raw genotype of a sample, as allele indices in stored haplotype order.
///
/// A missing allele is `None`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct RawGenotype(pub Vec<Option<usize>>);

impl RawGenotype {
    /// Returns a genotype with `ploidy` missing alleles.
    pub fn missing(ploidy: usize) -> Self {
        Self(vec![None; ploidy])
    }

    /// Returns the allele indices.
    pub fn indices(&self) -> &[Option<usize>] {
        &self.0
    }
}

/// A parsed variant record, as yielded by a [`VariantIndex`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRecord {
    /// Chromosome name.
    pub chrom: String,
    /// 1-based end position of the reference allele.
    pub end: usize,
    /// Variant identifier, `.` if absent.
    pub id: String,
    /// Reference allele.
    pub reference: String,
    /// Alternate alleles in file order, possibly the single placeholder `.`.
    pub alternates: Vec<String>,
    /// Raw genotypes, indexed by sample position.
    pub genotypes: Vec<RawGenotype>,
}

impl RawRecord {
    /// Returns the raw genotype of the sample at `sample_index`, if present.
    pub fn genotype(&self, sample_index: usize) -> Option<&RawGenotype> {
        self.genotypes.get(sample_index)
    }
}
