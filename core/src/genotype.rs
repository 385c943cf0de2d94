//! Resolved genotype calls.

use std::fmt;

use serde::Serialize;

use crate::index::{RawGenotype, RawRecord};

/// Token for an allele with a missing call.
pub const MISSING_ALLELE: &str = ".";

/// Placeholder alternate allele meaning that a record has no alternates.
pub const NO_ALTERNATE: &str = ".";

/// Number of haplotypes per sample.
pub const PLOIDY: usize = 2;

/// The alleles called for one sample at one variant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenotypeCall {
    /// Chromosome name.
    pub chrom: String,
    /// 1-based end position of the variant.
    pub position: usize,
    /// Variant identifier.
    pub variant_id: String,
    /// Alleles called, one per haplotype, in stored order.
    pub alleles_called: Vec<String>,
    /// Reference allele followed by the alternate alleles.
    pub all_alleles: Vec<String>,
    /// Reference allele.
    pub reference_allele: String,
}

impl GenotypeCall {
    /// Resolves a raw genotype against the alleles of its record.
    ///
    /// Each allele index is looked up in the reference-then-alternates allele list, and a missing
    /// index is called as [`MISSING_ALLELE`].
    pub fn try_from_raw(
        record: &RawRecord,
        genotype: &RawGenotype,
    ) -> Result<Self, AlleleIndexError> {
        let all_alleles = all_alleles(&record.reference, &record.alternates);

        let alleles_called = genotype
            .indices()
            .iter()
            .map(|index| match index {
                Some(i) => all_alleles
                    .get(*i)
                    .cloned()
                    .ok_or(AlleleIndexError {
                        index: *i,
                        alleles: all_alleles.len(),
                    }),
                None => Ok(MISSING_ALLELE.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            chrom: record.chrom.clone(),
            position: record.end,
            variant_id: record.id.clone(),
            alleles_called,
            all_alleles,
            reference_allele: record.reference.clone(),
        })
    }
}

fn all_alleles(reference: &str, alternates: &[String]) -> Vec<String> {
    let mut alleles = vec![reference.to_string()];

    match alternates {
        [alternate] if alternate == NO_ALTERNATE => (),
        alternates => alleles.extend(alternates.iter().cloned()),
    }

    alleles
}

/// An allele index that does not refer to any allele of its record.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AlleleIndexError {
    /// The offending allele index.
    pub index: usize,
    /// Number of alleles in the record.
    pub alleles: usize,
}

impl fmt::Display for AlleleIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allele index {} out of range for record with {} alleles",
            self.index, self.alleles
        )
    }
}

impl std::error::Error for AlleleIndexError {}

/// The genotype calls of a single sample, in query order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleGenotypes {
    sample_name: String,
    calls: Vec<GenotypeCall>,
}

impl SampleGenotypes {
    /// Creates an empty set of calls for a sample.
    pub fn new<S>(sample_name: S) -> Self
    where
        S: ToString,
    {
        Self {
            sample_name: sample_name.to_string(),
            calls: Vec::new(),
        }
    }

    /// Appends a call.
    pub fn add_call(&mut self, call: GenotypeCall) {
        self.calls.push(call);
    }

    /// Returns the calls in the order they were added.
    pub fn calls(&self) -> &[GenotypeCall] {
        &self.calls
    }

    /// Returns `true` if there are no calls.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Returns an iterator over the calls.
    pub fn iter(&self) -> std::slice::Iter<'_, GenotypeCall> {
        self.calls.iter()
    }

    /// Returns the number of calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns the sample name.
    pub fn sample_name(&self) -> &str {
        &self.sample_name
    }
}

impl<'a> IntoIterator for &'a SampleGenotypes {
    type Item = &'a GenotypeCall;
    type IntoIter = std::slice::Iter<'a, GenotypeCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
