//! Genotype resolution.
//!
//! A [`Resolver`] queries a [`VariantIndex`] for each requested coordinate, and resolves the
//! genotype of a single sample in every yielded record into a [`GenotypeCall`]. How records are
//! consumed is decided by the resolver's [`Policy`].

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use crate::{
    genotype::AlleleIndexError,
    index::{IndexedVcf, RawRecord, VariantIndex},
    Coordinate, GenotypeCall, SampleGenotypes,
};

/// How records yielded for a coordinate are consumed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Policy {
    /// Every record for every coordinate contributes a call, and coordinates without records
    /// contribute nothing.
    ///
    /// Suited for scanning regions that may contain any number of variants.
    #[default]
    Tolerant,
    /// Exactly one record is expected per coordinate.
    ///
    /// Only the first record contributes a call, and a coordinate without records fails the
    /// whole resolution. Suited for point lookups.
    Strict,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Tolerant => f.write_str("tolerant"),
            Policy::Strict => f.write_str("strict"),
        }
    }
}

/// Resolves the genotype calls of a sample across a list of coordinates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Resolver {
    policy: Policy,
}

impl Resolver {
    /// Resolves the calls of the sample at `sample_index` from an open index.
    ///
    /// Calls are ordered by coordinate, and within a coordinate by the order records are yielded
    /// by the index. On failure, no calls are returned.
    pub fn resolve<I>(
        &self,
        index: &mut I,
        sample_index: usize,
        locations: &[Coordinate],
    ) -> Result<SampleGenotypes, ResolveError>
    where
        I: VariantIndex + ?Sized,
    {
        if locations.is_empty() {
            return Err(ResolveError::NoLocations);
        }

        let samples = index.samples();
        let sample = samples.get(sample_index).ok_or(ResolveError::SampleIndex {
            index: sample_index,
            samples: samples.len(),
        })?;

        log::info!(
            "Resolving genotypes for sample '{}' across {} region(s) using {} policy",
            sample.as_ref(),
            locations.len(),
            self.policy,
        );

        let mut genotypes = SampleGenotypes::new(sample.as_ref());

        for coordinate in locations {
            log::debug!("Querying region {coordinate}");

            let mut records = index
                .query(coordinate)
                .map_err(|source| ResolveError::query(coordinate, source))?;

            match self.policy {
                Policy::Tolerant => {
                    for record in records {
                        let record = record.map_err(|e| ResolveError::query(coordinate, e))?;

                        genotypes.add_call(resolve_call(&record, sample_index, coordinate)?);
                    }
                }
                Policy::Strict => {
                    let record = records
                        .next()
                        .ok_or_else(|| ResolveError::MissingRecord {
                            coordinate: coordinate.clone(),
                        })?
                        .map_err(|e| ResolveError::query(coordinate, e))?;

                    genotypes.add_call(resolve_call(&record, sample_index, coordinate)?);

                    if records.next().is_some() {
                        log::warn!(
                            "Found more than one record in region {coordinate}, \
                            only the first will be used."
                        );
                    }
                }
            }
        }

        log::info!("Resolved {} genotype call(s)", genotypes.len());

        Ok(genotypes)
    }

    /// Opens the indexed VCF at `path`, resolves the calls of the sample at `sample_index`, and
    /// closes the file.
    pub fn resolve_path<P>(
        &self,
        path: P,
        sample_index: usize,
        locations: &[Coordinate],
    ) -> Result<SampleGenotypes, ResolveError>
    where
        P: AsRef<Path>,
    {
        let mut index = open(path)?;

        self.resolve(&mut index, sample_index, locations)
    }

    /// Sets the policy.
    pub fn set_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }
}

fn resolve_call(
    record: &RawRecord,
    sample_index: usize,
    coordinate: &Coordinate,
) -> Result<GenotypeCall, ResolveError> {
    let genotype = record
        .genotype(sample_index)
        .ok_or(ResolveError::SampleIndex {
            index: sample_index,
            samples: record.genotypes.len(),
        })?;

    GenotypeCall::try_from_raw(record, genotype).map_err(|source| ResolveError::AlleleIndex {
        coordinate: coordinate.clone(),
        source,
    })
}

/// Opens an indexed VCF for resolution.
pub fn open<P>(path: P) -> Result<IndexedVcf, ResolveError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    IndexedVcf::open(path).map_err(|source| ResolveError::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the position of the sample named `name` in the index.
pub fn find_sample<I>(index: &I, name: &str) -> Result<usize, ResolveError>
where
    I: VariantIndex + ?Sized,
{
    index
        .samples()
        .iter()
        .position(|sample| sample.as_ref() == name)
        .ok_or_else(|| ResolveError::UnknownSample {
            name: name.to_string(),
        })
}

/// An error associated with resolving genotypes.
#[derive(Debug)]
pub enum ResolveError {
    /// A genotype referred to an allele its record does not have.
    AlleleIndex {
        /// The coordinate being queried.
        coordinate: Coordinate,
        /// The underlying error.
        source: AlleleIndexError,
    },
    /// Strict policy found no record for a coordinate.
    MissingRecord {
        /// The coordinate without records.
        coordinate: Coordinate,
    },
    /// No coordinates were provided.
    NoLocations,
    /// The index could not be opened.
    NotFound {
        /// Path to the indexed file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// Querying the index failed.
    Query {
        /// The coordinate being queried.
        coordinate: Coordinate,
        /// The underlying error.
        source: io::Error,
    },
    /// The sample index was out of range.
    SampleIndex {
        /// The requested sample index.
        index: usize,
        /// Number of available samples.
        samples: usize,
    },
    /// No sample with the requested name.
    UnknownSample {
        /// The requested name.
        name: String,
    },
}

impl ResolveError {
    fn query(coordinate: &Coordinate, source: io::Error) -> Self {
        Self::Query {
            coordinate: coordinate.clone(),
            source,
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::AlleleIndex { coordinate, source } => {
                write!(f, "invalid genotype in region {coordinate}: {source}")
            }
            ResolveError::MissingRecord { coordinate } => {
                write!(f, "no record found in region {coordinate}")
            }
            ResolveError::NoLocations => f.write_str("no regions provided"),
            ResolveError::NotFound { path, source } => {
                write!(f, "failed to open indexed VCF '{}': {source}", path.display())
            }
            ResolveError::Query { coordinate, source } => {
                write!(f, "failed to query region {coordinate}: {source}")
            }
            ResolveError::SampleIndex { index, samples } => {
                write!(f, "sample index {index} out of range for {samples} sample(s)")
            }
            ResolveError::UnknownSample { name } => {
                write!(f, "sample name '{name}' not found in input header")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::AlleleIndex { source, .. } => Some(source),
            ResolveError::NotFound { source, .. } | ResolveError::Query { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
