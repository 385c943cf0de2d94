#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Genotype extraction and haplotype reconstruction from indexed VCF.
//!
//! This serves as the core library implementation for the `hapseq` CLI, but can also be used as
//! a free-standing library.
//!
//! # Overview
//!
//! A [`Resolver`] queries a [`VariantIndex`] for a list of [`Coordinate`]s and resolves the
//! genotype of one sample in every matching record into a [`GenotypeCall`], collected in a
//! [`SampleGenotypes`]. A [`Sequence`] can then be reconstructed from those calls, giving the
//! reference and the two haplotypes over a single range.
//!
//! # Example
//!
//! ```no_run
//! use hapseq_core::{Coordinate, Policy, Resolver, Sequence};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let range: Coordinate = "1:99-105".parse()?;
//!
//! let genotypes = Resolver::default()
//!     .set_policy(Policy::Tolerant)
//!     .resolve_path("calls.vcf.gz", 0, &[range.clone()])?;
//!
//! let sequence = Sequence::reconstruct(&genotypes, &range)?;
//!
//! println!("{}", sequence.haplotype1_string());
//! # Ok(())
//! # }
//! ```

pub mod coordinate;
pub use coordinate::Coordinate;

pub mod genotype;
pub use genotype::{GenotypeCall, SampleGenotypes};

pub mod index;
pub use index::VariantIndex;

pub mod resolve;
pub use resolve::{Policy, ResolveError, Resolver};

pub mod sequence;
pub use sequence::{ReconstructError, Sequence};
