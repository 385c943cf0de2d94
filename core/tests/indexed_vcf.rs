use std::{
    error::Error,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use noodles::{bgzf, tabix, vcf};

use hapseq_core::{
    resolve::{self, find_sample},
    Coordinate, Policy, ResolveError, Resolver, Sequence, VariantIndex,
};

const VCF: &str = "##fileformat=VCFv4.3
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
##contig=<ID=1>
##contig=<ID=2>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample0\tsample1
1\t100\trs100\tG\tA\t.\t.\t.\tGT\t0|1\t1/1
1\t103\t.\tT\t.\t.\t.\t.\tGT\t0/0\t./.
1\t105\trs105\tC\tT,G\t.\t.\t.\tGT\t2|.\t0/1
";

const VCF_WITHOUT_CONTIGS: &str = "##fileformat=VCFv4.3
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample0
1\t100\trs100\tG\tA\t.\t.\t.\tGT\t0|1
";

fn write_indexed_vcf(dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    write_indexed(dir, "calls.vcf.gz", VCF)
}

fn write_indexed(dir: &Path, name: &str, src: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);

    {
        let mut writer = bgzf::Writer::new(File::create(&path)?);
        writer.write_all(src.as_bytes())?;
    }

    let index = vcf::fs::index(&path)?;
    tabix::fs::write(dir.join(format!("{name}.tbi")), &index)?;

    Ok(path)
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_resolve_tolerant() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed_vcf(dir.path())?;

    let genotypes = Resolver::default().resolve_path(&path, 0, &["1:99-110".parse()?])?;

    assert_eq!(genotypes.sample_name(), "sample0");

    let positions: Vec<_> = genotypes.iter().map(|call| call.position).collect();
    assert_eq!(positions, vec![100, 103, 105]);

    let calls = genotypes.calls();
    assert_eq!(calls[0].variant_id, "rs100");
    assert_eq!(calls[0].all_alleles, strings(&["G", "A"]));
    assert_eq!(calls[0].alleles_called, strings(&["G", "A"]));
    assert_eq!(calls[1].all_alleles, strings(&["T"]));
    assert_eq!(calls[1].alleles_called, strings(&["T", "T"]));
    assert_eq!(calls[2].all_alleles, strings(&["C", "T", "G"]));
    assert_eq!(calls[2].alleles_called, strings(&["G", "."]));

    Ok(())
}

#[test]
fn test_resolve_strict() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed_vcf(dir.path())?;

    let resolver = Resolver::default().set_policy(Policy::Strict);

    let genotypes = resolver.resolve_path(&path, 1, &["1:99-100".parse()?, "1:102-103".parse()?])?;
    assert_eq!(genotypes.sample_name(), "sample1");
    assert_eq!(genotypes.calls()[0].alleles_called, strings(&["A", "A"]));
    assert_eq!(genotypes.calls()[1].alleles_called, strings(&[".", "."]));

    let result = resolver.resolve_path(&path, 1, &["1:99-100".parse()?, "1:200-300".parse()?]);
    assert!(matches!(result, Err(ResolveError::MissingRecord { .. })));

    Ok(())
}

#[test]
fn test_resolve_unknown_contig() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed_vcf(dir.path())?;

    let genotypes = Resolver::default().resolve_path(&path, 0, &["3:0-1000".parse()?])?;

    assert!(genotypes.is_empty());

    Ok(())
}

#[test]
fn test_resolve_declared_contig_without_records() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed_vcf(dir.path())?;

    let locations: [Coordinate; 1] = ["2:0-1000".parse()?];

    let genotypes = Resolver::default().resolve_path(&path, 0, &locations)?;
    assert!(genotypes.is_empty());
    assert_eq!(genotypes.sample_name(), "sample0");

    let result = Resolver::default()
        .set_policy(Policy::Strict)
        .resolve_path(&path, 0, &locations);
    assert!(matches!(
        result,
        Err(ResolveError::MissingRecord { coordinate }) if coordinate == locations[0]
    ));

    Ok(())
}

#[test]
fn test_resolve_header_without_contigs() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed(dir.path(), "no_contigs.vcf.gz", VCF_WITHOUT_CONTIGS)?;

    let resolver = Resolver::default();

    let genotypes = resolver.resolve_path(&path, 0, &["2:0-1000".parse()?])?;
    assert!(genotypes.is_empty());

    let genotypes = resolver.resolve_path(&path, 0, &["1:99-100".parse()?])?;
    assert_eq!(genotypes.calls()[0].alleles_called, strings(&["G", "A"]));

    Ok(())
}

#[test]
fn test_resolve_sample_by_name() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed_vcf(dir.path())?;

    let mut index = resolve::open(&path)?;
    assert_eq!(index.samples().len(), 2);

    let sample_index = find_sample(&index, "sample1")?;
    let genotypes = Resolver::default().resolve(&mut index, sample_index, &["1:104-105".parse()?])?;

    assert_eq!(genotypes.calls()[0].alleles_called, strings(&["C", "T"]));

    Ok(())
}

#[test]
fn test_reconstruct() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = write_indexed_vcf(dir.path())?;

    let range: Coordinate = "1:99-105".parse()?;
    let genotypes = Resolver::default().resolve_path(&path, 0, &[range.clone()])?;

    let sequence = Sequence::reconstruct(&genotypes, &range)?;

    assert_eq!(sequence.start, 100);
    assert_eq!(sequence.end, 105);
    assert_eq!(sequence.reference, strings(&["G", "N", "N", "T", "N", "C"]));
    assert_eq!(sequence.haplotype1, strings(&["G", "N", "N", "T", "N", "G"]));
    assert_eq!(sequence.haplotype2, strings(&["A", "N", "N", "T", "N", "."]));

    Ok(())
}
