//! Genomic coordinates used as query keys.

use std::{fmt, io, num::ParseIntError, str::FromStr};

/// Largest position a coordinate may refer to, the limit of tabix and CSI indexes.
pub const MAX_POSITION: usize = i32::MAX as usize;

/// A genomic interval on a single chromosome.
///
/// The interval is half-open at the start: `start` is the base immediately before the first
/// included base, so the first included 1-based position is `start + 1`, and the last is `end`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Coordinate {
    chrom: String,
    start: usize,
    end: usize,
}

impl Coordinate {
    /// Creates a new coordinate, checking that `start <= end <= MAX_POSITION`.
    pub fn new<S>(chrom: S, start: usize, end: usize) -> Result<Self, ParseCoordinateError>
    where
        S: ToString,
    {
        let chrom = chrom.to_string();

        if chrom.is_empty() {
            Err(ParseCoordinateError::EmptyChromosome)
        } else if start > end {
            Err(ParseCoordinateError::StartAfterEnd { start, end })
        } else if end > MAX_POSITION {
            Err(ParseCoordinateError::PositionOutOfRange(end))
        } else {
            Ok(Self { chrom, start, end })
        }
    }

    /// Returns the chromosome name.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Returns the half-open start.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the inclusive end.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the first included 1-based position.
    pub fn first_position(&self) -> usize {
        self.start + 1
    }

    /// Returns the last included 1-based position.
    pub fn last_position(&self) -> usize {
        self.end
    }

    /// Returns the number of bases covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if no bases are covered.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the 1-based `position` on `chrom` lies within the coordinate.
    pub fn contains(&self, chrom: &str, position: usize) -> bool {
        self.chrom == chrom && (self.first_position()..=self.last_position()).contains(&position)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Contig names may themselves contain ':', so split on the last one
        let (chrom, interval) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseCoordinateError::MissingInterval(s.to_string()))?;

        let (start, end) = interval
            .split_once('-')
            .ok_or_else(|| ParseCoordinateError::MissingInterval(s.to_string()))?;

        Self::new(chrom, parse_position(start)?, parse_position(end)?)
    }
}

fn parse_position(s: &str) -> Result<usize, ParseCoordinateError> {
    s.trim()
        .replace(',', "")
        .parse()
        .map_err(|e| ParseCoordinateError::InvalidPosition {
            position: s.to_string(),
            source: e,
        })
}

/// Reads coordinates from a BED-like regions file.
///
/// Each line should contain a tab-separated chromosome, start and end; further columns are
/// ignored. Blank lines, comments, and `track`/`browser` lines are skipped.
pub fn read_coordinates<R>(reader: R) -> io::Result<Vec<Coordinate>>
where
    R: io::BufRead,
{
    let mut coordinates = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;

        if is_skipped_line(&line) {
            continue;
        }

        let coordinate = parse_bed_line(&line).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid region on line {}: {e}", i + 1),
            )
        })?;

        coordinates.push(coordinate);
    }

    Ok(coordinates)
}

fn is_skipped_line(line: &str) -> bool {
    let line = line.trim();

    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

fn parse_bed_line(line: &str) -> Result<Coordinate, ParseCoordinateError> {
    let mut fields = line.split('\t');

    match (fields.next(), fields.next(), fields.next()) {
        (Some(chrom), Some(start), Some(end)) => {
            Coordinate::new(chrom, parse_position(start)?, parse_position(end)?)
        }
        _ => Err(ParseCoordinateError::MissingInterval(line.to_string())),
    }
}

/// An error associated with creating or parsing a coordinate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseCoordinateError {
    /// Chromosome name was empty.
    EmptyChromosome,
    /// A start or end position could not be parsed.
    InvalidPosition {
        /// The raw position.
        position: String,
        /// The underlying parse error.
        source: ParseIntError,
    },
    /// No interval was provided.
    MissingInterval(String),
    /// A position was greater than [`MAX_POSITION`].
    PositionOutOfRange(usize),
    /// Start was greater than end.
    StartAfterEnd {
        /// Start position.
        start: usize,
        /// End position.
        end: usize,
    },
}

impl fmt::Display for ParseCoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCoordinateError::EmptyChromosome => f.write_str("empty chromosome name"),
            ParseCoordinateError::InvalidPosition { position, source } => {
                write!(f, "invalid position '{position}': {source}")
            }
            ParseCoordinateError::MissingInterval(s) => {
                write!(f, "expected region as 'chrom:start-end', found '{s}'")
            }
            ParseCoordinateError::PositionOutOfRange(position) => {
                write!(f, "position {position} exceeds maximum {MAX_POSITION}")
            }
            ParseCoordinateError::StartAfterEnd { start, end } => {
                write!(f, "region start {start} is greater than end {end}")
            }
        }
    }
}

impl std::error::Error for ParseCoordinateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseCoordinateError::InvalidPosition { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() -> Result<(), ParseCoordinateError> {
        let coordinate = Coordinate::new("1", 99, 105)?;

        assert_eq!(coordinate.first_position(), 100);
        assert_eq!(coordinate.last_position(), 105);
        assert_eq!(coordinate.len(), 6);
        assert!(!coordinate.is_empty());

        assert!(coordinate.contains("1", 100));
        assert!(coordinate.contains("1", 105));
        assert!(!coordinate.contains("1", 99));
        assert!(!coordinate.contains("1", 106));
        assert!(!coordinate.contains("2", 100));

        Ok(())
    }

    #[test]
    fn test_start_after_end() {
        assert_eq!(
            Coordinate::new("1", 101, 100),
            Err(ParseCoordinateError::StartAfterEnd {
                start: 101,
                end: 100
            })
        );
    }

    #[test]
    fn test_position_out_of_range() -> Result<(), ParseCoordinateError> {
        let coordinate = Coordinate::new("1", MAX_POSITION, MAX_POSITION)?;
        assert!(coordinate.is_empty());

        assert_eq!(
            Coordinate::new("1", 0, MAX_POSITION + 1),
            Err(ParseCoordinateError::PositionOutOfRange(MAX_POSITION + 1))
        );
        assert_eq!(
            format!("1:{0}-{0}", usize::MAX).parse::<Coordinate>(),
            Err(ParseCoordinateError::PositionOutOfRange(usize::MAX))
        );

        Ok(())
    }

    #[test]
    fn test_empty_coordinate() -> Result<(), ParseCoordinateError> {
        let coordinate = Coordinate::new("1", 100, 100)?;

        assert!(coordinate.is_empty());
        assert_eq!(coordinate.len(), 0);

        Ok(())
    }

    #[test]
    fn test_from_str() -> Result<(), ParseCoordinateError> {
        assert_eq!("1:99-100".parse::<Coordinate>()?, Coordinate::new("1", 99, 100)?);
        assert_eq!(
            "chr2:1,000-2,000".parse::<Coordinate>()?,
            Coordinate::new("chr2", 1000, 2000)?
        );
        assert_eq!(
            "HLA-A*01:01:0-10".parse::<Coordinate>()?,
            Coordinate::new("HLA-A*01:01", 0, 10)?
        );

        Ok(())
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(matches!(
            "chr1".parse::<Coordinate>(),
            Err(ParseCoordinateError::MissingInterval(_))
        ));
        assert!(matches!(
            "chr1:100".parse::<Coordinate>(),
            Err(ParseCoordinateError::MissingInterval(_))
        ));
        assert!(matches!(
            "chr1:a-100".parse::<Coordinate>(),
            Err(ParseCoordinateError::InvalidPosition { .. })
        ));
        assert!(matches!(
            ":1-100".parse::<Coordinate>(),
            Err(ParseCoordinateError::EmptyChromosome)
        ));
    }

    #[test]
    fn test_display_from_str_agree() -> Result<(), ParseCoordinateError> {
        let coordinate = Coordinate::new("chrX", 5, 17)?;

        assert_eq!(coordinate.to_string(), "chrX:5-17");
        assert_eq!(coordinate.to_string().parse::<Coordinate>()?, coordinate);

        Ok(())
    }

    #[test]
    fn test_read_coordinates() -> Result<(), Box<dyn std::error::Error>> {
        let src = b"track name=test
# comment
1\t99\t100\tsnp1

2\t0\t10
";

        let coordinates = read_coordinates(&src[..])?;

        assert_eq!(
            coordinates,
            vec![Coordinate::new("1", 99, 100)?, Coordinate::new("2", 0, 10)?]
        );

        Ok(())
    }

    #[test]
    fn test_read_coordinates_invalid_line() {
        let src = b"1\t99\t100\n1\t100\n";

        let result = read_coordinates(&src[..]);

        let error = result.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert!(error.to_string().contains("line 2"));
    }
}
