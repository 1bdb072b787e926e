use chrono::NaiveDate;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{SeriesTable, Variable};
use crate::utils::constants::{COL_DATE, DEFAULT_BUFFER_SIZE, MISSING_TOKENS};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];
const FIELD_COUNT: usize = 1 + Variable::COUNT;

/// Reads whitespace-delimited daily records:
/// `Date Precip MaxTemp MinTemp WindSpeed`.
///
/// Values are taken as-is; the no-data sentinel is left for the checks.
pub struct ObservationReader {
    use_mmap: bool,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn read_series(&self, path: &Path) -> Result<SeriesTable> {
        debug!(
            "Reading observations from {} (mmap: {})",
            path.display(),
            self.use_mmap
        );

        let series = if self.use_mmap {
            let file = File::open(path)?;
            // SAFETY: the mapping is read-only and dropped before returning
            let mmap = unsafe { Mmap::map(&file)? };
            self.parse_bytes(&mmap)?
        } else {
            let file = File::open(path)?;
            let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            self.parse_bytes(&bytes)?
        };

        debug!("Read {} records from {}", series.len(), path.display());
        Ok(series)
    }

    /// Decode as UTF-8, falling back to Windows-1252 for legacy station files.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<SeriesTable> {
        let content: Cow<'_, str> = match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => {
                let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
                if had_errors {
                    return Err(ProcessingError::InvalidFormat(
                        "Input is neither UTF-8 nor Windows-1252 text".to_string(),
                    ));
                }
                decoded
            }
        };

        self.parse_str(&content)
    }

    pub fn parse_str(&self, content: &str) -> Result<SeriesTable> {
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut columns: [Vec<Option<f64>>; Variable::COUNT] = Default::default();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();

            // Optional header row
            if dates.is_empty() && fields[0].eq_ignore_ascii_case(COL_DATE) {
                continue;
            }

            if fields.len() < FIELD_COUNT {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Line {}: expected {} fields, found {}",
                    line_number,
                    FIELD_COUNT,
                    fields.len()
                )));
            }

            let date = parse_date(fields[0]).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Line {}: invalid date '{}'",
                    line_number, fields[0]
                ))
            })?;

            if let Some(&previous) = dates.last() {
                if date <= previous {
                    return Err(ProcessingError::DateOrder {
                        line: line_number,
                        previous,
                        current: date,
                    });
                }
            }

            for variable in Variable::ALL {
                let token = fields[1 + variable.index()];
                let value = parse_value(token).ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!(
                        "Line {}: invalid {} value '{}'",
                        line_number,
                        variable.label(),
                        token
                    ))
                })?;
                columns[variable.index()].push(value);
            }
            dates.push(date);
        }

        SeriesTable::new(dates, columns)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}

/// `Some(None)` for a missing-value token, `None` when the token is not a number
fn parse_value(token: &str) -> Option<Option<f64>> {
    if MISSING_TOKENS.contains(&token) {
        return Some(None);
    }

    let value: f64 = token.parse().ok()?;
    if value.is_finite() {
        Some(Some(value))
    } else if value.is_nan() {
        Some(None)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
1915-01-01   0.00  -4.00 -16.00  2.00
1915-01-02  -999  10.00  20.00  5.00

1915-01-03   5.00  40.00  10.00  NaN
";

    #[test]
    fn test_parse_sample() {
        let series = ObservationReader::new().parse_str(SAMPLE).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.dates()[1],
            NaiveDate::from_ymd_opt(1915, 1, 2).unwrap()
        );
        assert_eq!(
            series.column(Variable::Precipitation),
            &[Some(0.0), Some(-999.0), Some(5.0)]
        );
        assert_eq!(
            series.column(Variable::WindSpeed),
            &[Some(2.0), Some(5.0), None]
        );
    }

    #[test]
    fn test_header_and_comments_skipped() {
        let content = "# station 42\nDate Precip MaxTemp MinTemp WindSpeed\n19150101 1 2 1 1\n";
        let series = ObservationReader::new().parse_str(content).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(
            series.dates()[0],
            NaiveDate::from_ymd_opt(1915, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_short_line_is_error() {
        let result = ObservationReader::new().parse_str("1915-01-01 1.0 2.0 3.0\n");

        match result {
            Err(ProcessingError::InvalidFormat(msg)) => assert!(msg.contains("Line 1")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value_is_error() {
        let result = ObservationReader::new().parse_str("1915-01-01 1.0 warm 3.0 1.0\n");

        match result {
            Err(ProcessingError::InvalidFormat(msg)) => {
                assert!(msg.contains("Max Temp"));
                assert!(msg.contains("warm"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_date_is_error() {
        let content = "1915-01-01 1 2 1 1\n1915-01-01 1 2 1 1\n";
        let result = ObservationReader::new().parse_str(content);

        assert!(matches!(
            result,
            Err(ProcessingError::DateOrder { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let series = ObservationReader::new().parse_str("").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_windows_1252_fallback() {
        // 0xB0 is the degree sign in Windows-1252 and invalid as UTF-8
        let mut bytes = b"# temperatures in \xB0C\n".to_vec();
        bytes.extend_from_slice(b"1915-01-01 1 2 1 1\n");

        let series = ObservationReader::new().parse_bytes(&bytes).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_read_file_buffered_and_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", SAMPLE)?;

        let buffered = ObservationReader::new().read_series(temp_file.path())?;
        let mapped = ObservationReader::with_mmap(true).read_series(temp_file.path())?;

        assert_eq!(buffered, mapped);
        assert_eq!(buffered.len(), 3);
        Ok(())
    }
}
