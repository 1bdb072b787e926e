use chrono::NaiveDate;
use std::path::Path;

use crate::error::Result;
use crate::models::{SeriesTable, Variable};
use crate::writers::ParquetWriter;

/// Descriptive statistics of the present values of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub variable: Variable,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SeriesDescription {
    pub total_records: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub columns: Vec<ColumnStats>,
}

pub struct SeriesAnalyzer;

impl SeriesAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn describe(&self, series: &SeriesTable) -> SeriesDescription {
        SeriesDescription {
            total_records: series.len(),
            date_range: series.date_range(),
            columns: Variable::ALL
                .iter()
                .map(|variable| column_stats(*variable, series.column(*variable)))
                .collect(),
        }
    }

    pub fn analyze_parquet(&self, path: &Path) -> Result<SeriesDescription> {
        let series = ParquetWriter::new().read_series(path)?;
        Ok(self.describe(&series))
    }
}

impl Default for SeriesAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn column_stats(variable: Variable, column: &[Option<f64>]) -> ColumnStats {
    let mut values: Vec<f64> = column.iter().flatten().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);

    // Sample standard deviation (n - 1), undefined below two values
    let std = mean.filter(|_| count > 1).map(|mean| {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    });

    ColumnStats {
        variable,
        count,
        missing: column.len() - count,
        mean,
        std,
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

/// Linear interpolation between closest ranks; `sorted` must be ascending.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

impl SeriesDescription {
    pub fn column(&self, variable: Variable) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.variable == variable)
    }

    pub fn summary(&self) -> String {
        let date_range = match self.date_range {
            Some((start, end)) => format!("{} to {}", start, end),
            None => "empty series".to_string(),
        };

        format!("Records: {}\nDate Range: {}", self.total_records, date_range)
    }

    /// Table of statistics, one column per variable
    pub fn detailed_summary(&self) -> String {
        let mut out = format!("{}\n\n{:<8}", self.summary(), "");
        for stats in &self.columns {
            out.push_str(&format!("{:>12}", stats.variable.label()));
        }
        out.push('\n');

        type Getter = fn(&ColumnStats) -> String;
        let rows: [(&str, Getter); 9] = [
            ("count", |s: &ColumnStats| s.count.to_string()),
            ("missing", |s: &ColumnStats| s.missing.to_string()),
            ("mean", |s: &ColumnStats| fmt_stat(s.mean)),
            ("std", |s: &ColumnStats| fmt_stat(s.std)),
            ("min", |s: &ColumnStats| fmt_stat(s.min)),
            ("25%", |s: &ColumnStats| fmt_stat(s.q25)),
            ("50%", |s: &ColumnStats| fmt_stat(s.median)),
            ("75%", |s: &ColumnStats| fmt_stat(s.q75)),
            ("max", |s: &ColumnStats| fmt_stat(s.max)),
        ];

        for (label, getter) in rows {
            out.push_str(&format!("{:<8}", label));
            for stats in &self.columns {
                out.push_str(&format!("{:>12}", getter(stats)));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObservationRecord;

    fn series(values: &[Option<f64>]) -> SeriesTable {
        let start = NaiveDate::from_ymd_opt(2001, 6, 1).unwrap();
        let records = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                ObservationRecord::new(start + chrono::Duration::days(i as i64), *v, *v, None, Some(1.0))
            })
            .collect();
        SeriesTable::from_records(records).unwrap()
    }

    #[test]
    fn test_describe_statistics() {
        let description =
            SeriesAnalyzer::new().describe(&series(&[Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]));
        let precip = description.column(Variable::Precipitation).unwrap();

        assert_eq!(description.total_records, 5);
        assert_eq!(precip.count, 4);
        assert_eq!(precip.missing, 1);
        assert_eq!(precip.mean, Some(2.5));
        assert_eq!(precip.min, Some(1.0));
        assert_eq!(precip.max, Some(4.0));
        assert_eq!(precip.median, Some(2.5));
        assert_eq!(precip.q25, Some(1.75));
        assert_eq!(precip.q75, Some(3.25));

        let std = precip.std.unwrap();
        assert!((std - 1.290994).abs() < 1e-6);
    }

    #[test]
    fn test_all_missing_column() {
        let description = SeriesAnalyzer::new().describe(&series(&[Some(1.0), Some(2.0)]));
        let min_temp = description.column(Variable::MinTemp).unwrap();

        assert_eq!(min_temp.count, 0);
        assert_eq!(min_temp.missing, 2);
        assert_eq!(min_temp.mean, None);
        assert_eq!(min_temp.median, None);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let description = SeriesAnalyzer::new().describe(&series(&[Some(7.0)]));
        let precip = description.column(Variable::Precipitation).unwrap();

        assert_eq!(precip.mean, Some(7.0));
        assert_eq!(precip.std, None);
        assert_eq!(precip.q25, Some(7.0));
    }

    #[test]
    fn test_detailed_summary_layout() {
        let description = SeriesAnalyzer::new().describe(&SeriesTable::empty());
        let text = description.detailed_summary();

        assert!(text.contains("empty series"));
        assert!(text.contains("Wind Speed"));
        assert!(text.lines().any(|l| l.starts_with("count")));
        assert!(text.lines().any(|l| l.starts_with("max")));
    }

    #[test]
    fn test_analyze_parquet_matches_describe() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("series.parquet");
        let table = series(&[Some(0.5), None, Some(2.0)]);
        ParquetWriter::new().write_series(&table, &path)?;

        let analyzer = SeriesAnalyzer::new();
        let from_file = analyzer.analyze_parquet(&path)?;
        let in_memory = analyzer.describe(&table);

        assert_eq!(from_file.total_records, 3);
        assert_eq!(from_file.date_range, in_memory.date_range);
        assert_eq!(from_file.columns, in_memory.columns);
        Ok(())
    }
}
