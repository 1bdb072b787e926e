use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::models::{SeriesTable, TallyTable, Variable};
use crate::utils::constants::COL_DATE;

/// Delimited-text output for the cleaned series and the tally table.
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(self.delimiter);
        builder
    }

    pub fn write_series(&self, series: &SeriesTable, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_series_to(series, file)?;
        debug!("Wrote {} records to {}", series.len(), path.display());
        Ok(())
    }

    /// Missing values are written as empty fields.
    pub fn write_series_to<W: Write>(&self, series: &SeriesTable, writer: W) -> Result<()> {
        let mut csv_writer = self.builder().from_writer(writer);

        let mut header = vec![COL_DATE];
        header.extend(Variable::ALL.iter().map(|v| v.label()));
        csv_writer.write_record(&header)?;

        for record in series.records() {
            let mut row = vec![record.date.format("%Y-%m-%d").to_string()];
            row.extend(
                Variable::ALL
                    .iter()
                    .map(|v| record.value(*v).map(|x| x.to_string()).unwrap_or_default()),
            );
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_tally(&self, tally: &TallyTable, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_tally_to(tally, file)?;
        debug!("Wrote tally table to {}", path.display());
        Ok(())
    }

    pub fn write_tally_to<W: Write>(&self, tally: &TallyTable, writer: W) -> Result<()> {
        let mut csv_writer = self.builder().from_writer(writer);

        let mut header = vec![""];
        header.extend(Variable::ALL.iter().map(|v| v.label()));
        csv_writer.write_record(&header)?;

        for (check, row) in tally.rows() {
            let mut fields = vec![check.label().to_string()];
            fields.extend(row.iter().map(|count| count.to_string()));
            csv_writer.write_record(&fields)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
