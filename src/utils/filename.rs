use chrono::{Datelike, Local, NaiveDate};
use std::path::PathBuf;

fn date_stamp(date: NaiveDate) -> String {
    format!(
        "{:02}{:02}{:02}",
        date.year() % 100, // Last 2 digits of year
        date.month(),
        date.day()
    )
}

/// Cleaned series output: output/hydromet-qc-{YYMMDD}.parquet
pub fn generate_default_parquet_filename() -> PathBuf {
    let stamp = date_stamp(Local::now().date_naive());
    PathBuf::from("output").join(format!("hydromet-qc-{}.parquet", stamp))
}

/// Tally output: output/hydromet-qc-tally-{YYMMDD}.csv
pub fn generate_default_tally_filename() -> PathBuf {
    let stamp = date_stamp(Local::now().date_naive());
    PathBuf::from("output").join(format!("hydromet-qc-tally-{}.csv", stamp))
}
