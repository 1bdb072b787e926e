use crate::error::{ProcessingError, Result};
use crate::models::{SeriesTable, Variable};
use crate::utils::constants::{DEFAULT_BATCH_SIZE, DEFAULT_ROW_GROUP_SIZE};
use arrow::array::*;
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the series; missing values become Parquet nulls.
    pub fn write_series(&self, series: &SeriesTable, path: &Path) -> Result<()> {
        self.write_series_batched(series, path, DEFAULT_BATCH_SIZE)
    }

    pub fn write_series_batched(
        &self,
        series: &SeriesTable,
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        let batch_size = batch_size.max(1);
        let mut start = 0;
        while start < series.len() {
            let end = (start + batch_size).min(series.len());
            let batch = self.series_to_batch(series, start..end, schema.clone())?;
            writer.write(&batch)?;
            start = end;
        }

        writer.close()?;
        debug!("Wrote {} records to {}", series.len(), path.display());
        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let mut fields = vec![Field::new("date", DataType::Date32, false)];
        fields.extend(
            Variable::ALL
                .iter()
                .map(|v| Field::new(v.column_name(), DataType::Float64, true)),
        );

        Arc::new(Schema::new(fields))
    }

    fn series_to_batch(
        &self,
        series: &SeriesTable,
        range: std::ops::Range<usize>,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let dates: Vec<i32> = series.dates()[range.clone()]
            .iter()
            .map(|d| Date32Type::from_naive_date(*d))
            .collect();

        let mut arrays: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(dates))];
        for variable in Variable::ALL {
            let values = series.column(variable)[range.clone()].to_vec();
            arrays.push(Arc::new(Float64Array::from(values)));
        }

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Read a series previously written by [`write_series`](Self::write_series)
    pub fn read_series(&self, path: &Path) -> Result<SeriesTable> {
        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(DEFAULT_BATCH_SIZE)
            .build()?;

        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut columns: [Vec<Option<f64>>; Variable::COUNT] = Default::default();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let date_array = batch
                .column(0)
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| ProcessingError::Config("Invalid date column type".to_string()))?;
            dates.extend(date_array.values().iter().map(|d| Date32Type::to_naive_date(*d)));

            for variable in Variable::ALL {
                let array = batch
                    .column(1 + variable.index())
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| {
                        ProcessingError::Config(format!(
                            "Invalid {} column type",
                            variable.column_name()
                        ))
                    })?;
                columns[variable.index()].extend(array.iter());
            }
        }

        SeriesTable::new(dates, columns)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            avg_rows
        )
    }
}
