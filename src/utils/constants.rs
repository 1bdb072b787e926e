/// Reserved "no observation" value in raw station files
pub const NO_DATA_SENTINEL: f64 = -999.0;

/// Physical plausibility bounds (inclusive)
pub const PRECIP_MIN: f64 = 0.0;
pub const PRECIP_MAX: f64 = 25.0;
pub const TEMP_MIN: f64 = -25.0;
pub const TEMP_MAX: f64 = 35.0;
pub const WIND_SPEED_MIN: f64 = 0.0;
pub const WIND_SPEED_MAX: f64 = 10.0;

/// Largest credible daily max/min temperature spread
pub const MAX_DAILY_TEMP_SPREAD: f64 = 25.0;

/// Column labels used in reports and text output
pub const COL_PRECIP: &str = "Precip";
pub const COL_MAX_TEMP: &str = "Max Temp";
pub const COL_MIN_TEMP: &str = "Min Temp";
pub const COL_WIND_SPEED: &str = "Wind Speed";
pub const COL_DATE: &str = "Date";

/// Tokens read as missing values
pub const MISSING_TOKENS: [&str; 4] = ["NaN", "nan", "NA", ""];

/// Environment prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "HYDROMET_QC";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BATCH_SIZE: usize = 4096;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
