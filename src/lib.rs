pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::{Bounds, QcConfig};
pub use error::{ProcessingError, Result};
pub use models::{CheckKind, ObservationRecord, SeriesTable, TallyTable, Variable};
pub use processors::{run_quality_checks, QualityChecker};
