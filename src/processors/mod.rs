pub mod checks;
pub mod integrity_checker;
pub mod quality_checker;

pub use checks::{
    remove_excessive_ranges, remove_gross_errors, remove_no_data_values,
    swap_inverted_temperatures, CheckFn, CHECKS,
};
pub use integrity_checker::{IntegrityChecker, IntegrityReport, Violation, ViolationType};
pub use quality_checker::{run_quality_checks, QualityChecker};
