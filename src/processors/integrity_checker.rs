use chrono::NaiveDate;
use tracing::warn;

use crate::config::QcConfig;
use crate::models::{present_gt, SeriesTable, Variable};

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub complete_records: usize,
    pub missing_values: [usize; Variable::COUNT],
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations
            .iter()
            .all(|v| v.violation_type == ViolationType::DateGap)
    }

    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    RemainingSentinel,
    OutOfRange,
    InvertedTemperatures,
    ExcessiveSpread,
    /// Calendar days absent between consecutive records; reported, not an error
    DateGap,
}

/// Audits a series against the invariants the check pipeline establishes.
pub struct IntegrityChecker {
    config: QcConfig,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            config: QcConfig::default(),
        }
    }

    pub fn with_config(config: QcConfig) -> Self {
        Self { config }
    }

    pub fn check_integrity(&self, series: &SeriesTable) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: series.len(),
            complete_records: series.records().filter(|r| r.is_complete()).count(),
            missing_values: series.missing_counts(),
            violations: Vec::new(),
        };

        self.check_value_ranges(series, &mut report);
        self.check_temperature_pairs(series, &mut report);
        self.check_date_continuity(series, &mut report);

        report.violations.sort_by_key(|v| v.date);

        if !report.is_clean() {
            warn!(
                "Integrity check found {} violations in {} records",
                report.violations.len(),
                report.total_records
            );
        }

        report
    }

    fn check_value_ranges(&self, series: &SeriesTable, report: &mut IntegrityReport) {
        for variable in Variable::ALL {
            let bounds = self.config.bounds(variable);

            for (date, value) in series.dates().iter().zip(series.column(variable)) {
                let Some(value) = *value else { continue };

                if value == self.config.sentinel {
                    report.violations.push(Violation {
                        date: *date,
                        violation_type: ViolationType::RemainingSentinel,
                        details: format!("{} still holds the no-data value {}", variable, value),
                    });
                } else if !bounds.contains(value) {
                    report.violations.push(Violation {
                        date: *date,
                        violation_type: ViolationType::OutOfRange,
                        details: format!(
                            "{} {} is outside valid range [{}, {}]",
                            variable, value, bounds.lower, bounds.upper
                        ),
                    });
                }
            }
        }
    }

    fn check_temperature_pairs(&self, series: &SeriesTable, report: &mut IntegrityReport) {
        for record in series.records() {
            if present_gt(record.min_temp, record.max_temp) {
                report.violations.push(Violation {
                    date: record.date,
                    violation_type: ViolationType::InvertedTemperatures,
                    details: format!(
                        "Min Temp {:?} > Max Temp {:?}",
                        record.min_temp, record.max_temp
                    ),
                });
            }

            if let Some(spread) = record.temperature_range() {
                if spread > self.config.max_spread {
                    report.violations.push(Violation {
                        date: record.date,
                        violation_type: ViolationType::ExcessiveSpread,
                        details: format!(
                            "Daily range {:.1} exceeds {:.1}",
                            spread, self.config.max_spread
                        ),
                    });
                }
            }
        }
    }

    fn check_date_continuity(&self, series: &SeriesTable, report: &mut IntegrityReport) {
        for window in series.dates().windows(2) {
            let (prev, curr) = (window[0], window[1]);
            let missing_days = (curr - prev).num_days() - 1;

            if missing_days > 0 {
                report.violations.push(Violation {
                    date: curr,
                    violation_type: ViolationType::DateGap,
                    details: format!("{} days missing after {}", missing_days, prev),
                });
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Complete Records: {} ({:.1}%)\n",
            report.complete_records,
            percentage(report.complete_records, report.total_records)
        ));

        summary.push_str("Missing Values:\n");
        for variable in Variable::ALL {
            summary.push_str(&format!(
                "  {:<12} {}\n",
                variable.label(),
                report.missing_values[variable.index()]
            ));
        }

        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));
        for violation_type in [
            ViolationType::RemainingSentinel,
            ViolationType::OutOfRange,
            ViolationType::InvertedTemperatures,
            ViolationType::ExcessiveSpread,
            ViolationType::DateGap,
        ] {
            let count = report.count(violation_type);
            if count > 0 {
                summary.push_str(&format!("  {:?}: {}\n", violation_type, count));
            }
        }

        if !report.violations.is_empty() {
            summary.push_str("\nFirst 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
