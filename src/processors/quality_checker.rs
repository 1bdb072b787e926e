use tracing::{debug, info_span};
use validator::Validate;

use crate::config::QcConfig;
use crate::error::Result;
use crate::models::{CheckKind, SeriesTable, TallyTable};
use crate::processors::checks::CHECKS;

/// Runs the four checks over a whole series, in order, with one config.
pub struct QualityChecker {
    config: QcConfig,
}

impl QualityChecker {
    pub fn new(config: QcConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QcConfig {
        &self.config
    }

    pub fn run(&self, series: SeriesTable, tally: TallyTable) -> Result<(SeriesTable, TallyTable)> {
        self.run_with_observer(series, tally, |_, _, _| {})
    }

    /// Like [`run`](Self::run), calling `observer` with the materialized
    /// state after each check. The first failing check aborts the run.
    pub fn run_with_observer<F>(
        &self,
        series: SeriesTable,
        tally: TallyTable,
        mut observer: F,
    ) -> Result<(SeriesTable, TallyTable)>
    where
        F: FnMut(CheckKind, &SeriesTable, &TallyTable),
    {
        debug!("Running quality checks over {} records", series.len());

        CHECKS
            .iter()
            .try_fold(
                (series, tally),
                |(series, tally), (kind, check)| -> Result<(SeriesTable, TallyTable)> {
                    let span = info_span!("quality_check", check = %kind);
                    let _guard = span.enter();

                    let (series, tally) = check(series, tally, &self.config)?;
                    observer(*kind, &series, &tally);
                    Ok((series, tally))
                },
            )
    }
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self {
            config: QcConfig::default(),
        }
    }
}

/// Run every check over `series`, filling `tally`.
pub fn run_quality_checks(
    series: SeriesTable,
    tally: TallyTable,
    config: &QcConfig,
) -> Result<(SeriesTable, TallyTable)> {
    QualityChecker::new(config.clone())?.run(series, tally)
}
