use chrono::NaiveDate;

use crate::error::{ProcessingError, Result};
use crate::models::{ObservationRecord, Variable};

/// Date-indexed daily series stored column-wise.
///
/// Each variable is a `Vec<Option<f64>>` aligned with `dates`; `None` is the
/// missing marker. Dates are strictly increasing, so there is one record per
/// calendar day at most.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesTable {
    dates: Vec<NaiveDate>,
    columns: [Vec<Option<f64>>; Variable::COUNT],
}

impl SeriesTable {
    pub fn new(dates: Vec<NaiveDate>, columns: [Vec<Option<f64>>; Variable::COUNT]) -> Result<Self> {
        for variable in Variable::ALL {
            let actual = columns[variable.index()].len();
            if actual != dates.len() {
                return Err(ProcessingError::ColumnLength {
                    column: variable.column_name(),
                    expected: dates.len(),
                    actual,
                });
            }
        }

        if let Some((i, pair)) = dates
            .windows(2)
            .enumerate()
            .find(|(_, pair)| pair[1] <= pair[0])
        {
            return Err(ProcessingError::DateOrder {
                line: i + 2,
                previous: pair[0],
                current: pair[1],
            });
        }

        Ok(Self { dates, columns })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ObservationRecord>) -> Result<Self> {
        let mut dates = Vec::with_capacity(records.len());
        let mut columns: [Vec<Option<f64>>; Variable::COUNT] =
            std::array::from_fn(|_| Vec::with_capacity(records.len()));

        for record in records {
            for variable in Variable::ALL {
                columns[variable.index()].push(record.value(variable));
            }
            dates.push(record.date);
        }

        Self::new(dates, columns)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    pub fn column(&self, variable: Variable) -> &[Option<f64>] {
        &self.columns[variable.index()]
    }

    pub(crate) fn column_mut(&mut self, variable: Variable) -> &mut [Option<f64>] {
        &mut self.columns[variable.index()]
    }

    /// Both temperature columns, mutably, as `(max_temp, min_temp)`
    pub(crate) fn temperatures_mut(&mut self) -> (&mut [Option<f64>], &mut [Option<f64>]) {
        let [_, max_temp, min_temp, _] = &mut self.columns;
        (max_temp.as_mut_slice(), min_temp.as_mut_slice())
    }

    pub fn record(&self, index: usize) -> Option<ObservationRecord> {
        let date = *self.dates.get(index)?;
        Some(ObservationRecord::new(
            date,
            self.columns[Variable::Precipitation.index()][index],
            self.columns[Variable::MaxTemp.index()][index],
            self.columns[Variable::MinTemp.index()][index],
            self.columns[Variable::WindSpeed.index()][index],
        ))
    }

    pub fn records(&self) -> impl Iterator<Item = ObservationRecord> + '_ {
        (0..self.len()).filter_map(move |i| self.record(i))
    }

    pub fn missing_count(&self, variable: Variable) -> usize {
        self.column(variable).iter().filter(|v| v.is_none()).count()
    }

    pub fn missing_counts(&self) -> [usize; Variable::COUNT] {
        Variable::ALL.map(|variable| self.missing_count(variable))
    }

    pub fn present_count(&self, variable: Variable) -> usize {
        self.len() - self.missing_count(variable)
    }
}

/// `a > b` when both values are present; any comparison with a missing
/// value is false.
pub fn present_gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}
