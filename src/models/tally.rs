use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::models::Variable;

/// Rows of the tally table, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckKind {
    NoData = 0,
    GrossError = 1,
    Swapped = 2,
    RangeFail = 3,
}

impl CheckKind {
    pub const COUNT: usize = 4;

    pub const ALL: [CheckKind; CheckKind::COUNT] = [
        CheckKind::NoData,
        CheckKind::GrossError,
        CheckKind::Swapped,
        CheckKind::RangeFail,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckKind::NoData => "1. No Data",
            CheckKind::GrossError => "2. Gross Error",
            CheckKind::Swapped => "3. Swapped",
            CheckKind::RangeFail => "4. Range Fail",
        }
    }

    /// Message printed once the check has run
    pub fn completion_message(self) -> &'static str {
        match self {
            CheckKind::NoData => "Missing values removed",
            CheckKind::GrossError => "Check for gross errors complete",
            CheckKind::Swapped => "Check for swapped temperatures complete",
            CheckKind::RangeFail => "Check for excessive temperature range complete",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub type TallyRow = [usize; Variable::COUNT];

/// Per-check, per-variable counts of altered values.
///
/// Every row starts at zero and is written exactly once, by its own check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TallyTable {
    counts: [TallyRow; CheckKind::COUNT],
    written: [bool; CheckKind::COUNT],
}

impl TallyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check: CheckKind, row: TallyRow) -> Result<()> {
        if self.written[check.index()] {
            return Err(ProcessingError::TallyRowAlreadyWritten(check));
        }
        self.counts[check.index()] = row;
        self.written[check.index()] = true;
        Ok(())
    }

    pub fn is_written(&self, check: CheckKind) -> bool {
        self.written[check.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.written.iter().all(|w| *w)
    }

    pub fn row(&self, check: CheckKind) -> TallyRow {
        self.counts[check.index()]
    }

    pub fn get(&self, check: CheckKind, variable: Variable) -> usize {
        self.counts[check.index()][variable.index()]
    }

    /// Sum of one variable over every row written so far
    pub fn column_total(&self, variable: Variable) -> usize {
        self.counts.iter().map(|row| row[variable.index()]).sum()
    }

    pub fn column_totals(&self) -> TallyRow {
        Variable::ALL.map(|variable| self.column_total(variable))
    }

    pub fn rows(&self) -> impl Iterator<Item = (CheckKind, TallyRow)> + '_ {
        CheckKind::ALL.iter().map(move |check| (*check, self.row(*check)))
    }
}

impl fmt::Display for TallyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = CheckKind::ALL
            .iter()
            .map(|c| c.label().len())
            .max()
            .unwrap_or(0);

        write!(f, "{:label_width$}", "")?;
        for variable in Variable::ALL {
            write!(f, "  {:>10}", variable.label())?;
        }
        writeln!(f)?;

        for (check, row) in self.rows() {
            write!(f, "{:label_width$}", check.label())?;
            for count in row {
                write!(f, "  {:>10}", count)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
