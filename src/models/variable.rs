use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{COL_MAX_TEMP, COL_MIN_TEMP, COL_PRECIP, COL_WIND_SPEED};

/// Observed quantities of a daily record, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    Precipitation = 0,
    MaxTemp = 1,
    MinTemp = 2,
    WindSpeed = 3,
}

impl Variable {
    pub const COUNT: usize = 4;

    pub const ALL: [Variable; Variable::COUNT] = [
        Variable::Precipitation,
        Variable::MaxTemp,
        Variable::MinTemp,
        Variable::WindSpeed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Report label, e.g. "Max Temp"
    pub fn label(self) -> &'static str {
        match self {
            Variable::Precipitation => COL_PRECIP,
            Variable::MaxTemp => COL_MAX_TEMP,
            Variable::MinTemp => COL_MIN_TEMP,
            Variable::WindSpeed => COL_WIND_SPEED,
        }
    }

    /// Storage column name, e.g. "max_temp"
    pub fn column_name(self) -> &'static str {
        match self {
            Variable::Precipitation => "precipitation",
            Variable::MaxTemp => "max_temp",
            Variable::MinTemp => "min_temp",
            Variable::WindSpeed => "wind_speed",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_column_order() {
        for (i, variable) in Variable::ALL.iter().enumerate() {
            assert_eq!(variable.index(), i);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Variable::Precipitation.to_string(), "Precip");
        assert_eq!(Variable::WindSpeed.label(), "Wind Speed");
        assert_eq!(Variable::MinTemp.column_name(), "min_temp");
    }
}
