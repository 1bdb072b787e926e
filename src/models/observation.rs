use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::Variable;

/// One calendar day of station observations. `None` is the missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl ObservationRecord {
    pub fn new(
        date: NaiveDate,
        precipitation: Option<f64>,
        max_temp: Option<f64>,
        min_temp: Option<f64>,
        wind_speed: Option<f64>,
    ) -> Self {
        Self {
            date,
            precipitation,
            max_temp,
            min_temp,
            wind_speed,
        }
    }

    pub fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Precipitation => self.precipitation,
            Variable::MaxTemp => self.max_temp,
            Variable::MinTemp => self.min_temp,
            Variable::WindSpeed => self.wind_speed,
        }
    }

    /// Daily temperature spread when both readings are present
    pub fn temperature_range(&self) -> Option<f64> {
        match (self.max_temp, self.min_temp) {
            (Some(max), Some(min)) => Some(max - min),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        Variable::ALL.iter().all(|v| self.value(*v).is_some())
    }
}

pub struct ObservationRecordBuilder {
    date: Option<NaiveDate>,
    precipitation: Option<f64>,
    max_temp: Option<f64>,
    min_temp: Option<f64>,
    wind_speed: Option<f64>,
}

impl Default for ObservationRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationRecordBuilder {
    pub fn new() -> Self {
        Self {
            date: None,
            precipitation: None,
            max_temp: None,
            min_temp: None,
            wind_speed: None,
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn precipitation(mut self, value: f64) -> Self {
        self.precipitation = Some(value);
        self
    }

    pub fn temperatures(mut self, max: f64, min: f64) -> Self {
        self.max_temp = Some(max);
        self.min_temp = Some(min);
        self
    }

    pub fn max_temp(mut self, value: f64) -> Self {
        self.max_temp = Some(value);
        self
    }

    pub fn min_temp(mut self, value: f64) -> Self {
        self.min_temp = Some(value);
        self
    }

    pub fn wind_speed(mut self, value: f64) -> Self {
        self.wind_speed = Some(value);
        self
    }

    /// Only the date is required; unset observations stay missing.
    pub fn build(self) -> Result<ObservationRecord> {
        let date = self
            .date
            .ok_or_else(|| ProcessingError::MissingData("date".to_string()))?;

        Ok(ObservationRecord::new(
            date,
            self.precipitation,
            self.max_temp,
            self.min_temp,
            self.wind_speed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let date = NaiveDate::from_ymd_opt(1915, 1, 1).unwrap();

        let record = ObservationRecordBuilder::new()
            .date(date)
            .precipitation(2.5)
            .temperatures(12.0, 3.0)
            .wind_speed(4.1)
            .build()
            .unwrap();

        assert_eq!(record.date, date);
        assert_eq!(record.value(Variable::Precipitation), Some(2.5));
        assert_eq!(record.value(Variable::MaxTemp), Some(12.0));
        assert_eq!(record.value(Variable::MinTemp), Some(3.0));
        assert_eq!(record.temperature_range(), Some(9.0));
        assert!(record.is_complete());
    }

    #[test]
    fn test_builder_requires_date() {
        let result = ObservationRecordBuilder::new().precipitation(1.0).build();
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_missing_temperature_has_no_range() {
        let date = NaiveDate::from_ymd_opt(1915, 1, 2).unwrap();
        let record = ObservationRecordBuilder::new()
            .date(date)
            .max_temp(10.0)
            .build()
            .unwrap();

        assert_eq!(record.temperature_range(), None);
        assert!(!record.is_complete());
    }
}
