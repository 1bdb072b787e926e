use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::models::Variable;
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, MAX_DAILY_TEMP_SPREAD, NO_DATA_SENTINEL, PRECIP_MAX, PRECIP_MIN, TEMP_MAX,
    TEMP_MIN, WIND_SPEED_MAX, WIND_SPEED_MIN,
};

/// Closed plausibility interval. Values strictly outside are gross errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        !(value < self.lower || value > self.upper)
    }
}

fn validate_bounds(bounds: &Bounds) -> std::result::Result<(), ValidationError> {
    if !bounds.lower.is_finite() || !bounds.upper.is_finite() {
        return Err(ValidationError::new("non_finite_bounds"));
    }
    if bounds.lower > bounds.upper {
        return Err(ValidationError::new("inverted_bounds"));
    }
    Ok(())
}

/// Sentinel and spread limit must be finite; NaN never compares true.
fn validate_thresholds(config: &QcConfig) -> std::result::Result<(), ValidationError> {
    if !config.sentinel.is_finite() {
        return Err(ValidationError::new("non_finite_sentinel"));
    }
    if !config.max_spread.is_finite() {
        return Err(ValidationError::new("non_finite_max_spread"));
    }
    Ok(())
}

/// Thresholds for the quality-check pipeline.
///
/// Defaults describe a lowland station; other station types load their own
/// values from a settings file (see [`QcConfig::from_file`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_thresholds"))]
pub struct QcConfig {
    /// Raw value meaning "no observation"
    pub sentinel: f64,

    #[validate(nested)]
    pub precipitation: Bounds,

    #[validate(nested)]
    pub max_temp: Bounds,

    #[validate(nested)]
    pub min_temp: Bounds,

    #[validate(nested)]
    pub wind_speed: Bounds,

    /// Largest accepted `max_temp - min_temp` for a single day
    #[validate(range(min = 0.0))]
    pub max_spread: f64,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            sentinel: NO_DATA_SENTINEL,
            precipitation: Bounds::new(PRECIP_MIN, PRECIP_MAX),
            max_temp: Bounds::new(TEMP_MIN, TEMP_MAX),
            min_temp: Bounds::new(TEMP_MIN, TEMP_MAX),
            wind_speed: Bounds::new(WIND_SPEED_MIN, WIND_SPEED_MAX),
            max_spread: MAX_DAILY_TEMP_SPREAD,
        }
    }
}

impl QcConfig {
    pub fn bounds(&self, variable: Variable) -> Bounds {
        match variable {
            Variable::Precipitation => self.precipitation,
            Variable::MaxTemp => self.max_temp,
            Variable::MinTemp => self.min_temp,
            Variable::WindSpeed => self.wind_speed,
        }
    }

    /// Load thresholds from a TOML/JSON/YAML file, then apply
    /// `HYDROMET_QC__*` environment overrides. Unset keys keep their defaults,
    /// including a single `lower` or `upper` of a bounds table.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading QC configuration from {}", path.display());
        Self::load(Some(path), Self::environment())
    }

    /// Defaults plus environment overrides only.
    pub fn from_env() -> Result<Self> {
        Self::load(None, Self::environment())
    }

    fn load(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&QcConfig::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let qc_config: QcConfig = builder.add_source(environment).build()?.try_deserialize()?;
        qc_config.validate()?;
        Ok(qc_config)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(CONFIG_ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;

    /// Environment source that sees only the given variables
    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        QcConfig::environment().source(Some(vars))
    }

    #[test]
    fn test_default_thresholds() {
        let cfg = QcConfig::default();

        assert_eq!(cfg.sentinel, -999.0);
        assert_eq!(cfg.bounds(Variable::Precipitation), Bounds::new(0.0, 25.0));
        assert_eq!(cfg.bounds(Variable::MaxTemp), Bounds::new(-25.0, 35.0));
        assert_eq!(cfg.bounds(Variable::MinTemp), Bounds::new(-25.0, 35.0));
        assert_eq!(cfg.bounds(Variable::WindSpeed), Bounds::new(0.0, 10.0));
        assert_eq!(cfg.max_spread, 25.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::new(0.0, 25.0);

        assert!(bounds.contains(0.0));
        assert!(bounds.contains(25.0));
        assert!(bounds.contains(12.5));
        assert!(!bounds.contains(-0.1));
        assert!(!bounds.contains(25.1));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cfg = QcConfig {
            wind_speed: Bounds::new(10.0, 0.0),
            ..QcConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_negative_spread_rejected() {
        let cfg = QcConfig {
            max_spread: -1.0,
            ..QcConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_file_overrides_some_keys() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "max_spread = 30.0")?;
        writeln!(file, "[wind_speed]")?;
        writeln!(file, "lower = 0.0")?;
        writeln!(file, "upper = 40.0")?;

        let cfg = QcConfig::from_file(file.path())?;

        assert_eq!(cfg.max_spread, 30.0);
        assert_eq!(cfg.wind_speed, Bounds::new(0.0, 40.0));
        // Untouched keys keep defaults
        assert_eq!(cfg.precipitation, Bounds::new(0.0, 25.0));
        assert_eq!(cfg.sentinel, -999.0);
        Ok(())
    }

    #[test]
    fn test_from_file_rejects_invalid_bounds() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[precipitation]")?;
        writeln!(file, "lower = 50.0")?;
        writeln!(file, "upper = 0.0")?;

        assert!(QcConfig::from_file(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_non_finite_thresholds_rejected() {
        let nan_spread = QcConfig {
            max_spread: f64::NAN,
            ..QcConfig::default()
        };
        let nan_sentinel = QcConfig {
            sentinel: f64::NAN,
            ..QcConfig::default()
        };

        assert!(nan_spread.validate().is_err());
        assert!(nan_sentinel.validate().is_err());
    }

    #[test]
    fn test_from_file_rejects_nan_spread() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "max_spread = nan")?;

        let result = QcConfig::load(Some(file.path()), env_with(&[]));
        assert!(matches!(result, Err(ProcessingError::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_file_sets_single_bound() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[wind_speed]")?;
        writeln!(file, "upper = 15.0")?;

        let cfg = QcConfig::load(Some(file.path()), env_with(&[]))?;

        assert_eq!(cfg.wind_speed, Bounds::new(0.0, 15.0));
        assert_eq!(cfg.max_temp, Bounds::new(-25.0, 35.0));
        Ok(())
    }

    #[test]
    fn test_env_overrides_single_bound() -> Result<()> {
        let env = env_with(&[
            ("HYDROMET_QC__MAX_SPREAD", "20"),
            ("HYDROMET_QC__WIND_SPEED__UPPER", "15"),
        ]);

        let cfg = QcConfig::load(None, env)?;

        assert_eq!(cfg.max_spread, 20.0);
        assert_eq!(cfg.wind_speed, Bounds::new(0.0, 15.0));
        assert_eq!(cfg.precipitation, Bounds::new(0.0, 25.0));
        Ok(())
    }

    #[test]
    fn test_env_wins_over_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[wind_speed]")?;
        writeln!(file, "lower = 1.0")?;
        writeln!(file, "upper = 40.0")?;

        let env = env_with(&[("HYDROMET_QC__WIND_SPEED__UPPER", "12.5")]);
        let cfg = QcConfig::load(Some(file.path()), env)?;

        assert_eq!(cfg.wind_speed, Bounds::new(1.0, 12.5));
        Ok(())
    }
}
