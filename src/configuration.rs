use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fitting::leastsquares::RefinementOptions;
use crate::spline::splineerror::SplineError;
use crate::spline::vectorspacespline::{VectorSpaceSpline, DEFAULT_TIME_INTERVAL};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    SplineError(#[from] SplineError)
}

/// Spline setup read from JSON; absent fields take their defaults.
///
/// ```json
/// { "order": 4, "time_interval": 0.1, "refine_iterations": 100, "lbfgs_history": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineConfiguration {
    order: usize,
    time_interval: f64,
    refine_iterations: u64,
    lbfgs_history: usize
}

impl Default for SplineConfiguration {
    fn default() -> Self {
        let refinement = RefinementOptions::default();
        SplineConfiguration {
            order: 4,
            time_interval: DEFAULT_TIME_INTERVAL,
            refine_iterations: refinement.max_iters,
            lbfgs_history: refinement.history
        }
    }
}

impl SplineConfiguration {
    pub fn new(order: usize, time_interval: f64) -> SplineConfiguration {
        SplineConfiguration { order, time_interval, ..Default::default() }
    }

    pub fn from_reader(file_path: &str) -> Result<SplineConfiguration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let configuration: SplineConfiguration = serde_json::from_reader(reader)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_json_str(json: &str) -> Result<SplineConfiguration, ConfigurationError> {
        let configuration: SplineConfiguration = serde_json::from_str(json)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), SplineError> {
        if self.order < 2 {
            return Err(SplineError::InvalidOrder(self.order));
        }
        if !(self.time_interval.is_finite() && self.time_interval > 0.0) {
            return Err(SplineError::InvalidTimeInterval(self.time_interval));
        }
        Ok(())
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn time_interval(&self) -> f64 {
        self.time_interval
    }

    pub fn build_spline<const D: usize>(&self) -> Result<VectorSpaceSpline<D>, SplineError> {
        VectorSpaceSpline::with_time_interval(self.order, self.time_interval)
    }

    pub fn refinement_options(&self) -> RefinementOptions {
        RefinementOptions {
            max_iters: self.refine_iterations,
            history: self.lbfgs_history,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::math::bspline::bspline::BSpline;
    use crate::spline::trajectoryspline::TrajectorySpline;

    #[test]
    fn missing_fields_take_defaults() {
        let configuration = SplineConfiguration::from_json_str(r#"{ "time_interval": 0.05 }"#).unwrap();
        assert_eq!(configuration.order(), 4);
        assert_eq!(configuration.time_interval(), 0.05);
        assert_eq!(configuration.refinement_options(), RefinementOptions::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SplineConfiguration::from_json_str(r#"{ "order": 1 }"#),
            Err(ConfigurationError::SplineError(SplineError::InvalidOrder(1)))
        ));
        assert!(matches!(
            SplineConfiguration::from_json_str(r#"{ "time_interval": -1.0 }"#),
            Err(ConfigurationError::SplineError(SplineError::InvalidTimeInterval(_)))
        ));
        assert!(matches!(
            SplineConfiguration::from_json_str("{ order: 4 }"),
            Err(ConfigurationError::JsonParseError(_))
        ));
    }

    #[test]
    fn builds_spline_from_file() {
        let path = std::env::temp_dir().join(format!("posespline-config-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{ "order": 3, "time_interval": 0.2, "refine_iterations": 10 }}"#).unwrap();
        drop(file);

        let configuration = SplineConfiguration::from_reader(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(configuration.refinement_options().max_iters, 10);

        let spline = configuration.build_spline::<2>().unwrap();
        assert_eq!(spline.order(), 3);
        assert_eq!(spline.time_interval(), 0.2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SplineConfiguration::from_reader("/nonexistent/posespline.json"),
            Err(ConfigurationError::IOError(_))
        ));
    }
}
