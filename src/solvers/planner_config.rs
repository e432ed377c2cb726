use anyhow::{anyhow, Result};
use std::time::Duration;

/// The default maximal horizon.
pub const DEFAULT_MAX_HORIZON: usize = 256;

/// The default time budget for a whole search.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// The parameters of a horizon search.
///
/// ```
/// # use satplan::solvers::PlannerConfig;
/// # use std::time::Duration;
/// let config = PlannerConfig {
///     max_horizon: 16,
///     timeout: Duration::from_secs(10),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// The first horizon under consideration.
    pub min_horizon: usize,
    /// The last horizon under consideration.
    pub max_horizon: usize,
    /// The time budget for the whole search.
    pub timeout: Duration,
    /// An optional time limit for a single SAT solver call.
    ///
    /// Each call is limited by the remaining global budget in any case.
    pub attempt_timeout: Option<Duration>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_horizon: 0,
            max_horizon: DEFAULT_MAX_HORIZON,
            timeout: DEFAULT_TIMEOUT,
            attempt_timeout: None,
        }
    }
}

impl PlannerConfig {
    /// Checks the configuration is consistent.
    ///
    /// The minimal horizon must not exceed the maximal one, and the time limits must be strictly positive.
    pub fn validate(&self) -> Result<()> {
        if self.min_horizon > self.max_horizon {
            return Err(anyhow!(
                "the minimal horizon ({}) is greater than the maximal horizon ({})",
                self.min_horizon,
                self.max_horizon
            ));
        }
        if self.timeout.is_zero() {
            return Err(anyhow!("the timeout must be strictly positive"));
        }
        if let Some(d) = self.attempt_timeout {
            if d.is_zero() {
                return Err(anyhow!("the attempt timeout must be strictly positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(0, config.min_horizon);
        assert_eq!(256, config.max_horizon);
        assert_eq!(Duration::from_secs(600), config.timeout);
        assert_eq!(None, config.attempt_timeout);
    }

    #[test]
    fn test_min_greater_than_max() {
        let config = PlannerConfig {
            min_horizon: 3,
            max_horizon: 2,
            ..Default::default()
        };
        assert_eq!(
            "the minimal horizon (3) is greater than the maximal horizon (2)",
            config.validate().unwrap_err().to_string()
        );
    }

    #[test]
    fn test_min_equals_max() {
        let config = PlannerConfig {
            min_horizon: 2,
            max_horizon: 2,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_null_timeouts() {
        let config = PlannerConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = PlannerConfig {
            attempt_timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
