//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (period and timeout > 0, buckets increasing)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("server.listen_addr must not be empty")]
    EmptyListenAddr,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("observability.histogram_buckets_ms must not be empty")]
    NoBuckets,

    #[error("observability.histogram_buckets_ms must be strictly increasing (found {previous} before {current})")]
    UnorderedBuckets { previous: f64, current: f64 },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.listen_addr.trim().is_empty() {
        errors.push(ValidationError::EmptyListenAddr);
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "server.request_timeout_secs" });
    }
    if config.probe.period_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "probe.period_secs" });
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "probe.timeout_secs" });
    }

    let buckets = &config.observability.histogram_buckets_ms;
    if buckets.is_empty() {
        errors.push(ValidationError::NoBuckets);
    }
    for pair in buckets.windows(2) {
        if pair[1] <= pair[0] {
            errors.push(ValidationError::UnorderedBuckets {
                previous: pair[0],
                current: pair[1],
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = AppConfig::default();
        config.server.listen_addr = " ".into();
        config.probe.period_secs = 0;
        config.observability.histogram_buckets_ms = vec![10.0, 5.0];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyListenAddr));
        assert!(errors.contains(&ValidationError::ZeroDuration { field: "probe.period_secs" }));
        assert!(errors.contains(&ValidationError::UnorderedBuckets { previous: 10.0, current: 5.0 }));
    }

    #[test]
    fn empty_buckets_rejected() {
        let mut config = AppConfig::default();
        config.observability.histogram_buckets_ms.clear();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoBuckets]));
    }
}
