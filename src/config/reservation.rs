//! Reservation session configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationConfig {
    /// Idle time after which a session counts as expired
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// How often expired sessions are purged
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Consecutive rejected inputs before a session errors out
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,
}

impl ReservationConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            max_failed_attempts: default_max_failed_attempts(),
        }
    }
}

fn default_session_ttl() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_failed_attempts() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_defaults() {
        let config = ReservationConfig::default();
        assert_eq!(config.session_ttl(), Duration::from_secs(1800));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.max_failed_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        let config = ReservationConfig {
            session_ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSessionTtl));

        let config = ReservationConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSweepInterval));
    }
}
