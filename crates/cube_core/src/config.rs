//! # Cube Configuration
//!
//! Loaded once at startup, typically from TOML:
//!
//! ```toml
//! size = 4
//! cancel_poll_us = 500
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CubeError, CubeResult};

/// Construction parameters for a [`Cube`](crate::Cube).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CubeConfig {
    /// Edge length (number of layers per axis).
    pub size: usize,
    /// Upper bound, in microseconds, on how long a blocked waiter takes to
    /// notice cancellation.
    pub cancel_poll_us: u64,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 3,
            cancel_poll_us: 1_000,
        }
    }
}

impl CubeConfig {
    /// Default config with the given size.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] on malformed TOML or values that
    /// fail [`CubeConfig::validate`].
    pub fn from_toml_str(source: &str) -> CubeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CubeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> CubeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            CubeError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] for a zero size or poll interval.
    pub fn validate(&self) -> CubeResult<()> {
        if self.size == 0 {
            return Err(CubeError::InvalidConfig("size must be at least 1".into()));
        }
        if self.cancel_poll_us == 0 {
            return Err(CubeError::InvalidConfig(
                "cancel_poll_us must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Poll interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn cancel_poll(&self) -> Duration {
        Duration::from_micros(self.cancel_poll_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = CubeConfig::from_toml_str("size = 8").unwrap();
        assert_eq!(config.size, 8);
        assert_eq!(config.cancel_poll(), Duration::from_millis(1));
    }

    #[test]
    fn test_rejects_zero_size() {
        let err = CubeConfig::from_toml_str("size = 0").unwrap_err();
        assert!(matches!(err, CubeError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = CubeConfig::from_toml_str("size = 3\ncolour = 1").unwrap_err();
        assert!(matches!(err, CubeError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CubeConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CubeError::InvalidConfig(_)));
    }
}
