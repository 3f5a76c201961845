//! Panel tuning knobs.

use serde::{Deserialize, Serialize};

use crate::types::SearchCase;

pub const DEFAULT_WINDOW_SIZE: usize = 40;
pub const DEFAULT_SCROLL_STEP: usize = 20;
pub const DEFAULT_BOTTOM_THRESHOLD: f64 = 200.0;
pub const DEFAULT_TOP_THRESHOLD: f64 = 200.0;

/// Upper bound for `windowSize` and `scrollStep`.
pub const MAX_ROWS: usize = 100_000;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("windowSize must be at least 1")]
    ZeroWindow,
    #[error("scrollStep must be at least 1")]
    ZeroStep,
    #[error("{name} must be at most {max}, got {value}")]
    TooLarge { name: &'static str, value: usize, max: usize },
    #[error("Invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelConfig {
    /// Rows rendered at once
    pub window_size: usize,
    /// Rows the window moves per scroll trigger
    pub scroll_step: usize,
    /// Distance from content bottom that triggers advancing
    pub bottom_threshold: f64,
    /// Distance from content top that triggers retreating
    pub top_threshold: f64,
    pub search_case: SearchCase,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            scroll_step: DEFAULT_SCROLL_STEP,
            bottom_threshold: DEFAULT_BOTTOM_THRESHOLD,
            top_threshold: DEFAULT_TOP_THRESHOLD,
            search_case: SearchCase::Sensitive,
        }
    }
}

impl PanelConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.scroll_step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        for (name, value) in [("windowSize", self.window_size), ("scrollStep", self.scroll_step)] {
            if value > MAX_ROWS {
                return Err(ConfigError::TooLarge { name, value, max: MAX_ROWS });
            }
        }
        for (name, value) in [
            ("bottomThreshold", self.bottom_threshold),
            ("topThreshold", self.top_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PanelConfig::default();
        assert_eq!(config.window_size, 40);
        assert_eq!(config.scroll_step, 20);
        assert_eq!(config.search_case, SearchCase::Sensitive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = PanelConfig::from_json(r#"{"windowSize": 10, "searchCase": "insensitive"}"#).unwrap();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.scroll_step, DEFAULT_SCROLL_STEP);
        assert_eq!(config.search_case, SearchCase::Insensitive);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(PanelConfig::from_json(r#"{"windowSize": 0}"#), Err(ConfigError::ZeroWindow)));
        assert!(matches!(PanelConfig::from_json(r#"{"scrollStep": 0}"#), Err(ConfigError::ZeroStep)));
        assert!(matches!(
            PanelConfig::from_json(r#"{"topThreshold": -1.0}"#),
            Err(ConfigError::InvalidThreshold { name: "topThreshold", .. })
        ));
        assert!(matches!(PanelConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            PanelConfig::from_json(r#"{"scrollStep": 18446744073709551615}"#),
            Err(ConfigError::TooLarge { name: "scrollStep", .. })
        ));
        assert!(matches!(
            PanelConfig::from_json(r#"{"windowSize": 100001}"#),
            Err(ConfigError::TooLarge { name: "windowSize", .. })
        ));
        assert!(PanelConfig::from_json(r#"{"windowSize": 100000, "scrollStep": 100000}"#).is_ok());
    }
}
