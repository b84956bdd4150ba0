use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::Predicates;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Parse error")]
    Parse(#[from] serde_json::Error),
    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),
}

/// Settings of a triangulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Area tolerance for collinearity and degenerate triangles.
    #[serde(default = "Settings::default_epsilon")]
    pub epsilon: f64,
    /// Arithmetic used by the geometric predicates.
    #[serde(default)]
    pub predicates: Predicates,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            epsilon: Self::default_epsilon(),
            predicates: Predicates::default(),
        }
    }
}

impl Settings {
    fn default_epsilon() -> f64 {
        1e-9
    }

    pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.epsilon.is_finite() || self.epsilon < 0. {
            return Err(SettingsError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}
