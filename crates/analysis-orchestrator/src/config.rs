use std::path::Path;

use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};
use technical_analysis::IndicatorConfig;

/// Engine configuration. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,

    /// Trend strength used when the caller does not supply one (0.0 to 1.0)
    pub default_trend_strength: f64,

    /// Order size in shares used for execution insights
    pub default_position_size: u64,

    /// How many ranked algorithms an enhanced signal carries
    pub top_recommendations: usize,

    /// Portfolio value used to turn position size percent into shares
    pub portfolio_value: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            default_trend_strength: 0.5,
            default_position_size: 100,
            top_recommendations: 3,
            portfolio_value: 100_000.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::InvalidConfig(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.indicators.validate()?;

        if !(0.0..=1.0).contains(&self.default_trend_strength) {
            return Err(AnalysisError::InvalidConfig(
                "default_trend_strength must be between 0 and 1".to_string(),
            ));
        }
        if !(self.portfolio_value.is_finite() && self.portfolio_value > 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "portfolio_value must be positive".to_string(),
            ));
        }
        if self.top_recommendations == 0 {
            return Err(AnalysisError::InvalidConfig(
                "top_recommendations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
