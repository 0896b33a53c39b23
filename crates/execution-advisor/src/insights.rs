use serde::{Deserialize, Serialize};

use crate::catalog::{AlgorithmCatalog, RiskProfile, StealthLevel};

/// Average daily volume assumed when the caller has none.
pub const DEFAULT_AVERAGE_VOLUME: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeSuitability {
    High,
    Medium,
    Low,
}

impl SizeSuitability {
    fn from_participation_impact(impact: f64) -> Self {
        if impact < 0.1 {
            SizeSuitability::High
        } else if impact < 0.2 {
            SizeSuitability::Medium
        } else {
            SizeSuitability::Low
        }
    }
}

/// Cost and timing estimate for running one order through an algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionInsight {
    pub algorithm: String,
    pub estimated_execution_minutes: u32,
    pub estimated_impact_bps: f64,
    pub participation_rate: f64,
    /// Order share of average volume scaled by the participation rate
    pub participation_impact: f64,
    pub stealth_rating: StealthLevel,
    pub risk_profile: RiskProfile,
    pub size_suitability: SizeSuitability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionInsightReport {
    Known(ExecutionInsight),
    UnknownAlgorithm { algorithm: String },
}

impl ExecutionInsightReport {
    pub fn insight(&self) -> Option<&ExecutionInsight> {
        match self {
            ExecutionInsightReport::Known(insight) => Some(insight),
            ExecutionInsightReport::UnknownAlgorithm { .. } => None,
        }
    }
}

pub fn execution_insights(
    catalog: &AlgorithmCatalog,
    algorithm: &str,
    position_size: u64,
    average_volume: f64,
) -> ExecutionInsightReport {
    let profile = match catalog.lookup(algorithm) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "execution insight requested for unknown algorithm");
            return ExecutionInsightReport::UnknownAlgorithm { algorithm: algorithm.to_string() };
        }
    };

    let average_volume = if average_volume.is_finite() && average_volume > 0.0 {
        average_volume
    } else {
        DEFAULT_AVERAGE_VOLUME
    };
    let participation_impact = position_size as f64 * profile.volume_participation / average_volume;

    ExecutionInsightReport::Known(ExecutionInsight {
        algorithm: profile.name.clone(),
        estimated_execution_minutes: profile.execution_speed.estimated_minutes(),
        estimated_impact_bps: profile.market_impact.impact_bps(),
        participation_rate: profile.volume_participation,
        participation_impact,
        stealth_rating: profile.stealth_level,
        risk_profile: profile.risk_profile,
        size_suitability: SizeSuitability::from_participation_impact(participation_impact),
    })
}
