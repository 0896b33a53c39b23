use std::sync::Arc;

use analysis_core::{stats, MarketContext};
use serde::{Deserialize, Serialize};

use crate::catalog::{AlgorithmCatalog, AlgorithmProfile};
use crate::conditions::{classify_conditions, MarketCondition, MarketConditions};
use crate::insights::{execution_insights, ExecutionInsightReport};
use crate::selector::{select_optimal_algorithm, ExecutionRequest};

const BASE_WEIGHT: f64 = 0.4;
const CONDITION_WEIGHT: f64 = 0.2;
const SIGNAL_WEIGHT: f64 = 0.15;
const STEALTH_WEIGHT: f64 = 0.15;
const SELECTION_WEIGHT: f64 = 0.1;

const CONDITION_MATCH_BONUS: f64 = 0.2;
const FAST_SIGNAL_BONUS: f64 = 0.15;
const QUIET_SIGNAL_BONUS: f64 = 0.10;
const STEALTH_BONUS: f64 = 0.2;
const SELECTION_BONUS: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Rating::Excellent
        } else if score >= 0.70 {
            Rating::Good
        } else if score >= 0.50 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "EXCELLENT",
            Rating::Good => "GOOD",
            Rating::Fair => "FAIR",
            Rating::Poor => "POOR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRecommendation {
    pub name: String,
    pub score: f64,
    pub rating: Rating,
}

/// Score one catalog entry against the current conditions.
pub fn score_profile(
    profile: &AlgorithmProfile,
    tags: &[MarketCondition],
    request: &ExecutionRequest,
    selected: bool,
) -> f64 {
    let condition_bonus = CONDITION_MATCH_BONUS * profile.matched_conditions(tags) as f64;

    let signal_bonus = if request.signal_strength > 0.8 && profile.execution_speed.is_fast() {
        FAST_SIGNAL_BONUS
    } else if request.signal_strength < 0.3 && profile.stealth_level.is_high() {
        QUIET_SIGNAL_BONUS
    } else {
        0.0
    };

    let stealth_bonus = if request.stealth_required && profile.stealth_level.is_high() {
        STEALTH_BONUS
    } else {
        0.0
    };

    let selection_bonus = if selected { SELECTION_BONUS } else { 0.0 };

    let score = BASE_WEIGHT * profile.base_suitability
        + CONDITION_WEIGHT * condition_bonus
        + SIGNAL_WEIGHT * signal_bonus
        + STEALTH_WEIGHT * stealth_bonus
        + SELECTION_WEIGHT * selection_bonus;
    stats::clamp01(score)
}

/// Recommends execution algorithms from a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct ExecutionAdvisor {
    catalog: Arc<AlgorithmCatalog>,
}

impl Default for ExecutionAdvisor {
    fn default() -> Self {
        Self::new(Arc::new(AlgorithmCatalog::standard()))
    }
}

impl ExecutionAdvisor {
    pub fn new(catalog: Arc<AlgorithmCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<AlgorithmCatalog> {
        &self.catalog
    }

    pub fn classify(&self, context: &MarketContext) -> MarketConditions {
        classify_conditions(context)
    }

    pub fn select_optimal_algorithm(
        &self,
        conditions: &MarketConditions,
        request: &ExecutionRequest,
    ) -> &'static str {
        select_optimal_algorithm(conditions, request)
    }

    /// Every catalog entry scored and sorted best first. Ties keep catalog
    /// order.
    pub fn recommend_algorithms(
        &self,
        conditions: &MarketConditions,
        signal_strength: f64,
        confidence: f64,
        trend_strength: f64,
        stealth_required: bool,
    ) -> Vec<AlgorithmRecommendation> {
        let request = ExecutionRequest { signal_strength, confidence, trend_strength, stealth_required };
        self.recommend(conditions, &request)
    }

    pub fn recommend(
        &self,
        conditions: &MarketConditions,
        request: &ExecutionRequest,
    ) -> Vec<AlgorithmRecommendation> {
        let tags = conditions.tags();
        let selected = select_optimal_algorithm(conditions, request);

        let mut recommendations: Vec<AlgorithmRecommendation> = self
            .catalog
            .profiles()
            .iter()
            .map(|profile| {
                let score = score_profile(profile, &tags, request, profile.name == selected);
                AlgorithmRecommendation {
                    name: profile.name.clone(),
                    score,
                    rating: Rating::from_score(score),
                }
            })
            .collect();

        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            selected,
            top = recommendations.first().map(|r| r.name.as_str()),
            rating = recommendations.first().map(|r| r.rating.as_str()),
            "execution algorithms ranked"
        );
        recommendations
    }

    pub fn execution_insights(
        &self,
        algorithm: &str,
        position_size: u64,
        average_volume: f64,
    ) -> ExecutionInsightReport {
        execution_insights(&self.catalog, algorithm, position_size, average_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::*;
    use crate::conditions::{TrendLevel, VolatilityLevel, VolumeLevel};
    use approx::assert_relative_eq;

    fn medium_normal() -> MarketConditions {
        MarketConditions {
            volatility: VolatilityLevel::Medium,
            volume: VolumeLevel::Normal,
            trend: TrendLevel::Sideways,
            volume_ratio: 1.0,
        }
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(Rating::from_score(0.85), Rating::Excellent);
        assert_eq!(Rating::from_score(0.849), Rating::Good);
        assert_eq!(Rating::from_score(0.70), Rating::Good);
        assert_eq!(Rating::from_score(0.50), Rating::Fair);
        assert_eq!(Rating::from_score(0.49), Rating::Poor);
        assert_eq!(Rating::from_score(0.9).as_str(), "EXCELLENT");
        assert_eq!(
            serde_json::to_string(&Rating::Poor).unwrap(),
            format!("\"{}\"", Rating::Poor.as_str())
        );
    }

    #[test]
    fn test_score_formula() {
        let catalog = AlgorithmCatalog::standard();
        let dark = catalog.get(DARK_ICE).unwrap();
        let request = ExecutionRequest {
            signal_strength: 0.2,
            confidence: 0.5,
            trend_strength: 0.5,
            stealth_required: true,
        };
        let tags = [MarketCondition::HighVolume, MarketCondition::StrongTrend];
        // 0.4*0.9 + 0.2*0.4 + 0.15*0.10 + 0.15*0.2 + 0.1*0.3
        let score = score_profile(dark, &tags, &request, true);
        assert_relative_eq!(score, 0.36 + 0.08 + 0.015 + 0.03 + 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_every_entry_scored_and_sorted() {
        let advisor = ExecutionAdvisor::default();
        let recs = advisor.recommend_algorithms(&medium_normal(), 0.5, 0.5, 0.5, false);

        assert_eq!(recs.len(), 16);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    }

    #[test]
    fn test_selected_algorithm_gets_bonus() {
        let advisor = ExecutionAdvisor::default();
        // falls through to the TWAP default
        let recs = advisor.recommend_algorithms(&medium_normal(), 0.5, 0.5, 0.5, false);
        let twap = recs.iter().find(|r| r.name == TWAP).unwrap();
        assert_relative_eq!(twap.score, 0.4 * 0.7 + 0.2 * 0.2 + 0.1 * 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let advisor = ExecutionAdvisor::default();
        let recs = advisor.recommend_algorithms(&medium_normal(), 0.5, 0.5, 0.5, false);
        // PctVolPx and PctVolSz share base suitability and match no condition here
        let px = recs.iter().position(|r| r.name == PCT_VOL_PX).unwrap();
        let sz = recs.iter().position(|r| r.name == PCT_VOL_SZ).unwrap();
        assert!(px < sz);
    }

    #[test]
    fn test_recommendations_are_deterministic() {
        let advisor = ExecutionAdvisor::default();
        let conditions = MarketConditions {
            volatility: VolatilityLevel::High,
            volume: VolumeLevel::High,
            trend: TrendLevel::StrongTrend,
            volume_ratio: 1.8,
        };
        let first = advisor.recommend_algorithms(&conditions, 0.85, 0.7, 0.9, false);
        let second = advisor.recommend_algorithms(&conditions, 0.85, 0.7, 0.9, false);
        assert_eq!(first, second);
        assert_eq!(first[0].name, QB_STROBE);
    }
}
