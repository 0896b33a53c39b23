use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};

use crate::conditions::MarketCondition;

pub const VWAP: &str = "VWAP";
pub const TWAP: &str = "TWAP";
pub const ARRIVAL_PX: &str = "ArrivalPx";
pub const ADAPTIVE: &str = "Adaptive";
pub const PCT_VOL: &str = "PctVol";
pub const DARK_ICE: &str = "DarkIce";
pub const BALANCE_IMPACT: &str = "BalanceImpact";
pub const MIN_IMPACT: &str = "MinImpact";
pub const CLOSE_PX: &str = "ClosePx";
pub const PCT_VOL_PX: &str = "PctVolPx";
pub const PCT_VOL_SZ: &str = "PctVolSz";
pub const PCT_VOL_TM: &str = "PctVolTm";
pub const JEFFERIES_VWAP: &str = "JefferiesVWAP";
pub const CSFB_INLINE: &str = "CSFBInline";
pub const QB_STROBE: &str = "QBStrobe";
pub const ACCUMULATE: &str = "Accumulate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketImpact {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl MarketImpact {
    /// Rough cost estimate in basis points
    pub fn impact_bps(&self) -> f64 {
        match self {
            MarketImpact::VeryLow => 1.0,
            MarketImpact::Low => 2.0,
            MarketImpact::Medium => 5.0,
            MarketImpact::High => 8.0,
            MarketImpact::VeryHigh => 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionSpeed {
    VeryFast,
    Fast,
    Moderate,
    Adaptive,
    SlowSteady,
    VerySlow,
}

impl ExecutionSpeed {
    pub fn is_fast(&self) -> bool {
        matches!(self, ExecutionSpeed::Fast | ExecutionSpeed::VeryFast)
    }

    pub fn estimated_minutes(&self) -> u32 {
        match self {
            ExecutionSpeed::VeryFast => 2,
            ExecutionSpeed::Fast => 5,
            ExecutionSpeed::Moderate => 30,
            ExecutionSpeed::Adaptive => 45,
            ExecutionSpeed::SlowSteady => 120,
            ExecutionSpeed::VerySlow => 240,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StealthLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl StealthLevel {
    pub fn is_high(&self) -> bool {
        matches!(self, StealthLevel::High | StealthLevel::VeryHigh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskProfile {
    UltraConservative,
    Conservative,
    Balanced,
    Moderate,
    Stealth,
    Aggressive,
    VeryAggressive,
}

/// Static description of one execution algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmProfile {
    pub name: String,
    pub market_impact: MarketImpact,
    pub execution_speed: ExecutionSpeed,
    pub stealth_level: StealthLevel,
    /// Target share of market volume (0.1 = 10%)
    pub volume_participation: f64,
    /// Baseline suitability before condition matching, 0.0 to 1.0
    pub base_suitability: f64,
    pub recommended_conditions: Vec<MarketCondition>,
    pub risk_profile: RiskProfile,
}

impl AlgorithmProfile {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &str,
        market_impact: MarketImpact,
        execution_speed: ExecutionSpeed,
        stealth_level: StealthLevel,
        volume_participation: f64,
        base_suitability: f64,
        recommended_conditions: &[MarketCondition],
        risk_profile: RiskProfile,
    ) -> Self {
        Self {
            name: name.to_string(),
            market_impact,
            execution_speed,
            stealth_level,
            volume_participation,
            base_suitability,
            recommended_conditions: recommended_conditions.to_vec(),
            risk_profile,
        }
    }

    /// How many of the profile's recommended conditions are present.
    pub fn matched_conditions(&self, current: &[MarketCondition]) -> usize {
        self.recommended_conditions
            .iter()
            .filter(|c| current.contains(c))
            .count()
    }
}

/// Immutable, ordered set of algorithm profiles. Built once and shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmCatalog {
    profiles: Vec<AlgorithmProfile>,
}

impl AlgorithmCatalog {
    /// The sixteen broker algorithms, in their canonical order.
    pub fn standard() -> Self {
        use ExecutionSpeed as S;
        use MarketCondition::*;
        use MarketImpact as I;
        use RiskProfile as R;
        use StealthLevel as L;

        let profiles = vec![
            AlgorithmProfile::new(VWAP, I::Low, S::Moderate, L::High, 0.10, 0.80, &[HighVolume, HighVolatility], R::Conservative),
            AlgorithmProfile::new(TWAP, I::Low, S::SlowSteady, L::High, 0.05, 0.70, &[LowVolatility, Sideways], R::Conservative),
            AlgorithmProfile::new(ARRIVAL_PX, I::Medium, S::Fast, L::Medium, 0.15, 0.90, &[StrongTrend, HighVolatility], R::Aggressive),
            AlgorithmProfile::new(ADAPTIVE, I::Medium, S::Adaptive, L::Medium, 0.08, 0.85, &[LowVolatility], R::Balanced),
            AlgorithmProfile::new(PCT_VOL, I::High, S::Fast, L::Low, 0.20, 0.75, &[HighVolume], R::Aggressive),
            AlgorithmProfile::new(DARK_ICE, I::VeryLow, S::SlowSteady, L::VeryHigh, 0.03, 0.90, &[HighVolume, StrongTrend], R::Stealth),
            AlgorithmProfile::new(BALANCE_IMPACT, I::Low, S::Moderate, L::High, 0.07, 0.80, &[LowVolatility, Sideways], R::Balanced),
            AlgorithmProfile::new(MIN_IMPACT, I::VeryLow, S::VerySlow, L::VeryHigh, 0.02, 0.85, &[LowVolume, LowVolatility], R::UltraConservative),
            AlgorithmProfile::new(CLOSE_PX, I::Medium, S::Fast, L::Low, 0.25, 0.70, &[StrongTrend], R::Aggressive),
            AlgorithmProfile::new(PCT_VOL_PX, I::Medium, S::Moderate, L::Medium, 0.12, 0.75, &[HighVolume, HighVolatility], R::Moderate),
            AlgorithmProfile::new(PCT_VOL_SZ, I::Medium, S::Moderate, L::Medium, 0.15, 0.75, &[HighVolume], R::Moderate),
            AlgorithmProfile::new(PCT_VOL_TM, I::Medium, S::SlowSteady, L::High, 0.10, 0.80, &[HighVolume, Sideways], R::Conservative),
            AlgorithmProfile::new(JEFFERIES_VWAP, I::Low, S::Moderate, L::High, 0.08, 0.85, &[HighVolume, HighVolatility], R::Conservative),
            AlgorithmProfile::new(CSFB_INLINE, I::Low, S::Fast, L::Medium, 0.12, 0.80, &[StrongTrend, HighVolume], R::Moderate),
            AlgorithmProfile::new(QB_STROBE, I::High, S::VeryFast, L::Low, 0.30, 0.90, &[StrongTrend, HighVolatility], R::VeryAggressive),
            AlgorithmProfile::new(ACCUMULATE, I::VeryLow, S::VerySlow, L::VeryHigh, 0.01, 0.80, &[LowVolatility, Sideways], R::UltraConservative),
        ];

        Self { profiles }
    }

    pub fn profiles(&self) -> &[AlgorithmProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AlgorithmProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn lookup(&self, name: &str) -> Result<&AlgorithmProfile, AnalysisError> {
        self.get(name)
            .ok_or_else(|| AnalysisError::UnknownAlgorithm(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }
}

impl Default for AlgorithmCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
