use analysis_core::MarketContext;
use serde::{Deserialize, Serialize};

pub const LOW_VOLATILITY_THRESHOLD: f64 = 0.015;
pub const HIGH_VOLATILITY_THRESHOLD: f64 = 0.04;
pub const HIGH_VOLUME_RATIO: f64 = 1.5;
pub const LOW_VOLUME_RATIO: f64 = 0.7;
/// Fractional move beyond which the tape counts as trending
pub const STRONG_TREND_CHANGE: f64 = 0.03;

/// Market condition tags. A snapshot can carry several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketCondition {
    HighVolatility,
    MediumVolatility,
    LowVolatility,
    HighVolume,
    LowVolume,
    LowVolatilityHighVolume,
    StrongTrend,
    Sideways,
}

impl MarketCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCondition::HighVolatility => "HIGH_VOLATILITY",
            MarketCondition::MediumVolatility => "MEDIUM_VOLATILITY",
            MarketCondition::LowVolatility => "LOW_VOLATILITY",
            MarketCondition::HighVolume => "HIGH_VOLUME",
            MarketCondition::LowVolume => "LOW_VOLUME",
            MarketCondition::LowVolatilityHighVolume => "LOW_VOLATILITY_HIGH_VOLUME",
            MarketCondition::StrongTrend => "STRONG_TREND",
            MarketCondition::Sideways => "SIDEWAYS",
        }
    }
}

impl std::fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeLevel {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLevel {
    StrongTrend,
    Sideways,
}

/// Bucketed view of a `MarketContext`.
///
/// The raw volume ratio is kept alongside its bucket because the selection
/// cascade branches on finer thresholds (0.5, 1.2, 2.0, 2.5) than the
/// buckets resolve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    pub volatility: VolatilityLevel,
    pub volume: VolumeLevel,
    pub trend: TrendLevel,
    pub volume_ratio: f64,
}

impl MarketConditions {
    pub fn tags(&self) -> Vec<MarketCondition> {
        let mut tags = Vec::with_capacity(4);
        tags.push(match self.volatility {
            VolatilityLevel::Low => MarketCondition::LowVolatility,
            VolatilityLevel::Medium => MarketCondition::MediumVolatility,
            VolatilityLevel::High => MarketCondition::HighVolatility,
        });
        match self.volume {
            VolumeLevel::High => tags.push(MarketCondition::HighVolume),
            VolumeLevel::Low => tags.push(MarketCondition::LowVolume),
            VolumeLevel::Normal => {}
        }
        if self.volatility == VolatilityLevel::Low && self.volume == VolumeLevel::High {
            tags.push(MarketCondition::LowVolatilityHighVolume);
        }
        tags.push(match self.trend {
            TrendLevel::StrongTrend => MarketCondition::StrongTrend,
            TrendLevel::Sideways => MarketCondition::Sideways,
        });
        tags
    }

    pub fn has(&self, tag: MarketCondition) -> bool {
        self.tags().contains(&tag)
    }
}

/// The single classification used by both the cascade and the scorer.
pub fn classify_conditions(context: &MarketContext) -> MarketConditions {
    let volatility = if context.volatility < LOW_VOLATILITY_THRESHOLD {
        VolatilityLevel::Low
    } else if context.volatility > HIGH_VOLATILITY_THRESHOLD {
        VolatilityLevel::High
    } else {
        VolatilityLevel::Medium
    };

    let volume_ratio = context.volume_ratio();
    let volume = if volume_ratio > HIGH_VOLUME_RATIO {
        VolumeLevel::High
    } else if volume_ratio < LOW_VOLUME_RATIO {
        VolumeLevel::Low
    } else {
        VolumeLevel::Normal
    };

    let trend = if context.price_change_pct.abs() > STRONG_TREND_CHANGE {
        TrendLevel::StrongTrend
    } else {
        TrendLevel::Sideways
    };

    MarketConditions { volatility, volume, trend, volume_ratio }
}
