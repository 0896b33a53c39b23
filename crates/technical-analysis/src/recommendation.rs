use analysis_core::{Signal, SignalResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::StrongBuy => "STRONG_BUY",
            TradeAction::Buy => "BUY",
            TradeAction::Hold => "HOLD",
            TradeAction::Sell => "SELL",
            TradeAction::StrongSell => "STRONG_SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conviction {
    High,
    Medium,
    Low,
}

/// Actionable summary of a `SignalResult`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecommendation {
    pub action: TradeAction,
    pub conviction: Conviction,
    pub score: f64,
    pub confidence: f64,
    /// Directional strength weighted by confidence
    pub adjusted_score: f64,
    pub reasoning: String,
}

const HIGH_CONVICTION: f64 = 0.75;
const MEDIUM_CONVICTION: f64 = 0.60;

pub fn recommend_trade(result: &SignalResult) -> TradeRecommendation {
    let adjusted_score = result.signal.directional_strength(result.strength) * result.confidence;

    let (action, conviction) = match result.signal {
        Signal::Hold => (TradeAction::Hold, Conviction::Low),
        Signal::Buy if adjusted_score >= HIGH_CONVICTION => (TradeAction::StrongBuy, Conviction::High),
        Signal::Buy if adjusted_score >= MEDIUM_CONVICTION => (TradeAction::Buy, Conviction::Medium),
        Signal::Sell if adjusted_score >= HIGH_CONVICTION => (TradeAction::StrongSell, Conviction::High),
        Signal::Sell if adjusted_score >= MEDIUM_CONVICTION => (TradeAction::Sell, Conviction::Medium),
        Signal::Buy | Signal::Sell => (TradeAction::Hold, Conviction::Low),
    };

    TradeRecommendation {
        action,
        conviction,
        score: result.strength,
        confidence: result.confidence,
        adjusted_score,
        reasoning: result.reasoning_text(),
    }
}
