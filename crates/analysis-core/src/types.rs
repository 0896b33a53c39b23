use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::IndicatorSet;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Discrete trading signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }

    /// Strength in the signal's own direction. The composite score grows
    /// towards 1 for bullish setups, so a SELL is stronger the closer the
    /// composite is to 0.
    pub fn directional_strength(&self, composite: f64) -> f64 {
        match self {
            Signal::Sell => 1.0 - composite,
            Signal::Buy | Signal::Hold => composite,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market snapshot supplied per evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Fractional volatility (0.02 = 2%)
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub average_volume: f64,
    /// Fractional price change (0.03 = 3%)
    #[serde(default)]
    pub price_change_pct: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Snapshot time; stamped onto results instead of the wall clock.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

fn default_volatility() -> f64 {
    0.02
}

impl Default for MarketContext {
    fn default() -> Self {
        Self {
            volatility: default_volatility(),
            volume: 0.0,
            average_volume: 0.0,
            price_change_pct: 0.0,
            current_price: None,
            as_of: None,
        }
    }
}

impl MarketContext {
    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Price the signal is evaluated at: the context's price when usable,
    /// else `fallback_close`. Non-positive and non-finite values are skipped.
    pub fn resolve_price(&self, fallback_close: Option<f64>) -> Option<f64> {
        let usable = |p: &f64| p.is_finite() && *p > 0.0;
        self.current_price.filter(usable).or_else(|| fallback_close.filter(usable))
    }

    /// Current volume relative to its average; 1.0 when no average is known.
    pub fn volume_ratio(&self) -> f64 {
        if self.average_volume > 0.0 {
            self.volume / self.average_volume
        } else {
            1.0
        }
    }
}

/// Entry price band
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryRange {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

impl EntryRange {
    pub fn pinned(price: f64) -> Self {
        Self { min: price, max: price, optimal: price }
    }
}

/// Position-management parameters derived from a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPlan {
    pub entry_range: EntryRange,
    pub profit_target: f64,
    pub stop_loss: f64,
    pub trailing_stop_activation: f64,
    /// Trailing distance in percent (2.0 = 2%)
    pub trailing_stop_distance_pct: f64,
    /// Share of portfolio in percent (2.0 = 2%)
    pub position_size_pct: f64,
    /// False for HOLD envelopes and unavailable plans
    pub actionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

pub const POSITION_SIZING_UNAVAILABLE: &str = "position sizing unavailable";
pub const INFORMATIONAL_ENVELOPE: &str = "informational envelope";

impl PositionPlan {
    /// Sentinel plan returned when no usable price exists. Every price field
    /// is pinned to `sentinel_price` and nothing is sized.
    pub fn unavailable(sentinel_price: f64) -> Self {
        Self {
            entry_range: EntryRange::pinned(sentinel_price),
            profit_target: sentinel_price,
            stop_loss: sentinel_price,
            trailing_stop_activation: sentinel_price,
            trailing_stop_distance_pct: 0.0,
            position_size_pct: 0.0,
            actionable: false,
            note: Some(POSITION_SIZING_UNAVAILABLE.to_string()),
        }
    }

    /// Whole shares affordable at `price` for the planned portfolio share.
    pub fn share_quantity(&self, portfolio_value: f64, price: f64) -> u64 {
        if portfolio_value <= 0.0 || price <= 0.0 || self.position_size_pct <= 0.0 {
            return 0;
        }
        let dollars = portfolio_value * self.position_size_pct / 100.0;
        (dollars / price).floor() as u64
    }

    /// Reward per unit of risk measured from the optimal entry.
    pub fn risk_reward_ratio(&self) -> Option<f64> {
        let risk = (self.entry_range.optimal - self.stop_loss).abs();
        if risk == 0.0 {
            return None;
        }
        Some((self.profit_target - self.entry_range.optimal).abs() / risk)
    }
}

impl Default for PositionPlan {
    fn default() -> Self {
        Self::unavailable(0.0)
    }
}

/// Full result of one (symbol, snapshot) evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub symbol: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub signal: Signal,
    /// Weighted composite score, 0.0 to 1.0
    pub strength: f64,
    pub technical_score: f64,
    pub momentum_score: f64,
    pub volume_score: f64,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub indicators: IndicatorSet,
    pub position: PositionPlan,
}

pub const INSUFFICIENT_TECHNICAL_DATA: &str = "insufficient technical data";
pub const NEUTRAL_MARKET_CONDITIONS: &str = "neutral market conditions";

impl SignalResult {
    /// The canonical all-neutral HOLD result used for every degraded path.
    pub fn neutral(symbol: &str, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            symbol: symbol.to_string(),
            timestamp,
            signal: Signal::Hold,
            strength: 0.5,
            technical_score: 0.5,
            momentum_score: 0.5,
            volume_score: 0.5,
            confidence: 0.5,
            reasoning: vec![INSUFFICIENT_TECHNICAL_DATA.to_string()],
            indicators: IndicatorSet::empty(),
            position: PositionPlan::default(),
        }
    }

    pub fn reasoning_text(&self) -> String {
        self.reasoning.join("; ")
    }

    pub fn is_neutral_fallback(&self) -> bool {
        self.reasoning.len() == 1 && self.reasoning[0] == INSUFFICIENT_TECHNICAL_DATA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signal_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(Signal::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_directional_strength() {
        assert_relative_eq!(Signal::Buy.directional_strength(0.8), 0.8);
        assert_relative_eq!(Signal::Sell.directional_strength(0.2), 0.8);
    }

    #[test]
    fn test_volume_ratio_without_average() {
        let ctx = MarketContext { volume: 500.0, ..Default::default() };
        assert_eq!(ctx.volume_ratio(), 1.0);
        let ctx = MarketContext { volume: 500.0, average_volume: 1000.0, ..Default::default() };
        assert_relative_eq!(ctx.volume_ratio(), 0.5);
    }

    #[test]
    fn test_neutral_result() {
        let r = SignalResult::neutral("AAPL", None);
        assert_eq!(r.signal, Signal::Hold);
        assert_eq!(r.reasoning_text(), INSUFFICIENT_TECHNICAL_DATA);
        assert!(r.is_neutral_fallback());
        assert!(!r.position.actionable);
        assert_eq!(r.position.position_size_pct, 0.0);
    }

    #[test]
    fn test_share_quantity() {
        let plan = PositionPlan { position_size_pct: 5.0, ..PositionPlan::unavailable(100.0) };
        // 5% of 100k = 5000 -> 50 shares at 100
        assert_eq!(plan.share_quantity(100_000.0, 100.0), 50);
        assert_eq!(plan.share_quantity(100_000.0, 0.0), 0);
    }

    #[test]
    fn test_resolve_price_skips_unusable_values() {
        let ctx = MarketContext::default().with_price(0.0);
        assert_eq!(ctx.resolve_price(Some(42.0)), Some(42.0));
        let ctx = MarketContext::default().with_price(f64::NAN);
        assert_eq!(ctx.resolve_price(Some(-1.0)), None);
        let ctx = MarketContext::default().with_price(10.0);
        assert_eq!(ctx.resolve_price(Some(42.0)), Some(10.0));
    }

    #[test]
    fn test_context_deserializes_with_defaults() {
        let ctx: MarketContext = serde_json::from_str(r#"{"volume": 10.0}"#).unwrap();
        assert_relative_eq!(ctx.volatility, 0.02);
        assert_eq!(ctx.current_price, None);
    }
}
