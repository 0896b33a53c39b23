use analysis_core::{
    AnalysisError, EntryRange, IndicatorSet, PositionPlan, Signal, INFORMATIONAL_ENVELOPE,
};

/// Volatility assumed when the indicator set carries none (2% per bar).
pub const DEFAULT_VOLATILITY: f64 = 0.02;
/// ATR as a fraction of price, assumed when no ATR is available.
pub const DEFAULT_ATR_FRACTION: f64 = 0.02;

const STRONG_CONVICTION: f64 = 0.8;
const MODERATE_CONVICTION: f64 = 0.6;

const SIZE_MULTIPLIER: f64 = 0.15;
/// Soft cap on portfolio share, even at maximal strength and confidence
const MAX_POSITION_FRACTION: f64 = 0.10;
const HOLD_POSITION_PCT: f64 = 2.0;

/// Derives entry band, exits and sizing from a scored signal.
///
/// Every price level is a multiple of the current price (ATR enters as a
/// fraction of price), so plans scale linearly with the price they are
/// computed at.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionCalculator;

struct RiskInputs {
    volatility: f64,
    atr_fraction: f64,
}

impl RiskInputs {
    fn from_indicators(indicators: &IndicatorSet, price: f64) -> Self {
        let volatility = indicators
            .volatility
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(DEFAULT_VOLATILITY);
        let atr_fraction = indicators
            .atr
            .filter(|a| a.is_finite() && *a > 0.0)
            .map(|a| (a / price).clamp(0.001, 0.10))
            .unwrap_or(DEFAULT_ATR_FRACTION);
        Self { volatility, atr_fraction }
    }

    fn stop_pct(&self) -> f64 {
        (self.volatility * 1.5).clamp(0.02, 0.05)
    }

    fn trailing_distance_pct(&self) -> f64 {
        (self.volatility * 100.0).clamp(1.0, 3.0)
    }
}

impl PositionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Plan for `signal` at `price`. Never fails: an unusable price yields
    /// the "position sizing unavailable" sentinel plan.
    pub fn calculate(
        &self,
        signal: Signal,
        strength: f64,
        confidence: f64,
        price: f64,
        indicators: &IndicatorSet,
    ) -> PositionPlan {
        match self.try_calculate(signal, strength, confidence, price, indicators) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "position sizing unavailable");
                PositionPlan::unavailable(0.0)
            }
        }
    }

    pub fn try_calculate(
        &self,
        signal: Signal,
        strength: f64,
        confidence: f64,
        price: f64,
        indicators: &IndicatorSet,
    ) -> Result<PositionPlan, AnalysisError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(AnalysisError::InvalidPrice(price));
        }

        let risk = RiskInputs::from_indicators(indicators, price);
        // band tier follows the signal's direction, sizing the raw composite
        let conviction = signal.directional_strength(strength).clamp(0.0, 1.0);
        let size_pct = position_size_pct(strength.clamp(0.0, 1.0), confidence.clamp(0.0, 1.0));

        let plan = match signal {
            Signal::Hold => hold_envelope(price),
            Signal::Buy => long_plan(price, conviction, size_pct, &risk, indicators),
            Signal::Sell => short_plan(price, conviction, size_pct, &risk, indicators),
        };
        Ok(plan)
    }
}

fn position_size_pct(strength: f64, confidence: f64) -> f64 {
    (strength * confidence * SIZE_MULTIPLIER).min(MAX_POSITION_FRACTION) * 100.0
}

fn hold_envelope(price: f64) -> PositionPlan {
    PositionPlan {
        entry_range: EntryRange { min: price * 0.95, max: price * 1.05, optimal: price },
        profit_target: price * 1.02,
        stop_loss: price * 0.95,
        trailing_stop_activation: price * 1.03,
        trailing_stop_distance_pct: 2.0,
        position_size_pct: HOLD_POSITION_PCT,
        actionable: false,
        note: Some(INFORMATIONAL_ENVELOPE.to_string()),
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn long_entry(price: f64, conviction: f64, indicators: &IndicatorSet) -> EntryRange {
    if conviction > STRONG_CONVICTION {
        return EntryRange { min: price * 0.995, max: price * 1.005, optimal: price };
    }
    if conviction > MODERATE_CONVICTION {
        let optimal = price * 0.995;
        let floor = price * 0.985;
        let min = positive(indicators.support).map_or(floor, |s| s.max(floor)).min(optimal);
        return EntryRange { min, max: price * 1.01, optimal };
    }
    let optimal = price * 0.98;
    let floor = price * 0.97;
    let min = positive(indicators.bb_lower).map_or(floor, |l| l.max(floor)).min(optimal);
    EntryRange { min, max: price * 0.99, optimal }
}

fn short_entry(price: f64, conviction: f64, indicators: &IndicatorSet) -> EntryRange {
    if conviction > STRONG_CONVICTION {
        return EntryRange { min: price * 0.995, max: price * 1.005, optimal: price };
    }
    if conviction > MODERATE_CONVICTION {
        let optimal = price * 1.005;
        let ceiling = price * 1.015;
        let max = positive(indicators.resistance).map_or(ceiling, |r| r.min(ceiling)).max(optimal);
        return EntryRange { min: price * 0.99, max, optimal };
    }
    let optimal = price * 1.02;
    let ceiling = price * 1.03;
    let max = positive(indicators.bb_upper).map_or(ceiling, |u| u.min(ceiling)).max(optimal);
    EntryRange { min: price * 1.01, max, optimal }
}

fn long_plan(
    price: f64,
    conviction: f64,
    size_pct: f64,
    risk: &RiskInputs,
    indicators: &IndicatorSet,
) -> PositionPlan {
    let entry_range = long_entry(price, conviction, indicators);
    let atr_proxy = price * risk.atr_fraction;
    let stop_pct = risk.stop_pct();

    // Target clears the worst-case fill, stop sits below the best one
    let profit_target = entry_range.max + 2.0 * atr_proxy;
    let mut stop_loss = price * (1.0 - stop_pct);
    if stop_loss >= entry_range.min {
        stop_loss = entry_range.min * (1.0 - stop_pct);
    }

    PositionPlan {
        entry_range,
        profit_target,
        stop_loss,
        trailing_stop_activation: price * (1.0 + risk.atr_fraction * 1.5),
        trailing_stop_distance_pct: risk.trailing_distance_pct(),
        position_size_pct: size_pct,
        actionable: true,
        note: None,
    }
}

fn short_plan(
    price: f64,
    conviction: f64,
    size_pct: f64,
    risk: &RiskInputs,
    indicators: &IndicatorSet,
) -> PositionPlan {
    let entry_range = short_entry(price, conviction, indicators);
    let atr_proxy = price * risk.atr_fraction;
    let stop_pct = risk.stop_pct();

    // Mirror of the long plan: target below the lowest short fill
    let profit_target = entry_range.min - 2.0 * atr_proxy;
    let mut stop_loss = price * (1.0 + stop_pct);
    if stop_loss <= entry_range.max {
        stop_loss = entry_range.max * (1.0 + stop_pct);
    }

    PositionPlan {
        entry_range,
        profit_target,
        stop_loss,
        trailing_stop_activation: price * (1.0 - risk.atr_fraction * 1.5),
        trailing_stop_distance_pct: risk.trailing_distance_pct(),
        position_size_pct: size_pct,
        actionable: true,
        note: None,
    }
}
