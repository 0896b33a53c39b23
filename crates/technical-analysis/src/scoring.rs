use std::panic::{catch_unwind, AssertUnwindSafe};

use analysis_core::{
    stats, AnalysisError, IndicatorKey, IndicatorSet, MarketContext, Signal, SignalGenerator,
    SignalResult, NEUTRAL_MARKET_CONDITIONS,
};

use crate::position::PositionCalculator;

/// Weights of the composite score
pub const TECHNICAL_WEIGHT: f64 = 0.5;
pub const MOMENTUM_WEIGHT: f64 = 0.3;
pub const VOLUME_WEIGHT: f64 = 0.2;

/// Strict cut-offs: a composite of exactly 0.7 or 0.3 stays HOLD.
pub const BUY_THRESHOLD: f64 = 0.7;
pub const SELL_THRESHOLD: f64 = 0.3;

const NEUTRAL_SCORE: f64 = 0.5;

/// Run `evaluate` and fall back to the canonical neutral result on error or
/// panic. This is the only place scoring failures are absorbed.
pub fn safe_evaluate<F>(symbol: &str, context: &MarketContext, evaluate: F) -> SignalResult
where
    F: FnOnce() -> Result<SignalResult, AnalysisError>,
{
    match catch_unwind(AssertUnwindSafe(evaluate)) {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::warn!(symbol, kind = e.kind(), error = %e, "signal evaluation degraded to HOLD");
            SignalResult::neutral(symbol, context.as_of)
        }
        Err(_) => {
            tracing::warn!(symbol, "signal evaluation panicked, degraded to HOLD");
            SignalResult::neutral(symbol, context.as_of)
        }
    }
}

/// Sub-score accumulator that records why it moved.
struct Component {
    score: f64,
}

impl Component {
    fn new() -> Self {
        Self { score: NEUTRAL_SCORE }
    }

    fn adjust(&mut self, delta: f64, reason: String, reasoning: &mut Vec<String>) {
        self.score += delta;
        reasoning.push(reason);
    }

    fn finish(self) -> f64 {
        stats::clamp01(self.score)
    }
}

/// Rule-based scorer turning an `IndicatorSet` into a BUY/SELL/HOLD signal
/// with a position plan attached.
#[derive(Debug, Clone, Default)]
pub struct TechnicalScoringEngine {
    position: PositionCalculator,
}

impl TechnicalScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallible core. Rejects empty sets, missing required keys and
    /// non-finite values.
    pub fn score(
        &self,
        symbol: &str,
        context: &MarketContext,
        indicators: &IndicatorSet,
    ) -> Result<SignalResult, AnalysisError> {
        if indicators.is_empty() {
            return Err(AnalysisError::InsufficientData("empty indicator set".to_string()));
        }
        let missing = indicators.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
            return Err(AnalysisError::InsufficientData(format!(
                "missing indicators: {}",
                names.join(", ")
            )));
        }
        let non_finite = indicators.non_finite();
        if !non_finite.is_empty() {
            let names: Vec<&str> = non_finite.iter().map(|k| k.as_str()).collect();
            return Err(AnalysisError::InvalidData(format!(
                "non-finite indicators: {}",
                names.join(", ")
            )));
        }

        let required = |key: IndicatorKey| {
            indicators
                .get(key)
                .ok_or_else(|| AnalysisError::InsufficientData(key.as_str().to_string()))
        };

        let price = context.resolve_price(indicators.close);

        let mut reasoning = Vec::new();

        // Technical
        let mut technical = Component::new();
        let rsi = required(IndicatorKey::Rsi)?;
        if rsi > 70.0 {
            technical.adjust(-0.2, format!("RSI overbought ({rsi:.1})"), &mut reasoning);
        } else if rsi < 30.0 {
            technical.adjust(0.2, format!("RSI oversold ({rsi:.1})"), &mut reasoning);
        } else if (40.0..=60.0).contains(&rsi) {
            technical.adjust(0.1, format!("RSI neutral ({rsi:.1})"), &mut reasoning);
        }

        let macd = required(IndicatorKey::Macd)?;
        let macd_signal = required(IndicatorKey::MacdSignal)?;
        let histogram = required(IndicatorKey::MacdHistogram)?;
        if macd > macd_signal && histogram > 0.0 {
            technical.adjust(0.15, "MACD bullish crossover".to_string(), &mut reasoning);
        } else if macd < macd_signal && histogram < 0.0 {
            technical.adjust(-0.15, "MACD bearish crossover".to_string(), &mut reasoning);
        }

        let bb_position = required(IndicatorKey::BbPosition)?;
        if bb_position > 0.8 {
            technical.adjust(-0.1, "Near BB upper band".to_string(), &mut reasoning);
        } else if bb_position < 0.2 {
            technical.adjust(0.1, "Near BB lower band".to_string(), &mut reasoning);
        }

        let sma_short = required(IndicatorKey::SmaShort)?;
        let sma_long = required(IndicatorKey::SmaLong)?;
        if let Some(price) = price {
            if price > sma_short && sma_short > sma_long {
                technical.adjust(0.1, "Price above MA short > MA long".to_string(), &mut reasoning);
            } else if price < sma_short && sma_short < sma_long {
                technical.adjust(-0.1, "Price below MA short < MA long".to_string(), &mut reasoning);
            }
        }

        // Momentum
        let mut momentum = Component::new();
        let change_1d = required(IndicatorKey::PriceChange1dPct)?;
        if change_1d > 2.0 {
            momentum.adjust(0.2, format!("Strong 1D momentum (+{change_1d:.1}%)"), &mut reasoning);
        } else if change_1d > 0.5 {
            momentum.adjust(0.1, format!("Positive 1D momentum (+{change_1d:.1}%)"), &mut reasoning);
        } else if change_1d < -2.0 {
            momentum.adjust(-0.2, format!("Weak 1D momentum ({change_1d:.1}%)"), &mut reasoning);
        } else if change_1d < -0.5 {
            momentum.adjust(-0.1, format!("Negative 1D momentum ({change_1d:.1}%)"), &mut reasoning);
        }

        let change_5d = required(IndicatorKey::PriceChange5dPct)?;
        if change_5d > 5.0 {
            momentum.adjust(0.15, format!("Strong 5D trend (+{change_5d:.1}%)"), &mut reasoning);
        } else if change_5d < -5.0 {
            momentum.adjust(-0.15, format!("Weak 5D trend ({change_5d:.1}%)"), &mut reasoning);
        }

        // Volume
        let mut volume = Component::new();
        let volume_ratio = required(IndicatorKey::VolumeRatio)?;
        if volume_ratio > 1.5 {
            volume.adjust(0.2, format!("High volume ({volume_ratio:.1}x avg)"), &mut reasoning);
        } else if volume_ratio > 1.2 {
            volume.adjust(0.1, format!("Above avg volume ({volume_ratio:.1}x)"), &mut reasoning);
        } else if volume_ratio < 0.5 {
            volume.adjust(-0.1, format!("Low volume ({volume_ratio:.1}x avg)"), &mut reasoning);
        }

        let technical_score = technical.finish();
        let momentum_score = momentum.finish();
        let volume_score = volume.finish();

        let strength = composite_score(technical_score, momentum_score, volume_score);
        let signal = classify_signal(strength);
        let confidence = confidence_from_scores(technical_score, momentum_score, volume_score);

        if reasoning.is_empty() {
            reasoning.push(NEUTRAL_MARKET_CONDITIONS.to_string());
        }

        let position = match price {
            Some(price) => self.position.calculate(signal, strength, confidence, price, indicators),
            None => {
                tracing::warn!(symbol, "no usable price, position sizing unavailable");
                self.position.calculate(signal, strength, confidence, 0.0, indicators)
            }
        };

        tracing::debug!(
            symbol,
            signal = %signal,
            strength,
            confidence,
            technical_score,
            momentum_score,
            volume_score,
            "signal evaluated"
        );

        Ok(SignalResult {
            symbol: symbol.to_string(),
            timestamp: context.as_of,
            signal,
            strength,
            technical_score,
            momentum_score,
            volume_score,
            confidence,
            reasoning,
            indicators: indicators.clone(),
            position,
        })
    }
}

impl SignalGenerator for TechnicalScoringEngine {
    fn evaluate_signal(
        &self,
        symbol: &str,
        context: &MarketContext,
        indicators: &IndicatorSet,
    ) -> SignalResult {
        safe_evaluate(symbol, context, || self.score(symbol, context, indicators))
    }
}

pub fn composite_score(technical: f64, momentum: f64, volume: f64) -> f64 {
    TECHNICAL_WEIGHT * technical + MOMENTUM_WEIGHT * momentum + VOLUME_WEIGHT * volume
}

pub fn classify_signal(composite: f64) -> Signal {
    if composite > BUY_THRESHOLD {
        Signal::Buy
    } else if composite < SELL_THRESHOLD {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Agreement between the sub-scores: low dispersion means high confidence.
pub fn confidence_from_scores(technical: f64, momentum: f64, volume: f64) -> f64 {
    (1.0 - stats::population_variance(&[technical, momentum, volume])).clamp(0.3, 0.9)
}
