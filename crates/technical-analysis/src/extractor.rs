use analysis_core::{stats, AnalysisError, IndicatorSet, PriceBar};
use serde::{Deserialize, Serialize};

use crate::indicators::*;

/// Absolute floor on history length; the extractor never scores fewer bars.
pub const MIN_HISTORY_BARS: usize = 20;

/// Lookback periods used by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub volume_sma_period: usize,
    pub atr_period: usize,
    pub volatility_lookback: usize,
    pub support_resistance_lookback: usize,
    pub min_bars: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            sma_short_period: 20,
            sma_long_period: 50,
            volume_sma_period: 20,
            atr_period: 14,
            volatility_lookback: 20,
            support_resistance_lookback: 30,
            min_bars: MIN_HISTORY_BARS,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("sma_short_period", self.sma_short_period),
            ("sma_long_period", self.sma_long_period),
            ("volume_sma_period", self.volume_sma_period),
            ("atr_period", self.atr_period),
            ("volatility_lookback", self.volatility_lookback),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(AnalysisError::InvalidConfig(format!("{name} must be greater than 0")));
        }
        if self.macd_slow <= self.macd_fast {
            return Err(AnalysisError::InvalidConfig(
                "macd_slow must be greater than macd_fast".to_string(),
            ));
        }
        if self.min_bars < MIN_HISTORY_BARS {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_bars must be at least {MIN_HISTORY_BARS}"
            )));
        }
        if !(self.bollinger_std_dev.is_finite() && self.bollinger_std_dev > 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "bollinger_std_dev must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a bar series is usable: finite prices, non-negative volume,
/// strictly increasing timestamps.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), AnalysisError> {
    for (i, bar) in bars.iter().enumerate() {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite()) || !bar.volume.is_finite() {
            return Err(AnalysisError::InvalidData(format!("non-finite value in bar {i}")));
        }
        if bar.volume < 0.0 {
            return Err(AnalysisError::InvalidData(format!("negative volume in bar {i}")));
        }
    }
    if let Some(i) = bars.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
        return Err(AnalysisError::InvalidData(format!(
            "timestamps not strictly increasing at bar {}",
            i + 1
        )));
    }
    Ok(())
}

/// Computes the point-in-time `IndicatorSet` for a bar series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorExtractor {
    config: IndicatorConfig,
}

impl IndicatorExtractor {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Strict variant: reports why a series could not be used.
    pub fn try_extract(&self, bars: &[PriceBar]) -> Result<IndicatorSet, AnalysisError> {
        let min_bars = self.config.min_bars.max(MIN_HISTORY_BARS);
        if bars.len() < min_bars {
            return Err(AnalysisError::InsufficientData(format!(
                "need at least {} bars, got {}",
                min_bars,
                bars.len()
            )));
        }
        validate_series(bars)?;

        let cfg = &self.config;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let n = closes.len();
        let current_price = closes[n - 1];

        let mut set = IndicatorSet {
            close: Some(current_price),
            ..IndicatorSet::default()
        };

        set.rsi = rsi(&closes, cfg.rsi_period).last().copied();

        if let Some((line, signal, hist)) =
            macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal).latest()
        {
            set.macd = Some(line);
            set.macd_signal = Some(signal);
            set.macd_histogram = Some(hist);
        }

        let bb = bollinger_bands(&closes, cfg.bollinger_period, cfg.bollinger_std_dev);
        set.bb_upper = bb.upper.last().copied();
        set.bb_middle = bb.middle.last().copied();
        set.bb_lower = bb.lower.last().copied();
        set.bb_position = bb.position_of(current_price);

        set.sma_short = sma(&closes, cfg.sma_short_period).last().copied();
        // Short histories fall back to the short average for the long one
        set.sma_long = sma(&closes, cfg.sma_long_period)
            .last()
            .copied()
            .or(set.sma_short);

        set.volume_sma = sma(&volumes, cfg.volume_sma_period).last().copied();
        set.volume_ratio = set.volume_sma.map(|avg| {
            if avg > 0.0 {
                volumes[n - 1] / avg
            } else {
                1.0
            }
        });

        set.price_change_1d_pct = stats::percent_change(closes[n - 2], current_price);
        set.price_change_5d_pct = if n >= 6 {
            stats::percent_change(closes[n - 6], current_price)
        } else {
            set.price_change_1d_pct
        };

        set.atr = atr(bars, cfg.atr_period).last().copied();
        set.volatility = return_volatility(&closes, cfg.volatility_lookback);

        let sr = support_resistance(bars, cfg.support_resistance_lookback.min(n));
        set.support = sr.support;
        set.resistance = sr.resistance;

        Ok(set)
    }

    /// Lenient variant used by the pipeline: an unusable series yields an
    /// empty set, which downstream scoring turns into a neutral HOLD.
    pub fn extract(&self, bars: &[PriceBar]) -> IndicatorSet {
        match self.try_extract(bars) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, bars = bars.len(), "indicator extraction skipped");
                IndicatorSet::empty()
            }
        }
    }
}
