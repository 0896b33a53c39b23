use serde::{Deserialize, Serialize};

/// Names of the indicators the extractor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKey {
    Rsi,
    Macd,
    MacdSignal,
    MacdHistogram,
    BbUpper,
    BbLower,
    BbMiddle,
    BbPosition,
    SmaShort,
    SmaLong,
    VolumeSma,
    VolumeRatio,
    PriceChange1dPct,
    PriceChange5dPct,
    Atr,
    Volatility,
    Support,
    Resistance,
    Close,
}

impl IndicatorKey {
    /// Keys the scoring engine needs before it will score anything.
    pub const REQUIRED: [IndicatorKey; 14] = [
        IndicatorKey::Rsi,
        IndicatorKey::Macd,
        IndicatorKey::MacdSignal,
        IndicatorKey::MacdHistogram,
        IndicatorKey::BbUpper,
        IndicatorKey::BbLower,
        IndicatorKey::BbMiddle,
        IndicatorKey::BbPosition,
        IndicatorKey::SmaShort,
        IndicatorKey::SmaLong,
        IndicatorKey::VolumeSma,
        IndicatorKey::VolumeRatio,
        IndicatorKey::PriceChange1dPct,
        IndicatorKey::PriceChange5dPct,
    ];

    pub const ALL: [IndicatorKey; 19] = [
        IndicatorKey::Rsi,
        IndicatorKey::Macd,
        IndicatorKey::MacdSignal,
        IndicatorKey::MacdHistogram,
        IndicatorKey::BbUpper,
        IndicatorKey::BbLower,
        IndicatorKey::BbMiddle,
        IndicatorKey::BbPosition,
        IndicatorKey::SmaShort,
        IndicatorKey::SmaLong,
        IndicatorKey::VolumeSma,
        IndicatorKey::VolumeRatio,
        IndicatorKey::PriceChange1dPct,
        IndicatorKey::PriceChange5dPct,
        IndicatorKey::Atr,
        IndicatorKey::Volatility,
        IndicatorKey::Support,
        IndicatorKey::Resistance,
        IndicatorKey::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKey::Rsi => "rsi",
            IndicatorKey::Macd => "macd",
            IndicatorKey::MacdSignal => "macd_signal",
            IndicatorKey::MacdHistogram => "macd_histogram",
            IndicatorKey::BbUpper => "bb_upper",
            IndicatorKey::BbLower => "bb_lower",
            IndicatorKey::BbMiddle => "bb_middle",
            IndicatorKey::BbPosition => "bb_position",
            IndicatorKey::SmaShort => "sma_short",
            IndicatorKey::SmaLong => "sma_long",
            IndicatorKey::VolumeSma => "volume_sma",
            IndicatorKey::VolumeRatio => "volume_ratio",
            IndicatorKey::PriceChange1dPct => "price_change_1d_pct",
            IndicatorKey::PriceChange5dPct => "price_change_5d_pct",
            IndicatorKey::Atr => "atr",
            IndicatorKey::Volatility => "volatility",
            IndicatorKey::Support => "support",
            IndicatorKey::Resistance => "resistance",
            IndicatorKey::Close => "close",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        IndicatorKey::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

/// Point-in-time indicator values for one evaluation.
///
/// Every field is optional: `None` means "not computed", which is distinct
/// from a computed value of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_middle: Option<f64>,
    /// Position of the close inside the Bollinger band, 0 = lower, 1 = upper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_short: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_long: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_sma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_1d_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_5d_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    /// Fractional volatility of returns (0.02 = 2%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
}

impl IndicatorSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: IndicatorKey) -> Option<f64> {
        match key {
            IndicatorKey::Rsi => self.rsi,
            IndicatorKey::Macd => self.macd,
            IndicatorKey::MacdSignal => self.macd_signal,
            IndicatorKey::MacdHistogram => self.macd_histogram,
            IndicatorKey::BbUpper => self.bb_upper,
            IndicatorKey::BbLower => self.bb_lower,
            IndicatorKey::BbMiddle => self.bb_middle,
            IndicatorKey::BbPosition => self.bb_position,
            IndicatorKey::SmaShort => self.sma_short,
            IndicatorKey::SmaLong => self.sma_long,
            IndicatorKey::VolumeSma => self.volume_sma,
            IndicatorKey::VolumeRatio => self.volume_ratio,
            IndicatorKey::PriceChange1dPct => self.price_change_1d_pct,
            IndicatorKey::PriceChange5dPct => self.price_change_5d_pct,
            IndicatorKey::Atr => self.atr,
            IndicatorKey::Volatility => self.volatility,
            IndicatorKey::Support => self.support,
            IndicatorKey::Resistance => self.resistance,
            IndicatorKey::Close => self.close,
        }
    }

    pub fn set(&mut self, key: IndicatorKey, value: Option<f64>) {
        let slot = match key {
            IndicatorKey::Rsi => &mut self.rsi,
            IndicatorKey::Macd => &mut self.macd,
            IndicatorKey::MacdSignal => &mut self.macd_signal,
            IndicatorKey::MacdHistogram => &mut self.macd_histogram,
            IndicatorKey::BbUpper => &mut self.bb_upper,
            IndicatorKey::BbLower => &mut self.bb_lower,
            IndicatorKey::BbMiddle => &mut self.bb_middle,
            IndicatorKey::BbPosition => &mut self.bb_position,
            IndicatorKey::SmaShort => &mut self.sma_short,
            IndicatorKey::SmaLong => &mut self.sma_long,
            IndicatorKey::VolumeSma => &mut self.volume_sma,
            IndicatorKey::VolumeRatio => &mut self.volume_ratio,
            IndicatorKey::PriceChange1dPct => &mut self.price_change_1d_pct,
            IndicatorKey::PriceChange5dPct => &mut self.price_change_5d_pct,
            IndicatorKey::Atr => &mut self.atr,
            IndicatorKey::Volatility => &mut self.volatility,
            IndicatorKey::Support => &mut self.support,
            IndicatorKey::Resistance => &mut self.resistance,
            IndicatorKey::Close => &mut self.close,
        };
        *slot = value;
    }

    /// Builder-style setter, handy for assembling sets by hand.
    pub fn with(mut self, key: IndicatorKey, value: f64) -> Self {
        self.set(key, Some(value));
        self
    }

    /// String-keyed lookup for collaborators that address indicators by name.
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        IndicatorKey::parse(name).and_then(|k| self.get(k))
    }

    pub fn is_empty(&self) -> bool {
        IndicatorKey::ALL.iter().all(|k| self.get(*k).is_none())
    }

    pub fn missing_required(&self) -> Vec<IndicatorKey> {
        IndicatorKey::REQUIRED
            .iter()
            .copied()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    /// Keys whose value is present but NaN or infinite.
    pub fn non_finite(&self) -> Vec<IndicatorKey> {
        IndicatorKey::ALL
            .iter()
            .copied()
            .filter(|k| self.get(*k).is_some_and(|v| !v.is_finite()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_not_zero() {
        let set = IndicatorSet::empty().with(IndicatorKey::Rsi, 0.0);
        assert_eq!(set.get(IndicatorKey::Rsi), Some(0.0));
        assert_eq!(set.get(IndicatorKey::Macd), None);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_empty_set_reports_all_required_missing() {
        let set = IndicatorSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.missing_required().len(), IndicatorKey::REQUIRED.len());
    }

    #[test]
    fn test_lookup_by_name() {
        let set = IndicatorSet::empty().with(IndicatorKey::BbPosition, 0.85);
        assert_eq!(set.get_by_name("bb_position"), Some(0.85));
        assert_eq!(set.get_by_name("bb_width"), None);
        assert_eq!(IndicatorKey::parse("price_change_5d_pct"), Some(IndicatorKey::PriceChange5dPct));
    }

    #[test]
    fn test_non_finite_detection() {
        let set = IndicatorSet::empty()
            .with(IndicatorKey::Rsi, f64::NAN)
            .with(IndicatorKey::Macd, 1.0);
        assert_eq!(set.non_finite(), vec![IndicatorKey::Rsi]);
    }

    #[test]
    fn test_serde_skips_absent_keys() {
        let set = IndicatorSet::empty().with(IndicatorKey::VolumeRatio, 1.4);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({ "volume_ratio": 1.4 }));
    }
}
