use analysis_core::stats;
use analysis_core::PriceBar;

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Exponential Moving Average with span weighting: each output is the
/// weighted mean of every value so far, weights decaying by `1 - alpha`.
///
/// Output is aligned with the input (one value per element), so short series
/// still produce a usable trailing value.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.is_empty() {
        return vec![];
    }

    let decay = 1.0 - 2.0 / (period as f64 + 1.0);
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    data.iter()
        .map(|&value| {
            weighted_sum = value + decay * weighted_sum;
            weight_total = 1.0 + decay * weight_total;
            weighted_sum / weight_total
        })
        .collect()
}

/// Relative Strength Index from simple rolling means of gains and losses
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    changes
        .windows(period)
        .map(|window| {
            let gain: f64 = window.iter().filter(|c| **c > 0.0).sum();
            let loss: f64 = window.iter().filter(|c| **c < 0.0).map(|c| -c).sum();
            rsi_from_averages(gain / period as f64, loss / period as f64)
        })
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // flat series sits at the midpoint, pure gains saturate
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    fn empty() -> Self {
        MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] }
    }

    /// Last (line, signal, histogram) triple, if any.
    pub fn latest(&self) -> Option<(f64, f64, f64)> {
        Some((*self.macd_line.last()?, *self.signal_line.last()?, *self.histogram.last()?))
    }
}

pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    if fast_period == 0 || signal_period == 0 || slow_period <= fast_period || data.is_empty() {
        return MacdResult::empty();
    }

    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let macd_line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, signal_period);
    let histogram = macd_line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands (sample standard deviation)
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    /// Where `price` sits inside the last band, 0 = lower, 1 = upper.
    /// Zero-width bands report the midpoint.
    pub fn position_of(&self, price: f64) -> Option<f64> {
        let upper = *self.upper.last()?;
        let lower = *self.lower.last()?;
        let width = upper - lower;
        if width <= 0.0 {
            return Some(0.5);
        }
        Some(((price - lower) / width).clamp(0.0, 1.0))
    }
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    if period == 0 || data.len() < period {
        return BollingerBands { upper: vec![], middle: vec![], lower: vec![] };
    }

    let middle = sma(data, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for i in period - 1..data.len() {
        let mean = middle[i + 1 - period];
        let std = stats::std_dev(&data[i + 1 - period..=i]);

        upper.push(mean + std_dev * std);
        lower.push(mean - std_dev * std);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Average True Range
pub fn atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period + 1 {
        return vec![];
    }

    let true_ranges: Vec<f64> = bars
        .windows(2)
        .map(|w| {
            let high_low = w[1].high - w[1].low;
            let high_close = (w[1].high - w[0].close).abs();
            let low_close = (w[1].low - w[0].close).abs();
            high_low.max(high_close).max(low_close)
        })
        .collect();

    let mut atr_values = Vec::with_capacity(true_ranges.len() - period + 1);
    let mut atr = true_ranges[..period].iter().sum::<f64>() / period as f64;
    atr_values.push(atr);

    for tr in &true_ranges[period..] {
        atr = (atr * (period - 1) as f64 + tr) / period as f64;
        atr_values.push(atr);
    }

    atr_values
}

/// Sample standard deviation of the last `lookback` simple returns, as a
/// fraction (0.02 = 2% per bar).
pub fn return_volatility(closes: &[f64], lookback: usize) -> Option<f64> {
    if lookback < 2 || closes.len() < 3 {
        return None;
    }
    let start = closes.len().saturating_sub(lookback + 1);
    let returns = stats::simple_returns(&closes[start..]);
    if returns.len() < 2 {
        return None;
    }
    Some(stats::std_dev(&returns))
}

/// Support and resistance levels from recent pivot points
pub struct SupportResistance {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

pub fn support_resistance(bars: &[PriceBar], lookback: usize) -> SupportResistance {
    let none = SupportResistance { support: None, resistance: None };
    if lookback < 5 || bars.len() < lookback {
        return none;
    }
    let Some(last) = bars.last() else {
        return none;
    };
    let current_price = last.close;

    let recent = &bars[bars.len() - lookback..];
    let mut swing_highs: Vec<f64> = Vec::new();
    let mut swing_lows: Vec<f64> = Vec::new();

    // Swing highs/lows need two bars of confirmation on each side
    for i in 2..recent.len() - 2 {
        if recent[i].high > recent[i - 1].high
            && recent[i].high > recent[i - 2].high
            && recent[i].high > recent[i + 1].high
            && recent[i].high > recent[i + 2].high
        {
            swing_highs.push(recent[i].high);
        }
        if recent[i].low < recent[i - 1].low
            && recent[i].low < recent[i - 2].low
            && recent[i].low < recent[i + 1].low
            && recent[i].low < recent[i + 2].low
        {
            swing_lows.push(recent[i].low);
        }
    }

    // Nearest resistance = lowest swing high above current price
    let resistance = swing_highs
        .iter()
        .filter(|&&h| h > current_price)
        .copied()
        .reduce(f64::min);

    // Nearest support = highest swing low below current price
    let support = swing_lows
        .iter()
        .filter(|&&l| l < current_price)
        .copied()
        .reduce(f64::max);

    SupportResistance { support, resistance }
}
