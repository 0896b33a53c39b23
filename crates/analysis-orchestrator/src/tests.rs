use super::*;
use analysis_core::{IndicatorKey, Signal, INSUFFICIENT_TECHNICAL_DATA};
use approx::assert_relative_eq;
use chrono::DateTime;
use execution_advisor::catalog::{MIN_IMPACT, QB_STROBE};
use execution_advisor::VolatilityLevel;

fn bars_from_closes(closes: &[f64], volume: f64) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar {
            timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
            open: c,
            high: c * 1.01,
            low: c * 0.99,
            close: c,
            volume,
        })
        .collect()
}

/// Sixty bars of a steady slide with a volume spike on the last one.
fn selloff_bars() -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64 * 1.5).collect();
    let mut bars = bars_from_closes(&closes, 1_000_000.0);
    if let Some(last) = bars.last_mut() {
        last.volume = 2_000_000.0;
    }
    bars
}

fn bearish_indicators() -> IndicatorSet {
    IndicatorSet::empty()
        .with(IndicatorKey::Rsi, 75.0)
        .with(IndicatorKey::Macd, -1.2)
        .with(IndicatorKey::MacdSignal, -0.4)
        .with(IndicatorKey::MacdHistogram, -0.8)
        .with(IndicatorKey::BbUpper, 110.0)
        .with(IndicatorKey::BbLower, 90.0)
        .with(IndicatorKey::BbMiddle, 100.0)
        .with(IndicatorKey::BbPosition, 0.85)
        .with(IndicatorKey::SmaShort, 101.0)
        .with(IndicatorKey::SmaLong, 103.0)
        .with(IndicatorKey::VolumeSma, 1_000_000.0)
        .with(IndicatorKey::VolumeRatio, 0.3)
        .with(IndicatorKey::PriceChange1dPct, -3.0)
        .with(IndicatorKey::PriceChange5dPct, -1.0)
}

#[test]
fn test_bearish_indicator_scenario() {
    let engine = SignalEngine::default();
    let context = MarketContext::default().with_price(100.0);
    let result = engine.evaluate_signal("ACME", &context, &bearish_indicators());

    assert_eq!(result.signal, Signal::Sell);
    assert!(result.technical_score <= 0.2);
    assert_relative_eq!(
        result.strength,
        0.5 * result.technical_score + 0.3 * result.momentum_score + 0.2 * result.volume_score,
        epsilon = 1e-12
    );
}

#[test]
fn test_empty_indicator_scenario() {
    let engine = SignalEngine::default();
    let result = engine.evaluate_signal("ACME", &MarketContext::default(), &IndicatorSet::empty());

    assert_eq!(result.signal, Signal::Hold);
    assert_relative_eq!(result.strength, 0.5);
    assert_relative_eq!(result.confidence, 0.5);
    assert_eq!(result.reasoning_text(), INSUFFICIENT_TECHNICAL_DATA);
}

#[test]
fn test_short_history_degrades_to_hold() {
    let engine = SignalEngine::default();
    let bars = bars_from_closes(&[100.0; 10], 1_000.0);
    let result = engine.evaluate_bars("ACME", &MarketContext::default(), &bars);

    assert!(result.is_neutral_fallback());
    // snapshot time falls back to the last bar
    assert_eq!(result.timestamp, Some(bars[9].timestamp));
}

#[test]
fn test_selloff_bars_score_momentum_and_volume() {
    let engine = SignalEngine::default();
    let bars = selloff_bars();
    let result = engine.evaluate_bars("ACME", &MarketContext::default(), &bars);

    assert!(!result.is_neutral_fallback());
    assert!(result.indicators.missing_required().is_empty());
    // 119.0 -> 111.5 over five bars, last volume ~1.9x its average
    assert!(result.reasoning.contains(&"Weak 5D trend (-6.3%)".to_string()));
    assert!(result.reasoning.contains(&"High volume (1.9x avg)".to_string()));
    assert!(result.momentum_score < 0.5);
    assert!(result.volume_score > 0.5);
    // price comes from the last close when the context has none
    assert_relative_eq!(result.position.entry_range.optimal, 111.5, epsilon = 1e-9);
}

#[test]
fn test_stealth_low_volume_scenario() {
    let engine = SignalEngine::default();
    let context = MarketContext {
        volatility: 0.02,
        volume: 300.0,
        average_volume: 1_000.0,
        ..Default::default()
    };
    let conditions = engine.classify(&context);
    let recs = engine.recommend_algorithms(&conditions, 0.5, 0.5, 0.5, true);

    let request = execution_advisor::ExecutionRequest {
        signal_strength: 0.5,
        confidence: 0.5,
        trend_strength: 0.5,
        stealth_required: true,
    };
    assert_eq!(engine.advisor().select_optimal_algorithm(&conditions, &request), MIN_IMPACT);
    assert_eq!(recs[0].name, MIN_IMPACT);
}

#[test]
fn test_volatile_strong_trend_scenario() {
    let engine = SignalEngine::default();
    let context = MarketContext { volatility: 0.05, ..Default::default() };
    let conditions = engine.classify(&context);
    assert_eq!(conditions.volatility, VolatilityLevel::High);

    let recs = engine.recommend_algorithms(&conditions, 0.85, 0.6, 0.9, false);
    assert_eq!(recs[0].name, QB_STROBE);
    assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_enhance_attaches_execution_advice() {
    let engine = SignalEngine::default();
    let context = MarketContext {
        volatility: 0.02,
        volume: 1_000_000.0,
        average_volume: 1_000_000.0,
        current_price: Some(100.0),
        ..Default::default()
    };
    let result = engine.evaluate_signal("ACME", &context, &bearish_indicators());
    let enhanced = engine.enhance("ACME", &context, &result, &ExecutionPreferences::default());

    assert_eq!(enhanced.algorithm_recommendations.len(), 3);
    assert_eq!(enhanced.recommended_algorithm, enhanced.algorithm_recommendations[0].name);
    assert_relative_eq!(enhanced.algo_confidence, enhanced.algorithm_recommendations[0].score);
    assert_eq!(
        enhanced.execution_insights.insight().map(|i| i.algorithm.as_str()),
        Some(enhanced.recommended_algorithm.as_str())
    );
    assert!(enhanced.market_conditions.contains(&MarketCondition::MediumVolatility));

    // position_size_pct of 100k at 100 per share
    let expected = (100_000.0 * result.position.position_size_pct / 100.0 / 100.0).floor() as u64;
    assert_eq!(enhanced.share_quantity, expected);
}

#[test]
fn test_zero_context_price_sizes_from_close() {
    let engine = SignalEngine::default();
    let context = MarketContext::default().with_price(0.0);
    let indicators = bearish_indicators().with(IndicatorKey::Close, 50.0);
    let result = engine.evaluate_signal("ACME", &context, &indicators);
    let enhanced = engine.enhance("ACME", &context, &result, &ExecutionPreferences::default());

    assert!(result.position.actionable);
    assert_relative_eq!(result.position.entry_range.optimal, 50.0);
    // plan and share count both use the close of 50
    let expected = (100_000.0 * result.position.position_size_pct / 100.0 / 50.0).floor() as u64;
    assert!(expected > 0);
    assert_eq!(enhanced.share_quantity, expected);
}

#[test]
fn test_batch_preserves_order() {
    let engine = SignalEngine::default();
    let snapshots: Vec<SymbolSnapshot> = ["AAA", "BBB", "CCC", "DDD"]
        .iter()
        .enumerate()
        .map(|(i, symbol)| SymbolSnapshot {
            symbol: symbol.to_string(),
            context: MarketContext::default(),
            bars: if i % 2 == 0 { selloff_bars() } else { Vec::new() },
        })
        .collect();

    let out = engine.evaluate_batch(&snapshots, &ExecutionPreferences::default());
    let symbols: Vec<&str> = out.iter().map(|e| e.signal.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "BBB", "CCC", "DDD"]);
    assert!(out[1].signal.is_neutral_fallback());
    assert!(!out[0].signal.is_neutral_fallback());
}

#[test]
fn test_invalid_config_rejected() {
    let config = EngineConfig { portfolio_value: -1.0, ..Default::default() };
    assert!(SignalEngine::new(config).is_err());
}
