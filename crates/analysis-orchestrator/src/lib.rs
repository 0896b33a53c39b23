use std::sync::Arc;

use analysis_core::{
    AnalysisError, IndicatorSet, MarketContext, PriceBar, SignalGenerator, SignalResult,
};
use execution_advisor::{
    AlgorithmCatalog, AlgorithmRecommendation, ExecutionAdvisor, ExecutionInsightReport,
    MarketCondition, MarketConditions,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use technical_analysis::{
    recommend_trade, IndicatorExtractor, TechnicalScoringEngine, TradeRecommendation,
};

pub mod config;
pub use config::EngineConfig;

#[cfg(test)]
mod tests;

/// Caller choices that shape execution advice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionPreferences {
    /// Falls back to `EngineConfig::default_trend_strength`
    pub trend_strength: Option<f64>,
    pub stealth_required: bool,
    /// Order size in shares; falls back to `EngineConfig::default_position_size`
    pub position_size: Option<u64>,
}

/// One symbol's input for batch evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    #[serde(default)]
    pub context: MarketContext,
    #[serde(default)]
    pub bars: Vec<PriceBar>,
}

/// A signal together with how to execute it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedSignal {
    pub signal: SignalResult,
    pub trade: TradeRecommendation,
    /// Whole shares for the planned position at the current price
    pub share_quantity: u64,
    pub recommended_algorithm: String,
    pub algorithm_recommendations: Vec<AlgorithmRecommendation>,
    pub market_conditions: Vec<MarketCondition>,
    pub execution_insights: ExecutionInsightReport,
    pub algo_confidence: f64,
}

/// Entry point for collaborators. Pure and synchronous; safe to share
/// across threads.
pub struct SignalEngine {
    config: EngineConfig,
    extractor: IndicatorExtractor,
    scorer: TechnicalScoringEngine,
    advisor: ExecutionAdvisor,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), Arc::new(AlgorithmCatalog::standard()))
    }
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Result<Self, AnalysisError> {
        Self::with_catalog(config, Arc::new(AlgorithmCatalog::standard()))
    }

    /// Build around an existing shared catalog.
    pub fn with_catalog(
        config: EngineConfig,
        catalog: Arc<AlgorithmCatalog>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::build(config, catalog))
    }

    fn build(config: EngineConfig, catalog: Arc<AlgorithmCatalog>) -> Self {
        Self {
            extractor: IndicatorExtractor::new(config.indicators.clone()),
            scorer: TechnicalScoringEngine::new(),
            advisor: ExecutionAdvisor::new(catalog),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn advisor(&self) -> &ExecutionAdvisor {
        &self.advisor
    }

    pub fn evaluate_signal(
        &self,
        symbol: &str,
        context: &MarketContext,
        indicators: &IndicatorSet,
    ) -> SignalResult {
        self.scorer.evaluate_signal(symbol, context, indicators)
    }

    /// Extract indicators from `bars`, then score them. The last bar's
    /// timestamp stands in for a missing snapshot time.
    pub fn evaluate_bars(
        &self,
        symbol: &str,
        context: &MarketContext,
        bars: &[PriceBar],
    ) -> SignalResult {
        let indicators = self.extractor.extract(bars);
        let context = MarketContext {
            as_of: context.as_of.or_else(|| bars.last().map(|b| b.timestamp)),
            ..context.clone()
        };
        self.evaluate_signal(symbol, &context, &indicators)
    }

    pub fn classify(&self, context: &MarketContext) -> MarketConditions {
        self.advisor.classify(context)
    }

    pub fn recommend_algorithms(
        &self,
        conditions: &MarketConditions,
        signal_strength: f64,
        confidence: f64,
        trend_strength: f64,
        stealth_required: bool,
    ) -> Vec<AlgorithmRecommendation> {
        self.advisor.recommend_algorithms(
            conditions,
            signal_strength,
            confidence,
            trend_strength,
            stealth_required,
        )
    }

    pub fn execution_insights(
        &self,
        algorithm: &str,
        position_size: u64,
        average_volume: f64,
    ) -> ExecutionInsightReport {
        self.advisor.execution_insights(algorithm, position_size, average_volume)
    }

    /// Attach execution advice to an already scored signal.
    pub fn enhance(
        &self,
        symbol: &str,
        context: &MarketContext,
        result: &SignalResult,
        preferences: &ExecutionPreferences,
    ) -> EnhancedSignal {
        let conditions = self.classify(context);
        let trend_strength = preferences
            .trend_strength
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .unwrap_or(self.config.default_trend_strength);
        let signal_strength = result.signal.directional_strength(result.strength);

        let mut ranked = self.recommend_algorithms(
            &conditions,
            signal_strength,
            result.confidence,
            trend_strength,
            preferences.stealth_required,
        );

        let (recommended_algorithm, algo_confidence) = match ranked.first() {
            Some(top) => (top.name.clone(), top.score),
            None => (execution_advisor::catalog::VWAP.to_string(), 0.5),
        };

        let position_size = preferences
            .position_size
            .unwrap_or(self.config.default_position_size);
        let execution_insights =
            self.execution_insights(&recommended_algorithm, position_size, context.average_volume);

        let price = context
            .resolve_price(result.indicators.close)
            .unwrap_or(0.0);
        let share_quantity = result
            .position
            .share_quantity(self.config.portfolio_value, price);

        ranked.truncate(self.config.top_recommendations);

        tracing::info!(
            symbol,
            signal = %result.signal,
            algorithm = %recommended_algorithm,
            score = algo_confidence,
            "enhanced signal with execution advice"
        );

        EnhancedSignal {
            signal: result.clone(),
            trade: recommend_trade(result),
            share_quantity,
            recommended_algorithm,
            algorithm_recommendations: ranked,
            market_conditions: conditions.tags(),
            execution_insights,
            algo_confidence,
        }
    }

    /// Evaluate and enhance one snapshot.
    pub fn run(&self, snapshot: &SymbolSnapshot, preferences: &ExecutionPreferences) -> EnhancedSignal {
        let result = self.evaluate_bars(&snapshot.symbol, &snapshot.context, &snapshot.bars);
        self.enhance(&snapshot.symbol, &snapshot.context, &result, preferences)
    }

    /// Independent symbols evaluated in parallel. Output order matches input.
    pub fn evaluate_batch(
        &self,
        snapshots: &[SymbolSnapshot],
        preferences: &ExecutionPreferences,
    ) -> Vec<EnhancedSignal> {
        tracing::info!(symbols = snapshots.len(), "evaluating batch");
        snapshots
            .par_iter()
            .map(|snapshot| self.run(snapshot, preferences))
            .collect()
    }
}

impl SignalGenerator for SignalEngine {
    fn evaluate_signal(
        &self,
        symbol: &str,
        context: &MarketContext,
        indicators: &IndicatorSet,
    ) -> SignalResult {
        SignalEngine::evaluate_signal(self, symbol, context, indicators)
    }
}
