pub mod extractor;
pub mod indicators;
pub mod position;
pub mod recommendation;
pub mod scoring;


pub use extractor::{validate_series, IndicatorConfig, IndicatorExtractor, MIN_HISTORY_BARS};
pub use position::PositionCalculator;
pub use recommendation::{recommend_trade, Conviction, TradeAction, TradeRecommendation};
pub use scoring::{safe_evaluate, TechnicalScoringEngine};
