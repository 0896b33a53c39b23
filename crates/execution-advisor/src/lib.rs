//! Execution-algorithm recommendations: a fixed catalog of broker
//! algorithms, market-condition classification, a priority cascade that
//! picks one algorithm, and a score for every catalog entry.

pub mod catalog;
pub mod conditions;
pub mod insights;
pub mod recommender;
pub mod selector;

pub use catalog::{AlgorithmCatalog, AlgorithmProfile, ExecutionSpeed, MarketImpact, RiskProfile, StealthLevel};
pub use conditions::{classify_conditions, MarketCondition, MarketConditions, TrendLevel, VolatilityLevel, VolumeLevel};
pub use insights::{execution_insights, ExecutionInsight, ExecutionInsightReport, SizeSuitability};
pub use recommender::{AlgorithmRecommendation, ExecutionAdvisor, Rating};
pub use selector::{select_optimal_algorithm, ExecutionRequest};
