use crate::{IndicatorSet, MarketContext, SignalResult};

/// Turns indicator values into a signal with position parameters.
///
/// Implementations must be infallible from the caller's point of view: a
/// degraded input produces the neutral HOLD result, never an error.
pub trait SignalGenerator: Send + Sync {
    fn evaluate_signal(
        &self,
        symbol: &str,
        context: &MarketContext,
        indicators: &IndicatorSet,
    ) -> SignalResult;
}
