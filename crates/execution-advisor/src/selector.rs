use serde::{Deserialize, Serialize};

use crate::catalog::*;
use crate::conditions::{MarketConditions, VolatilityLevel};

/// Caller-side inputs to algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub signal_strength: f64,
    pub confidence: f64,
    /// 0.0 (no trend) to 1.0 (strong trend)
    pub trend_strength: f64,
    pub stealth_required: bool,
}

/// Priority cascade picking one algorithm. The first matching rule wins;
/// rule order is significant.
pub fn select_optimal_algorithm(
    conditions: &MarketConditions,
    request: &ExecutionRequest,
) -> &'static str {
    let vr = conditions.volume_ratio;
    let strength = request.signal_strength;
    let trend = request.trend_strength;
    let confidence = request.confidence;

    // 1. stealth or very strong conviction
    if request.stealth_required || strength > 0.9 {
        return if vr < 0.5 {
            MIN_IMPACT
        } else if vr > 1.5 {
            DARK_ICE
        } else {
            ACCUMULATE
        };
    }

    // 2. volatile tape with a strong signal
    if conditions.volatility == VolatilityLevel::High && strength > 0.8 {
        return if trend > 0.7 {
            QB_STROBE
        } else if vr > 2.0 {
            CLOSE_PX
        } else if vr > 1.5 {
            JEFFERIES_VWAP
        } else {
            ARRIVAL_PX
        };
    }

    // 3. very heavy volume
    if vr > 2.5 {
        return if conditions.volatility == VolatilityLevel::High {
            PCT_VOL_PX
        } else if trend > 0.6 {
            CSFB_INLINE
        } else {
            PCT_VOL_SZ
        };
    }

    // 4. heavy volume
    if vr > 1.5 {
        return if conditions.volatility == VolatilityLevel::Low { PCT_VOL_TM } else { VWAP };
    }

    // 5. calm tape
    if conditions.volatility == VolatilityLevel::Low {
        return if confidence > 0.8 {
            ADAPTIVE
        } else if vr < 0.7 {
            BALANCE_IMPACT
        } else {
            TWAP
        };
    }

    // 6. trend following
    if trend > 0.7 {
        return if strength > 0.7 { ARRIVAL_PX } else { CSFB_INLINE };
    }

    // 7. participation
    if confidence > 0.7 {
        return ADAPTIVE;
    }
    if vr > 1.2 {
        return PCT_VOL;
    }

    TWAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{TrendLevel, VolumeLevel};

    fn conditions(volatility: VolatilityLevel, volume_ratio: f64) -> MarketConditions {
        let volume = if volume_ratio > 1.5 {
            VolumeLevel::High
        } else if volume_ratio < 0.7 {
            VolumeLevel::Low
        } else {
            VolumeLevel::Normal
        };
        MarketConditions { volatility, volume, trend: TrendLevel::Sideways, volume_ratio }
    }

    fn request(signal_strength: f64, confidence: f64, trend_strength: f64, stealth: bool) -> ExecutionRequest {
        ExecutionRequest { signal_strength, confidence, trend_strength, stealth_required: stealth }
    }

    #[test]
    fn test_stealth_low_volume_picks_min_impact() {
        let c = conditions(VolatilityLevel::Medium, 0.3);
        assert_eq!(select_optimal_algorithm(&c, &request(0.5, 0.5, 0.5, true)), MIN_IMPACT);
    }

    #[test]
    fn test_stealth_volume_branches() {
        let r = request(0.5, 0.5, 0.5, true);
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::High, 2.0), &r), DARK_ICE);
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::High, 1.0), &r), ACCUMULATE);
        // very strong signal behaves like a stealth request
        let strong = request(0.95, 0.5, 0.9, false);
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::Low, 0.3), &strong), MIN_IMPACT);
    }

    #[test]
    fn test_volatile_strong_signal_branches() {
        let high = VolatilityLevel::High;
        assert_eq!(select_optimal_algorithm(&conditions(high, 1.0), &request(0.85, 0.5, 0.9, false)), QB_STROBE);
        assert_eq!(select_optimal_algorithm(&conditions(high, 2.2), &request(0.85, 0.5, 0.5, false)), CLOSE_PX);
        assert_eq!(select_optimal_algorithm(&conditions(high, 1.8), &request(0.85, 0.5, 0.5, false)), JEFFERIES_VWAP);
        assert_eq!(select_optimal_algorithm(&conditions(high, 1.0), &request(0.85, 0.5, 0.5, false)), ARRIVAL_PX);
    }

    #[test]
    fn test_heavy_volume_rules() {
        let r = request(0.5, 0.5, 0.5, false);
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::High, 3.0), &r), PCT_VOL_PX);
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::Medium, 3.0), &r), PCT_VOL_SZ);
        assert_eq!(
            select_optimal_algorithm(&conditions(VolatilityLevel::Medium, 3.0), &request(0.5, 0.5, 0.65, false)),
            CSFB_INLINE
        );
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::Low, 2.0), &r), PCT_VOL_TM);
        assert_eq!(select_optimal_algorithm(&conditions(VolatilityLevel::Medium, 2.0), &r), VWAP);
    }

    #[test]
    fn test_calm_tape_rules() {
        let low = VolatilityLevel::Low;
        assert_eq!(select_optimal_algorithm(&conditions(low, 1.0), &request(0.5, 0.85, 0.5, false)), ADAPTIVE);
        assert_eq!(select_optimal_algorithm(&conditions(low, 0.6), &request(0.5, 0.5, 0.5, false)), BALANCE_IMPACT);
        assert_eq!(select_optimal_algorithm(&conditions(low, 1.0), &request(0.5, 0.5, 0.5, false)), TWAP);
    }

    #[test]
    fn test_trend_and_fallback_rules() {
        let med = VolatilityLevel::Medium;
        assert_eq!(select_optimal_algorithm(&conditions(med, 1.0), &request(0.75, 0.5, 0.8, false)), ARRIVAL_PX);
        assert_eq!(select_optimal_algorithm(&conditions(med, 1.0), &request(0.5, 0.5, 0.8, false)), CSFB_INLINE);
        assert_eq!(select_optimal_algorithm(&conditions(med, 1.0), &request(0.5, 0.75, 0.5, false)), ADAPTIVE);
        assert_eq!(select_optimal_algorithm(&conditions(med, 1.3), &request(0.5, 0.5, 0.5, false)), PCT_VOL);
        assert_eq!(select_optimal_algorithm(&conditions(med, 1.0), &request(0.5, 0.5, 0.5, false)), TWAP);
    }
}
