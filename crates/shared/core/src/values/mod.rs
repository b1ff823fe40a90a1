use chrono::{DateTime, Utc};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Canonical coin ticker, e.g. `BTC`
pub type CoinSymbol = String;

/// Caller-assigned identifier of one analysis invocation
pub type RequestId = String;

/// Lower bound of the confidence scale
pub const CONFIDENCE_MIN: f64 = 0.0;

/// Upper bound of the confidence scale
pub const CONFIDENCE_MAX: f64 = 100.0;

/// Round to one decimal place (half away from zero)
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamp a confidence into `[0, 100]` and round to one decimal.
///
/// NaN collapses to the lower bound.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return CONFIDENCE_MIN;
    }
    round_one_decimal(value.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(86.549), 86.5);
        assert_eq!(round_one_decimal(86.55), 86.6);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(-3.0), 0.0);
        assert_eq!(clamp_confidence(140.0), 100.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
        assert_eq!(clamp_confidence(f64::INFINITY), 100.0);
        assert_eq!(clamp_confidence(72.34), 72.3);
    }
}
