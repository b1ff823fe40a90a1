use serde::{Deserialize, Serialize};

use super::ImpactClass;
use crate::values::{CoinSymbol, RequestId, clamp_confidence};

/// Outcome of analyzing one news item
///
/// Immutable once built: fields are only reachable through accessors.
/// Callers that need extra fields (source, index, timestamp) wrap the
/// serialized form instead of mutating the record. Deserialization goes
/// through the same checks as the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnalysisRecord")]
pub struct AnalysisResult {
    impact: ImpactClass,
    confidence: f64,
    affected_coins: Vec<CoinSymbol>,
    request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Wire form of [`AnalysisResult`], validated before conversion
#[derive(Deserialize)]
struct AnalysisRecord {
    impact: ImpactClass,
    confidence: f64,
    affected_coins: Vec<CoinSymbol>,
    request_id: RequestId,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<AnalysisRecord> for AnalysisResult {
    type Error = String;

    fn try_from(record: AnalysisRecord) -> Result<Self, Self::Error> {
        if !(0.0..=100.0).contains(&record.confidence) {
            return Err(format!(
                "confidence {} is outside [0, 100]",
                record.confidence
            ));
        }

        match record.error {
            Some(error) => {
                if record.impact != ImpactClass::Neutral
                    || record.confidence != 0.0
                    || !record.affected_coins.is_empty()
                {
                    return Err(
                        "failed result must be Neutral with zero confidence and no coins"
                            .to_string(),
                    );
                }
                Ok(Self::failed(record.request_id, error))
            }
            None => Ok(Self::new(
                record.impact,
                record.confidence,
                record.affected_coins,
                record.request_id,
            )),
        }
    }
}

impl AnalysisResult {
    /// Create a scored result. Confidence is clamped to `[0, 100]`.
    pub fn new(
        impact: ImpactClass,
        confidence: f64,
        affected_coins: Vec<CoinSymbol>,
        request_id: impl Into<RequestId>,
    ) -> Self {
        Self {
            impact,
            confidence: clamp_confidence(confidence),
            affected_coins,
            request_id: request_id.into(),
            error: None,
        }
    }

    /// Create the neutral record for an item that could not be scored
    pub fn failed(request_id: impl Into<RequestId>, error: impl Into<String>) -> Self {
        Self {
            impact: ImpactClass::Neutral,
            confidence: 0.0,
            affected_coins: Vec::new(),
            request_id: request_id.into(),
            error: Some(error.into()),
        }
    }

    pub fn impact(&self) -> ImpactClass {
        self.impact
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn affected_coins(&self) -> &[CoinSymbol] {
        &self.affected_coins
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if scoring did not complete for this item
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if any of `coins` (case-insensitive) was detected
    pub fn mentions_any(&self, coins: &[CoinSymbol]) -> bool {
        self.affected_coins
            .iter()
            .any(|c| coins.iter().any(|f| f.eq_ignore_ascii_case(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_confidence() {
        let result = AnalysisResult::new(ImpactClass::Positive, 130.0, vec![], "r-1");
        assert_eq!(result.confidence(), 100.0);
        assert!(!result.is_error());
    }

    #[test]
    fn test_failed_has_neutral_defaults() {
        let result = AnalysisResult::failed("r-2", "title is empty");
        assert_eq!(result.impact(), ImpactClass::Neutral);
        assert_eq!(result.confidence(), 0.0);
        assert!(result.affected_coins().is_empty());
        assert_eq!(result.error(), Some("title is empty"));
    }

    #[test]
    fn test_error_field_omitted_when_absent() {
        let result = AnalysisResult::new(ImpactClass::Neutral, 50.0, vec!["BTC".into()], "r-3");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["impact"], "Neutral");
        assert_eq!(json["affected_coins"][0], "BTC");
    }

    #[test]
    fn test_deserialize_accepts_valid_records() {
        let result: AnalysisResult = serde_json::from_value(serde_json::json!({
            "impact": "Positive",
            "confidence": 72.5,
            "affected_coins": ["BTC"],
            "request_id": "r-5"
        }))
        .unwrap();
        assert_eq!(
            result,
            AnalysisResult::new(ImpactClass::Positive, 72.5, vec!["BTC".into()], "r-5")
        );

        let failed: AnalysisResult = serde_json::from_value(serde_json::json!({
            "impact": "Neutral",
            "confidence": 0.0,
            "affected_coins": [],
            "request_id": "r-6",
            "error": "title is empty"
        }))
        .unwrap();
        assert_eq!(failed.error(), Some("title is empty"));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_confidence() {
        for confidence in [130.0, -1.0] {
            let parsed = serde_json::from_value::<AnalysisResult>(serde_json::json!({
                "impact": "Negative",
                "confidence": confidence,
                "affected_coins": [],
                "request_id": "r-7"
            }));
            let err = parsed.unwrap_err().to_string();
            assert!(err.contains("outside [0, 100]"), "{}", err);
        }
    }

    #[test]
    fn test_deserialize_rejects_scored_failure() {
        let parsed = serde_json::from_value::<AnalysisResult>(serde_json::json!({
            "impact": "Positive",
            "confidence": 80.0,
            "affected_coins": ["ETH"],
            "request_id": "r-8",
            "error": "boom"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_mentions_any_ignores_case() {
        let result = AnalysisResult::new(ImpactClass::Neutral, 50.0, vec!["ETH".into()], "r-4");
        assert!(result.mentions_any(&["eth".to_string()]));
        assert!(!result.mentions_any(&["BTC".to_string()]));
    }
}
