use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional market-impact verdict for a piece of news
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImpactClass {
    /// Likely to push prices up
    Positive,
    /// Likely to push prices down
    Negative,
    /// No directional evidence either way
    #[default]
    Neutral,
}

impl ImpactClass {
    /// Wire name, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactClass::Positive => "Positive",
            ImpactClass::Negative => "Negative",
            ImpactClass::Neutral => "Neutral",
        }
    }

    /// Returns true for Positive or Negative
    pub fn is_directional(&self) -> bool {
        !matches!(self, ImpactClass::Neutral)
    }
}

impl fmt::Display for ImpactClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&ImpactClass::Negative).unwrap(),
            "\"Negative\""
        );
        assert_eq!(ImpactClass::Positive.to_string(), "Positive");
        assert!(!ImpactClass::Neutral.is_directional());
    }
}
