//! Tool catalog

use herald_core::Timeframe;
use serde_json::{Value, json};

use crate::config::Limits;

/// Tools served by `tools/call`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    NewsAnalyze,
    NewsBatchAnalyze,
    MarketSentiment,
    ImpactKeywords,
    HealthCheck,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::NewsAnalyze,
        Tool::NewsBatchAnalyze,
        Tool::MarketSentiment,
        Tool::ImpactKeywords,
        Tool::HealthCheck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::NewsAnalyze => "crypto_news_analyze",
            Tool::NewsBatchAnalyze => "crypto_news_batch_analyze",
            Tool::MarketSentiment => "crypto_market_sentiment",
            Tool::ImpactKeywords => "crypto_impact_keywords",
            Tool::HealthCheck => "server_health_check",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::NewsAnalyze => {
                "Analyze cryptocurrency news for sentiment and market impact"
            }
            Tool::NewsBatchAnalyze => {
                "Analyze multiple cryptocurrency news items in one call"
            }
            Tool::MarketSentiment => {
                "Get overall cryptocurrency market sentiment from recently analyzed news"
            }
            Tool::ImpactKeywords => "Extract and score impact keywords in cryptocurrency text",
            Tool::HealthCheck => "Check server health and component status",
        }
    }

    /// JSON schema of the tool arguments
    pub fn input_schema(&self, limits: &Limits) -> Value {
        match self {
            Tool::NewsAnalyze => json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "News headline or title",
                        "minLength": 1,
                        "maxLength": limits.max_title_chars
                    },
                    "summary": {
                        "type": "string",
                        "description": "News content or description",
                        "minLength": 1,
                        "maxLength": limits.max_summary_chars
                    },
                    "source": {
                        "type": "string",
                        "description": "News source (optional)",
                        "maxLength": limits.max_source_chars
                    }
                },
                "required": ["title", "summary"]
            }),
            Tool::NewsBatchAnalyze => json!({
                "type": "object",
                "properties": {
                    "news_items": {
                        "type": "array",
                        "description": "News items to analyze",
                        "minItems": 1,
                        "maxItems": limits.max_batch_items,
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string", "minLength": 1, "maxLength": limits.max_title_chars },
                                "summary": { "type": "string", "minLength": 1, "maxLength": limits.max_summary_chars },
                                "source": { "type": "string", "maxLength": limits.max_source_chars }
                            },
                            "required": ["title", "summary"]
                        }
                    }
                },
                "required": ["news_items"]
            }),
            Tool::MarketSentiment => {
                let timeframes: Vec<&str> = Timeframe::ALL.iter().map(|t| t.as_str()).collect();
                json!({
                    "type": "object",
                    "properties": {
                        "timeframe": {
                            "type": "string",
                            "description": "Analysis timeframe",
                            "enum": timeframes,
                            "default": Timeframe::default().as_str()
                        },
                        "coins": {
                            "type": "array",
                            "description": "Only count news mentioning these coins (optional)",
                            "items": { "type": "string" },
                            "maxItems": limits.max_filter_coins
                        }
                    }
                })
            }
            Tool::ImpactKeywords => json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Text to scan for impact keywords",
                        "minLength": 1,
                        "maxLength": limits.max_text_chars
                    },
                    "include_weights": {
                        "type": "boolean",
                        "description": "Include keyword weights in the response",
                        "default": false
                    }
                },
                "required": ["text"]
            }),
            Tool::HealthCheck => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn descriptor(&self, limits: &Limits) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(limits),
        })
    }
}

/// The `tools/list` result
pub fn catalog(limits: &Limits) -> Value {
    let tools: Vec<Value> = Tool::ALL.iter().map(|t| t.descriptor(limits)).collect();
    json!({ "tools": tools })
}
