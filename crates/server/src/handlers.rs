//! Tool handlers
//!
//! Each handler validates its arguments, runs the analysis and builds the
//! response document. Validation failures map to `-32602`; anything that
//! goes wrong after validation maps to `-32603`.

use chrono::Utc;
use herald_core::{
    AnalysisResult, CoinSymbol, MarketSentiment, NewsItem, SentimentBreakdown, Timeframe,
    Timestamp,
};
use herald_sentiment::{AnalysisError, BatchAggregator, KeywordMatch, item_request_id};
use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::config::Limits;
use crate::error::RpcError;
use crate::server::ToolServer;

type Args = Map<String, Value>;
type HandlerResult = Result<Value, RpcError>;

/// ISO-8601 UTC with microseconds and a `Z` suffix
pub fn iso_timestamp(at: Timestamp) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// `<prefix>_<HHMMSSffffff>_<8 hex chars>`
pub fn new_request_id(prefix: &str, at: Timestamp) -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    format!("{}_{}_{}", prefix, at.format("%H%M%S%6f"), suffix)
}

/// Cache key for a market sentiment query; coin order does not matter
pub fn market_sentiment_key(timeframe: Timeframe, coins: &[CoinSymbol]) -> String {
    let mut sorted = coins.to_vec();
    sorted.sort();
    format!("market_sentiment:{}:{}", timeframe, sorted.join(","))
}

/// Market-wide view over journaled results
pub fn market_sentiment_from(
    results: &[AnalysisResult],
    aggregator: &BatchAggregator,
    timeframe: Timeframe,
    coins: &[CoinSymbol],
    baseline: f64,
    at: Timestamp,
) -> MarketSentiment {
    let summary = aggregator.summarize(results);
    let confidence = if results.is_empty() {
        baseline
    } else {
        summary.avg_confidence
    };

    MarketSentiment {
        timeframe,
        overall_sentiment: summary.dominant_impact(),
        confidence,
        analyzed_items: results.len(),
        sentiment_breakdown: SentimentBreakdown {
            positive: summary.positive_count,
            negative: summary.negative_count,
            neutral: summary.neutral_count,
        },
        top_coins_mentioned: summary.top_affected_coins,
        timestamp: at,
        filtered_coins: (!coins.is_empty()).then(|| coins.to_vec()),
    }
}

impl ToolServer {
    pub(crate) fn analyze_news(&mut self, args: &Args) -> HandlerResult {
        let limits = self.config.limits;
        let title = string_arg(args, "title")?.unwrap_or_default();
        let summary = string_arg(args, "summary")?.unwrap_or_default();
        let source = string_arg(args, "source")?.unwrap_or_default();

        if title.is_empty() || summary.is_empty() {
            return Err(RpcError::invalid_params(
                "Invalid params: title and summary required",
            ));
        }
        check_length("title", title, limits.max_title_chars)?;
        check_length("summary", summary, limits.max_summary_chars)?;
        check_length("source", source, limits.max_source_chars)?;

        let now = Utc::now();
        let request_id = new_request_id("mcp_single", now);
        let result = self
            .engine
            .analyze_single(title, summary, &request_id)
            .map_err(|e| RpcError::internal("Analysis failed", e))?;
        self.journal.record(now, &result);

        let mut body = to_object(&result)?;
        if !source.is_empty() {
            body.insert("source".into(), json!(source));
        }
        body.insert("analysis_id".into(), json!(request_id));
        body.insert("timestamp".into(), json!(iso_timestamp(now)));

        info!(
            "Single analysis completed: {} ({}, {:.1})",
            request_id,
            result.impact(),
            result.confidence()
        );
        Ok(Value::Object(body))
    }

    pub(crate) fn analyze_news_batch(&mut self, args: &Args) -> HandlerResult {
        let limits = self.config.limits;
        let items = match args.get("news_items") {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => {
                return Err(RpcError::invalid_params(
                    "Invalid params: news_items array required",
                ));
            }
        };
        if items.len() > limits.max_batch_items {
            return Err(RpcError::invalid_params(format!(
                "Batch size limit exceeded (max {} items)",
                limits.max_batch_items
            )));
        }

        let parsed = items
            .iter()
            .enumerate()
            .map(|(index, item)| BatchItem::parse(index, item, &limits))
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        let request_id = new_request_id("mcp_batch", now);
        let mut results = Vec::with_capacity(parsed.len());
        let mut bodies = Vec::with_capacity(parsed.len());

        for (index, item) in parsed.iter().enumerate() {
            let item_id = item_request_id(&request_id, index);
            let result = match item {
                BatchItem::News(news) => self.engine.analyze_item(news, &item_id).into_result(),
                BatchItem::Malformed(reason) => AnalysisResult::failed(
                    item_id.clone(),
                    AnalysisError::MalformedItem(reason.clone()).to_string(),
                ),
            };
            self.journal.record(now, &result);

            let mut body = to_object(&result)?;
            body.insert("item_index".into(), json!(index));
            body.insert("analysis_id".into(), json!(item_id));
            if let Some(source) = item.source() {
                body.insert("source".into(), json!(source));
            }
            results.push(result);
            bodies.push(Value::Object(body));
        }

        let summary = self.aggregator.summarize(&results);
        self.notify_batch(&bodies, &request_id);

        info!(
            "Batch analysis completed: {} ({} items, {} errors)",
            request_id,
            results.len(),
            summary.error_count
        );
        Ok(json!({
            "results": bodies,
            "total_items": results.len(),
            "request_id": request_id,
            "timestamp": iso_timestamp(now),
            "summary": summary,
        }))
    }

    pub(crate) async fn market_sentiment(&mut self, args: &Args) -> HandlerResult {
        let timeframe = match string_arg(args, "timeframe")? {
            None | Some("") => Timeframe::default(),
            Some(name) => Timeframe::parse(name).ok_or_else(|| {
                RpcError::invalid_params(format!(
                    "Invalid params: timeframe must be one of {}",
                    timeframe_names()
                ))
            })?,
        };
        let coins = coin_filter(args, self.config.limits.max_filter_coins)?;
        let key = market_sentiment_key(timeframe, &coins);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                info!("Market sentiment cache hit for {}", key);
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for {}: {}", key, e),
        }

        let now = Utc::now();
        let window = self.journal.window(now - timeframe.duration(), &coins);
        let sentiment = market_sentiment_from(
            &window,
            &self.aggregator,
            timeframe,
            &coins,
            self.engine.scorer().config().baseline,
            now,
        );
        let value = serde_json::to_value(&sentiment)
            .map_err(|e| RpcError::internal("Market sentiment analysis failed", e))?;

        if let Err(e) = self
            .cache
            .set(&key, value.clone(), self.config.market_sentiment_ttl())
            .await
        {
            warn!("Cache write failed for {}: {}", key, e);
        }

        info!(
            "Market sentiment calculated for {} over {} items",
            timeframe, sentiment.analyzed_items
        );
        Ok(value)
    }

    pub(crate) fn impact_keywords(&self, args: &Args) -> HandlerResult {
        let text = string_arg(args, "text")?.unwrap_or_default();
        if text.is_empty() {
            return Err(RpcError::invalid_params("Invalid params: text required"));
        }
        check_length("text", text, self.config.limits.max_text_chars)?;

        let include_weights = match args.get("include_weights") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "Invalid params: include_weights must be a boolean",
                ));
            }
        };

        let scorer = self.engine.scorer();
        let (impact, confidence) = scorer.score(text);
        let matches = scorer.matches(text);
        let render = |found: &[KeywordMatch]| -> Vec<Value> {
            found
                .iter()
                .map(|m| {
                    if include_weights {
                        json!({ "keyword": m.keyword, "weight": m.weight })
                    } else {
                        json!(m.keyword)
                    }
                })
                .collect()
        };

        info!("Keyword analysis completed: {} keywords found", matches.total());
        Ok(json!({
            "impact": impact,
            "confidence": confidence,
            "positive_keywords": render(&matches.positive),
            "negative_keywords": render(&matches.negative),
            "detected_coins": self.engine.detector().detect(text),
            "total_keywords": matches.total(),
            "analysis_timestamp": iso_timestamp(Utc::now()),
        }))
    }

    pub(crate) async fn health_check(&self) -> HandlerResult {
        let cache_status = if self.cache.is_connected().await {
            "healthy"
        } else {
            "unhealthy"
        };
        let webhook_status = self.notifier.test().await;
        let cache_stats = self.cache.stats().await;
        let assessor_configured =
            self.config.assessor.is_some() || self.engine.assessor_name().is_some();

        info!("Health check completed");
        Ok(json!({
            "server_name": self.config.server_name,
            "version": self.config.version,
            "status": "healthy",
            "timestamp": iso_timestamp(Utc::now()),
            "timezone": self.config.timezone,
            "components": {
                "cache": cache_status,
                "webhook_manager": webhook_status.as_str(),
                "news_analyzer": "healthy",
            },
            "cache_stats": cache_stats,
            "environment": {
                "log_level": self.config.log_level,
                "cache_configured": true,
                "cache_backend": self.cache.name(),
                "webhook_configured": self.notifier.is_enabled(),
                "assessor_configured": assessor_configured,
            },
            "uptime_seconds": self.started.elapsed().as_secs(),
            "journal_entries": self.journal.len(),
        }))
    }
}

/// One entry of `news_items` after argument checks
#[derive(Debug)]
enum BatchItem {
    News(NewsItem),
    /// Reported as a per-item error
    Malformed(String),
}

impl BatchItem {
    /// Over-length fields reject the whole request; shape problems only
    /// fail the item.
    fn parse(index: usize, value: &Value, limits: &Limits) -> Result<Self, RpcError> {
        let Value::Object(fields) = value else {
            return Ok(BatchItem::Malformed("expected an object".into()));
        };

        let text = |key: &str, max: usize| -> Result<Result<String, String>, RpcError> {
            match fields.get(key) {
                None | Some(Value::Null) => Ok(Ok(String::new())),
                Some(Value::String(s)) => {
                    let s = s.trim();
                    check_length(&format!("news_items[{}].{}", index, key), s, max)?;
                    Ok(Ok(s.to_string()))
                }
                Some(_) => Ok(Err(format!("{} must be a string", key))),
            }
        };

        let title = text("title", limits.max_title_chars)?;
        let summary = text("summary", limits.max_summary_chars)?;
        let source = text("source", limits.max_source_chars)?;

        let (title, summary, source) = match (title, summary, source) {
            (Ok(t), Ok(s), Ok(src)) => (t, s, src),
            (Err(reason), _, _) | (_, Err(reason), _) | (_, _, Err(reason)) => {
                return Ok(BatchItem::Malformed(reason));
            }
        };

        let mut item = NewsItem::new(title, summary);
        if matches!(fields.get("source"), Some(Value::String(_))) {
            item = item.with_source(source);
        }
        Ok(BatchItem::News(item))
    }

    fn source(&self) -> Option<&str> {
        match self {
            BatchItem::News(item) => item.source.as_deref(),
            BatchItem::Malformed(_) => None,
        }
    }
}

/// Trimmed string argument; absent and `null` are `None`
fn string_arg<'a>(args: &'a Args, key: &str) -> Result<Option<&'a str>, RpcError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim())),
        Some(_) => Err(RpcError::invalid_params(format!(
            "Invalid params: {} must be a string",
            key
        ))),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), RpcError> {
    if value.chars().count() > max {
        return Err(RpcError::invalid_params(format!(
            "Invalid params: {} exceeds {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Uppercased, de-duplicated coin filter in request order
fn coin_filter(args: &Args, max: usize) -> Result<Vec<CoinSymbol>, RpcError> {
    let raw = match args.get("coins") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(raw)) => raw,
        Some(_) => {
            return Err(RpcError::invalid_params(
                "Invalid params: coins must be an array of strings",
            ));
        }
    };
    if raw.len() > max {
        return Err(RpcError::invalid_params(format!(
            "Invalid params: at most {} coins may be given",
            max
        )));
    }

    let mut coins: Vec<CoinSymbol> = Vec::with_capacity(raw.len());
    for value in raw {
        let symbol = value
            .as_str()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                RpcError::invalid_params("Invalid params: coins must be an array of strings")
            })?;
        if !coins.contains(&symbol) {
            coins.push(symbol);
        }
    }
    Ok(coins)
}

fn timeframe_names() -> String {
    Timeframe::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, RpcError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RpcError::internal(
            "Response encoding failed",
            format!("expected an object, got {}", other),
        )),
        Err(e) => Err(RpcError::internal("Response encoding failed", e)),
    }
}
