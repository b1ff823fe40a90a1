//! Stdio tool server
//!
//! Reads one JSON-RPC request per line, dispatches it and writes one
//! response line. Requests are handled strictly one at a time.

use herald_cache::InMemoryCache;
use herald_notify::notifier_from_config;
use herald_ports::{NotificationSink, SentimentCache};
use herald_sentiment::{AnalysisEngine, BatchAggregator};
use log::{debug, error, info, warn};
use serde_json::{Map, Value, json};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::error::{RpcError, Result, codes};
use crate::journal::AnalysisJournal;
use crate::protocol::{PROTOCOL_VERSION, RpcRequest, RpcResponse};
use crate::tools::{Tool, catalog};

/// JSON-RPC tool server over line-delimited stdio
pub struct ToolServer {
    pub(crate) config: ServerConfig,
    pub(crate) engine: Arc<AnalysisEngine>,
    pub(crate) aggregator: BatchAggregator,
    pub(crate) cache: Arc<dyn SentimentCache>,
    pub(crate) notifier: Arc<dyn NotificationSink>,
    pub(crate) journal: AnalysisJournal,
    pub(crate) started: Instant,
    deliveries: Vec<JoinHandle<()>>,
}

impl ToolServer {
    pub fn new(
        config: ServerConfig,
        engine: AnalysisEngine,
        cache: Arc<dyn SentimentCache>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let journal = AnalysisJournal::new(config.journal_capacity);
        Self {
            config,
            engine: Arc::new(engine),
            aggregator: BatchAggregator::default(),
            cache,
            notifier,
            journal,
            started: Instant::now(),
            deliveries: Vec::new(),
        }
    }

    /// Validate `config` and wire the default adapters
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let engine = config.build_engine()?;
        let cache: Arc<dyn SentimentCache> = Arc::new(InMemoryCache::new());
        let notifier = notifier_from_config(&config.webhook)?;
        Ok(Self::new(config, engine, cache, notifier))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    pub fn journal(&self) -> &AnalysisJournal {
        &self.journal
    }

    /// Serve until EOF or Ctrl-C
    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.run_until(reader, writer, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until EOF or until `shutdown` completes
    pub async fn run_until<R, W, S>(
        &mut self,
        mut reader: R,
        mut writer: W,
        shutdown: S,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        info!(
            "Starting {} v{} (protocol {})",
            self.config.server_name, self.config.version, PROTOCOL_VERSION
        );

        let mut buf = Vec::new();
        tokio::pin!(shutdown);

        let outcome = loop {
            // Partial reads stay in `buf`, so it is only cleared once a line is handled
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => read,
                _ = &mut shutdown => {
                    info!("Interrupt received, shutting down");
                    break Ok(());
                }
            };

            match read {
                Ok(0) => {
                    info!("Input closed, shutting down");
                    break Ok(());
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            }

            let response = self.handle_raw_line(&buf).await;
            buf.clear();

            if let Some(response) = response {
                if let Err(e) = write_line(&mut writer, &response).await {
                    break Err(e.into());
                }
            }
        };

        self.shutdown().await;
        outcome
    }

    /// Handle one line of raw input bytes; invalid UTF-8 is a parse error
    pub async fn handle_raw_line(&mut self, bytes: &[u8]) -> Option<String> {
        match std::str::from_utf8(bytes) {
            Ok(line) => self.handle_line(line).await,
            Err(e) => {
                warn!("Rejected input line: invalid UTF-8 ({})", e);
                Some(RpcResponse::failure(None, RpcError::parse_error()).to_line())
            }
        }
    }

    /// Handle one input line; `None` means nothing is written back
    pub async fn handle_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match RpcRequest::parse(line) {
            Ok(request) => self.handle_request(request).await?,
            Err(response) => {
                warn!("Rejected input line: {}", describe_error(&response));
                response
            }
        };
        Some(response.to_line())
    }

    pub async fn handle_request(&mut self, request: RpcRequest) -> Option<RpcResponse> {
        info!(
            "Received request: {} (id: {})",
            request.method,
            request.id.as_ref().map_or_else(|| "none".to_string(), Value::to_string)
        );

        if request.is_notification() {
            debug!("Notification {} acknowledged", request.method);
            return None;
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(catalog(&self.config.limits)),
            "tools/call" => self.call_tool(&request.params).await,
            other => {
                warn!("Unknown method: {}", other);
                Err(RpcError::method_not_found(other))
            }
        };

        Some(RpcResponse::from_result(request.id, outcome))
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.config.server_name,
                "version": self.config.version,
            }
        })
    }

    async fn call_tool(&mut self, params: &Value) -> std::result::Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("Invalid params: tool name required"))?;

        let empty = Map::new();
        let args = match params.get("arguments") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(args)) => args,
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "Invalid params: arguments must be an object",
                ));
            }
        };

        let tool = Tool::from_name(name).ok_or_else(|| RpcError::unknown_tool(name))?;
        let outcome = match tool {
            Tool::NewsAnalyze => self.analyze_news(args),
            Tool::NewsBatchAnalyze => self.analyze_news_batch(args),
            Tool::MarketSentiment => self.market_sentiment(args).await,
            Tool::ImpactKeywords => self.impact_keywords(args),
            Tool::HealthCheck => self.health_check().await,
        };

        if let Err(e) = &outcome {
            if e.code == codes::INTERNAL_ERROR {
                error!("Tool {} failed: {}", name, e);
            } else {
                debug!("Tool {} rejected arguments: {}", name, e.message);
            }
        }
        outcome
    }

    /// Hand batch results to the notification sink without waiting
    pub(crate) fn notify_batch(&mut self, results: &[Value], request_id: &str) {
        if !self.notifier.is_enabled() {
            return;
        }

        let notifier = Arc::clone(&self.notifier);
        let results = results.to_vec();
        let request_id = request_id.to_string();
        let handle = tokio::spawn(async move {
            match notifier.send_batch_results(&results, &request_id).await {
                Ok(()) => debug!("Batch {} delivered to webhook", request_id),
                Err(e) => warn!("Webhook delivery failed for {}: {}", request_id, e),
            }
        });

        self.deliveries.retain(|h| !h.is_finished());
        self.deliveries.push(handle);
    }

    /// Wait for in-flight webhook deliveries
    pub async fn drain_deliveries(&mut self) {
        for handle in self.deliveries.drain(..) {
            if let Err(e) = handle.await {
                warn!("Webhook task ended abnormally: {}", e);
            }
        }
    }

    pub async fn shutdown(&mut self) {
        self.drain_deliveries().await;
        self.cache.shutdown().await;
        info!(
            "{} stopped after {}s",
            self.config.server_name,
            self.started.elapsed().as_secs()
        );
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

fn describe_error(response: &RpcResponse) -> String {
    response
        .error
        .as_ref()
        .map_or_else(|| "unknown".to_string(), |e| e.message.clone())
}
