//! Runs the external `fin_insight.py` CLI and shapes its output.
//!
//! The script prints diagnostics and a JSON document to stdout. The document
//! is everything from the first `{` to the last `}`. Its fields are passed
//! through with defaults for the ones the API always returns.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dashmap::DashMap;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::{Mutex, Semaphore};

use crate::cache::MemoryCache;
use crate::config::InsightConfig;
use crate::error::FinInsightsError;
use crate::validation::require_ticker;

const SCRIPT_NAME: &str = "fin_insight.py";

/// Errors from running fin-insight.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("fin-insight package not found in the system")]
    NotInstalled,
    #[error("Failed to start fin-insight: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Error executing fin-insight: {0}")]
    ExecutionFailed(String),
    #[error("fin-insight did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("No JSON data found in fin-insight output")]
    NoJson,
    #[error("Invalid JSON in fin-insight output: {0}")]
    InvalidJson(String),
}

/// Statement tables returned only for detailed requests.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightDetails {
    pub income_statement: Value,
    pub balance_sheet: Value,
    pub cash_flow: Value,
}

/// The API's view of a fin-insight document.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialInsights {
    pub ticker: String,
    pub latest_price: Value,
    pub sentiment_summary: Value,
    pub financial_highlights: Value,
    pub rating: Value,
    pub details: Option<InsightDetails>,
}

impl FinancialInsights {
    /// Pick the API fields out of a raw document. A key that is present keeps
    /// its value even when that value is `null`.
    pub fn from_document(ticker: &str, doc: &Map<String, Value>, detailed: bool) -> Self {
        let field = |key: &str, default: Value| doc.get(key).cloned().unwrap_or(default);
        let empty = || Value::Object(Map::new());

        Self {
            ticker: ticker.to_string(),
            latest_price: field("latest_price", Value::from(0.0)),
            sentiment_summary: field("sentiment_summary", Value::from("N/A")),
            financial_highlights: field("financialHighlights", empty()),
            rating: field("rating", Value::from("Unknown")),
            details: detailed.then(|| InsightDetails {
                income_statement: field("income_statement", empty()),
                balance_sheet: field("balance_sheet", empty()),
                cash_flow: field("cash_flow", empty()),
            }),
        }
    }
}

fn json_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// Extract and parse the JSON object embedded in the script's stdout.
pub fn extract_document(stdout: &str) -> Result<Map<String, Value>, InsightError> {
    let block = json_block().find(stdout).ok_or(InsightError::NoJson)?;
    serde_json::from_str(block.as_str()).map_err(|e| InsightError::InvalidJson(e.to_string()))
}

/// Find `fin_insight.py`.
///
/// An explicit path wins if it exists. Otherwise each search directory is
/// checked for the script itself, then directories named like a
/// `site-packages` are checked for the `fin_insight` package.
pub fn locate_script(explicit: Option<&Path>, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("FIN_INSIGHT_SCRIPT {} does not exist", path.display());
        return None;
    }

    search_dirs
        .iter()
        .map(|dir| dir.join(SCRIPT_NAME))
        .find(|p| p.is_file())
        .or_else(|| {
            search_dirs
                .iter()
                .filter(|dir| dir.to_string_lossy().contains("site-packages"))
                .map(|dir| dir.join("fin_insight").join(SCRIPT_NAME))
                .find(|p| p.is_file())
        })
}

/// The current directory followed by every `PYTHONPATH` entry.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(pythonpath) = std::env::var_os("PYTHONPATH") {
        dirs.extend(std::env::split_paths(&pythonpath).filter(|p| !p.as_os_str().is_empty()));
    }
    dirs
}

type Document = Arc<Map<String, Value>>;

/// Runs fin-insight with bounded concurrency and caches parsed documents.
/// Concurrent requests for the same symbol share one run.
pub struct InsightService {
    config: InsightConfig,
    search_dirs: Vec<PathBuf>,
    permits: Semaphore,
    cache: MemoryCache<Document>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl InsightService {
    pub fn new(config: InsightConfig) -> Self {
        Self::with_search_dirs(config, default_search_dirs())
    }

    pub fn with_search_dirs(config: InsightConfig, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            permits: Semaphore::new(config.max_concurrency.max(1)),
            cache: MemoryCache::new(config.cache_ttl),
            inflight: DashMap::new(),
            config,
            search_dirs,
        }
    }

    /// Whether a fin-insight script can currently be found.
    pub fn is_available(&self) -> bool {
        self.script_path().is_some()
    }

    fn script_path(&self) -> Option<PathBuf> {
        locate_script(self.config.script.as_deref(), &self.search_dirs)
    }

    /// Insights for `ticker` (trimmed, upper-cased). Only a blank ticker is
    /// rejected; anything else is handed to the script as a single argument.
    pub async fn insights(
        &self,
        ticker: &str,
        detailed: bool,
    ) -> Result<FinancialInsights, FinInsightsError> {
        let symbol = require_ticker(ticker)?.to_uppercase();

        let doc = match self.cache.get(&symbol) {
            Some(doc) => {
                tracing::debug!("Insight cache hit for {}", symbol);
                doc
            }
            None => self.load(&symbol).await?,
        };

        Ok(FinancialInsights::from_document(&symbol, &doc, detailed))
    }

    /// Runs the script for `symbol` unless a concurrent request already
    /// cached its document while this one waited on the per-symbol lock.
    async fn load(&self, symbol: &str) -> Result<Document, InsightError> {
        let lock = Arc::clone(self.inflight.entry(symbol.to_string()).or_default().value());

        let result = {
            let _guard = lock.lock().await;
            match self.cache.get(symbol) {
                Some(doc) => {
                    tracing::debug!("Insight for {} produced by a concurrent request", symbol);
                    Ok(doc)
                }
                None => self.run(symbol).await.map(|doc| {
                    let doc = Arc::new(doc);
                    self.cache.set(symbol.to_string(), Arc::clone(&doc));
                    doc
                }),
            }
        };

        drop(lock);
        self.inflight
            .remove_if(symbol, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    async fn run(&self, symbol: &str) -> Result<Map<String, Value>, InsightError> {
        let script = self.script_path().ok_or(InsightError::NotInstalled)?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| InsightError::ExecutionFailed("runner is shutting down".to_string()))?;

        tracing::info!("Running fin-insight for {}", symbol);
        let mut cmd = Command::new(&self.config.python);
        cmd.arg(&script)
            .arg(symbol)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.config.timeout, cmd.output())
            .await
            .map_err(|_| InsightError::TimedOut(self.config.timeout))?
            .map_err(InsightError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        tracing::debug!("fin_insight output: {}", stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!("fin-insight exited with {}: {}", output.status, stderr);
            return Err(InsightError::ExecutionFailed(stderr));
        }

        extract_document(&stdout)
    }
}
