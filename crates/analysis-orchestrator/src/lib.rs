use analysis_core::{
    AnalysisError, CompanyInfo, InsiderTrade, InsiderTradeSource, MarketDataProvider,
    MarketHistory, Recommendation, RecommendationProvider, SeriesKind,
};
use insider_trades::OpenInsiderClient;
use llm_client::{LlmConfig, LlmError, OllamaClient};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use technical_analysis::TechnicalAnalysisEngine;
use yahoo_client::YahooFinanceClient;

pub mod presentation;
pub mod prompt;

pub use presentation::format_analysis;
pub use prompt::{compose_prompt, PromptContext};

/// Runtime settings, read from the environment with fixed fallbacks
#[derive(Debug, Clone)]
pub struct AnalystConfig {
    pub llm: LlmConfig,
    /// Timeout for market data and insider listing requests
    pub http_timeout: Duration,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            http_timeout: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
        }
    }
}

/// Everything fetched for one ticker before any computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub history: MarketHistory,
    pub company: CompanyInfo,
    pub insider_trades: Vec<InsiderTrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub prompt: String,
    pub recommendation: Recommendation,
}

/// Sequential fetch → compose → infer pipeline for a single ticker
pub struct StockAnalyst {
    market: Box<dyn MarketDataProvider>,
    insiders: Box<dyn InsiderTradeSource>,
    llm: Box<dyn RecommendationProvider>,
    engine: TechnicalAnalysisEngine,
}

impl StockAnalyst {
    pub fn new(
        market: Box<dyn MarketDataProvider>,
        insiders: Box<dyn InsiderTradeSource>,
        llm: Box<dyn RecommendationProvider>,
    ) -> Self {
        Self {
            market,
            insiders,
            llm,
            engine: TechnicalAnalysisEngine::new(),
        }
    }

    /// Wire up Yahoo Finance, OpenInsider and Ollama
    pub fn from_config(config: &AnalystConfig) -> Result<Self, LlmError> {
        let llm = OllamaClient::new(config.llm.clone())?;

        Ok(Self::new(
            Box::new(YahooFinanceClient::new(config.http_timeout)),
            Box::new(OpenInsiderClient::new(config.http_timeout)),
            Box::new(llm),
        ))
    }

    /// Fetch price history, company info, then insider trades.
    ///
    /// Market data failures abort before the insider listing is requested;
    /// the insider listing itself never fails.
    pub async fn fetch(&self, ticker: &str) -> Result<MarketData, AnalysisError> {
        tracing::info!("Fetching market data for {}", ticker);

        let daily = self.market.price_series(ticker, SeriesKind::Daily).await?;
        let weekly = self.market.price_series(ticker, SeriesKind::Weekly).await?;
        let monthly = self.market.price_series(ticker, SeriesKind::Monthly).await?;
        let company = self.market.company_info(ticker).await?;

        let insider_trades = self.insiders.recent_trades(ticker).await;
        tracing::info!(
            "Fetched {}/{}/{} bars and {} insider trades for {}",
            daily.len(),
            weekly.len(),
            monthly.len(),
            insider_trades.len(),
            ticker
        );

        Ok(MarketData {
            history: MarketHistory {
                daily,
                weekly,
                monthly,
            },
            company,
            insider_trades,
        })
    }

    /// Compute indicators and render the prompt. Pure; no I/O.
    pub fn compose(&self, ticker: &str, data: &MarketData) -> Result<String, AnalysisError> {
        let indicators = self.engine.snapshot(&data.history.daily)?;
        let performance = self.engine.performance(&data.history)?;

        Ok(compose_prompt(&PromptContext {
            ticker,
            company: &data.company,
            indicators: &indicators,
            performance: &performance,
            insider_trades: &data.insider_trades,
        }))
    }

    pub async fn recommend(&self, prompt: &str) -> Result<Recommendation, AnalysisError> {
        tracing::info!("Requesting recommendation from {}", self.llm.backend_name());

        let raw = self.llm.recommend(prompt).await?;
        let formatted = format_analysis(&raw);
        Ok(Recommendation { raw, formatted })
    }

    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisReport, AnalysisError> {
        let data = self.fetch(ticker).await?;
        let prompt = self.compose(ticker, &data)?;
        let recommendation = self.recommend(&prompt).await?;

        Ok(AnalysisReport {
            ticker: ticker.to_string(),
            prompt,
            recommendation,
        })
    }
}
