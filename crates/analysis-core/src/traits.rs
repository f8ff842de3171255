use async_trait::async_trait;
use crate::{AnalysisError, CompanyInfo, InsiderTrade, PriceSeries, SeriesKind};

/// Source of historical bars and company metadata
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn price_series(&self, symbol: &str, kind: SeriesKind) -> Result<PriceSeries, AnalysisError>;

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, AnalysisError>;
}

/// Source of recent insider transactions.
///
/// Infallible by contract: implementations degrade to an empty list, so an
/// empty result may mean either "no trades" or "source unavailable".
#[async_trait]
pub trait InsiderTradeSource: Send + Sync {
    async fn recent_trades(&self, symbol: &str) -> Vec<InsiderTrade>;
}

/// Language-model backend that turns a prompt into a recommendation text
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(&self, prompt: &str) -> Result<String, AnalysisError>;

    fn backend_name(&self) -> &'static str;
}
