use analysis_core::{
    AnalysisError, Bar, CompanyInfo, MarketDataProvider, PriceSeries, SeriesKind,
};
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "price,assetProfile,summaryDetail,defaultKeyStatistics";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: reqwest::Client,
    /// Session crumb for quoteSummary, fetched once per client
    crumb: Arc<OnceCell<String>>,
}

impl YahooFinanceClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            crumb: Arc::new(OnceCell::new()),
        }
    }

    async fn crumb(&self, symbol: &str) -> Result<&str, AnalysisError> {
        self.crumb
            .get_or_try_init(|| self.fetch_crumb(symbol))
            .await
            .map(String::as_str)
    }

    /// Cookie + crumb handshake. The crumb is only valid together with the
    /// session cookie fc.yahoo.com sets, which the cookie store keeps.
    async fn fetch_crumb(&self, symbol: &str) -> Result<String, AnalysisError> {
        // The page itself is a 404; only its Set-Cookie header matters
        if let Err(e) = self.client.get(COOKIE_URL).send().await {
            tracing::debug!("Cookie request to {} failed: {}", COOKIE_URL, e);
        }

        let response = self
            .client
            .get(CRUMB_URL)
            .send()
            .await
            .map_err(|e| AnalysisError::market_data(symbol, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::market_data(symbol, e.to_string()))?;

        if !status.is_success() {
            return Err(AnalysisError::market_data(
                symbol,
                format!("crumb request HTTP {}: {}", status, body),
            ));
        }

        let crumb = parse_crumb(&body).map_err(|e| AnalysisError::market_data(symbol, e.to_string()))?;
        tracing::debug!("Obtained Yahoo crumb");
        Ok(crumb)
    }

    async fn get_json(&self, symbol: &str, url: &str, query: &[(&str, &str)]) -> Result<Value, AnalysisError> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AnalysisError::market_data(symbol, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::market_data(
                symbol,
                format!(
                    "HTTP {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::market_data(symbol, e.to_string()))
    }

    /// Get historical bars for one lookback range / interval pair
    pub async fn get_chart(&self, symbol: &str, kind: SeriesKind) -> Result<PriceSeries, AnalysisError> {
        let (range, interval) = kind.range_and_interval();
        let url = format!("{}/{}", CHART_URL, symbol);

        let json = self
            .get_json(symbol, &url, &[("range", range), ("interval", interval)])
            .await?;

        let bars = parse_chart(&json).map_err(|e| AnalysisError::market_data(symbol, e.to_string()))?;
        tracing::debug!("{} {} bars for {}", bars.len(), kind.name(), symbol);
        Ok(PriceSeries::new(kind, bars))
    }

    /// Get company profile, valuation and trading statistics
    pub async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo, AnalysisError> {
        let crumb = self.crumb(symbol).await?;
        let url = format!("{}/{}", QUOTE_SUMMARY_URL, symbol);

        let json = self
            .get_json(
                symbol,
                &url,
                &[("modules", QUOTE_SUMMARY_MODULES), ("crumb", crumb)],
            )
            .await?;

        parse_quote_summary(&json).map_err(|e| AnalysisError::market_data(symbol, e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn price_series(&self, symbol: &str, kind: SeriesKind) -> Result<PriceSeries, AnalysisError> {
        self.get_chart(symbol, kind).await
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo, AnalysisError> {
        self.get_company_info(symbol).await
    }
}

/// Decode a `/v8/finance/chart` payload. Rows with any null OHLCV field are
/// skipped, which is how Yahoo marks halted or not-yet-closed periods.
pub fn parse_chart(json: &Value) -> Result<Vec<Bar>, AnalysisError> {
    let chart = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| AnalysisError::InvalidData(chart_error(json)))?;

    let timestamps = chart
        .get("timestamp")
        .and_then(|v| v.as_array())
        .ok_or_else(|| AnalysisError::InvalidData("No timestamps found".to_string()))?;

    let quotes = chart
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| AnalysisError::InvalidData("No quote data found".to_string()))?;

    let column = |name: &str| -> Result<&Vec<Value>, AnalysisError> {
        quotes
            .get(name)
            .and_then(|v| v.as_array())
            .ok_or_else(|| AnalysisError::InvalidData(format!("No {} values", name)))
    };

    let opens = column("open")?;
    let highs = column("high")?;
    let lows = column("low")?;
    let closes = column("close")?;
    let volumes = column("volume")?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, ts) in timestamps.iter().enumerate() {
        let field = |col: &Vec<Value>| col.get(i).and_then(|v| v.as_f64());

        if let (Some(ts), Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            ts.as_i64(),
            field(opens),
            field(highs),
            field(lows),
            field(closes),
            field(volumes),
        ) {
            let timestamp = DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| AnalysisError::InvalidData(format!("Invalid timestamp {}", ts)))?;

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    Ok(bars)
}

fn chart_error(json: &Value) -> String {
    error_description(json, "chart")
        .unwrap_or("No chart data found")
        .to_string()
}

/// `{root: {error: {description}}}`, the shape of every Yahoo error payload
fn error_description<'a>(json: &'a Value, root: &str) -> Option<&'a str> {
    json.get(root)?.get("error")?.get("description")?.as_str()
}

/// Validate a `/v1/test/getcrumb` body. A valid crumb is a short opaque
/// token; a rejected session comes back as a JSON or HTML error page.
pub fn parse_crumb(body: &str) -> Result<String, AnalysisError> {
    let crumb = body.trim();

    if crumb.is_empty() {
        return Err(AnalysisError::InvalidData("Empty crumb".to_string()));
    }

    if crumb.starts_with('{') || crumb.starts_with('<') || crumb.contains(char::is_whitespace) {
        let reason = serde_json::from_str::<Value>(crumb)
            .ok()
            .and_then(|json| error_description(&json, "finance").map(str::to_string))
            .unwrap_or_else(|| "Unexpected crumb response".to_string());
        return Err(AnalysisError::InvalidData(reason));
    }

    Ok(crumb.to_string())
}

/// Decode a `/v10/finance/quoteSummary` payload into [`CompanyInfo`].
pub fn parse_quote_summary(json: &Value) -> Result<CompanyInfo, AnalysisError> {
    let data = json
        .get("quoteSummary")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            let reason = error_description(json, "quoteSummary")
                .or_else(|| error_description(json, "finance"))
                .unwrap_or("No company data found");
            AnalysisError::InvalidData(reason.to_string())
        })?;

    // Numeric fields come either bare or wrapped as {"raw": .., "fmt": ..}
    let number = |module: &str, key: &str| -> Option<f64> {
        let v = data.get(module)?.get(key)?;
        v.get("raw").unwrap_or(v).as_f64()
    };
    let text = |module: &str, key: &str| -> Option<String> {
        data.get(module)?
            .get(key)?
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(CompanyInfo {
        name: text("price", "longName"),
        industry: text("assetProfile", "industry"),
        sector: text("assetProfile", "sector"),
        market_cap: number("price", "marketCap").unwrap_or(0.0),
        fifty_two_week_low: number("summaryDetail", "fiftyTwoWeekLow").unwrap_or(0.0),
        fifty_two_week_high: number("summaryDetail", "fiftyTwoWeekHigh").unwrap_or(0.0),
        volume: number("summaryDetail", "volume").map(|v| v as u64).unwrap_or(0),
        average_volume: number("summaryDetail", "averageVolume").map(|v| v as u64).unwrap_or(0),
        trailing_pe: number("summaryDetail", "trailingPE"),
        forward_pe: number("summaryDetail", "forwardPE"),
        trailing_eps: number("defaultKeyStatistics", "trailingEps").unwrap_or(0.0),
        peg_ratio: number("defaultKeyStatistics", "pegRatio"),
    })
}
