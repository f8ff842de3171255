//! Scraper for the OpenInsider search listing.
//!
//! Extraction relies on the `tinytable` class and a fixed column order. Any
//! failure along the way yields an empty list instead of an error.

use analysis_core::{InsiderTrade, InsiderTradeSource};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://openinsider.com";
const TABLE_SELECTOR: &str = "table.tinytable";

/// Most recent trades kept per ticker
pub const MAX_TRADES: usize = 5;

// Column positions in the listing
const COL_TRADE_DATE: usize = 2;
const COL_INSIDER_NAME: usize = 4;
const COL_TITLE: usize = 5;
const COL_TRADE_TYPE: usize = 6;
const COL_PRICE: usize = 7;
const COL_QUANTITY: usize = 8;
const COL_OWNED: usize = 9;
const COL_OWNERSHIP_CHANGE: usize = 10;
const COL_VALUE: usize = 11;
const MIN_COLUMNS: usize = COL_VALUE + 1;

#[derive(Error, Debug)]
enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("table `{0}` not found")]
    MissingTable(&'static str),

    #[error("row {row} has {cells} cells")]
    MalformedRow { row: usize, cells: usize },
}

#[derive(Clone)]
pub struct OpenInsiderClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenInsiderClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, base_url }
    }

    /// Up to [`MAX_TRADES`] trades in listing order, or an empty list on any failure
    pub async fn fetch_trades(&self, symbol: &str) -> Vec<InsiderTrade> {
        match self.try_fetch(symbol).await {
            Ok(trades) => {
                debug!("{} insider trades for {}", trades.len(), symbol);
                trades
            }
            Err(e) => {
                warn!("Insider trades unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, symbol: &str) -> Result<Vec<InsiderTrade>, ScrapeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", symbol)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }

        let body = response.text().await?;
        extract_trades(&body)
    }
}

#[async_trait]
impl InsiderTradeSource for OpenInsiderClient {
    async fn recent_trades(&self, symbol: &str) -> Vec<InsiderTrade> {
        self.fetch_trades(symbol).await
    }
}

/// Parse a listing page. Missing table or malformed rows give an empty list.
pub fn parse_trades(html: &str) -> Vec<InsiderTrade> {
    extract_trades(html).unwrap_or_else(|e| {
        warn!("Could not parse insider listing: {}", e);
        Vec::new()
    })
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e:?}")))
}

fn extract_trades(html: &str) -> Result<Vec<InsiderTrade>, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector(TABLE_SELECTOR)?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(ScrapeError::MissingTable(TABLE_SELECTOR))?;

    table
        .select(&row_sel)
        .skip(1)
        .take(MAX_TRADES)
        .enumerate()
        .map(|(row, tr)| {
            let cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
            trade_from_cells(row, &cells)
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn trade_from_cells(row: usize, cells: &[String]) -> Result<InsiderTrade, ScrapeError> {
    if cells.len() < MIN_COLUMNS {
        return Err(ScrapeError::MalformedRow {
            row,
            cells: cells.len(),
        });
    }

    Ok(InsiderTrade {
        date: cells[COL_TRADE_DATE].clone(),
        insider_name: cells[COL_INSIDER_NAME].clone(),
        title: cells[COL_TITLE].clone(),
        trade_type: cells[COL_TRADE_TYPE].clone(),
        price: cells[COL_PRICE].clone(),
        quantity: cells[COL_QUANTITY].clone(),
        shares_owned: cells[COL_OWNED].clone(),
        ownership_change: cells[COL_OWNERSHIP_CHANGE].clone(),
        value: cells[COL_VALUE].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "<tr><th>X</th><th>Filing Date</th><th>Trade Date</th><th>Ticker</th>\
        <th>Insider Name</th><th>Title</th><th>Trade Type</th><th>Price</th><th>Qty</th>\
        <th>Owned</th><th>&Delta;Own</th><th>Value</th></tr>";

    fn data_row(i: usize) -> String {
        format!(
            "<tr><td></td><td>2024-05-0{i} 16:05:11</td><td>2024-05-0{i}</td><td><a href=\"/ABC\">ABC</a></td>\
             <td><a href=\"/insider/{i}\">Insider {i}</a></td><td>Dir</td><td>S - Sale</td>\
             <td>$1{i}.50</td><td>-1,00{i}</td><td>20,00{i}</td><td>-5%</td><td>-$1{i},000</td></tr>"
        )
    }

    fn listing(rows: usize, class: &str) -> String {
        let body: String = (1..=rows).map(data_row).collect();
        format!(
            "<html><body><table class=\"{class}\"><thead>{HEADER}</thead><tbody>{body}</tbody></table></body></html>"
        )
    }

    #[test]
    fn test_parse_caps_at_five_in_source_order() {
        let trades = parse_trades(&listing(6, "tinytable"));

        assert_eq!(trades.len(), 5);
        for (i, trade) in trades.iter().enumerate() {
            let n = i + 1;
            assert_eq!(trade.date, format!("2024-05-0{n}"));
            assert_eq!(trade.insider_name, format!("Insider {n}"));
            assert_eq!(trade.title, "Dir");
            assert_eq!(trade.trade_type, "S - Sale");
            assert_eq!(trade.price, format!("$1{n}.50"));
            assert_eq!(trade.quantity, format!("-1,00{n}"));
            assert_eq!(trade.shares_owned, format!("20,00{n}"));
            assert_eq!(trade.ownership_change, "-5%");
            assert_eq!(trade.value, format!("-$1{n},000"));
        }
    }

    #[test]
    fn test_parse_fewer_rows_than_cap() {
        let trades = parse_trades(&listing(2, "tinytable sortable"));
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].insider_name, "Insider 2");
    }

    #[test]
    fn test_parse_missing_table_class() {
        assert!(parse_trades(&listing(6, "othertable")).is_empty());
    }

    #[test]
    fn test_parse_malformed_row() {
        let html = format!(
            "<table class=\"tinytable\">{HEADER}{}<tr><td>only</td><td>two</td></tr></table>",
            data_row(1)
        );
        assert!(parse_trades(&html).is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_trades("").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_empty() {
        let client = OpenInsiderClient::with_base_url("http://127.0.0.1:9".to_string(), Duration::from_secs(2));
        assert!(client.fetch_trades("ABC").await.is_empty());
    }
}
