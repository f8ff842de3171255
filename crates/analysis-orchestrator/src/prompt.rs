//! Renders market data, indicators and insider activity into the model prompt.

use analysis_core::{CompanyInfo, InsiderTrade};
use technical_analysis::{IndicatorSnapshot, PerformanceSnapshot};

/// Placeholder for any value the data source did not provide
pub const NOT_AVAILABLE: &str = "N/A";

pub const NO_INSIDER_TRADES: &str = "No recent insider trades found.";

/// Everything the prompt is rendered from
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub ticker: &'a str,
    pub company: &'a CompanyInfo,
    pub indicators: &'a IndicatorSnapshot,
    pub performance: &'a PerformanceSnapshot,
    pub insider_trades: &'a [InsiderTrade],
}

pub fn compose_prompt(ctx: &PromptContext<'_>) -> String {
    let company = ctx.company;
    let ind = ctx.indicators;
    let perf = ctx.performance;

    format!(
        "You are an expert stock analyst. Provide a comprehensive analysis of {ticker} to determine if it's a good short-term (day/swing trade) or long-term investment.

INSIDER TRADES:
{insider_trades}

COMPANY INFORMATION:
Name: {name}
Industry: {industry}
Sector: {sector}
Market Cap: {market_cap}

CURRENT MARKET DATA:
Price: {price}
52-Week Range: {week_low} - {week_high}
Volume: {volume}
Average Volume: {average_volume}

TECHNICAL INDICATORS:
RSI (14): {rsi}
SMA 20: {sma20}
SMA 50: {sma50}
VWAP: {vwap}

PERFORMANCE:
Daily Change: {daily_change}
Weekly Change: {weekly_change}
Monthly Change: {monthly_change}

FUNDAMENTAL METRICS:
P/E Ratio: {trailing_pe}
EPS (TTM): {trailing_eps}
Forward P/E: {forward_pe}
PEG Ratio: {peg_ratio}

Based on this data, provide:
1. SHORT-TERM OUTLOOK (1-5 days)
   - Clear buy/sell/hold recommendation
   - Key support and resistance levels
   - Potential entry/exit points
   - Risk assessment

2. LONG-TERM OUTLOOK (6-12 months)
   - Investment recommendation
   - Growth potential
   - Key risks and catalysts
   - Target price range

3. KEY CONSIDERATIONS
   - Technical analysis insights
   - Fundamental strengths/weaknesses
   - Market sentiment
   - Industry trends

Format your response clearly with sections, colorful elements and provide specific actionable insights.
",
        ticker = ctx.ticker,
        insider_trades = format_insider_trades(ctx.insider_trades),
        name = text_or_na(company.name.as_deref()),
        industry = text_or_na(company.industry.as_deref()),
        sector = text_or_na(company.sector.as_deref()),
        market_cap = format_currency_grouped(company.market_cap),
        price = format_currency(ind.price),
        week_low = format_currency(company.fifty_two_week_low),
        week_high = format_currency(company.fifty_two_week_high),
        volume = format_count(company.volume),
        average_volume = format_count(company.average_volume),
        rsi = format_ratio(ind.rsi14),
        sma20 = format_optional_currency(ind.sma20),
        sma50 = format_optional_currency(ind.sma50),
        vwap = format_optional_currency(ind.vwap),
        daily_change = format_percent(perf.daily_change),
        weekly_change = format_percent(perf.weekly_change),
        monthly_change = format_percent(perf.monthly_change),
        trailing_pe = format_ratio(company.trailing_pe),
        trailing_eps = format_currency(company.trailing_eps),
        forward_pe = format_ratio(company.forward_pe),
        peg_ratio = format_ratio(company.peg_ratio),
    )
}

pub fn format_insider_trades(trades: &[InsiderTrade]) -> String {
    if trades.is_empty() {
        return NO_INSIDER_TRADES.to_string();
    }

    trades
        .iter()
        .map(|t| {
            format!(
                "- {}: {} ({}) {} {} shares @ {} | owned after: {} ({}) | value: {}",
                t.date,
                t.insider_name,
                t.title,
                t.trade_type,
                t.quantity,
                t.price,
                t.shares_owned,
                t.ownership_change,
                t.value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

pub fn format_currency(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn format_optional_currency(value: Option<f64>) -> String {
    value.map(format_currency).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `$` amount with thousands separators and 2 decimals
pub fn format_currency_grouped(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(whole), fraction)
}

pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_ratio(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
