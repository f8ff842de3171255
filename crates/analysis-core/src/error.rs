use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Error fetching data for {symbol}: {message}")]
    MarketData { symbol: String, message: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Error generating analysis: {0}")]
    Inference(String),
}

impl AnalysisError {
    pub fn market_data(symbol: &str, message: impl Into<String>) -> Self {
        AnalysisError::MarketData {
            symbol: symbol.to_string(),
            message: message.into(),
        }
    }
}
