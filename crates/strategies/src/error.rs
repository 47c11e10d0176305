use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Missing market data: {0}")]
    MissingData(String),

    #[error("An error occurred during indicator calculation: {0}")]
    Indicator(String),
}
