use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}
