use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Router received invalid parameters: {0}")]
    InvalidParameters(String),
}
