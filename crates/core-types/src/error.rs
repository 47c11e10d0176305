use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown product: '{0}'")]
    UnknownProduct(String),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
