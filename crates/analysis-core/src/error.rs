use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InsufficientData(_) => "insufficient_data",
            AnalysisError::InvalidPrice(_) => "invalid_price",
            AnalysisError::UnknownAlgorithm(_) => "unknown_algorithm",
            AnalysisError::InvalidData(_) => "invalid_data",
            AnalysisError::InvalidConfig(_) => "invalid_config",
        }
    }
}
