use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Degenerate vector: cannot normalize a zero-magnitude vector")]
    DegenerateVector,

    #[error("Numeric divergence: {0}")]
    NumericDivergence(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
}
