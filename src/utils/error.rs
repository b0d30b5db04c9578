use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("Class strategy '{selector}' requires a stock_mappings table")]
    MissingStockMappings { selector: String },

    #[error("Fetch failed for {url}: HTTP status {status}")]
    FetchStatus { url: String, status: u16 },
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
