pub mod batch;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod price;
pub mod utils;

// Re-export commonly used types
pub use config::{SiteConfig, SitesConfig, StockMappings, Strategy};
pub use fetch::{FetchConfig, PageFetcher};
pub use models::{ProductResult, ProductTarget};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
