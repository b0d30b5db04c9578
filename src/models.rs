use serde::{Deserialize, Serialize};

/// One page to scrape: the product URL plus the site id that selects
/// which extraction rules apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductTarget {
    pub url: String,
    pub site: String,
}

/// The record emitted for one successfully fetched target. Field order
/// here is the serialized key order of the JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductResult {
    pub site: String,
    pub product_name: String,
    pub stock_status: String,
    pub price: String,
    pub url: String,
}
