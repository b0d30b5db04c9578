use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

use crate::utils::error::{AppError, Result};

/// A declarative rule describing how to locate and extract one field's
/// value from a parsed document.
///
/// The `type` tag is closed: an unrecognized tag in a config file is a
/// deserialization error at load time, never a silent miss at runtime.
/// `selector` and `text` are semantically identical; both spellings are
/// accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Strategy {
    Meta { property: String },
    Selector { selector: String },
    Attribute { selector: String, attribute: String },
    Text { selector: String },
    Class { selector: String },
}

impl Strategy {
    /// The CSS selector this strategy queries with, if it uses one.
    pub fn css_selector(&self) -> Option<&str> {
        match self {
            Strategy::Meta { .. } => None,
            Strategy::Selector { selector }
            | Strategy::Attribute { selector, .. }
            | Strategy::Text { selector }
            | Strategy::Class { selector } => Some(selector),
        }
    }
}

/// Lookup table translating site-specific raw tokens (CSS classes or
/// text) into canonical stock-status labels.
pub type StockMappings = HashMap<String, String>;

/// Extraction rules for one site: a strategy per field plus an optional
/// stock-status mapping table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    pub product_name: Strategy,
    pub stock_status: Strategy,
    pub price: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_mappings: Option<StockMappings>,
}

impl SiteConfig {
    fn strategies(&self) -> [&Strategy; 3] {
        [&self.product_name, &self.stock_status, &self.price]
    }
}

/// All site configurations, keyed by site id. Loaded once at startup,
/// read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SitesConfig {
    #[serde(flatten)]
    pub sites: HashMap<String, SiteConfig>,
}

impl SitesConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: SitesConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn get(&self, site: &str) -> Option<&SiteConfig> {
        self.sites.get(site)
    }

    pub fn validate(&self) -> Result<()> {
        for (site, site_config) in &self.sites {
            for strategy in site_config.strategies() {
                if let Some(selector) = strategy.css_selector() {
                    Selector::parse(selector).map_err(|_| AppError::InvalidSelector {
                        selector: selector.to_string(),
                    })?;
                }

                // A class strategy is unresolvable without its mapping
                // table; reject the config up front instead of at the
                // point of use.
                if matches!(strategy, Strategy::Class { .. })
                    && site_config.stock_mappings.is_none()
                {
                    return Err(AppError::Config(format!(
                        "site '{site}' uses a class strategy but defines no stock_mappings table"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Loads the ordered target list from a JSON array of `{url, site}`
/// objects, validating that every URL parses.
pub fn load_targets(path: &Path) -> Result<Vec<crate::models::ProductTarget>> {
    let raw = std::fs::read_to_string(path)?;
    let targets: Vec<crate::models::ProductTarget> = serde_json::from_str(&raw)?;
    for target in &targets {
        Url::parse(&target.url)
            .map_err(|e| AppError::Config(format!("invalid target URL '{}': {}", target.url, e)))?;
    }
    Ok(targets)
}
