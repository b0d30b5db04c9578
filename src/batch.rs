use scraper::Html;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use crate::config::{SiteConfig, SitesConfig};
use crate::extract::extract_value;
use crate::fetch::PageFetcher;
use crate::models::{ProductResult, ProductTarget};
use crate::price::normalize_price;
use crate::utils::error::{AppError, Result};

/// Runs the full batch: fetch, parse and extract every target in order,
/// strictly sequentially. A target with no site configuration or a
/// failed fetch is skipped with a warning and produces no record; the
/// batch itself is never aborted by one target's failure.
pub async fn run_batch(
    sites: &SitesConfig,
    targets: &[ProductTarget],
    fetcher: &PageFetcher,
) -> Result<Vec<ProductResult>> {
    let mut results = Vec::new();

    for target in targets {
        let Some(site_config) = sites.get(&target.site) else {
            warn!(
                url = %target.url,
                site = %target.site,
                "skipping target, no configuration found for site"
            );
            continue;
        };

        let body = match fetcher.fetch(&target.url).await {
            Ok(body) => body,
            Err(AppError::FetchStatus { url, status }) => {
                warn!(%url, status, "failed to fetch target");
                continue;
            }
            Err(AppError::Http(e)) => {
                warn!(url = %target.url, error = %e, "failed to fetch target");
                continue;
            }
            Err(e) => return Err(e),
        };

        let document = Html::parse_document(&body);
        results.push(scrape_document(&document, target, site_config)?);
    }

    info!(records = results.len(), targets = targets.len(), "batch complete");
    Ok(results)
}

/// Extracts the three product fields from one parsed page and assembles
/// the result record. The stock-mapping table is applied to the stock
/// field only, matching rule semantics: name and price strategies run
/// without it.
pub fn scrape_document(
    document: &Html,
    target: &ProductTarget,
    site_config: &SiteConfig,
) -> Result<ProductResult> {
    let product_name = extract_value(document, &site_config.product_name, None)?;
    let stock_status = extract_value(
        document,
        &site_config.stock_status,
        site_config.stock_mappings.as_ref(),
    )?;
    let price = extract_value(document, &site_config.price, None)?;

    Ok(ProductResult {
        site: target.site.clone(),
        product_name,
        stock_status,
        price: normalize_price(&price),
        url: target.url.clone(),
    })
}

/// Renders the output sequence as a JSON array indented with four
/// spaces, the shape consumers of the report expect.
pub fn render_report(results: &[ProductResult]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(results, &mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json writes valid UTF-8"))
}
