use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::config::{StockMappings, Strategy};
use crate::utils::error::{AppError, Result};

/// Placeholder for "field not found". Distinct from an empty string: an
/// element that exists but has no text yields `""`, not this.
pub const UNKNOWN: &str = "Unknown";

static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());

/// Interprets an extraction strategy against a parsed document and
/// returns a single normalized string value.
///
/// A missing element or attribute is never an error; absence is always
/// represented by the [`UNKNOWN`] sentinel. The only failure modes are
/// configuration defects: an unparseable selector, or a `class` strategy
/// invoked without a stock-mapping table.
///
/// When `stock_mappings` is supplied, raw values that appear as keys in
/// it are replaced by their canonical labels before returning. The
/// `class` variant instead scans the matched element's class tokens in
/// document order and returns the label of the first token found in the
/// table.
pub fn extract_value(
    document: &Html,
    strategy: &Strategy,
    stock_mappings: Option<&StockMappings>,
) -> Result<String> {
    let value = match strategy {
        Strategy::Meta { property } => document
            .select(&META)
            .find(|tag| tag.value().attr("property") == Some(property.as_str()))
            .and_then(|tag| tag.value().attr("content"))
            .map(|content| content.trim().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),

        // `selector` and `text` are distinct config spellings of the
        // same rule: first match's text content.
        Strategy::Selector { selector } | Strategy::Text { selector } => {
            select_first(document, selector)?
                .map(element_text)
                .unwrap_or_else(|| UNKNOWN.to_string())
        }

        Strategy::Attribute {
            selector,
            attribute,
        } => select_first(document, selector)?
            .and_then(|element| element.value().attr(attribute))
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),

        Strategy::Class { selector } => {
            // The class variant is unresolvable without its lookup
            // table; an absent table is a config defect, not a miss.
            let mappings = stock_mappings.ok_or_else(|| AppError::MissingStockMappings {
                selector: selector.clone(),
            })?;
            let label = select_first(document, selector)?.and_then(|element| {
                element
                    .value()
                    .attr("class")
                    .unwrap_or("")
                    .split_whitespace()
                    .find_map(|class| mappings.get(class))
            });
            return Ok(label.cloned().unwrap_or_else(|| UNKNOWN.to_string()));
        }
    };

    // Map raw text through the stock table when one is supplied.
    if let Some(mappings) = stock_mappings {
        if let Some(label) = mappings.get(&value) {
            return Ok(label.clone());
        }
    }

    Ok(value)
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Result<Option<ElementRef<'a>>> {
    let parsed = Selector::parse(selector).map_err(|_| AppError::InvalidSelector {
        selector: selector.to_string(),
    })?;
    Ok(document.select(&parsed).next())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    fn mappings(pairs: &[(&str, &str)]) -> StockMappings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_meta_strategy() {
        let document = parse(
            r#"<html><head>
                <meta property="og:title" content="  Widget Deluxe  ">
                <meta property="og:type" content="product">
            </head></html>"#,
        );
        let strategy = Strategy::Meta {
            property: "og:title".to_string(),
        };
        let value = extract_value(&document, &strategy, None).unwrap();
        assert_eq!(value, "Widget Deluxe");
    }

    #[test]
    fn test_selector_strategy() {
        let document = parse(r#"<div class="price"> $19.99 </div>"#);
        let strategy = Strategy::Selector {
            selector: ".price".to_string(),
        };
        assert_eq!(extract_value(&document, &strategy, None).unwrap(), "$19.99");
    }

    #[test]
    fn test_text_strategy_matches_selector_strategy() {
        let document = parse(r#"<h1>Widget</h1>"#);
        let selector = Strategy::Selector {
            selector: "h1".to_string(),
        };
        let text = Strategy::Text {
            selector: "h1".to_string(),
        };
        assert_eq!(
            extract_value(&document, &selector, None).unwrap(),
            extract_value(&document, &text, None).unwrap(),
        );
    }

    #[test]
    fn test_attribute_strategy() {
        let document = parse(r#"<div class="stock" data-availability="InStock"></div>"#);
        let strategy = Strategy::Attribute {
            selector: ".stock".to_string(),
            attribute: "data-availability".to_string(),
        };
        assert_eq!(
            extract_value(&document, &strategy, None).unwrap(),
            "InStock"
        );
    }

    #[test]
    fn test_attribute_strategy_missing_attribute() {
        let document = parse(r#"<div class="stock"></div>"#);
        let strategy = Strategy::Attribute {
            selector: ".stock".to_string(),
            attribute: "data-availability".to_string(),
        };
        assert_eq!(extract_value(&document, &strategy, None).unwrap(), UNKNOWN);
    }

    #[rstest]
    #[case::meta(Strategy::Meta { property: "og:title".to_string() })]
    #[case::selector(Strategy::Selector { selector: ".price".to_string() })]
    #[case::text(Strategy::Text { selector: "h1".to_string() })]
    #[case::attribute(Strategy::Attribute {
        selector: ".stock".to_string(),
        attribute: "data-availability".to_string(),
    })]
    fn test_miss_returns_unknown(#[case] strategy: Strategy) {
        let document = parse("<html><body><p>nothing relevant</p></body></html>");
        assert_eq!(extract_value(&document, &strategy, None).unwrap(), UNKNOWN);
    }

    #[test]
    fn test_class_strategy_first_matching_token_wins() {
        let document = parse(r#"<div class="product in-stock badge"></div>"#);
        let strategy = Strategy::Class {
            selector: "div".to_string(),
        };
        let table = mappings(&[("in-stock", "In Stock"), ("badge", "Out of Stock")]);
        assert_eq!(
            extract_value(&document, &strategy, Some(&table)).unwrap(),
            "In Stock"
        );
    }

    #[test]
    fn test_class_strategy_no_matching_token() {
        let document = parse(r#"<div class="stock available"></div>"#);
        let strategy = Strategy::Class {
            selector: ".stock".to_string(),
        };
        let table = mappings(&[]);
        assert_eq!(
            extract_value(&document, &strategy, Some(&table)).unwrap(),
            UNKNOWN
        );
    }

    #[test]
    fn test_class_strategy_no_matching_element() {
        let document = parse(r#"<p>no stock element here</p>"#);
        let strategy = Strategy::Class {
            selector: ".stock".to_string(),
        };
        let table = mappings(&[("in-stock", "In Stock")]);
        assert_eq!(
            extract_value(&document, &strategy, Some(&table)).unwrap(),
            UNKNOWN
        );
    }

    #[test]
    fn test_class_strategy_requires_mappings() {
        let document = parse(r#"<div class="stock in-stock"></div>"#);
        let strategy = Strategy::Class {
            selector: ".stock".to_string(),
        };
        let result = extract_value(&document, &strategy, None);
        assert!(matches!(
            result,
            Err(AppError::MissingStockMappings { .. })
        ));
    }

    #[test]
    fn test_text_value_mapped_through_stock_table() {
        let document = parse(r#"<span class="availability">auf Lager</span>"#);
        let strategy = Strategy::Text {
            selector: ".availability".to_string(),
        };
        let table = mappings(&[("auf Lager", "In Stock")]);
        assert_eq!(
            extract_value(&document, &strategy, Some(&table)).unwrap(),
            "In Stock"
        );
    }

    #[test]
    fn test_unmapped_text_passes_through() {
        let document = parse(r#"<span class="availability">ships soon</span>"#);
        let strategy = Strategy::Text {
            selector: ".availability".to_string(),
        };
        let table = mappings(&[("auf Lager", "In Stock")]);
        assert_eq!(
            extract_value(&document, &strategy, Some(&table)).unwrap(),
            "ships soon"
        );
    }

    #[test]
    fn test_mapping_is_case_sensitive() {
        let document = parse(r#"<div class="stock In-Stock"></div>"#);
        let strategy = Strategy::Class {
            selector: ".stock".to_string(),
        };
        let table = mappings(&[("in-stock", "In Stock")]);
        assert_eq!(
            extract_value(&document, &strategy, Some(&table)).unwrap(),
            UNKNOWN
        );
    }

    #[test]
    fn test_empty_element_text_is_not_unknown() {
        let document = parse(r#"<div class="price"></div>"#);
        let strategy = Strategy::Selector {
            selector: ".price".to_string(),
        };
        assert_eq!(extract_value(&document, &strategy, None).unwrap(), "");
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let document = parse("<html></html>");
        let strategy = Strategy::Selector {
            selector: "div >".to_string(),
        };
        let result = extract_value(&document, &strategy, None);
        assert!(matches!(result, Err(AppError::InvalidSelector { .. })));
    }

    #[test]
    fn test_meta_without_content_attribute() {
        let document = parse(r#"<html><head><meta property="og:title"></head></html>"#);
        let strategy = Strategy::Meta {
            property: "og:title".to_string(),
        };
        assert_eq!(extract_value(&document, &strategy, None).unwrap(), UNKNOWN);
    }

    #[test]
    fn test_first_matching_element_wins() {
        let document = parse(
            r#"<div class="price">$19.99</div><div class="price">$29.99</div>"#,
        );
        let strategy = Strategy::Selector {
            selector: ".price".to_string(),
        };
        assert_eq!(extract_value(&document, &strategy, None).unwrap(), "$19.99");
    }
}
