/// Currency symbols stripped from extracted price text.
const CURRENCY_SYMBOLS: [char; 2] = ['£', '$'];

/// Strips currency symbols and thousands-separator commas from price
/// text and trims surrounding whitespace.
///
/// The output stays textual: decimal points and any locale formatting
/// not explicitly stripped are preserved, and the "Unknown" sentinel
/// passes through unchanged. Idempotent.
pub fn normalize_price(text: &str) -> String {
    text.chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}
