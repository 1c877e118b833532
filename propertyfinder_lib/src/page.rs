//! Locates and decodes the `__NEXT_DATA__` payload embedded in site pages.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::PayloadError;

/// The inline script every search and detail page renders from.
pub const NEXT_DATA_LOCATOR: &str = "script#__NEXT_DATA__";

/// Extracts the embedded render data from an HTML document.
///
/// A missing or empty script element yields [`PayloadError::Absent`];
/// text that is not JSON yields [`PayloadError::Decode`].
pub fn extract_next_data(html: &str) -> Result<Value, PayloadError> {
    let selector =
        Selector::parse(NEXT_DATA_LOCATOR).map_err(|e| PayloadError::Locator(e.to_string()))?;
    let document = Html::parse_document(html);

    let text: String = match document.select(&selector).next() {
        Some(script) => script.text().collect(),
        None => return Err(PayloadError::Absent),
    };
    if text.trim().is_empty() {
        return Err(PayloadError::Absent);
    }

    Ok(serde_json::from_str(&text)?)
}
