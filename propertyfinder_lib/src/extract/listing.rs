use propertyfinder_api::types::SearchPage as SearchDocument;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ContractError;

/// A listing found on a search page, pointing at its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRef {
    pub id: String,
    pub detail_url: String,
}

/// What one search results page yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Total pages reported for the search by this page.
    pub page_count: u32,
    pub refs: Vec<ListingRef>,
}

/// Reads `props.pageProps.searchResult` from a decoded search page.
///
/// The search layout is the site's stable contract, so any missing field
/// is a [`ContractError`] rather than a skippable gap.
pub fn to_listing_refs(doc: &Value) -> Result<SearchPage, ContractError> {
    let document = SearchDocument::deserialize(doc)?;
    let result = document.props.page_props.search_result;
    Ok(SearchPage {
        page_count: result.meta.page_count,
        refs: result
            .listings
            .into_iter()
            .map(|listing| ListingRef {
                id: listing.property.id,
                detail_url: listing.property.share_url,
            })
            .collect(),
    })
}
