use serde::{Deserialize, Serialize};

use super::next_data::{string_or_number, NextData};

/// `props.pageProps` of a search results page.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchPageProps {
    pub search_result: SearchResult,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResult {
    pub meta: SearchMeta,
    pub listings: Vec<SearchListing>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchMeta {
    /// Total number of result pages for the search, as reported by this page.
    pub page_count: u32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchListing {
    pub property: ListingProperty,
}

/// The only two listing fields the crawler needs from a search page.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListingProperty {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub share_url: String,
}

/// A decoded search results page.
pub type SearchPage = NextData<SearchPageProps>;
