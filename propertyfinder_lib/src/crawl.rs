//! Pagination driver: crawls one search target page by page.
//!
//! Pages are fetched strictly in order. The page count reported by page 1
//! decides where the crawl ends; later pages report it again but are not
//! consulted, so a count that changes mid-crawl is not picked up. Every
//! listing on a page is fetched concurrently and the results are merged in
//! listing order before the next page is requested.

use std::fmt;

use futures::future::join_all;
use propertyfinder_api::Client;

use crate::error::{CrawlError, ExtractError, PayloadError};
use crate::extract::{to_detail_record, to_listing_refs, ListingRef, SearchPage};
use crate::page::extract_next_data;
use crate::record::{DetailRecord, ExportRow};
use crate::target::{SearchTarget, TargetResult};

/// Result of one unit of crawl work.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    /// Expected, non-fatal gap: the unit is dropped and the crawl goes on.
    Skipped(SkipReason),
    /// The upstream contract is broken; the target stops.
    Fatal(CrawlError),
}

/// Why a page or listing produced nothing.
#[derive(Debug)]
pub enum SkipReason {
    Fetch(propertyfinder_api::Error),
    Payload(PayloadError),
    Extract(ExtractError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "{}", e),
            Self::Payload(e) => write!(f, "{}", e),
            Self::Extract(e) => write!(f, "{}", e),
        }
    }
}

/// How a target's crawl ended.
#[derive(Debug)]
pub enum StopReason {
    /// Every page up to the page-1 count was processed.
    Completed,
    /// A results page could not be fetched or carried no usable data.
    /// Pages before it are kept.
    PageSkipped { page: u32, reason: SkipReason },
    /// The crawl was aborted; rows collected so far are kept.
    Fatal { page: u32, error: CrawlError },
}

impl StopReason {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::PageSkipped { page, reason } => write!(f, "stopped at page {}: {}", page, reason),
            Self::Fatal { page, error } => write!(f, "failed at page {}: {}", page, error),
        }
    }
}

/// Everything one target's crawl produced.
#[derive(Debug)]
pub struct TargetCrawl {
    /// Deduplicated rows in first-seen order.
    pub rows: Vec<ExportRow>,
    /// Results pages whose listings were expanded.
    pub pages: u32,
    /// Page count reported by page 1, if it was reached.
    pub page_count: Option<u32>,
    /// Listings dropped because their detail page failed.
    pub skipped_listings: usize,
    pub stop: StopReason,
}

/// Crawls `target` to completion.
pub async fn crawl_target(client: &Client, target: &SearchTarget) -> TargetCrawl {
    let mut collected = TargetResult::new();
    let mut page: u32 = 1;
    let mut page_count: Option<u32> = None;
    let mut pages = 0;
    let mut skipped_listings = 0;

    let stop = loop {
        let search = match fetch_search_page(client, target, page).await {
            Outcome::Success(search) => search,
            Outcome::Skipped(reason) => {
                log_page_skip(target, page, &reason);
                break StopReason::PageSkipped { page, reason };
            }
            Outcome::Fatal(error) => {
                tracing::error!("Page {} of {} is unusable: {}", page, target.domain(), error);
                break StopReason::Fatal { page, error };
            }
        };

        let total = *page_count.get_or_insert(search.page_count);
        tracing::info!(
            "Processing page {} of {} pages of results from {}.",
            page,
            total,
            target.domain()
        );

        let outcomes = fetch_listings(client, &search.refs).await;
        let mut batch = Vec::with_capacity(outcomes.len());
        for (listing, outcome) in search.refs.iter().zip(outcomes) {
            match outcome {
                Ok(record) => batch.push(record.to_export_row()),
                Err(reason) => {
                    skipped_listings += 1;
                    tracing::warn!(
                        "Skipping listing {} ({}): {}",
                        listing.id,
                        listing.detail_url,
                        reason
                    );
                }
            }
        }
        collected.extend(batch);
        pages += 1;

        page += 1;
        if page > total {
            break StopReason::Completed;
        }
    };

    tracing::info!(
        "Finished {} after {} page(s): {} unique listings, {} skipped ({})",
        target.domain(),
        pages,
        collected.len(),
        skipped_listings,
        stop
    );

    TargetCrawl {
        rows: collected.finish(),
        pages,
        page_count,
        skipped_listings,
        stop,
    }
}

/// Fetches and decodes results page `page` of `target`.
pub async fn fetch_search_page(
    client: &Client,
    target: &SearchTarget,
    page: u32,
) -> Outcome<SearchPage> {
    let html = match client.fetch(&target.page_url(page)).await {
        Ok(html) => html,
        Err(e) => return Outcome::Skipped(SkipReason::Fetch(e)),
    };
    let doc = match extract_next_data(&html) {
        Ok(doc) => doc,
        Err(e) => return Outcome::Skipped(SkipReason::Payload(e)),
    };
    match to_listing_refs(&doc) {
        Ok(search) => Outcome::Success(search),
        Err(e) => Outcome::Fatal(e.into()),
    }
}

/// Fetches and extracts one listing's detail page.
///
/// A listing can only be skipped, never stop the target, so there is no
/// fatal case here.
pub async fn fetch_listing(
    client: &Client,
    listing: &ListingRef,
) -> Result<DetailRecord, SkipReason> {
    let html = client
        .fetch(&listing.detail_url)
        .await
        .map_err(SkipReason::Fetch)?;
    let doc = extract_next_data(&html).map_err(SkipReason::Payload)?;
    to_detail_record(&doc).map_err(SkipReason::Extract)
}

/// Fetches every listing concurrently; results come back in `refs` order.
async fn fetch_listings(
    client: &Client,
    refs: &[ListingRef],
) -> Vec<Result<DetailRecord, SkipReason>> {
    join_all(refs.iter().map(|listing| fetch_listing(client, listing))).await
}

fn log_page_skip(target: &SearchTarget, page: u32, reason: &SkipReason) {
    match reason {
        SkipReason::Payload(PayloadError::Absent) => tracing::info!(
            "No results data on page {} of {}, stopping",
            page,
            target.domain()
        ),
        SkipReason::Payload(PayloadError::Decode(e)) => tracing::warn!(
            "Malformed results data on page {} of {}, stopping: {}",
            page,
            target.domain(),
            e
        ),
        other => tracing::warn!(
            "Failed to get page {} of {}, stopping: {}",
            page,
            target.domain(),
            other
        ),
    }
}
