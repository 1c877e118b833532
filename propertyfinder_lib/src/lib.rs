//! Crawler for propertyfinder search results.
//!
//! Walks each configured search page by page, fetches every listing's
//! detail page, flattens the embedded `__NEXT_DATA__` property object into
//! a [`DetailRecord`] and hands the deduplicated rows of each search to a
//! [`ResultSink`].

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod page;
pub mod record;
pub mod run;
pub mod target;

pub use propertyfinder_api;
pub use propertyfinder_api::{Client, RetryPolicy};

pub use config::{CrawlConfig, DEFAULT_TARGETS};
pub use crawl::{crawl_target, Outcome, SkipReason, StopReason, TargetCrawl};
pub use error::{ConfigError, ContractError, CrawlError, ExtractError, OutputError, PayloadError, RunError};
pub use extract::{to_detail_record, to_listing_refs, ListingRef, SearchPage};
pub use page::extract_next_data;
pub use record::{ContactOptions, DetailRecord, ExportRow, FieldValue, EXCLUDED_FIELDS, EXPORT_COLUMNS};
pub use run::{run_targets, ResultSink, RunSummary, Runner, TargetReport};
pub use target::{SearchTarget, TargetResult};
