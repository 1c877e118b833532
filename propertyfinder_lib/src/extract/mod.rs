//! Mapping decoded `__NEXT_DATA__` documents onto crawler types.

mod detail;
mod fields;
mod listing;
pub mod text;

pub use detail::{to_detail_record, PROPERTY_PATH};
pub use listing::{to_listing_refs, ListingRef, SearchPage};
