mod next_data;
pub use self::next_data::{NextData, Props};

mod search;
pub use self::search::{ListingProperty, SearchListing, SearchMeta, SearchPage, SearchPageProps, SearchResult};
