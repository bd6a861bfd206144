//! Reference buy-back price lookup.
//!
//! Scrapes the shop's own catalog search page for the first listed price and
//! builds search links into a secondary listings site. The catalog markup
//! shifts without notice, so extraction is a best-effort text scan: a page
//! with no recognizable price yields `None`, not an error.

pub mod catalog;
pub mod listings;

pub use catalog::PriceClient;
pub use listings::{ListingSearch, listing_search};
