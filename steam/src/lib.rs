//! This library provides functionality for interacting with the Steam
//! Community Market: search query encoding, listing extraction from market
//! markup, price normalization and filtering, plus the thin login and
//! purchase endpoints the monitoring bot drives.
mod auth;
mod endpoint;
mod error;
mod filter;
mod http;
mod listing;
mod price;
mod query;

pub use auth::{login, Session};
pub use error::Error;
pub use filter::PriceBand;
pub use http::{Acquisition, Client, Marketplace, PurchaseTerms};
pub use listing::{extract_listings, resolve_listing_id, Listing};
pub use price::parse_price;
pub use query::{
    EncodedQuery, Exterior, Page, QueryEncoder, SearchCriteria, SortDirection, SortVariant,
};

pub type Result<T> = std::result::Result<T, Error>;
