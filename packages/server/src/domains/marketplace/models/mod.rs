pub mod ens_listing;

pub use ens_listing::{EnsListing, PgListingStore};
