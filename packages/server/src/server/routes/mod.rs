// HTTP routes
pub mod crawl;
pub mod deals;
pub mod domains;
pub mod error;
pub mod health;
pub mod valuate;

pub use crawl::*;
pub use deals::*;
pub use domains::*;
pub use error::*;
pub use health::*;
pub use valuate::*;
