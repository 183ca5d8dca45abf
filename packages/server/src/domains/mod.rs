pub mod agent;
pub mod deals;
pub mod marketplace;
pub mod valuation;
