//! Valuation domain - rough ETH estimates for ENS names.

pub mod valuate;

pub use valuate::{parse_ens_name, valuate, Confidence, Valuation, ValuationError};

use crate::domains::deals::ANALYSIS_WINDOW;
use crate::kernel::ServerDeps;

/// Valuate a name using stored listings as comparables.
pub async fn valuate_domain(deps: &ServerDeps, name: &str) -> Result<Valuation, ValuationError> {
    // Reject bad names before touching the store
    parse_ens_name(name)?;

    let comparables: Vec<_> = deps
        .store
        .find_all(ANALYSIS_WINDOW)
        .await
        .map_err(|e| ValuationError::Comparables(e.to_string()))?
        .iter()
        .map(|row| row.to_normalized())
        .collect();

    valuate(name, &comparables)
}
