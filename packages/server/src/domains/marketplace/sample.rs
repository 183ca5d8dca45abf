//! Deterministic sample listings for demos and offline runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::listing::RawListing;

const LABELS: &[&str] = &[
    "alpha", "vault", "degen", "wagmi", "punk", "oracle", "ether", "miner", "bridge", "layer",
    "gas", "block", "nft", "dao", "whale", "stake", "yield", "swap", "mint", "node",
];

/// `count` raw listings derived from `seed`. The same seed always gives the same listings.
pub fn sample_listings(count: usize, seed: u64) -> Vec<RawListing> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let label = LABELS[i % LABELS.len()];
            let name = if i < LABELS.len() {
                format!("{}.eth", label)
            } else {
                format!("{}{}.eth", label, i / LABELS.len())
            };

            let floor: f64 = round3(rng.gen_range(0.05..2.0));
            let ratio: f64 = rng.gen_range(0.6..1.4);
            let price = round3(floor * ratio);

            RawListing::new(name, format!("{} ETH", price))
                .with_floor_price(format!("{} ETH", floor))
                .with_metadata("sample", true)
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_listings_are_deterministic() {
        assert_eq!(sample_listings(25, 7), sample_listings(25, 7));
        assert_ne!(sample_listings(5, 7), sample_listings(5, 8));
    }

    #[test]
    fn test_sample_listing_names_are_unique() {
        let listings = sample_listings(45, 1);
        let mut names: Vec<_> = listings.iter().map(|l| l.domain_name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 45);
        assert!(names.iter().all(|n| n.ends_with(".eth")));
    }
}
