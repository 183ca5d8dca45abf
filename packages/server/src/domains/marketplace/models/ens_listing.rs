use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::marketplace::listing::NormalizedListing;
use crate::kernel::BaseListingStore;

/// EnsListing - a normalized marketplace listing persisted by domain name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnsListing {
    pub id: Uuid,
    pub domain_name: String,
    pub price: f64,
    pub floor_price: Option<f64>,
    pub is_below_floor: bool,
    pub listed_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
    pub source: String, // marketplace target name, e.g. 'Vision'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnsListing {
    /// Build a fresh (not yet persisted) row from a normalized listing.
    pub fn from_normalized(listing: &NormalizedListing, source: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain_name: listing.domain_name.clone(),
            price: listing.price,
            floor_price: listing.floor_price,
            is_below_floor: listing.is_below_floor,
            listed_at: listing.listed_at_utc().unwrap_or(now),
            metadata: serde_json::Value::Object(listing.metadata.clone()),
            source: source.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_normalized(&self) -> NormalizedListing {
        NormalizedListing {
            domain_name: self.domain_name.clone(),
            price: self.price,
            floor_price: self.floor_price,
            is_below_floor: self.is_below_floor,
            listed_at: self.listed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            metadata: self.metadata.as_object().cloned().unwrap_or_default(),
        }
    }

    // =========================================================================
    // SQL Queries - ALL queries must be in models/
    // =========================================================================

    /// Insert or update by domain name, keeping the original id and created_at
    pub async fn upsert(listing: &NormalizedListing, source: &str, pool: &PgPool) -> Result<Self> {
        let row = Self::from_normalized(listing, source, Utc::now());
        let saved = sqlx::query_as::<_, EnsListing>(
            r#"
            INSERT INTO ens_listings (
                id, domain_name, price, floor_price, is_below_floor,
                listed_at, metadata, source, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (domain_name) DO UPDATE SET
                price = EXCLUDED.price,
                floor_price = EXCLUDED.floor_price,
                is_below_floor = EXCLUDED.is_below_floor,
                listed_at = EXCLUDED.listed_at,
                metadata = EXCLUDED.metadata,
                source = EXCLUDED.source,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(&row.domain_name)
        .bind(row.price)
        .bind(row.floor_price)
        .bind(row.is_below_floor)
        .bind(row.listed_at)
        .bind(&row.metadata)
        .bind(&row.source)
        .bind(row.created_at)
        .fetch_one(pool)
        .await
        .context("Failed to upsert ENS listing")?;
        Ok(saved)
    }

    /// Find all listings, most recently updated first
    pub async fn find_all(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let listings = sqlx::query_as::<_, EnsListing>(
            "SELECT * FROM ens_listings ORDER BY updated_at DESC, domain_name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }

    /// Find listings priced under their floor
    pub async fn find_below_floor(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let listings = sqlx::query_as::<_, EnsListing>(
            r#"
            SELECT * FROM ens_listings
            WHERE is_below_floor = true
            ORDER BY (floor_price - price) / NULLIF(floor_price, 0) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ens_listings")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Find listing by domain name (case-insensitive)
    pub async fn find_by_domain(domain_name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let listing =
            sqlx::query_as::<_, EnsListing>("SELECT * FROM ens_listings WHERE domain_name = $1")
                .bind(domain_name.trim().to_lowercase())
                .fetch_optional(pool)
                .await?;
        Ok(listing)
    }
}

/// Postgres-backed listing store
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseListingStore for PgListingStore {
    async fn upsert(&self, listing: &NormalizedListing, source: &str) -> Result<EnsListing> {
        EnsListing::upsert(listing, source, &self.pool).await
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<EnsListing>> {
        EnsListing::find_all(limit, &self.pool).await
    }

    async fn find_below_floor(&self, limit: i64) -> Result<Vec<EnsListing>> {
        EnsListing::find_below_floor(limit, &self.pool).await
    }

    async fn count(&self) -> Result<i64> {
        EnsListing::count(&self.pool).await
    }

    async fn find_by_domain(&self, domain_name: &str) -> Result<Option<EnsListing>> {
        EnsListing::find_by_domain(domain_name, &self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::marketplace::listing::{normalize, RawListing};
    use chrono::TimeZone;

    #[test]
    fn test_round_trip_through_row_preserves_fields() {
        let scraped_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let listing = normalize(
            &RawListing::new("abc.eth", "0.8 ETH").with_floor_price("1 ETH"),
            scraped_at,
        );

        let row = EnsListing::from_normalized(&listing, "Vision", scraped_at);
        assert_eq!(row.source, "Vision");
        assert_eq!(row.listed_at, scraped_at);
        assert_eq!(row.to_normalized(), listing);
    }
}
