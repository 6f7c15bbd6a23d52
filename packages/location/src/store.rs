//! Persistence seam for the location workflows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crime_atlas_database::{DbError, queries};
use crime_atlas_database_models::{
    CityRow, CountryRow, CountryTree, CrimeEventRow, PlaceRecord, ZoneRow,
};
use switchy_database::Database;

/// Storage operations the workflows depend on.
///
/// The production implementation is [`DbLocationStore`]; tests use an
/// in-memory double.
#[async_trait::async_trait]
pub trait LocationStore: Send + Sync {
    /// Inserts or updates a country keyed by display name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    async fn upsert_country(&self, place: &PlaceRecord) -> Result<CountryRow, DbError>;

    /// Inserts or updates a city keyed by display name, linked to its
    /// country.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    async fn upsert_city(&self, place: &PlaceRecord, country_id: i32) -> Result<CityRow, DbError>;

    /// Inserts or updates a zone keyed by display name, linked to its
    /// city.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    async fn upsert_zone(&self, place: &PlaceRecord, city_id: i32) -> Result<ZoneRow, DbError>;

    /// Creates a fresh crime event linked to its zone.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    async fn insert_crime_event(
        &self,
        occurred_at: DateTime<Utc>,
        crime_type: &str,
        zone_id: i32,
    ) -> Result<CrimeEventRow, DbError>;

    /// Fetches a country by exact display name with its full subtree
    /// inflated, or `None` if no such country exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    async fn get_country_tree(&self, name: &str) -> Result<Option<CountryTree>, DbError>;
}

/// [`LocationStore`] backed by the shared database connection.
pub struct DbLocationStore {
    db: Arc<dyn Database>,
}

impl DbLocationStore {
    /// Wraps the given database connection.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl LocationStore for DbLocationStore {
    async fn upsert_country(&self, place: &PlaceRecord) -> Result<CountryRow, DbError> {
        queries::upsert_country(self.db.as_ref(), place).await
    }

    async fn upsert_city(&self, place: &PlaceRecord, country_id: i32) -> Result<CityRow, DbError> {
        queries::upsert_city(self.db.as_ref(), place, country_id).await
    }

    async fn upsert_zone(&self, place: &PlaceRecord, city_id: i32) -> Result<ZoneRow, DbError> {
        queries::upsert_zone(self.db.as_ref(), place, city_id).await
    }

    async fn insert_crime_event(
        &self,
        occurred_at: DateTime<Utc>,
        crime_type: &str,
        zone_id: i32,
    ) -> Result<CrimeEventRow, DbError> {
        queries::insert_crime_event(self.db.as_ref(), occurred_at, crime_type, zone_id).await
    }

    async fn get_country_tree(&self, name: &str) -> Result<Option<CountryTree>, DbError> {
        queries::get_country_tree(self.db.as_ref(), name).await
    }
}
