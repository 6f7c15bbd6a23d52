//! Raw SQL query functions for the location hierarchy.
//!
//! Country, city, and zone rows are upserted keyed on their geocoded
//! display name (`ON CONFLICT (name) DO UPDATE ... RETURNING`), so a
//! re-occurrence of the same place refreshes its geometry in place
//! instead of creating a duplicate. Crime events are append-only.

use chrono::{DateTime, Utc};
use crime_atlas_database_models::{
    BoundingBox, CityRow, CityTree, CountryRow, CountryTree, CrimeEventRow, PlaceRecord, ZoneRow,
    ZoneTree,
};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Inserts or updates a country keyed by display name.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_country(db: &dyn Database, place: &PlaceRecord) -> Result<CountryRow, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO countries (
                name, longitude, latitude,
                bbox_south, bbox_north, bbox_west, bbox_east, place_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO UPDATE SET
                longitude = EXCLUDED.longitude,
                latitude = EXCLUDED.latitude,
                bbox_south = EXCLUDED.bbox_south,
                bbox_north = EXCLUDED.bbox_north,
                bbox_west = EXCLUDED.bbox_west,
                bbox_east = EXCLUDED.bbox_east,
                place_id = EXCLUDED.place_id
            RETURNING *",
            &place_params(place),
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get country row from upsert".to_string(),
    })?;

    country_from_row(row)
}

/// Inserts or updates a city keyed by display name, linked to its country.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_city(
    db: &dyn Database,
    place: &PlaceRecord,
    country_id: i32,
) -> Result<CityRow, DbError> {
    let mut params = place_params(place).to_vec();
    params.push(DatabaseValue::Int32(country_id));

    let rows = db
        .query_raw_params(
            "INSERT INTO cities (
                name, longitude, latitude,
                bbox_south, bbox_north, bbox_west, bbox_east, place_id,
                country_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (name) DO UPDATE SET
                longitude = EXCLUDED.longitude,
                latitude = EXCLUDED.latitude,
                bbox_south = EXCLUDED.bbox_south,
                bbox_north = EXCLUDED.bbox_north,
                bbox_west = EXCLUDED.bbox_west,
                bbox_east = EXCLUDED.bbox_east,
                place_id = EXCLUDED.place_id,
                country_id = EXCLUDED.country_id
            RETURNING *",
            &params,
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get city row from upsert".to_string(),
    })?;

    city_from_row(row)
}

/// Inserts or updates a zone keyed by display name, linked to its city.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn upsert_zone(
    db: &dyn Database,
    place: &PlaceRecord,
    city_id: i32,
) -> Result<ZoneRow, DbError> {
    let mut params = place_params(place).to_vec();
    params.push(DatabaseValue::Int32(city_id));

    let rows = db
        .query_raw_params(
            "INSERT INTO zones (
                name, longitude, latitude,
                bbox_south, bbox_north, bbox_west, bbox_east, place_id,
                city_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (name) DO UPDATE SET
                longitude = EXCLUDED.longitude,
                latitude = EXCLUDED.latitude,
                bbox_south = EXCLUDED.bbox_south,
                bbox_north = EXCLUDED.bbox_north,
                bbox_west = EXCLUDED.bbox_west,
                bbox_east = EXCLUDED.bbox_east,
                place_id = EXCLUDED.place_id,
                city_id = EXCLUDED.city_id
            RETURNING *",
            &params,
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get zone row from upsert".to_string(),
    })?;

    zone_from_row(row)
}

/// Inserts a new crime event linked to its zone. Events are never
/// deduplicated — every call creates a fresh row.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_crime_event(
    db: &dyn Database,
    occurred_at: DateTime<Utc>,
    crime_type: &str,
    zone_id: i32,
) -> Result<CrimeEventRow, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO crime_events (occurred_at, crime_type, zone_id)
             VALUES ($1, $2, $3)
             RETURNING *",
            &[
                DatabaseValue::DateTime(occurred_at.naive_utc()),
                DatabaseValue::String(crime_type.to_string()),
                DatabaseValue::Int32(zone_id),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get crime event row from insert".to_string(),
    })?;

    crime_event_from_row(row)
}

/// Fetches a country by exact display name with its full subtree (cities,
/// zones, crime events) inflated, or `None` if no such country exists.
///
/// One query per hierarchy level — the hierarchy for a single country is
/// small enough that N+1 fetches are not worth batching.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub async fn get_country_tree(
    db: &dyn Database,
    name: &str,
) -> Result<Option<CountryTree>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM countries WHERE name = $1",
            &[DatabaseValue::String(name.to_string())],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let country = country_from_row(row)?;

    let city_rows = db
        .query_raw_params(
            "SELECT * FROM cities WHERE country_id = $1 ORDER BY name",
            &[DatabaseValue::Int32(country.id)],
        )
        .await?;

    let mut cities = Vec::with_capacity(city_rows.len());

    for city_row in &city_rows {
        let city = city_from_row(city_row)?;

        let zone_rows = db
            .query_raw_params(
                "SELECT * FROM zones WHERE city_id = $1 ORDER BY name",
                &[DatabaseValue::Int32(city.id)],
            )
            .await?;

        let mut zones = Vec::with_capacity(zone_rows.len());

        for zone_row in &zone_rows {
            let zone = zone_from_row(zone_row)?;

            let event_rows = db
                .query_raw_params(
                    "SELECT * FROM crime_events WHERE zone_id = $1 ORDER BY occurred_at",
                    &[DatabaseValue::Int32(zone.id)],
                )
                .await?;

            let mut events = Vec::with_capacity(event_rows.len());
            for event_row in &event_rows {
                events.push(crime_event_from_row(event_row)?);
            }

            zones.push(ZoneTree { zone, events });
        }

        cities.push(CityTree { city, zones });
    }

    Ok(Some(CountryTree { country, cities }))
}

/// The eight shared parameters of every geographic-level upsert, in
/// column order: name, point, bounding box, place id.
fn place_params(place: &PlaceRecord) -> [DatabaseValue; 8] {
    [
        DatabaseValue::String(place.name.clone()),
        DatabaseValue::Real64(place.longitude),
        DatabaseValue::Real64(place.latitude),
        DatabaseValue::Real64(place.bounding_box.south),
        DatabaseValue::Real64(place.bounding_box.north),
        DatabaseValue::Real64(place.bounding_box.west),
        DatabaseValue::Real64(place.bounding_box.east),
        DatabaseValue::Int64(place.place_id),
    ]
}

fn bounding_box_from_row(row: &switchy_database::Row) -> BoundingBox {
    BoundingBox::new(
        row.to_value("bbox_south").unwrap_or(0.0),
        row.to_value("bbox_north").unwrap_or(0.0),
        row.to_value("bbox_west").unwrap_or(0.0),
        row.to_value("bbox_east").unwrap_or(0.0),
    )
}

fn country_from_row(row: &switchy_database::Row) -> Result<CountryRow, DbError> {
    let id: i32 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse country id: {e}"),
    })?;

    Ok(CountryRow {
        id,
        name: row.to_value("name").unwrap_or_default(),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        bounding_box: bounding_box_from_row(row),
        place_id: row.to_value("place_id").unwrap_or(0),
    })
}

fn city_from_row(row: &switchy_database::Row) -> Result<CityRow, DbError> {
    let id: i32 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse city id: {e}"),
    })?;

    let country_id: i32 = row.to_value("country_id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse city country_id: {e}"),
    })?;

    Ok(CityRow {
        id,
        name: row.to_value("name").unwrap_or_default(),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        bounding_box: bounding_box_from_row(row),
        place_id: row.to_value("place_id").unwrap_or(0),
        country_id,
    })
}

fn zone_from_row(row: &switchy_database::Row) -> Result<ZoneRow, DbError> {
    let id: i32 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse zone id: {e}"),
    })?;

    let city_id: i32 = row.to_value("city_id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse zone city_id: {e}"),
    })?;

    Ok(ZoneRow {
        id,
        name: row.to_value("name").unwrap_or_default(),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        bounding_box: bounding_box_from_row(row),
        place_id: row.to_value("place_id").unwrap_or(0),
        city_id,
    })
}

fn crime_event_from_row(row: &switchy_database::Row) -> Result<CrimeEventRow, DbError> {
    let id: i64 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse crime event id: {e}"),
    })?;

    let zone_id: i32 = row.to_value("zone_id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse crime event zone_id: {e}"),
    })?;

    let occurred_at_naive: chrono::NaiveDateTime = row.to_value("occurred_at").unwrap_or_default();
    let occurred_at =
        chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(occurred_at_naive, chrono::Utc);

    Ok(CrimeEventRow {
        id,
        occurred_at,
        crime_type: row.to_value("crime_type").unwrap_or_default(),
        zone_id,
    })
}
