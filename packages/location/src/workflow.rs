//! The hierarchical upsert saga and the subtree query.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use crime_atlas_database_models::{
    BoundingBox, CountryTree, HierarchySubtree, LocationHierarchy, PlaceRecord,
};
use crime_atlas_geocoder::{Geocoder, PlaceMatch};

use crate::{CrimeReport, LocationError};
use crate::store::LocationStore;

/// Records one crime event, resolving and upserting each geographic
/// level in strict parent-to-child order.
///
/// Each step performs one geocoder call and one store write. There is no
/// transaction around the sequence: a validation, geocoding, or
/// persistence failure aborts the remaining steps but leaves earlier
/// writes committed.
///
/// # Errors
///
/// Returns [`LocationError::Validation`] for a missing country, city, or
/// zone (checked in that order, each before its geocoder call) or an
/// unparseable `crime_time`; geocoding and persistence failures are
/// propagated as [`LocationError::Geocode`] and
/// [`LocationError::Persistence`].
pub async fn add_location(
    geocoder: &dyn Geocoder,
    store: &dyn LocationStore,
    report: &CrimeReport,
) -> Result<LocationHierarchy, LocationError> {
    let country_name = require(&report.country, "Country")?;
    let country_match = geocoder.resolve(country_name).await?;
    let country = store.upsert_country(&place_record(&country_match)).await?;

    let city_name = require(&report.city, "City")?;
    let city_match = geocoder
        .resolve(&format!("{country_name} + {city_name}"))
        .await?;
    let city = store
        .upsert_city(&place_record(&city_match), country.id)
        .await?;

    let zone_name = require(&report.zone, "Zone")?;
    let zone_match = geocoder
        .resolve(&format!("{country_name} + {city_name} + {zone_name}"))
        .await?;
    let zone = store.upsert_zone(&place_record(&zone_match), city.id).await?;

    let occurred_at = parse_crime_time(&report.crime_time)?;
    let location = store
        .insert_crime_event(occurred_at, &report.type_crime, zone.id)
        .await?;

    log::debug!(
        "Recorded crime event {} in zone {} ({})",
        location.id,
        zone.id,
        zone.name
    );

    Ok(LocationHierarchy {
        country,
        city,
        zone,
        location,
    })
}

/// Returns the stored hierarchy subtree matching the given filters.
///
/// Without a country filter the result is empty and any city/zone
/// filters are ignored. A city or zone filter that matches nothing
/// simply leaves its level absent; only a missing country is an error.
///
/// # Errors
///
/// Returns [`LocationError::CountryNotFound`] when a country filter is
/// given but no stored country has that display name, or
/// [`LocationError::Persistence`] if the read fails.
pub async fn get_location(
    store: &dyn LocationStore,
    country: Option<&str>,
    city: Option<&str>,
    zone: Option<&str>,
) -> Result<HierarchySubtree, LocationError> {
    let Some(country_name) = country.filter(|name| !name.is_empty()) else {
        return Ok(HierarchySubtree::default());
    };

    let tree = store
        .get_country_tree(country_name)
        .await?
        .ok_or_else(|| LocationError::CountryNotFound(country_name.to_string()))?;

    Ok(narrow(tree, city, zone))
}

/// Narrows a fetched country tree by exact-name city and zone filters.
/// The result is additive: each level is present only when resolved.
fn narrow(tree: CountryTree, city: Option<&str>, zone: Option<&str>) -> HierarchySubtree {
    let city_match = city.and_then(|name| {
        tree.cities
            .iter()
            .find(|candidate| candidate.city.name == name)
            .cloned()
    });

    let zone_match = city_match.as_ref().and_then(|matched| {
        zone.and_then(|name| {
            matched
                .zones
                .iter()
                .find(|candidate| candidate.zone.name == name)
                .cloned()
        })
    });

    HierarchySubtree {
        country: Some(tree),
        city: city_match,
        zone: zone_match,
    }
}

fn require<'a>(value: &'a str, field: &str) -> Result<&'a str, LocationError> {
    if value.is_empty() {
        return Err(LocationError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

/// Parses the submitted crime timestamp. RFC 3339 is the canonical
/// format; bare `YYYY-MM-DDTHH:MM:SS` and date-only `YYYY-MM-DD` inputs
/// are also accepted (interpreted as UTC, dates at midnight).
fn parse_crime_time(value: &str) -> Result<DateTime<Utc>, LocationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(DateTime::from_naive_utc_and_offset(
            date.and_time(NaiveTime::MIN),
            Utc,
        ));
    }

    Err(LocationError::Validation(format!(
        "Invalid crimeTime {value:?}"
    )))
}

/// Converts a geocoder match into the attributes written on upsert.
fn place_record(place: &PlaceMatch) -> PlaceRecord {
    PlaceRecord {
        name: place.display_name.clone(),
        longitude: place.longitude,
        latitude: place.latitude,
        bounding_box: BoundingBox::from_array(place.bounding_box),
        place_id: place.place_id,
    }
}
