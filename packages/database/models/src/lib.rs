#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Database row types and hierarchy shapes for the crime atlas.
//!
//! The location hierarchy is four levels deep: country -> city -> zone ->
//! crime event. Each geographic level is keyed by the display name the
//! geocoder resolved for it; crime events are plain append-only rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates, stored in the order
/// Nominatim reports it: south, north, west, east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern latitude boundary.
    pub south: f64,
    /// Northern latitude boundary.
    pub north: f64,
    /// Western longitude boundary.
    pub west: f64,
    /// Eastern longitude boundary.
    pub east: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Builds a bounding box from a `[south, north, west, east]` array.
    #[must_use]
    pub const fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

/// The geocoded attributes written on every upsert of a geographic level.
///
/// The `name` is the geocoder's display name and is the uniqueness key;
/// geometry, bounding box, and place id are refreshed in place on each
/// re-occurrence of the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    /// Display name returned by the geocoder.
    pub name: String,
    /// Point longitude (WGS84).
    pub longitude: f64,
    /// Point latitude (WGS84).
    pub latitude: f64,
    /// Bounding box of the resolved place.
    pub bounding_box: BoundingBox,
    /// External place identifier from the geocoder.
    pub place_id: i64,
}

/// A country row as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRow {
    /// Primary key.
    pub id: i32,
    /// Display name (unique).
    pub name: String,
    /// Point longitude.
    pub longitude: f64,
    /// Point latitude.
    pub latitude: f64,
    /// Bounding box.
    pub bounding_box: BoundingBox,
    /// External place identifier.
    pub place_id: i64,
}

/// A city row as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRow {
    /// Primary key.
    pub id: i32,
    /// Display name (unique).
    pub name: String,
    /// Point longitude.
    pub longitude: f64,
    /// Point latitude.
    pub latitude: f64,
    /// Bounding box.
    pub bounding_box: BoundingBox,
    /// External place identifier.
    pub place_id: i64,
    /// Owning country.
    pub country_id: i32,
}

/// A zone row as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRow {
    /// Primary key.
    pub id: i32,
    /// Display name (unique).
    pub name: String,
    /// Point longitude.
    pub longitude: f64,
    /// Point latitude.
    pub latitude: f64,
    /// Bounding box.
    pub bounding_box: BoundingBox,
    /// External place identifier.
    pub place_id: i64,
    /// Owning city.
    pub city_id: i32,
}

/// A crime event row. Always inserted fresh, never deduplicated.
///
/// The wire names `crimeTime` and `typeCrime` match the fields clients
/// submit when recording an event, so the response echoes the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeEventRow {
    /// Primary key.
    pub id: i64,
    /// When the crime occurred.
    #[serde(rename = "crimeTime")]
    pub occurred_at: DateTime<Utc>,
    /// Free-text crime type, stored verbatim.
    #[serde(rename = "typeCrime")]
    pub crime_type: String,
    /// Owning zone.
    pub zone_id: i32,
}

/// A zone with its crime events inflated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneTree {
    /// The zone row itself.
    #[serde(flatten)]
    pub zone: ZoneRow,
    /// All crime events recorded in this zone.
    pub events: Vec<CrimeEventRow>,
}

/// A city with its zones (and their events) inflated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityTree {
    /// The city row itself.
    #[serde(flatten)]
    pub city: CityRow,
    /// All zones owned by this city.
    pub zones: Vec<ZoneTree>,
}

/// A country with its full nested hierarchy inflated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryTree {
    /// The country row itself.
    #[serde(flatten)]
    pub country: CountryRow,
    /// All cities owned by this country.
    pub cities: Vec<CityTree>,
}

/// The composite result of recording one crime event: the four rows
/// touched along the hierarchy, in parent-to-child order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHierarchy {
    /// The upserted country.
    pub country: CountryRow,
    /// The upserted city.
    pub city: CityRow,
    /// The upserted zone.
    pub zone: ZoneRow,
    /// The newly created crime event.
    pub location: CrimeEventRow,
}

/// The additive result of a hierarchy query: each level is present only
/// if the corresponding filter resolved to a stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchySubtree {
    /// Matched country with its full subtree, if a country filter matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryTree>,
    /// Matched city subtree, if a city filter matched within the country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<CityTree>,
    /// Matched zone subtree, if a zone filter matched within the city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneTree>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_from_array_keeps_order() {
        let bbox = BoundingBox::from_array([48.81, 48.90, 2.22, 2.47]);
        assert!((bbox.south - 48.81).abs() < f64::EPSILON);
        assert!((bbox.north - 48.90).abs() < f64::EPSILON);
        assert!((bbox.west - 2.22).abs() < f64::EPSILON);
        assert!((bbox.east - 2.47).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_subtree_serializes_to_empty_object() {
        let subtree = HierarchySubtree::default();
        let json = serde_json::to_value(&subtree).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn crime_event_wire_names_match_the_submitted_fields() {
        let event = CrimeEventRow {
            id: 1,
            occurred_at: "2024-01-01T10:00:00Z".parse().unwrap(),
            crime_type: "theft".to_string(),
            zone_id: 7,
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["typeCrime"], "theft");
        assert_eq!(json["zoneId"], 7);
        assert!(json.get("crimeTime").is_some());
        assert!(json.get("crimeType").is_none());
        assert!(json.get("occurredAt").is_none());
    }

    #[test]
    fn hierarchy_location_keys_echo_the_request_shape() {
        let bbox = BoundingBox::new(48.81, 48.90, 2.22, 2.47);
        let hierarchy = LocationHierarchy {
            country: CountryRow {
                id: 1,
                name: "France".to_string(),
                longitude: 2.0,
                latitude: 46.0,
                bounding_box: bbox,
                place_id: 10,
            },
            city: CityRow {
                id: 2,
                name: "Paris".to_string(),
                longitude: 2.32,
                latitude: 48.85,
                bounding_box: bbox,
                place_id: 11,
                country_id: 1,
            },
            zone: ZoneRow {
                id: 3,
                name: "Le Marais".to_string(),
                longitude: 2.36,
                latitude: 48.86,
                bounding_box: bbox,
                place_id: 12,
                city_id: 2,
            },
            location: CrimeEventRow {
                id: 4,
                occurred_at: "2024-01-01T10:00:00Z".parse().unwrap(),
                crime_type: "theft".to_string(),
                zone_id: 3,
            },
        };

        let json = serde_json::to_value(&hierarchy).unwrap();

        assert_eq!(json["location"]["typeCrime"], "theft");
        assert_eq!(json["location"]["zoneId"], 3);
        assert!(json["location"].get("crimeTime").is_some());
        assert_eq!(json["city"]["countryId"], 1);
        assert_eq!(json["zone"]["cityId"], 2);
    }
}
