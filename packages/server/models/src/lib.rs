#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime atlas server.
//!
//! Response bodies reuse the hierarchy types from
//! `crime_atlas_database_models` directly; only the inbound shapes live
//! here.

use crime_atlas_location::CrimeReport;
use serde::Deserialize;

/// JSON body of `POST /api/geo/addLocation`.
///
/// Missing fields default to the empty string, matching the workflow's
/// presence validation (empty means absent).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLocationRequest {
    /// Country name to geocode.
    #[serde(default)]
    pub country: String,
    /// City name to geocode.
    #[serde(default)]
    pub city: String,
    /// Zone name to geocode.
    #[serde(default)]
    pub zone: String,
    /// RFC 3339 timestamp of the crime.
    #[serde(default)]
    pub crime_time: String,
    /// Free-text crime type.
    #[serde(default)]
    pub type_crime: String,
}

impl From<AddLocationRequest> for CrimeReport {
    fn from(request: AddLocationRequest) -> Self {
        Self {
            country: request.country,
            city: request.city,
            zone: request.zone,
            crime_time: request.crime_time,
            type_crime: request.type_crime,
        }
    }
}

/// Query parameters of `GET /api/geo/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-form place query.
    #[serde(default)]
    pub q: String,
}

/// Query parameters of `GET /api/geo/getLocation`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetLocationParams {
    /// Country display name filter.
    pub country: Option<String>,
    /// City display name filter (ignored without a country).
    pub city: Option<String>,
    /// Zone display name filter (ignored without a matching city).
    pub zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_location_request_accepts_camel_case_body() {
        let request: AddLocationRequest = serde_json::from_str(
            r#"{
                "country": "France",
                "city": "Paris",
                "zone": "Le Marais",
                "crimeTime": "2024-01-01T10:00:00Z",
                "typeCrime": "theft"
            }"#,
        )
        .unwrap();

        assert_eq!(request.country, "France");
        assert_eq!(request.crime_time, "2024-01-01T10:00:00Z");
        assert_eq!(request.type_crime, "theft");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let request: AddLocationRequest = serde_json::from_str(r#"{"country": "France"}"#).unwrap();
        assert_eq!(request.country, "France");
        assert!(request.city.is_empty());
        assert!(request.zone.is_empty());

        let report = CrimeReport::from(request);
        assert_eq!(report.country, "France");
        assert!(report.city.is_empty());
    }
}
