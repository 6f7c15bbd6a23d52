#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime atlas.
//!
//! Serves the geo API under `/api/geo`: free-form place search, the
//! crime-recording `addLocation` workflow, and the `getLocation`
//! hierarchy query, plus an `awake` liveness probe.

pub mod handlers;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use crime_atlas_geocoder::{GeocodeError, Geocoder};
use crime_atlas_location::LocationError;
use crime_atlas_location::store::LocationStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// Location hierarchy persistence.
    pub store: Arc<dyn LocationStore>,
    /// Outbound geocoding client.
    pub geocoder: Arc<dyn Geocoder>,
}

/// Maps a workflow error to its HTTP status: 400 for validation, 404
/// for a place or country with no match, 502 for an upstream geocoder
/// failure, 500 for persistence failures.
#[must_use]
pub fn error_status(err: &LocationError) -> StatusCode {
    match err {
        LocationError::Validation(_) => StatusCode::BAD_REQUEST,
        LocationError::CountryNotFound(_) | LocationError::Geocode(GeocodeError::NoMatch { .. }) => {
            StatusCode::NOT_FOUND
        }
        LocationError::Geocode(_) => StatusCode::BAD_GATEWAY,
        LocationError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts a workflow error into its JSON error response
/// (`{"error": message}`).
#[must_use]
pub fn error_response(err: &LocationError) -> HttpResponse {
    HttpResponse::build(error_status(err)).json(serde_json::json!({
        "error": err.to_string()
    }))
}
