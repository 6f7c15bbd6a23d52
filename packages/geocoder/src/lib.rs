#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding client for the crime atlas.
//!
//! Resolves free-form place queries (country, city, zone names) to
//! coordinates and a canonical display name using the Nominatim /
//! OpenStreetMap search API. Every lookup is a single fresh request with
//! `limit=1` — there is no retry, no backoff, and no caching at this
//! layer.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

pub mod nominatim;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The best match returned by the geocoder for a place query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceMatch {
    /// Canonical human-readable name for the resolved place. Used as the
    /// uniqueness key for stored geographic records.
    pub display_name: String,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Bounding box in Nominatim order: south, north, west, east.
    pub bounding_box: [f64; 4],
    /// External place identifier assigned by the geocoder.
    pub place_id: i64,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The geocoder returned zero results for the query.
    #[error("No match found for query: {query}")]
    NoMatch {
        /// The query that produced no results.
        query: String,
    },
}

/// A geocoding backend that resolves a free-form query to its best match.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `query` to the single best [`PlaceMatch`].
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NoMatch`] when the backend has no result
    /// for the query, or [`GeocodeError::Http`] / [`GeocodeError::Parse`]
    /// when the lookup itself fails.
    async fn resolve(&self, query: &str) -> Result<PlaceMatch, GeocodeError>;
}
