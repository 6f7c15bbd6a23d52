#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location hierarchy workflows for the crime atlas.
//!
//! [`workflow::add_location`] records a crime event by resolving each
//! geographic level (country, city, zone) through the geocoder and
//! upserting it in strict parent-to-child order. The steps are a
//! sequential saga, not a transaction: a failure at step N leaves the
//! writes of steps 1..N-1 committed. [`workflow::get_location`] reads
//! the stored hierarchy back, narrowed by optional city/zone filters.
//!
//! Both workflows are written against the [`crime_atlas_geocoder::Geocoder`]
//! and [`store::LocationStore`] trait seams so they can be exercised with
//! in-memory doubles.

pub mod store;
pub mod workflow;

pub use workflow::{add_location, get_location};

use crime_atlas_database::DbError;
use crime_atlas_geocoder::GeocodeError;

/// A crime report as submitted by a client, before any resolution.
///
/// Fields arrive as raw strings; presence validation and timestamp
/// parsing happen inside the workflow, in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrimeReport {
    /// Country name to geocode.
    pub country: String,
    /// City name to geocode (combined with the country for the query).
    pub city: String,
    /// Zone name to geocode (combined with country and city).
    pub zone: String,
    /// When the crime occurred, as an RFC 3339 timestamp string.
    pub crime_time: String,
    /// Free-text crime type, stored verbatim.
    pub type_crime: String,
}

/// Errors from the location workflows.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// A required field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The geocoder failed or returned no match.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// No stored country matches the queried display name.
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    /// A storage read or write failed.
    #[error(transparent)]
    Persistence(#[from] DbError),
}
