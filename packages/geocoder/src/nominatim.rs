//! Nominatim / OpenStreetMap geocoder client.
//!
//! The public instance has strict rate limits (1 request per second) and
//! requires a descriptive `User-Agent`. Point `NOMINATIM_URL` at a
//! self-hosted instance to avoid both.

use crate::{GeocodeError, Geocoder, PlaceMatch};

/// Default search endpoint (the public OpenStreetMap instance).
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Geocoder backed by the Nominatim free-form search endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder against the given search endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("crime-atlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Creates a geocoder from the `NOMINATIM_URL` environment variable,
    /// falling back to the public instance.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("NOMINATIM_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    async fn search(&self, query: &str) -> Result<PlaceMatch, GeocodeError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;

        parse_response(&body)?.ok_or_else(|| GeocodeError::NoMatch {
            query: query.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<PlaceMatch, GeocodeError> {
        match self.search(query).await {
            Ok(place) => Ok(place),
            Err(e) => {
                log::error!("Geocoding failed for query {query:?}: {e}");
                Err(e)
            }
        }
    }
}

/// Parses a Nominatim JSON response into the best match, or `None` when
/// the result array is empty.
fn parse_response(body: &serde_json::Value) -> Result<Option<PlaceMatch>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let display_name = first["display_name"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing display_name in Nominatim response".to_string(),
        })?;

    let latitude = parse_coordinate(first, "lat")?;
    let longitude = parse_coordinate(first, "lon")?;

    let bounding_box = parse_bounding_box(&first["boundingbox"])?;

    // jsonv2 returns place_id as a number; older formats as a string.
    let place_id = first["place_id"]
        .as_i64()
        .or_else(|| first["place_id"].as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing place_id in Nominatim response".to_string(),
        })?;

    Ok(Some(PlaceMatch {
        display_name,
        longitude,
        latitude,
        bounding_box,
        place_id,
    }))
}

/// Coordinates arrive as decimal strings ("48.8589").
fn parse_coordinate(value: &serde_json::Value, field: &str) -> Result<f64, GeocodeError> {
    value[field]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value[field].as_f64())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("Missing {field} in Nominatim response"),
        })
}

/// The bounding box is a four-element array of decimal strings in
/// south, north, west, east order.
fn parse_bounding_box(value: &serde_json::Value) -> Result<[f64; 4], GeocodeError> {
    let items = value.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Missing boundingbox in Nominatim response".to_string(),
    })?;

    if items.len() != 4 {
        return Err(GeocodeError::Parse {
            message: format!("Expected 4 boundingbox values, got {}", items.len()),
        });
    }

    let mut bbox = [0.0f64; 4];
    for (i, item) in items.iter().enumerate() {
        bbox[i] = item
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .or_else(|| item.as_f64())
            .ok_or_else(|| GeocodeError::Parse {
                message: format!("Invalid boundingbox value at index {i}"),
            })?;
    }

    Ok(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_best_match() {
        let body = serde_json::json!([{
            "place_id": 71_525_097,
            "lat": "48.8588897",
            "lon": "2.3200410",
            "display_name": "Paris, Île-de-France, France métropolitaine, France",
            "boundingbox": ["48.8155755", "48.9021560", "2.2241220", "2.4697602"]
        }]);

        let place = parse_response(&body).unwrap().unwrap();
        assert_eq!(
            place.display_name,
            "Paris, Île-de-France, France métropolitaine, France"
        );
        assert!((place.latitude - 48.8588897).abs() < 1e-6);
        assert!((place.longitude - 2.320_041).abs() < 1e-6);
        assert_eq!(place.place_id, 71_525_097);
        assert!((place.bounding_box[0] - 48.8155755).abs() < 1e-6);
        assert!((place.bounding_box[3] - 2.4697602).abs() < 1e-6);
    }

    #[test]
    fn empty_result_array_is_none() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn non_array_response_is_parse_error() {
        let body = serde_json::json!({"error": "rate limited"});
        let err = parse_response(&body).unwrap_err();
        assert!(matches!(err, GeocodeError::Parse { .. }));
    }

    #[test]
    fn malformed_coordinate_is_parse_error() {
        let body = serde_json::json!([{
            "place_id": 1,
            "lat": "not-a-number",
            "lon": "2.32",
            "display_name": "Somewhere",
            "boundingbox": ["0", "0", "0", "0"]
        }]);
        let err = parse_response(&body).unwrap_err();
        assert!(matches!(err, GeocodeError::Parse { .. }));
    }

    #[test]
    fn string_place_id_is_accepted() {
        let body = serde_json::json!([{
            "place_id": "12345",
            "lat": "1.0",
            "lon": "2.0",
            "display_name": "Somewhere",
            "boundingbox": ["0", "1", "2", "3"]
        }]);
        let place = parse_response(&body).unwrap().unwrap();
        assert_eq!(place.place_id, 12345);
    }

    #[test]
    fn short_bounding_box_is_parse_error() {
        let body = serde_json::json!([{
            "place_id": 1,
            "lat": "1.0",
            "lon": "2.0",
            "display_name": "Somewhere",
            "boundingbox": ["0", "1"]
        }]);
        let err = parse_response(&body).unwrap_err();
        assert!(matches!(err, GeocodeError::Parse { .. }));
    }
}
