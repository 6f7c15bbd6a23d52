//! HTTP handler functions for the geo API.

use actix_web::{HttpResponse, web};
use crime_atlas_location::{CrimeReport, workflow};
use crime_atlas_server_models::{AddLocationRequest, GetLocationParams, SearchParams};

use crate::{AppState, error_response};

/// `GET /api/geo/search`
///
/// Resolves a free-form place query to its best geocoder match.
pub async fn search(state: web::Data<AppState>, params: web::Query<SearchParams>) -> HttpResponse {
    match state.geocoder.resolve(&params.q).await {
        Ok(place) => HttpResponse::Ok().json(place),
        Err(e) => error_response(&e.into()),
    }
}

/// `POST /api/geo/addLocation`
///
/// Records a crime event, upserting its country/city/zone hierarchy.
pub async fn add_location(
    state: web::Data<AppState>,
    body: web::Json<AddLocationRequest>,
) -> HttpResponse {
    let report = CrimeReport::from(body.into_inner());

    match workflow::add_location(state.geocoder.as_ref(), state.store.as_ref(), &report).await {
        Ok(hierarchy) => HttpResponse::Ok().json(hierarchy),
        Err(e) => {
            log::error!("Failed to add location: {e}");
            error_response(&e)
        }
    }
}

/// `GET /api/geo/getLocation`
///
/// Returns the stored hierarchy subtree matching the given filters.
pub async fn get_location(
    state: web::Data<AppState>,
    params: web::Query<GetLocationParams>,
) -> HttpResponse {
    let result = workflow::get_location(
        state.store.as_ref(),
        params.country.as_deref(),
        params.city.as_deref(),
        params.zone.as_deref(),
    )
    .await;

    match result {
        Ok(subtree) => HttpResponse::Ok().json(subtree),
        Err(e) => {
            log::error!("Failed to query location: {e}");
            error_response(&e)
        }
    }
}

/// `GET /api/geo/awake` — liveness probe.
pub async fn awake() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "awakking"
    }))
}

/// `GET /`
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Hello World!"
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use crime_atlas_database::DbError;
    use crime_atlas_geocoder::GeocodeError;
    use crime_atlas_location::LocationError;

    use super::*;
    use crate::error_status;

    #[actix_web::test]
    async fn awake_responds_with_probe_message() {
        let app =
            test::init_service(App::new().route("/api/geo/awake", web::get().to(awake))).await;

        let req = test::TestRequest::get().uri("/api/geo/awake").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, serde_json::json!({"message": "awakking"}));
    }

    #[actix_web::test]
    async fn root_responds_with_hello() {
        let app = test::init_service(App::new().route("/", web::get().to(hello))).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, serde_json::json!({"message": "Hello World!"}));
    }

    // `test` is shadowed by `actix_web::test` in this module, so name the
    // built-in test attribute explicitly for this synchronous test.
    #[::core::prelude::v1::test]
    fn error_statuses_differentiate_failure_kinds() {
        assert_eq!(
            error_status(&LocationError::Validation("Country is required".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&LocationError::Geocode(GeocodeError::NoMatch {
                query: "Atlantis".to_string()
            })),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&LocationError::Geocode(GeocodeError::Parse {
                message: "bad payload".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&LocationError::CountryNotFound("Atlantis".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&LocationError::Persistence(DbError::Conversion {
                message: "bad row".to_string()
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
