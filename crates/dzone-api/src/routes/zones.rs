//! # Zone Catalog API
//!
//! Read-only view of the loaded zone registry and a stateless classify
//! endpoint for callers that keep their own address state.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use dzone_core::{FeeMinorUnits, GeoPoint, ZoneId};
use dzone_zones::{Classification, Zone};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::middleware::metrics::record_classification;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// One zone as listed by `GET /v1/zones`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub id: ZoneId,
    pub name: String,
    pub priority: i32,
    pub fee_minor_units: FeeMinorUnits,
    /// Fee formatted in major units with the catalog's minor-unit digits.
    pub fee_display: String,
    pub vertices: usize,
    pub polygon: Vec<GeoPoint>,
}

impl ZoneSummary {
    fn from_zone(zone: &Zone, minor_unit_digits: u8) -> Self {
        Self {
            id: zone.id.clone(),
            name: zone.display_name().to_string(),
            priority: zone.priority,
            fee_minor_units: zone.fee_minor_units,
            fee_display: zone.fee_minor_units.format_major(minor_unit_digits),
            vertices: zone.polygon.len(),
            polygon: zone.polygon.vertices().to_vec(),
        }
    }
}

/// Response for `GET /v1/zones`. Zones are in evaluation order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneListResponse {
    pub currency: String,
    pub minor_unit_digits: u8,
    pub zones: Vec<ZoneSummary>,
}

/// Request for `POST /v1/zones/classify`.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub lat: f64,
    pub lng: f64,
}

impl ClassifyRequest {
    fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

impl Validate for ClassifyRequest {
    fn validate(&self) -> Result<(), String> {
        self.point().validate().map_err(|e| e.to_string())
    }
}

/// Response for `POST /v1/zones/classify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub point: GeoPoint,
    pub classification: Classification,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the zones router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/zones", get(list_zones))
        .route("/v1/zones/classify", post(classify_point))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/zones — List zones in priority order.
async fn list_zones(State(state): State<AppState>) -> Json<ZoneListResponse> {
    let registry = &state.registry;
    let digits = registry.minor_unit_digits();
    Json(ZoneListResponse {
        currency: registry.currency().to_string(),
        minor_unit_digits: digits,
        zones: registry
            .zones()
            .iter()
            .map(|z| ZoneSummary::from_zone(z, digits))
            .collect(),
    })
}

/// POST /v1/zones/classify — Classify a coordinate without a session.
async fn classify_point(
    State(state): State<AppState>,
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let point = req.point();
    let classification = state.registry.classify(&point);
    record_classification(&classification);
    tracing::debug!(%point, outcome = classification.kind(), "stateless classification");
    Ok(Json(ClassifyResponse {
        point,
        classification,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn zones_app() -> Router<()> {
        router().with_state(AppState::new())
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn classify_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/zones/classify")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_zones_in_priority_order() {
        let resp = zones_app()
            .oneshot(Request::builder().uri("/v1/zones").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list: ZoneListResponse = body_json(resp).await;
        assert_eq!(list.currency, "EUR");
        let ids: Vec<&str> = list.zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["city", "extended"]);
        assert_eq!(list.zones[0].fee_display, "3.00");
        assert_eq!(list.zones[0].vertices, list.zones[0].polygon.len());
    }

    #[tokio::test]
    async fn classify_city_centre() {
        let resp = zones_app()
            .oneshot(classify_request(r#"{"lat":45.8131,"lng":15.9775}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ClassifyResponse = body_json(resp).await;
        assert_eq!(body.classification.zone_id().map(ZoneId::as_str), Some("city"));
        assert_eq!(body.classification.fee(), Some(FeeMinorUnits(300)));
    }

    #[tokio::test]
    async fn classify_far_point_is_outside() {
        let resp = zones_app()
            .oneshot(classify_request(r#"{"lat":45.95,"lng":15.9775}"#))
            .await
            .unwrap();
        let body: ClassifyResponse = body_json(resp).await;
        assert_eq!(body.classification, Classification::Outside);
    }

    #[tokio::test]
    async fn classify_out_of_range_returns_422() {
        let resp = zones_app()
            .oneshot(classify_request(r#"{"lat":91.0,"lng":0.0}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn classify_malformed_body_returns_400() {
        let resp = zones_app()
            .oneshot(classify_request(r#"{"lat":"north"}"#))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }
}
