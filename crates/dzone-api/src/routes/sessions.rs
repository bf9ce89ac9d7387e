//! # Address Session API
//!
//! HTTP surface for the address confirmation state machine. Each session
//! owns one `AddressState`; every mutation runs inside a single store write
//! lock, so a session never sees two writers at once.
//!
//! ## Async Resolution Protocol
//!
//! The client runs geocoding and device geolocation itself:
//!
//! 1. `POST /v1/sessions/{id}/resolutions` with the source → returns a
//!    ticket `{generation, source}`.
//! 2. The client calls its provider.
//! 3. `POST /v1/sessions/{id}/resolutions/{generation}` with the outcome.
//!    A superseded generation answers `{"status":"stale"}` and changes
//!    nothing. A current failure answers 422 `RESOLUTION_FAILED`. The
//!    `source` must match the issued ticket; a mismatch answers 422.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dzone_core::{AddressSource, FeeMinorUnits, GeoPoint};
use dzone_state::{
    AddressSnapshot, CheckoutQuote, Completion, Generation, ResolutionFailure, ResolutionTicket,
    ResolvedAddress,
};
use dzone_zones::Classification;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, parse_session_id, Validate};
use crate::middleware::metrics::{record_classification, record_stale_completion};
use crate::state::{AppState, SessionRecord};

/// Upper bound on stored address text.
pub const MAX_ADDRESS_TEXT_LEN: usize = 512;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Session view returned by most endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub address: AddressSnapshot,
    pub quote: CheckoutQuote,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionResponse {
    fn from_record(record: &SessionRecord) -> Self {
        Self {
            id: record.id,
            address: record.address.snapshot(),
            quote: record.address.checkout_quote(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Request for `PUT /v1/sessions/{id}/text`.
#[derive(Debug, Deserialize)]
pub struct SetTextRequest {
    pub text: String,
}

impl Validate for SetTextRequest {
    fn validate(&self) -> Result<(), String> {
        if self.text.len() > MAX_ADDRESS_TEXT_LEN {
            return Err(format!(
                "text must not exceed {MAX_ADDRESS_TEXT_LEN} bytes"
            ));
        }
        Ok(())
    }
}

/// Request for `POST /v1/sessions/{id}/point`.
#[derive(Debug, Deserialize)]
pub struct ApplyPointRequest {
    pub lat: f64,
    pub lng: f64,
    /// Defaults to `manual-pin`.
    #[serde(default = "default_point_source")]
    pub source: AddressSource,
}

fn default_point_source() -> AddressSource {
    AddressSource::ManualPin
}

impl ApplyPointRequest {
    fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

impl Validate for ApplyPointRequest {
    fn validate(&self) -> Result<(), String> {
        self.point().validate().map_err(|e| e.to_string())
    }
}

/// Response for `POST /v1/sessions/{id}/point`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyPointResponse {
    pub classification: Classification,
    pub session: SessionResponse,
}

/// Request for `POST /v1/sessions/{id}/resolutions`.
#[derive(Debug, Deserialize)]
pub struct BeginResolutionRequest {
    pub source: AddressSource,
}

impl Validate for BeginResolutionRequest {
    fn validate(&self) -> Result<(), String> {
        if !self.source.is_async() {
            return Err(format!(
                "{} is applied directly via /point, not resolved asynchronously",
                self.source
            ));
        }
        Ok(())
    }
}

/// Outcome reported by the client's async collaborator.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Resolved {
        point: GeoPoint,
        #[serde(default)]
        formatted_address: Option<String>,
    },
    Failed {
        failure: ResolutionFailure,
    },
}

/// Request for `POST /v1/sessions/{id}/resolutions/{generation}`.
#[derive(Debug, Deserialize)]
pub struct CompleteResolutionRequest {
    pub source: AddressSource,
    pub outcome: ResolutionOutcome,
}

impl Validate for CompleteResolutionRequest {
    fn validate(&self) -> Result<(), String> {
        match &self.outcome {
            ResolutionOutcome::Resolved {
                point,
                formatted_address,
            } => {
                point.validate().map_err(|e| e.to_string())?;
                if formatted_address
                    .as_ref()
                    .is_some_and(|t| t.len() > MAX_ADDRESS_TEXT_LEN)
                {
                    return Err(format!(
                        "formatted_address must not exceed {MAX_ADDRESS_TEXT_LEN} bytes"
                    ));
                }
                Ok(())
            }
            ResolutionOutcome::Failed { .. } => Ok(()),
        }
    }
}

impl CompleteResolutionRequest {
    fn into_outcome(self) -> Result<ResolvedAddress, ResolutionFailure> {
        match self.outcome {
            ResolutionOutcome::Resolved {
                point,
                formatted_address,
            } => Ok(ResolvedAddress {
                point,
                formatted_address,
            }),
            ResolutionOutcome::Failed { failure } => Err(failure),
        }
    }
}

/// Response for `POST /v1/sessions/{id}/resolutions/{generation}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteResolutionResponse {
    pub completion: Completion,
    pub session: SessionResponse,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the sessions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{id}", get(get_session).delete(delete_session))
        .route("/v1/sessions/{id}/text", put(set_text))
        .route("/v1/sessions/{id}/point", post(apply_point))
        .route("/v1/sessions/{id}/resolutions", post(begin_resolution))
        .route(
            "/v1/sessions/{id}/resolutions/{generation}",
            post(complete_resolution),
        )
        .route("/v1/sessions/{id}/clear", post(clear_session))
        .route("/v1/sessions/{id}/quote", get(get_quote))
}

fn not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("session {id}"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/sessions — Start an empty address session.
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let record = SessionRecord::new();
    let response = SessionResponse::from_record(&record);
    state.sessions.insert(record.id, record);
    tracing::info!(session = %response.id, "address session created");
    (StatusCode::CREATED, Json(response))
}

/// GET /v1/sessions/{id} — Current snapshot and quote.
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let record = state.sessions.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(SessionResponse::from_record(&record)))
}

/// DELETE /v1/sessions/{id} — Discard a session.
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&id)?;
    state.sessions.remove(&id).ok_or_else(|| not_found(&id))?;
    tracing::info!(session = %id, "address session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/sessions/{id}/text — Record typed address text.
///
/// Never changes the resolved point or confirmation.
async fn set_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SetTextRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let req = extract_validated_json(body)?;
    let record = state
        .sessions
        .update(&id, |record| {
            record.address.set_address_text(req.text);
            record.touch();
        })
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(SessionResponse::from_record(&record)))
}

/// POST /v1/sessions/{id}/point — Apply a known coordinate (map click,
/// marker drag) and classify it.
async fn apply_point(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ApplyPointRequest>, JsonRejection>,
) -> Result<Json<ApplyPointResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let req = extract_validated_json(body)?;
    let point = req.point();
    let registry = &state.registry;

    let (classification, record) = state
        .sessions
        .try_update(&id, |record| {
            let classification = record
                .address
                .apply_resolved_point(point, req.source, registry)
                .clone();
            record.touch();
            Ok::<_, AppError>((classification, record.clone()))
        })
        .ok_or_else(|| not_found(&id))??;

    record_classification(&classification);
    Ok(Json(ApplyPointResponse {
        classification,
        session: SessionResponse::from_record(&record),
    }))
}

/// POST /v1/sessions/{id}/resolutions — Start an async resolution and
/// hand out its ticket.
async fn begin_resolution(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<BeginResolutionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResolutionTicket>), AppError> {
    let id = parse_session_id(&id)?;
    let req = extract_validated_json(body)?;
    let ticket = state
        .sessions
        .try_update(&id, |record| {
            let ticket = record.address.begin_async_resolution(req.source);
            record.touch();
            Ok::<_, AppError>(ticket)
        })
        .ok_or_else(|| not_found(&id))??;
    Ok((StatusCode::ACCEPTED, Json(ticket)))
}

/// POST /v1/sessions/{id}/resolutions/{generation} — Report the outcome
/// of an async resolution.
async fn complete_resolution(
    State(state): State<AppState>,
    Path((id, generation)): Path<(String, u64)>,
    body: Result<Json<CompleteResolutionRequest>, JsonRejection>,
) -> Result<Json<CompleteResolutionResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let req = extract_validated_json(body)?;
    let ticket = ResolutionTicket::new(Generation(generation), req.source);
    let outcome = req.into_outcome();
    let registry = &state.registry;

    let (completion, record) = state
        .sessions
        .try_update(&id, |record| {
            if let Some(issued) = record.address.pending_ticket() {
                if issued.generation == ticket.generation && issued.source != ticket.source {
                    return Err(AppError::Validation(format!(
                        "resolution {} was issued for {}, not {}",
                        issued.generation, issued.source, ticket.source
                    )));
                }
            }
            let result = record
                .address
                .complete_async_resolution(ticket, outcome, registry);
            record.touch();
            result
                .map(|completion| (completion, record.clone()))
                .map_err(AppError::from)
        })
        .ok_or_else(|| not_found(&id))??;

    match &completion {
        Completion::Applied { classification } => record_classification(classification),
        Completion::Stale => record_stale_completion(),
    }
    Ok(Json(CompleteResolutionResponse {
        completion,
        session: SessionResponse::from_record(&record),
    }))
}

/// POST /v1/sessions/{id}/clear — Reset the address to empty.
async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let record = state
        .sessions
        .update(&id, |record| {
            record.address.clear();
            record.touch();
        })
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(SessionResponse::from_record(&record)))
}

/// Response for `GET /v1/sessions/{id}/quote`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: CheckoutQuote,
    pub currency: String,
    /// Fee in major units, when confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_display: Option<String>,
    /// Order total in minor units, when a subtotal was given and the
    /// order can be submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_minor_units: Option<u64>,
}

/// Query string for `GET /v1/sessions/{id}/quote`.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteQuery {
    pub subtotal_minor_units: Option<u64>,
}

/// GET /v1/sessions/{id}/quote — Delivery gate and fee for checkout.
async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let record = state.sessions.get(&id).ok_or_else(|| not_found(&id))?;
    let quote = record.address.checkout_quote();
    let digits = state.registry.minor_unit_digits();
    Ok(Json(QuoteResponse {
        fee_display: quote.fee_minor_units.map(|f| f.format_major(digits)),
        total_minor_units: query
            .subtotal_minor_units
            .and_then(|s| quote.order_total(FeeMinorUnits(s)))
            .map(|t| t.minor_units()),
        currency: state.registry.currency().to_string(),
        quote,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn sessions_app(state: AppState) -> Router<()> {
        router().with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn insert_session(state: &AppState) -> Uuid {
        let record = SessionRecord::new();
        let id = record.id;
        state.sessions.insert(id, record);
        id
    }

    #[tokio::test]
    async fn create_session_starts_empty() {
        let state = AppState::new();
        let resp = sessions_app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: SessionResponse = body_json(resp).await;
        assert_eq!(body.address.phase, dzone_state::AddressPhase::Empty);
        assert!(!body.quote.can_submit);
        assert!(state.sessions.get(&body.id).is_some());
    }

    #[tokio::test]
    async fn unknown_session_returns_404() {
        let app = sessions_app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/sessions/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_session_id_returns_404() {
        let resp = sessions_app(AppState::new())
            .oneshot(
                Request::builder()
                    .uri("/v1/sessions/not-a-uuid/quote")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn point_in_city_confirms_session() {
        let state = AppState::new();
        let id = insert_session(&state);
        let resp = sessions_app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/v1/sessions/{id}/point"),
                serde_json::json!({"lat": 45.8131, "lng": 15.9775}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApplyPointResponse = body_json(resp).await;
        assert!(body.classification.is_zone());
        assert!(body.session.quote.can_submit);
        assert_eq!(body.session.address.source, Some(AddressSource::ManualPin));
        assert!(state.sessions.get(&id).unwrap().address.is_confirmed());
    }

    #[tokio::test]
    async fn text_update_keeps_confirmation() {
        let state = AppState::new();
        let id = insert_session(&state);
        state.sessions.update(&id, |r| {
            r.address.apply_resolved_point(
                GeoPoint::new(45.8131, 15.9775),
                AddressSource::ManualPin,
                &state.registry,
            );
        });
        let resp = sessions_app(state.clone())
            .oneshot(json_request(
                "PUT",
                &format!("/v1/sessions/{id}/text"),
                serde_json::json!({"text": "Trg bana Jelačića 1"}),
            ))
            .await
            .unwrap();
        let body: SessionResponse = body_json(resp).await;
        assert_eq!(body.address.raw_text, "Trg bana Jelačića 1");
        assert!(body.address.confirmed);
    }

    #[tokio::test]
    async fn overlong_text_returns_422() {
        let state = AppState::new();
        let id = insert_session(&state);
        let resp = sessions_app(state)
            .oneshot(json_request(
                "PUT",
                &format!("/v1/sessions/{id}/text"),
                serde_json::json!({"text": "x".repeat(MAX_ADDRESS_TEXT_LEN + 1)}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn manual_pin_cannot_begin_async_resolution() {
        let state = AppState::new();
        let id = insert_session(&state);
        let resp = sessions_app(state)
            .oneshot(json_request(
                "POST",
                &format!("/v1/sessions/{id}/resolutions"),
                serde_json::json!({"source": "manual-pin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn stale_generation_is_reported_and_ignored() {
        let state = AppState::new();
        let id = insert_session(&state);
        let app = sessions_app(state.clone());

        let first: ResolutionTicket = body_json(
            app.clone()
                .oneshot(json_request(
                    "POST",
                    &format!("/v1/sessions/{id}/resolutions"),
                    serde_json::json!({"source": "autocomplete"}),
                ))
                .await
                .unwrap(),
        )
        .await;
        let _second: ResolutionTicket = body_json(
            app.clone()
                .oneshot(json_request(
                    "POST",
                    &format!("/v1/sessions/{id}/resolutions"),
                    serde_json::json!({"source": "autocomplete"}),
                ))
                .await
                .unwrap(),
        )
        .await;

        let resp = app
            .oneshot(json_request(
                "POST",
                &format!("/v1/sessions/{id}/resolutions/{}", first.generation),
                serde_json::json!({
                    "source": "autocomplete",
                    "outcome": {"status": "resolved", "point": {"lat": 45.8131, "lng": 15.9775}}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: CompleteResolutionResponse = body_json(resp).await;
        assert_eq!(body.completion, Completion::Stale);
        assert_eq!(body.session.address.point, None);
        assert!(state.sessions.get(&id).unwrap().address.is_pending());
    }

    #[tokio::test]
    async fn current_failure_returns_422_with_details() {
        let state = AppState::new();
        let id = insert_session(&state);
        let ticket = state
            .sessions
            .try_update(&id, |r| {
                Ok::<_, ()>(r.address.begin_async_resolution(AddressSource::DeviceLocation))
            })
            .unwrap()
            .unwrap();

        let resp = sessions_app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/v1/sessions/{id}/resolutions/{}", ticket.generation),
                serde_json::json!({
                    "source": "device-location",
                    "outcome": {
                        "status": "failed",
                        "failure": {"channel": "geolocation", "error": "permission_denied"}
                    }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = body_json(resp).await;
        assert_eq!(body["error"]["code"], "RESOLUTION_FAILED");
        assert_eq!(body["error"]["details"]["error"], "permission_denied");
        assert!(!state.sessions.get(&id).unwrap().address.is_pending());
    }

    #[tokio::test]
    async fn completion_with_other_source_is_rejected() {
        let state = AppState::new();
        let id = insert_session(&state);
        let ticket = state
            .sessions
            .try_update(&id, |r| {
                Ok::<_, ()>(r.address.begin_async_resolution(AddressSource::DeviceLocation))
            })
            .unwrap()
            .unwrap();

        let resp = sessions_app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/v1/sessions/{id}/resolutions/{}", ticket.generation),
                serde_json::json!({
                    "source": "manual-pin",
                    "outcome": {"status": "resolved", "point": {"lat": 45.8131, "lng": 15.9775}}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let record = state.sessions.get(&id).unwrap();
        assert_eq!(record.address.source(), None);
        assert_eq!(record.address.pending_ticket(), Some(ticket));

        let resp = sessions_app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/v1/sessions/{id}/resolutions/{}", ticket.generation),
                serde_json::json!({
                    "source": "device-location",
                    "outcome": {"status": "resolved", "point": {"lat": 45.8131, "lng": 15.9775}}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: CompleteResolutionResponse = body_json(resp).await;
        assert_eq!(body.session.address.source, Some(AddressSource::DeviceLocation));
    }

    #[tokio::test]
    async fn quote_includes_currency_and_total() {
        let state = AppState::new();
        let id = insert_session(&state);
        state.sessions.update(&id, |r| {
            r.address.apply_resolved_point(
                GeoPoint::new(45.78, 16.05),
                AddressSource::ManualPin,
                &state.registry,
            );
        });
        let resp = sessions_app(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/sessions/{id}/quote?subtotal_minor_units=2500"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: serde_json::Value = body_json(resp).await;
        assert_eq!(body["confirmed"], true);
        assert_eq!(body["can_submit"], true);
        assert_eq!(body["zone_id"], "extended");
        assert_eq!(body["fee_minor_units"], 700);
        assert_eq!(body["fee_display"], "7.00");
        assert_eq!(body["currency"], "EUR");
        assert_eq!(body["total_minor_units"], 3200);
    }

    #[tokio::test]
    async fn delete_then_get_returns_404() {
        let state = AppState::new();
        let id = insert_session(&state);
        let app = sessions_app(state);
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
