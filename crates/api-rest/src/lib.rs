//! # API REST
//!
//! REST delivery surface for the screening core.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (wire JSON translation, CORS, error mapping)
//!
//! The core pipeline (classify, compose, render) lives in `ph-core`,
//! `ph-report`, and `ph-render-pdf`; nothing here decides risk or layout.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use ph_core::{classify, ScreeningError};
use ph_render_pdf::{DocumentRenderer, PdfRenderer};
use ph_report::{compose, suggested_filename, Branding, ReferenceId};

pub mod wire;

use wire::ScreeningFormData;

/// The only message a failed render may show the caller; the engine detail
/// goes to the logs.
const RENDER_FAILURE_MESSAGE: &str =
    "document generation failed - please retry or contact support";

/// Application state shared across REST API handlers
///
/// Holds the brand identity stamped onto documents and the rendering engine.
/// Both are immutable after startup, so handlers can run concurrently
/// without coordination.
#[derive(Clone)]
pub struct AppState {
    pub branding: Arc<Branding>,
    pub renderer: PdfRenderer,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            branding: Arc::new(Branding::default()),
            renderer: PdfRenderer::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response body.
#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Risk preview response body, mirroring the review step of the form.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskRes {
    pub tier: String,
    pub score: u32,
    pub factors: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, assess_risk, generate_report),
    components(schemas(HealthRes, RiskRes, ScreeningFormData))
)]
struct ApiDoc;

/// Build the REST application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/screening/risk", post(assess_risk))
        .route("/screening/report", post(generate_report))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Parse the request body as a screening form payload.
///
/// Uses `serde_path_to_error` so a 422 names the failing field (e.g.
/// `familyHistory[1]`) instead of a bare serde message.
fn parse_form(body: &str) -> Result<ScreeningFormData, (StatusCode, String)> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() {
            "<root>"
        } else {
            path.as_str()
        };
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("screening form schema mismatch at {path}: {source}"),
        )
    })
}

fn unprocessable(err: ScreeningError) -> (StatusCode, String) {
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the screening API service.
/// This endpoint is used for monitoring and load balancer health checks.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response containing service status
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Prost Health screening API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/screening/risk",
    request_body = ScreeningFormData,
    responses(
        (status = 200, description = "Risk tier with contributing factors", body = RiskRes),
        (status = 422, description = "Invalid form payload")
    )
)]
/// Classify a screening form payload without generating a document
///
/// This is the review-step preview: the form posts its accumulated answers
/// and shows the returned tier and factor list to the user before they
/// request the full report.
///
/// # Returns
/// * `Ok(Json<RiskRes>)` - Risk tier, score, and contributing factors
/// * `Err((StatusCode, String))` - 422 naming the offending field
///
/// # Errors
/// Returns `422 Unprocessable Entity` if:
/// - the JSON does not match the form schema, or
/// - a required answer is missing, a tag is unknown, or the date of birth
///   yields an out-of-range age.
#[axum::debug_handler]
async fn assess_risk(
    State(_state): State<AppState>,
    body: String,
) -> Result<Json<RiskRes>, (StatusCode, String)> {
    let form = parse_form(&body)?;
    let today = Utc::now().date_naive();
    let record = form.into_record(today).map_err(unprocessable)?;
    let assessment = classify(&record, today).map_err(unprocessable)?;
    Ok(Json(RiskRes {
        tier: assessment.tier.as_str().to_string(),
        score: assessment.score,
        factors: assessment.factors,
    }))
}

#[utoipa::path(
    post,
    path = "/screening/report",
    request_body = ScreeningFormData,
    responses(
        (status = 200, description = "Generated PDF document (application/pdf bytes)"),
        (status = 422, description = "Invalid form payload"),
        (status = 500, description = "Document generation failed")
    )
)]
/// Generate the screening request PDF for a form payload
///
/// Runs the full pipeline: translate the wire payload, classify, compose the
/// report document, render it to PDF bytes, and return them with the
/// suggested filename in the `Content-Disposition` header. Delivery
/// (download, open in tab) is the caller's concern.
///
/// # Returns
/// * `Ok(Response)` - `application/pdf` bytes with an attachment disposition
/// * `Err((StatusCode, String))` - 422 for bad input, 500 for render failure
///
/// # Errors
/// Returns `422 Unprocessable Entity` for invalid payloads and
/// `500 Internal Server Error` with a fixed user-facing message when the
/// rendering engine fails; the engine error is logged, never returned.
#[axum::debug_handler]
async fn generate_report(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, (StatusCode, String)> {
    let form = parse_form(&body)?;
    let generated_at = Utc::now();
    let today = generated_at.date_naive();

    let record = form.into_record(today).map_err(unprocessable)?;
    let assessment = classify(&record, today).map_err(unprocessable)?;
    let reference = ReferenceId::new(today);

    let report = compose(
        &record,
        &assessment,
        generated_at,
        &reference,
        &state.branding,
    )
    .map_err(unprocessable)?;

    let bytes = state.renderer.render(&report).map_err(|err| {
        tracing::error!("rendering failed for {reference}: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            RENDER_FAILURE_MESSAGE.to_string(),
        )
    })?;

    tracing::info!(
        "generated report {reference} ({} bytes, tier {})",
        bytes.len(),
        assessment.tier
    );

    let filename = suggested_filename(&record, today, &state.branding);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> String {
        serde_json::json!({
            "firstName": "David",
            "lastName": "Okafor",
            "dateOfBirth": "1940-03-03",
            "previousPSA": "no",
            "previousBiopsy": "no",
            "previousMRI": "no",
            "familyHistory": ["father"],
            "ethnicity": "black-african"
        })
        .to_string()
    }

    #[test]
    fn parse_form_names_the_failing_field() {
        let (status, message) =
            parse_form(r#"{"firstName": "David", "familyHistory": "father"}"#).unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            message.contains("familyHistory"),
            "message should name the field: {message}"
        );
    }

    #[tokio::test]
    async fn assess_risk_returns_tier_and_factors() {
        let response = assess_risk(State(AppState::new()), sample_body())
            .await
            .expect("classification succeeds");
        let RiskRes {
            tier,
            score,
            factors,
        } = response.0;
        // Age 70+: 3, father: 3, ethnicity: 2, unknown PSA: 1.
        assert_eq!(tier, "HIGH");
        assert_eq!(score, 9);
        assert!(factors.iter().any(|f| f.contains("Family history")));
    }

    #[tokio::test]
    async fn assess_risk_rejects_unknown_tags() {
        let body = sample_body().replace("black-african", "martian");
        let (status, message) = assess_risk(State(AppState::new()), body)
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("ethnicity"));
    }

    #[tokio::test]
    async fn generate_report_returns_pdf_with_attachment_headers() {
        let response = generate_report(State(AppState::new()), sample_body())
            .await
            .expect("report generation succeeds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("disposition header");
        assert!(disposition.starts_with("attachment; filename=\"Prost_Health_Screening_David_Okafor_"));
        assert!(disposition.ends_with(".pdf\""));
    }
}
