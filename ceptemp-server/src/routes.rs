use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use ceptemp_core::{LookupError, Pipeline, TemperatureResult, telemetry};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Whether the response body carries the resolved city (split
    /// deployment exposes it, the single-service deployment does not).
    pub include_city: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cep/{code}", get(get_temperature))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// One handler for both deployments: runs the pipeline under a span whose
/// parent is taken from the inbound trace headers, then maps the outcome
/// onto the HTTP contract.
async fn get_temperature(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TemperatureResult>, ApiError> {
    let span =
        tracing::info_span!("lookup temperature", cep = %code, trace_id = tracing::field::Empty);
    telemetry::extract_parent(&span, &headers);

    let mut result = state
        .pipeline
        .lookup_temperature(&code)
        .instrument(span)
        .await?;

    if !state.include_city {
        result.city = None;
    }
    Ok(Json(result))
}

/// Boundary-side wrapper deciding status codes for pipeline outcomes.
pub struct ApiError(LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LookupError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            LookupError::ZipcodeNotFound => StatusCode::NOT_FOUND,
            LookupError::Transport { .. } | LookupError::UnexpectedResponse { .. } => {
                tracing::error!(error = %self.0, "lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.0.to_string()).into_response()
    }
}
