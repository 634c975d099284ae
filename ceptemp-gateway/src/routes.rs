use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use ceptemp_core::{is_valid_cep, telemetry};

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    /// Base URL of the resolver service, e.g. `http://ceptemp-server:8081`.
    pub resolver_url: String,
}

/// Optional request body; when present its `cep` wins over the path value.
#[derive(Debug, Deserialize)]
pub struct CepBody {
    #[serde(default)]
    cep: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cep", get(missing_zipcode))
        .route("/cep/{code}", get(forward_lookup))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn missing_zipcode() -> GatewayError {
    GatewayError::MissingZipcode
}

/// Validate locally, then forward the lookup to the resolver with the
/// current trace context injected, so both hops land in one trace. The
/// resolver's status and body are relayed verbatim.
async fn forward_lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Option<Json<CepBody>>,
) -> Result<Response, GatewayError> {
    let cep = body
        .and_then(|Json(b)| b.cep)
        .filter(|c| !c.is_empty())
        .unwrap_or(code);

    if cep.is_empty() {
        return Err(GatewayError::MissingZipcode);
    }
    if !is_valid_cep(&cep) {
        return Err(GatewayError::InvalidZipcode);
    }

    let span = tracing::info_span!("get temperature from resolver", cep = %cep);
    async {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        telemetry::inject_context(&mut headers);

        let url = format!("{}/cep/{}", state.resolver_url, cep);
        let upstream = state
            .http
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(GatewayError::Upstream)?;

        let status = StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = upstream.bytes().await.map_err(GatewayError::Upstream)?;

        let mut response = Response::builder().status(status);
        if let Some(content_type) = content_type {
            response = response.header(header::CONTENT_TYPE, content_type);
        }
        response
            .body(Body::from(bytes))
            .map_err(|e| GatewayError::Relay(e.to_string()))
    }
    .instrument(span)
    .await
}

#[derive(Debug)]
pub enum GatewayError {
    MissingZipcode,
    InvalidZipcode,
    Upstream(reqwest::Error),
    Relay(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingZipcode => {
                (StatusCode::BAD_REQUEST, "zipcode is required").into_response()
            }
            Self::InvalidZipcode => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid zipcode").into_response()
            }
            Self::Upstream(err) => {
                tracing::error!(error = %err, "resolver call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
            Self::Relay(detail) => {
                tracing::error!(detail, "failed to relay resolver response");
                (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response()
            }
        }
    }
}
