//! Gateway boundary tests: local validation, forwarding, and relay of the
//! resolver's responses.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ceptemp_gateway::routes::{AppState, router};
use tower::util::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESOLVER_BODY: &str =
    r#"{"city":"Francisco Beltrão","temp_C":20.0,"temp_F":68.0,"temp_K":293.15}"#;

fn app(resolver: &MockServer) -> axum::Router {
    router(AppState {
        http: reqwest::Client::new(),
        resolver_url: resolver.uri(),
    })
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn forwards_path_cep_with_json_accept() {
    let resolver = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cep/79052564"))
        .and(header_eq("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(RESOLVER_BODY, "application/json"),
        )
        .expect(1)
        .mount(&resolver)
        .await;

    let (status, body) = send(app(&resolver), get("/cep/79052564")).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["city"], "Francisco Beltrão");
    assert_eq!(json["temp_K"], 293.15);
}

#[tokio::test]
async fn body_cep_wins_over_path() {
    let resolver = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cep/01310100"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(RESOLVER_BODY, "application/json"),
        )
        .expect(1)
        .mount(&resolver)
        .await;

    let request = Request::builder()
        .uri("/cep/79052564")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"cep": "01310100"}"#))
        .expect("request");

    let (status, _) = send(app(&resolver), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_cep_is_rejected_before_forwarding() {
    let resolver = MockServer::start().await;

    let (status, body) = send(app(&resolver), get("/cep/invalid")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("invalid zipcode"));
    assert!(resolver.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_cep_is_a_bad_request() {
    let resolver = MockServer::start().await;

    let (status, body) = send(app(&resolver), get("/cep")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("zipcode is required"));
    assert!(resolver.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let resolver = MockServer::start().await;

    let request = Request::builder()
        .uri("/cep/79052564")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let (status, _) = send(app(&resolver), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resolver.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn relays_not_found_from_resolver() {
    let resolver = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cep/11111111"))
        .respond_with(ResponseTemplate::new(404).set_body_string("can not find zipcode"))
        .mount(&resolver)
        .await;

    let (status, body) = send(app(&resolver), get("/cep/11111111")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "can not find zipcode");
}

#[tokio::test]
async fn unreachable_resolver_is_an_internal_error() {
    let app = router(AppState {
        http: reqwest::Client::new(),
        resolver_url: "http://127.0.0.1:9".to_string(),
    });

    let (status, _) = send(app, get("/cep/79052564")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
