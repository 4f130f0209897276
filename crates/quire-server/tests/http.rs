use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use http_body_util::BodyExt;
use quire_core::domain::RenderError;
use quire_core::impls::TempDirProvisioner;
use quire_core::ports::Renderer;
use quire_core::{Artifact, OrchestratorBuilder};
use quire_server::http::build_router;
use tempfile::TempDir;
use tower::ServiceExt;

/// "Compiles" by prefixing the source; `\bogus` fails like a real compiler would.
struct FakeLatex;

#[async_trait]
impl Renderer for FakeLatex {
    async fn render(&self, source: &[u8], dir: &Path) -> Result<Artifact, RenderError> {
        if source.windows(6).any(|w| w == b"\\bogus") {
            return Err(RenderError::Compile {
                pass: 1,
                exit_code: Some(1),
                log: "! Undefined control sequence.".to_string(),
            });
        }
        let images = std::fs::read_dir(dir).map_err(RenderError::MissingOutput)?.count();
        let mut pdf = format!("%PDF images={images} ").into_bytes();
        pdf.extend_from_slice(source);
        Ok(Artifact::pdf(pdf))
    }
}

struct TestApp {
    router: Router,
    _scratch: TempDir,
}

fn app(retention: Duration, max_request_bytes: usize) -> TestApp {
    let scratch = TempDir::new().expect("scratch dir");
    let orchestrator = OrchestratorBuilder::new()
        .renderer(FakeLatex)
        .provisioner(TempDirProvisioner::new(scratch.path()))
        .retention(retention)
        .build()
        .expect("orchestrator");
    TestApp {
        router: build_router(Arc::new(orchestrator), max_request_bytes),
        _scratch: scratch,
    }
}

fn default_app() -> TestApp {
    app(Duration::from_secs(300), 1024 * 1024)
}

fn encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl TestApp {
    async fn get(&self, path: &str, pairs: &[(&str, &str)]) -> Response {
        let uri = format!("{path}?{}", encode(pairs));
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.router.clone().oneshot(request).await.expect("response")
    }

    async fn post_form(&self, path: &str, body: String) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request");
        self.router.clone().oneshot(request).await.expect("response")
    }
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

#[tokio::test]
async fn compile_then_fetch_pdf() {
    let app = default_app();
    let image = URL_SAFE.encode(b"\x89PNG fake");

    let response = app
        .get(
            "/compile",
            &[
                ("src", "\\doc{A}"),
                ("image1type", "png"),
                ("image1data", &image),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_text(response).await;
    assert!(id.starts_with("job-"), "{id}");

    let response = app.get("/pdf", &[("id", &id)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    // src.tex is written by the real renderer only, so the fake sees the image alone.
    assert_eq!(body_bytes(response).await, b"%PDF images=1 \\doc{A}");
}

#[tokio::test]
async fn compile_accepts_urlencoded_post() {
    let app = default_app();

    let response = app
        .post_form("/compile", encode(&[("src", "\\doc{B}")]))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_text(response).await;

    let response = app.post_form("/pdf", encode(&[("id", &id)])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"%PDF images=0 \\doc{B}");
}

#[tokio::test]
async fn non_utf8_source_is_compiled_byte_for_byte() {
    let app = default_app();

    // Latin-1 "café"; the 0xE9 byte is not valid UTF-8 on its own.
    let response = app.post_form("/compile", "src=caf%E9".to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_text(response).await;

    let response = app.get("/pdf", &[("id", &id)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"%PDF images=0 caf\xe9");
}

#[tokio::test]
async fn non_utf8_query_source_is_compiled_byte_for_byte() {
    let app = default_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/compile?src=caf%E9")
        .body(Body::empty())
        .expect("request");
    let response = app.router.clone().oneshot(request).await.expect("response");
    let id = body_text(response).await;

    let response = app.get("/pdf", &[("id", &id)]).await;
    assert_eq!(body_bytes(response).await, b"%PDF images=0 caf\xe9");
}

#[tokio::test]
async fn unknown_id_is_rejected_with_hint() {
    let app = default_app();

    let response = app.get("/pdf", &[("id", "job-01ARZ3NDEKTSV4RRFFQ69G5FAV")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "ERROR: bad document ID: job-01ARZ3NDEKTSV4RRFFQ69G5FAV. \
         Please reserve an ID first, using /compile."
    );
}

#[tokio::test]
async fn missing_id_is_treated_as_unknown() {
    let app = default_app();

    let response = app.get("/pdf", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.starts_with("ERROR: bad document ID: ."));
}

#[tokio::test]
async fn bad_attachment_is_a_client_error() {
    let app = default_app();

    let response = app
        .get(
            "/compile",
            &[
                ("src", "x"),
                ("image1type", "png"),
                ("image1data", "%%% definitely not base64"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .starts_with("ERROR: failed to decode data for image #1")
    );
}

#[tokio::test]
async fn attachment_without_data_is_reported_by_position() {
    let app = default_app();

    let response = app
        .get("/compile", &[("src", "x"), ("image1type", "png")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "ERROR: no data for image #1");
}

#[tokio::test]
async fn compiler_log_is_returned_on_failure() {
    let app = default_app();

    let response = app.get("/compile", &[("src", "\\bogus")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "ERROR: failed to compile latex:\n\n! Undefined control sequence."
    );
}

#[tokio::test]
async fn document_expires_after_retention() {
    let app = app(Duration::from_millis(100), 1024 * 1024);

    let response = app.get("/compile", &[("src", "\\doc{A}")]).await;
    let id = body_text(response).await;
    assert_eq!(
        app.get("/pdf", &[("id", &id)]).await.status(),
        StatusCode::OK
    );

    tokio::time::sleep(Duration::from_millis(400)).await;

    let response = app.get("/pdf", &[("id", &id)]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains(&id));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let app = app(Duration::from_secs(300), 64);
    let big = "x".repeat(1024);

    let response = app
        .post_form("/compile", encode(&[("src", &big)]))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn post_without_form_content_type_is_refused() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/compile")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .expect("request");

    let response = app.router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body_text(response).await.starts_with("ERROR: "));
}
