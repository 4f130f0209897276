//! HTTP surface: `/compile` submits a document, `/pdf` fetches the result.
//!
//! Both endpoints accept GET (query string) and POST (urlencoded body).

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use quire_core::JobOrchestrator;

mod error;
mod form;

pub use error::HttpError;
pub use form::FormFields;

const ID_FIELD: &str = "id";

pub fn build_router(orchestrator: Arc<JobOrchestrator>, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/compile", get(compile).post(compile))
        .route("/pdf", get(pdf).post(pdf))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(orchestrator)
}

async fn compile(
    State(orchestrator): State<Arc<JobOrchestrator>>,
    fields: FormFields,
) -> Result<String, HttpError> {
    let id = orchestrator.submit(fields.into_submission()?).await?;
    Ok(id.to_string())
}

async fn pdf(
    State(orchestrator): State<Arc<JobOrchestrator>>,
    fields: FormFields,
) -> Result<Response, HttpError> {
    let id = fields
        .get(ID_FIELD)
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .unwrap_or_default();
    let artifact = orchestrator.retrieve(&id).await?;

    Ok((
        [(header::CONTENT_TYPE, artifact.content_type())],
        artifact.into_bytes(),
    )
        .into_response())
}
