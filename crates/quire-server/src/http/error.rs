use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use quire_core::{ErrorKind, RetrieveError, SubmitError};

/// Plain-text error response: `ERROR: <message>`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unknown ids are a client mistake, so they share 400 with bad input.
fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Input | ErrorKind::Render | ErrorKind::NotFound => StatusCode::BAD_REQUEST,
        ErrorKind::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SubmitError> for HttpError {
    fn from(err: SubmitError) -> Self {
        Self::new(status_for(err.kind()), err.to_string())
    }
}

impl From<RetrieveError> for HttpError {
    fn from(err: RetrieveError) -> Self {
        Self::new(
            status_for(err.kind()),
            format!("{err}. Please reserve an ID first, using /compile."),
        )
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, format!("ERROR: {}", self.message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::domain::{MaterializeError, RenderError};
    use std::time::Duration;

    #[test]
    fn unknown_id_message_points_to_compile() {
        let err = HttpError::from(RetrieveError::UnknownId("job-x".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "bad document ID: job-x. Please reserve an ID first, using /compile."
        );
    }

    #[test]
    fn status_follows_error_kind() {
        let input = HttpError::from(SubmitError::from(MaterializeError::MissingData {
            position: 1,
        }));
        assert_eq!(input.status(), StatusCode::BAD_REQUEST);

        let render = HttpError::from(SubmitError::from(RenderError::TimedOut(
            Duration::from_secs(1),
        )));
        assert_eq!(render.status(), StatusCode::BAD_REQUEST);

        let fatal = HttpError::from(SubmitError::Provision(std::io::Error::other("full")));
        assert_eq!(fatal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
