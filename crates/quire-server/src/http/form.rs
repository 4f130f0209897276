//! Urlencoded fields decoded to bytes.
//!
//! `axum::Form` decodes into `String` and replaces invalid UTF-8 with U+FFFD.
//! The document source must reach the compiler byte for byte, so fields are
//! percent-decoded here with `urlencoding::decode_binary` instead.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, Method, StatusCode, header},
};

use quire_core::Submission;
use quire_core::domain::collect_attachments;

use super::HttpError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const ATTACHMENT_PREFIX: &str = "image";

/// Request fields from the query string (GET) or a urlencoded body (POST).
///
/// On POST the body is read first and the query string second. The first
/// occurrence of a key wins.
#[derive(Debug, Default)]
pub struct FormFields {
    fields: HashMap<String, Bytes>,
}

impl FormFields {
    pub fn parse(raw: &[u8]) -> Self {
        let mut fields = Self::default();
        fields.extend(raw);
        fields
    }

    fn extend(&mut self, raw: &[u8]) {
        for pair in raw.split(|&b| b == b'&').filter(|pair| !pair.is_empty()) {
            let (key, value) = match pair.iter().position(|&b| b == b'=') {
                Some(eq) => (&pair[..eq], &pair[eq + 1..]),
                None => (pair, &[][..]),
            };
            let key = String::from_utf8_lossy(&decode(key)).into_owned();
            self.fields
                .entry(key)
                .or_insert_with(|| Bytes::from(decode(value)));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.fields.get(key)
    }

    /// Split into the raw `src` bytes and the textual attachment fields.
    ///
    /// Attachment fields must be UTF-8; anything else is a client error.
    pub fn into_submission(mut self) -> Result<Submission, HttpError> {
        let source = self
            .fields
            .remove(Submission::SOURCE_FIELD)
            .unwrap_or_default();

        let mut text = HashMap::with_capacity(self.fields.len());
        for (key, value) in self.fields {
            if !key.starts_with(ATTACHMENT_PREFIX) {
                continue;
            }
            let value = std::str::from_utf8(&value)
                .map_err(|_| {
                    HttpError::new(
                        StatusCode::BAD_REQUEST,
                        format!("field {key} is not valid UTF-8"),
                    )
                })?
                .to_owned();
            text.insert(key, value);
        }

        Ok(Submission::new(source, collect_attachments(&text)))
    }
}

/// Percent-decode one key or value; `+` stands for a space in form encoding.
fn decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}

fn has_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().unwrap_or_default().to_owned();
        if req.method() == Method::GET || req.method() == Method::HEAD {
            return Ok(Self::parse(query.as_bytes()));
        }

        if !has_form_content_type(req.headers()) {
            return Err(HttpError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Form requests must have `Content-Type: {FORM_CONTENT_TYPE}`"),
            ));
        }

        // Honors DefaultBodyLimit; an oversized body is rejected with 413.
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::new(rejection.status(), rejection.body_text()))?;

        let mut fields = Self::parse(&body);
        fields.extend(query.as_bytes());
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_percent_escapes_and_plus() {
        let fields = FormFields::parse(b"src=a+b%2Bc%5Cdoc&image1type=png");
        assert_eq!(&fields.get("src").unwrap()[..], b"a b+c\\doc");
        assert_eq!(&fields.get("image1type").unwrap()[..], b"png");
    }

    #[test]
    fn keeps_non_utf8_bytes() {
        let fields = FormFields::parse(b"src=caf%E9");
        assert_eq!(&fields.get("src").unwrap()[..], [0x63, 0x61, 0x66, 0xe9]);
    }

    #[test]
    fn first_occurrence_wins() {
        let mut fields = FormFields::parse(b"id=from-body");
        fields.extend(b"id=from-query&extra=1");
        assert_eq!(&fields.get("id").unwrap()[..], b"from-body");
        assert_eq!(&fields.get("extra").unwrap()[..], b"1");
    }

    #[test]
    fn key_without_value_is_empty() {
        let fields = FormFields::parse(b"src&&id=");
        assert!(fields.get("src").unwrap().is_empty());
        assert!(fields.get("id").unwrap().is_empty());
    }

    #[test]
    fn submission_keeps_source_bytes_and_collects_attachments() {
        let raw = b"src=caf%E9&image1type=png&image1data=AA%3D%3D&note=%FF";
        let submission = FormFields::parse(raw).into_submission().unwrap();

        assert_eq!(&submission.source[..], [0x63, 0x61, 0x66, 0xe9]);
        assert_eq!(submission.attachments.len(), 1);
        assert_eq!(submission.attachments[0].data.as_deref(), Some("AA=="));
    }

    #[test]
    fn non_utf8_attachment_field_is_rejected() {
        let err = FormFields::parse(b"image1type=png&image1name=%FF")
            .into_submission()
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "field image1name is not valid UTF-8");
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=utf-8".parse().unwrap(),
        );
        assert!(has_form_content_type(&headers));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!has_form_content_type(&headers));
    }
}
