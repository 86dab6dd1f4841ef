//! Raw API responses.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Parsed JSON.
    Json(Value),
    /// Anything that did not parse as JSON (CSV, HTML, error pages).
    Text(String),
    /// Zero-length body.
    Empty,
}

/// A response of any status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded body.
    pub body: Body,
}

impl ApiResponse {
    /// Read a reqwest response to completion.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        Ok(Self::from_parts(status, headers, text))
    }

    /// Build from already-read parts. JSON is tried whenever the body is not
    /// empty, since some endpoints omit the content type.
    #[must_use]
    pub fn from_parts(status: StatusCode, headers: HeaderMap, text: String) -> Self {
        let body = if text.trim().is_empty() {
            Body::Empty
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => Body::Json(value),
                Err(_) => Body::Text(text),
            }
        };
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// JSON body, if any.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Top-level field of a JSON object body.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.json().and_then(|v| v.get(key))
    }

    /// Top-level string field.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// JSON array body.
    #[must_use]
    pub fn array(&self) -> Option<&Vec<Value>> {
        self.json().and_then(Value::as_array)
    }

    /// `error` field the API uses for failures.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.str_field("error")
    }

    /// Body as text whatever its kind.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.body {
            Body::Json(value) => value.to_string(),
            Body::Text(text) => text.clone(),
            Body::Empty => String::new(),
        }
    }

    /// Body text cut to `max_chars` for logs.
    #[must_use]
    pub fn summary(&self, max_chars: usize) -> String {
        let text = self.text();
        if text.chars().count() <= max_chars {
            text
        } else {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{cut}…")
        }
    }

    /// Header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Deserialize the JSON body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        match &self.body {
            Body::Json(value) => Ok(serde_json::from_value(value.clone())?),
            _ => Err(ClientError::NotJson(self.summary(200))),
        }
    }

    /// Fail unless the status is `expected`.
    pub fn expect_status(&self, expected: StatusCode) -> Result<&Self, ClientError> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(self.to_api_error())
        }
    }

    /// Fail unless the status is 2xx.
    pub fn expect_success(&self) -> Result<&Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.to_api_error())
        }
    }

    fn to_api_error(&self) -> ClientError {
        ClientError::Api {
            status: self.status_code(),
            message: self
                .error_message()
                .map_or_else(|| self.summary(200), str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, text: &str) -> ApiResponse {
        ApiResponse::from_parts(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            text.to_string(),
        )
    }

    #[test]
    fn json_body_is_parsed() {
        let r = response(200, r#"{"status":"ok","app":"VetBuddy API"}"#);
        assert_eq!(r.str_field("status"), Some("ok"));
        assert!(r.is_success());
    }

    #[test]
    fn non_json_body_is_kept_as_text() {
        let r = response(200, "numero,data\n2026/001,2026-01-02");
        assert!(matches!(r.body, Body::Text(_)));
        assert!(r.decode::<Value>().is_err());
    }

    #[test]
    fn empty_body() {
        assert_eq!(response(204, "  ").body, Body::Empty);
    }

    #[test]
    fn api_error_uses_error_field() {
        let r = response(401, r#"{"error":"Non autorizzato"}"#);
        match r.expect_success() {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Non autorizzato");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn summary_truncates_on_char_boundary() {
        let r = response(500, "èèèèè");
        assert_eq!(r.summary(2), "èè…");
    }
}
