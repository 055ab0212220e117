use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! debug_println {
    ($($arg:tt)*) => {
        if std::env::var("BLOGFORGE_DEBUG").is_ok() {
            println!($($arg)*);
        }
    };
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Failures of a single generation round trip. The service variant carries
/// the backend's own message (or a generic fallback when it sent none);
/// the transport variant carries the underlying network/decoding error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("{0}")]
    Service(String),
    #[error("{0}")]
    Transport(String),
}

const UNKNOWN_ERROR: &str = "Unknown error occurred";

pub struct GenerateClient {
    base_url: String,
    client: reqwest::Client,
}

impl GenerateClient {
    pub fn new(base_url: String) -> Self {
        GenerateClient {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Submit a video URL and wait for the generated blog markdown.
    ///
    /// There is deliberately no client-side timeout: generation runs
    /// multiple backend agents and routinely takes 30-60 seconds.
    pub async fn generate(&self, url: &str) -> Result<String, GenerateError> {
        let endpoint = format!("{}/generate", self.base_url);
        debug_println!("POST {} url={}", endpoint, url);

        let response = self
            .client
            .post(&endpoint)
            .json(&GenerateRequest { url })
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let ok = response.status().is_success();
        debug_println!("Response status: {}", response.status());

        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        interpret_response(ok, &body)
    }
}

/// Map a response body to the generated content or an error, given whether
/// the HTTP status indicated success. Success still fails when the body has
/// no usable `content`; failure bodies surface their `error` field verbatim
/// when present.
fn interpret_response(ok: bool, body: &str) -> Result<String, GenerateError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GenerateError::Transport(e.to_string()))?;

    if ok {
        match parsed.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(GenerateError::Service(
                parsed.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )),
        }
    } else {
        Err(GenerateError::Service(
            parsed.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_yields_content() {
        let result = interpret_response(true, r##"{"content":"# Hello"}"##);
        assert_eq!(result.unwrap(), "# Hello");
    }

    #[test]
    fn test_failure_body_surfaces_service_error() {
        let result = interpret_response(false, r#"{"error":"quota exceeded"}"#);
        assert_eq!(
            result.unwrap_err(),
            GenerateError::Service("quota exceeded".to_string())
        );
    }

    #[test]
    fn test_failure_without_error_field_is_generic() {
        let result = interpret_response(false, r#"{}"#);
        assert_eq!(
            result.unwrap_err(),
            GenerateError::Service(UNKNOWN_ERROR.to_string())
        );
    }

    #[test]
    fn test_success_status_without_content_is_service_error() {
        let result = interpret_response(true, r#"{}"#);
        assert_eq!(
            result.unwrap_err(),
            GenerateError::Service(UNKNOWN_ERROR.to_string())
        );
    }

    #[test]
    fn test_malformed_json_is_transport_error() {
        let result = interpret_response(true, "<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(GenerateError::Transport(_))));
    }

    #[test]
    fn test_error_display_is_bare_message() {
        let err = GenerateError::Service("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
