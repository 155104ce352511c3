//! # Transport — the wire underneath the remote call layer
//!
//! [`Transport`] sends one [`ApiRequest`] and returns whatever status and body
//! came back. It knows nothing about retries or credentials beyond attaching
//! the bearer token it is handed.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`.
//! Cookies ride along with every request so the server's HTTP-only refresh
//! cookie reaches `/auth/refresh`:
//!
//! | Target | Cookie handling |
//! |--------|-----------------|
//! | WASM | `fetch` with `credentials: "include"` |
//! | Native | in-process cookie jar (`reqwest` `cookies` feature) |

use std::future::Future;

use serde_json::Value;

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One call against the API, relative to the configured base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::with_body(Method::Post, path, body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::with_body(Method::Patch, path, body)
    }

    pub fn delete(path: impl Into<String>, body: Value) -> Self {
        Self::with_body(Method::Delete, path, body)
    }

    fn with_body(method: Method, path: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            path: path.into(),
            body: Some(body),
        }
    }

    /// `"GET /notes"` style label used in logs.
    pub fn route(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }
}

/// Raw HTTP outcome. Empty bodies are `Value::Null`, non-JSON bodies a `Value::String`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async trait for sending requests to the API server.
pub trait Transport {
    /// Send `request`, attaching `Authorization: Bearer <token>` when `bearer` is set.
    /// Only failures without an HTTP status are errors here.
    fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

/// `reqwest`-backed transport.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let client = builder
            .build()
            .map_err(|e| ApiError::NoResponse(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(route = %request.route(), error = %e, "request failed without response");
            ApiError::NoResponse(e.to_string())
        })?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::NoResponse(e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        tracing::debug!(route = %request.route(), status, "response received");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::delete("/notes", json!({ "id": "a" }));
        assert_eq!(req.route(), "DELETE /notes");
        assert_eq!(req.body, Some(json!({ "id": "a" })));
        assert!(ApiRequest::get("/users").body.is_none());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let transport = HttpTransport::new("http://localhost:3500/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3500");
    }
}
