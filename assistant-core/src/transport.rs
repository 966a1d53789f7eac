use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "jarvis-assistant/1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single outbound request. Query pairs are appended to `url` by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport and protocol failures. Domain misses never end up here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// `reqwest`-backed transport used outside of tests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            user_agent: user_agent.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };

        builder = builder
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&request.query);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = ?request.method, url = %request.url, "outbound request");

        let res = builder.send().await.map_err(|source| FetchError::Transport {
            url: request.url.clone(),
            source,
        })?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(|source| FetchError::Transport {
            url: request.url.clone(),
            source,
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Send `request` with its own method and decode a 2xx JSON body into `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: HttpRequest,
) -> Result<T, FetchError> {
    let url = request.url.clone();
    let res = transport.send(request).await?;

    if !res.is_success() {
        return Err(FetchError::Status { status: res.status, url });
    }

    serde_json::from_str(&res.body).map_err(|source| FetchError::Decode { url, source })
}


#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Echo {
        value: i32,
    }

    #[tokio::test]
    async fn fetch_json_decodes_success_body() {
        let fake = FakeTransport::new().respond("https://api.test/echo", 200, r#"{"value": 7}"#);

        let echo: Echo = fetch_json(&fake, HttpRequest::get("https://api.test/echo").query("a", 1))
            .await
            .expect("decode should succeed");

        assert_eq!(echo.value, 7);
        assert_eq!(fake.request(0).query, vec![("a".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn fetch_json_reports_status_and_url() {
        let fake = FakeTransport::new().respond("https://api.test/down", 503, "busy");

        let err = fetch_json::<Echo>(&fake, HttpRequest::get("https://api.test/down"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 503 for https://api.test/down");
    }

    #[tokio::test]
    async fn fetch_json_reports_malformed_json() {
        let fake = FakeTransport::new().respond("https://api.test/bad", 200, "<html>");

        let err = fetch_json::<Echo>(&fake, HttpRequest::get("https://api.test/bad"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().starts_with("invalid JSON from https://api.test/bad"));
    }

    #[tokio::test]
    async fn fetch_json_keeps_request_method() {
        let fake = FakeTransport::new().respond("https://api.test/echo", 200, r#"{"value": 1}"#);
        let request = HttpRequest::post_json("https://api.test/echo", serde_json::json!({"q": 1}));

        let echo: Echo = fetch_json(&fake, request).await.expect("decode should succeed");

        assert_eq!(echo.value, 1);
        assert_eq!(fake.request(0).method, Method::Post);
    }
}
