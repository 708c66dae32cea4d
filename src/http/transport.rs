use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::failure::{RequestFailure, RequestInfo};
use super::headers::{Headers, CONTENT_TYPE};

/// A fully resolved request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Value>,
}

/// A successful response; `body` is `None` when the server sent nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Performs the actual network exchange for a [`RequestClient`](super::RequestClient).
///
/// Implementations report non-success statuses as [`RequestFailure::Response`]
/// and are responsible for classifying every other failure into one of the
/// remaining variants.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, RequestFailure>;
}

pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport::from_client(Client::new())
    }

    pub fn from_client(inner: Client) -> Self {
        ReqwestTransport { inner }
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let inner = Client::builder().timeout(timeout).build()?;

        Ok(ReqwestTransport::from_client(inner))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        ReqwestTransport::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, RequestFailure> {
        let url = Url::parse(&request.url).map_err(|e| {
            RequestFailure::configuration(format!("Invalid url `{}`: {}", request.url, e))
        })?;

        let info = RequestInfo {
            method: request.method.to_string(),
            url: url.to_string(),
        };

        let body = encode_body(&request.headers, request.body.as_ref())?;

        let mut builder = self.inner.request(request.method, url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        debug!("{} {}", info.method, info.url);

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, &info))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| RequestFailure::Transport {
            request: info.clone(),
            message: e.to_string(),
        })?;

        debug!("{} {} -> {}", info.method, info.url, status);

        let body = decode_body(&bytes);

        if !status.is_success() {
            return Err(RequestFailure::Response {
                status: status.as_u16(),
                body,
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify(e: reqwest::Error, info: &RequestInfo) -> RequestFailure {
    if e.is_builder() {
        return RequestFailure::configuration(e.to_string());
    }

    RequestFailure::Transport {
        request: info.clone(),
        message: e.to_string(),
    }
}

/// Encodes `body` according to the effective `Content-Type`.
///
/// JSON (or no content type at all) serializes the value. For any other
/// content type a string payload goes out verbatim.
fn encode_body(
    headers: &Headers,
    body: Option<&Value>,
) -> Result<Option<Vec<u8>>, RequestFailure> {
    let body = match body {
        Some(body) => body,
        None => return Ok(None),
    };

    let is_json = headers
        .get(CONTENT_TYPE)
        .map_or(true, |ct| ct.to_ascii_lowercase().contains("json"));

    match body {
        Value::String(s) if !is_json => Ok(Some(s.clone().into_bytes())),
        other => serde_json::to_vec(other).map(Some).map_err(|e| {
            RequestFailure::configuration(format!("Failed to encode request body: {}", e))
        }),
    }
}

fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_json_by_default() {
        let body = json!({"name": "Bo"});

        let encoded = encode_body(&Headers::json(), Some(&body)).unwrap();
        assert_eq!(encoded.as_deref(), Some(&br#"{"name":"Bo"}"#[..]));

        let encoded = encode_body(&Headers::new(), Some(&json!("raw"))).unwrap();
        assert_eq!(encoded.as_deref(), Some(&br#""raw""#[..]));
    }

    #[test]
    fn test_encode_plain_text_verbatim() {
        let headers = Headers::new().with("content-type", "text/plain; charset=utf-8");

        let encoded = encode_body(&headers, Some(&json!("hello"))).unwrap();
        assert_eq!(encoded.as_deref(), Some(&b"hello"[..]));

        let encoded = encode_body(&headers, Some(&json!([1, 2]))).unwrap();
        assert_eq!(encoded.as_deref(), Some(&b"[1,2]"[..]));
    }

    #[test]
    fn test_encode_without_body() {
        assert_eq!(encode_body(&Headers::json(), None).unwrap(), None);
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b" \n"), None);
        assert_eq!(decode_body(br#"{"id":1}"#), Some(json!({"id": 1})));
        assert_eq!(decode_body(b"plain text"), Some(json!("plain text")));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_configuration_failure() {
        let transport = ReqwestTransport::new();

        let result = transport
            .execute(TransportRequest {
                method: Method::GET,
                url: "not a url/users".to_string(),
                headers: Headers::json(),
                body: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(RequestFailure::Configuration { .. })
        ));
    }
}
