use anyhow::Context;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::failure::RequestFailure;
use super::headers::Headers;
use super::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::log_sink::{FileSink, LogCrateSink, LogSink, ERROR_CHANNEL};
use crate::settings::{Settings, SinkSettings};

pub type RequestResult = Result<Option<Value>, RequestFailure>;

/// What a request operation does with a failure after it has been logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return `Ok(None)`, indistinguishable from an empty response body.
    #[default]
    Swallow,
    /// Return the failure as `Err`.
    Strict,
}

/// Issues requests against a fixed base URL and reports every failure to a log sink.
///
/// Per-call headers are laid over the client's default headers for that call
/// only. Each failure produces exactly one sink write on the
/// [`ERROR_CHANNEL`](crate::log_sink::ERROR_CHANNEL); whether it then reaches
/// the caller depends on the [`ErrorPolicy`].
pub struct RequestClient<T = ReqwestTransport, S = LogCrateSink> {
    transport: T,
    sink: S,
    base_url: String,
    default_headers: Headers,
    error_policy: ErrorPolicy,
}

impl RequestClient {
    pub fn new(base_url: &str) -> Self {
        RequestClient::with_parts(base_url, ReqwestTransport::new(), LogCrateSink)
    }
}

impl RequestClient<ReqwestTransport, Box<dyn LogSink>> {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client_settings = &settings.client;

        let transport = match client_settings.timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)
                .context("Failed to build http client")?,
            None => ReqwestTransport::new(),
        };

        let sink: Box<dyn LogSink> = match &settings.log.sink {
            SinkSettings::Log => Box::new(LogCrateSink),
            SinkSettings::File { path } => Box::new(
                FileSink::open(path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?,
            ),
        };

        Ok(
            RequestClient::with_parts(client_settings.base_url.as_str(), transport, sink)
                .with_default_headers(client_settings.default_headers.clone())
                .with_error_policy(client_settings.error_policy),
        )
    }
}

impl<T, S> RequestClient<T, S>
where
    T: Transport,
    S: LogSink,
{
    pub fn with_parts(base_url: &str, transport: T, sink: S) -> Self {
        RequestClient {
            transport,
            sink,
            base_url: base_url.to_string(),
            default_headers: Headers::json(),
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_default_headers(mut self, default_headers: Headers) -> Self {
        self.default_headers = default_headers;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn get(&self, endpoint: &str, headers: &Headers) -> RequestResult {
        self.request(self.error_policy, Method::GET, endpoint, Ok(None), headers).await
    }

    pub async fn post<D>(&self, endpoint: &str, data: &D, headers: &Headers) -> RequestResult
    where
        D: Serialize + ?Sized,
    {
        self.request(self.error_policy, Method::POST, endpoint, to_body(data), headers).await
    }

    pub async fn put<D>(&self, endpoint: &str, data: &D, headers: &Headers) -> RequestResult
    where
        D: Serialize + ?Sized,
    {
        self.request(self.error_policy, Method::PUT, endpoint, to_body(data), headers).await
    }

    pub async fn delete(&self, endpoint: &str, headers: &Headers) -> RequestResult {
        self.request(self.error_policy, Method::DELETE, endpoint, Ok(None), headers).await
    }

    /// Like [`get`](Self::get), but returns the failure regardless of the client's policy.
    pub async fn try_get(&self, endpoint: &str, headers: &Headers) -> RequestResult {
        self.request(ErrorPolicy::Strict, Method::GET, endpoint, Ok(None), headers).await
    }

    pub async fn try_post<D>(&self, endpoint: &str, data: &D, headers: &Headers) -> RequestResult
    where
        D: Serialize + ?Sized,
    {
        self.request(ErrorPolicy::Strict, Method::POST, endpoint, to_body(data), headers).await
    }

    pub async fn try_put<D>(&self, endpoint: &str, data: &D, headers: &Headers) -> RequestResult
    where
        D: Serialize + ?Sized,
    {
        self.request(ErrorPolicy::Strict, Method::PUT, endpoint, to_body(data), headers).await
    }

    pub async fn try_delete(&self, endpoint: &str, headers: &Headers) -> RequestResult {
        self.request(ErrorPolicy::Strict, Method::DELETE, endpoint, Ok(None), headers).await
    }

    async fn request(
        &self,
        error_policy: ErrorPolicy,
        method: Method,
        endpoint: &str,
        body: Result<Option<Value>, RequestFailure>,
        headers: &Headers,
    ) -> RequestResult {
        let outcome = match body {
            Ok(body) => {
                let request = TransportRequest {
                    method,
                    url: join_url(&self.base_url, endpoint),
                    headers: self.default_headers.merged(headers),
                    body,
                };

                self.transport.execute(request).await
            }
            Err(failure) => Err(failure),
        };

        match outcome {
            Ok(response) => Ok(response.body),
            Err(failure) => self.report(failure, error_policy),
        }
    }

    fn report(&self, failure: RequestFailure, error_policy: ErrorPolicy) -> RequestResult {
        self.sink.write(&failure.log_message(), ERROR_CHANNEL);

        match error_policy {
            ErrorPolicy::Swallow => Ok(None),
            ErrorPolicy::Strict => Err(failure),
        }
    }
}

fn to_body<D: Serialize + ?Sized>(data: &D) -> Result<Option<Value>, RequestFailure> {
    serde_json::to_value(data).map(Some).map_err(|e| {
        RequestFailure::configuration(format!("Failed to serialize request body: {}", e))
    })
}

/// Appends `endpoint` to `base_url` with exactly one `/` between them.
///
/// Absolute endpoints (`scheme://...` or `//...`) are used as they are.
fn join_url(base_url: &str, endpoint: &str) -> String {
    if is_absolute_url(endpoint) {
        return endpoint.to_string();
    }

    if endpoint.is_empty() {
        return base_url.to_string();
    }

    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn is_absolute_url(endpoint: &str) -> bool {
    let rest = match endpoint.find(':') {
        Some(i) if is_scheme(&endpoint[..i]) => &endpoint[i + 1..],
        _ => endpoint,
    };

    rest.starts_with("//")
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();

    chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
