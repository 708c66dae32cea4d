use async_trait::async_trait;
use std::sync::Mutex;

use crate::http::{RequestFailure, Transport, TransportRequest, TransportResponse};
use crate::log_sink::LogSink;

/// Answers every request with the same canned outcome and remembers what it was sent.
pub struct StubTransport {
    outcome: Result<TransportResponse, RequestFailure>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl StubTransport {
    pub fn responding(status: u16, body: Option<serde_json::Value>) -> Self {
        StubTransport::with_outcome(Ok(TransportResponse { status, body }))
    }

    pub fn failing(failure: RequestFailure) -> Self {
        StubTransport::with_outcome(Err(failure))
    }

    fn with_outcome(outcome: Result<TransportResponse, RequestFailure>) -> Self {
        StubTransport {
            outcome,
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, RequestFailure> {
        self.requests.lock().unwrap().push(request);
        self.outcome.clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, message: &str, channel: &str) {
        self.writes
            .lock()
            .unwrap()
            .push((message.to_string(), channel.to_string()));
    }
}
