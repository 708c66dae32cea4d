pub mod config;
pub mod http;
pub mod log_sink;
pub mod settings;

#[cfg(test)]
mod test_util;

pub use http::{
    ErrorPolicy, Headers, RequestClient, RequestFailure, RequestInfo, ReqwestTransport, Transport,
    TransportRequest, TransportResponse,
};
pub use log_sink::{FileSink, LogCrateSink, LogSink, ERROR_CHANNEL};
