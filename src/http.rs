mod client;
mod failure;
mod headers;
mod transport;

pub use client::{ErrorPolicy, RequestClient, RequestResult};
pub use failure::{RequestFailure, RequestInfo};
pub use headers::{Headers, APPLICATION_JSON, CONTENT_TYPE};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
