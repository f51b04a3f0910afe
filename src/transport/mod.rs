//! HTTP transport: reqwest client construction and response header helpers.

pub mod http;

pub use http::{build_async_client, build_blocking_client, retry_after, TransportError};
