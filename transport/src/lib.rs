//! Asynchronous HTTP transport core for a resource-oriented client.
//!
//! # Overview
//! Submits a fully-formed HTTP [`Request`] and delivers exactly one
//! [`Outcome`] — a complete [`Response`] or a classified
//! [`TransportError`] — through a caller-supplied completion closure. The
//! resource-mapping layer above (URL construction, body serialization,
//! status interpretation) never learns which mechanism moved the bytes.
//!
//! # Design
//! - [`Transport`] is the contract: `dispatch(request, completion)`,
//!   non-blocking, exactly-once delivery, all failures through the
//!   completion path.
//! - [`DelegateTransport`] implements it over any [`Connector`], a
//!   primitive that reports progress as discrete events (response began,
//!   data received, finished, failed). A per-dispatch state machine
//!   buffers partial results and collapses the event stream into one
//!   outcome.
//! - [`HttpConnector`] is the shipped connector: tokio + hyper HTTP/1.1,
//!   constructed explicitly with a runtime handle.
//! - Retry policy, connection pooling, and TLS stay outside this crate.

pub mod delegate;
pub mod error;
pub mod http;
pub mod net;
pub mod transport;

pub use delegate::{ConnectionDelegate, Connector, DelegateTransport, DispatchHandle};
pub use error::TransportError;
pub use http::{Method, Request, Response};
pub use net::HttpConnector;
pub use transport::{validate, Completion, Outcome, Transport};
