//! The transport contract: dispatch a request, receive one outcome.
//!
//! # Design
//! `Transport` is the single seam between the resource-mapping layer and
//! whatever mechanism moves bytes. Callers hand over a [`Request`] and a
//! completion closure; the transport returns immediately and invokes the
//! closure later, exactly once, with the [`Outcome`]. All failures travel
//! through that same closure — a dispatch never panics across this
//! boundary and never leaves the caller waiting forever.

use crate::error::TransportError;
use crate::http::{Request, Response};

/// Terminal result of one dispatch: a complete response, or a classified
/// transport failure. Delivered exactly once per dispatch.
pub type Outcome = Result<Response, TransportError>;

/// Caller-supplied continuation receiving the [`Outcome`].
///
/// Invoked on the transport's execution context, not the dispatching
/// thread; closures that touch shared state must be `Send` and handle the
/// context switch themselves.
pub type Completion = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// Uniform asynchronous request submission.
///
/// Implementations must uphold:
/// - `dispatch` returns without blocking on network I/O;
/// - the completion is invoked exactly once, eventually;
/// - a malformed request ([`validate`] fails) is reported through the
///   completion with [`TransportError::InvalidRequest`] before any I/O is
///   attempted;
/// - 4xx/5xx statuses are delivered as `Ok(Response)`, never as errors.
///
/// The resource-mapping layer depends only on this trait, so concrete
/// transports are substitutable, including scripted ones in tests.
pub trait Transport: Send + Sync {
    fn dispatch(&self, request: Request, completion: Completion);
}

/// Check a request before any asynchronous work starts.
///
/// Only structural problems visible without touching the network are
/// caught here; URL parse errors requiring scheme/host resolution surface
/// later through the failure path.
pub fn validate(request: &Request) -> Result<(), TransportError> {
    if request.url.is_empty() {
        return Err(TransportError::InvalidRequest(
            "empty target URL".to_string(),
        ));
    }
    Ok(())
}
