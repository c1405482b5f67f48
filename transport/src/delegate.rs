//! Delegate-driven transport: converts discrete connection events into a
//! single completion delivery.
//!
//! # Design
//! The underlying network primitive reports progress as separate events
//! (response line arrived, a chunk of body arrived, transfer finished,
//! transfer failed). [`PendingDispatch`] is the state machine that sits
//! between that event stream and the caller's single completion closure:
//! it buffers partial results across events and delivers exactly one
//! [`Outcome`] when a terminal event arrives.
//!
//! Exactly-once delivery is enforced structurally: the completion lives in
//! an `Option` behind a mutex, and delivery `take`s it. A second terminal
//! event, or a `cancel` racing a terminal event, finds the slot empty and
//! becomes a no-op. Each dispatch owns its accumulator buffer exclusively,
//! so concurrent dispatches never contend.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::http::{Request, Response};
use crate::transport::{validate, Completion, Outcome, Transport};

/// Receiver of connection events for one in-flight request.
///
/// Event order for a well-behaved connector: `response_began` once, then
/// zero or more `data_received` in byte-arrival order, then exactly one of
/// `finished` / `failed`. Implementations must tolerate events after a
/// terminal one by ignoring them.
pub trait ConnectionDelegate: Send {
    fn response_began(&mut self, status: u16, headers: Vec<(String, String)>);
    fn data_received(&mut self, chunk: Bytes);
    fn finished(&mut self);
    fn failed(&mut self, error: TransportError);
}

/// The underlying event-driven network primitive.
///
/// `begin` must not block: it starts the exchange and reports everything
/// that happens afterwards through the delegate, ending with `finished`
/// or `failed`.
pub trait Connector: Send + Sync {
    fn begin(&self, request: Request, delegate: Box<dyn ConnectionDelegate>);
}

impl<C: Connector + ?Sized> Connector for Arc<C> {
    fn begin(&self, request: Request, delegate: Box<dyn ConnectionDelegate>) {
        (**self).begin(request, delegate)
    }
}

type CompletionSlot = Arc<Mutex<Option<Completion>>>;

/// Cancels an in-flight dispatch.
///
/// `cancel` delivers [`TransportError::Cancelled`] through the completion
/// if the dispatch has not completed yet; afterwards any events still
/// arriving from the connector are dropped. Cancelling a finished
/// dispatch does nothing. Dropping the handle does not cancel.
pub struct DispatchHandle {
    slot: CompletionSlot,
}

impl DispatchHandle {
    pub fn cancel(&self) {
        if let Some(completion) = self.slot.lock().take() {
            debug!("dispatch cancelled");
            completion(Err(TransportError::Cancelled));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InFlight,
    Completed,
    Failed,
}

/// Per-dispatch state: accumulates response parts until a terminal event.
struct PendingDispatch {
    state: State,
    status: Option<u16>,
    headers: Vec<(String, String)>,
    body: BytesMut,
    slot: CompletionSlot,
}

impl PendingDispatch {
    fn new(slot: CompletionSlot) -> Self {
        Self {
            state: State::InFlight,
            status: None,
            headers: Vec::new(),
            body: BytesMut::new(),
            slot,
        }
    }

    fn deliver(&mut self, terminal: State, outcome: Outcome) {
        self.state = terminal;
        if let Some(completion) = self.slot.lock().take() {
            completion(outcome);
        }
    }
}

impl ConnectionDelegate for PendingDispatch {
    fn response_began(&mut self, status: u16, headers: Vec<(String, String)>) {
        if self.state != State::InFlight {
            return;
        }
        self.status = Some(status);
        self.headers = headers;
    }

    fn data_received(&mut self, chunk: Bytes) {
        if self.state != State::InFlight {
            return;
        }
        self.body.extend_from_slice(&chunk);
    }

    fn finished(&mut self) {
        if self.state != State::InFlight {
            return;
        }
        match self.status.take() {
            Some(status) => {
                debug!(status, bytes = self.body.len(), "dispatch completed");
                let response = Response {
                    status,
                    headers: std::mem::take(&mut self.headers),
                    body: self.body.split().freeze(),
                };
                self.deliver(State::Completed, Ok(response));
            }
            // A connector that finishes without ever reporting a response
            // broke the event contract.
            None => self.deliver(
                State::Failed,
                Err(TransportError::Protocol(
                    "transfer finished before any response arrived".to_string(),
                )),
            ),
        }
    }

    fn failed(&mut self, error: TransportError) {
        if self.state != State::InFlight {
            return;
        }
        warn!(%error, "dispatch failed");
        self.deliver(State::Failed, Err(error));
    }
}

/// [`Transport`] implementation over any [`Connector`].
///
/// Owns the connector it was constructed with; tearing the transport down
/// tears the connector down with it.
pub struct DelegateTransport<C> {
    connector: C,
}

impl<C: Connector> DelegateTransport<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Dispatch with a handle that can cancel the exchange.
    ///
    /// Identical to [`Transport::dispatch`] otherwise; the completion
    /// still fires exactly once whether or not `cancel` is called.
    pub fn dispatch_cancellable(&self, request: Request, completion: Completion) -> DispatchHandle {
        let slot: CompletionSlot = Arc::new(Mutex::new(Some(completion)));
        let handle = DispatchHandle { slot: slot.clone() };

        if let Err(error) = validate(&request) {
            warn!(%error, "rejecting malformed request");
            if let Some(completion) = slot.lock().take() {
                completion(Err(error));
            }
            return handle;
        }

        debug!(method = request.method.as_str(), url = %request.url, "dispatching");
        self.connector
            .begin(request, Box::new(PendingDispatch::new(slot)));
        handle
    }
}

impl<C: Connector> Transport for DelegateTransport<C> {
    fn dispatch(&self, request: Request, completion: Completion) {
        let _ = self.dispatch_cancellable(request, completion);
    }
}
