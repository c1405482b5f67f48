//! Real network connector built on tokio and hyper.
//!
//! # Design
//! `HttpConnector` is the concrete event primitive behind
//! [`DelegateTransport`](crate::DelegateTransport). It is constructed
//! explicitly with a runtime handle — there is no ambient global client —
//! and each `begin` spawns one task that performs the whole exchange:
//! connect, HTTP/1.1 handshake, send, then stream body frames to the
//! delegate one `data_received` per frame, in arrival order. The delegate
//! always sees a terminal `finished`/`failed` last, on the runtime's
//! context, never on the caller's thread.
//!
//! Only the `http` scheme is handled; TLS termination belongs to the
//! embedding application, not this core.

use std::time::Duration;

use http::Uri;
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

use crate::delegate::{ConnectionDelegate, Connector};
use crate::error::TransportError;
use crate::http::Request;

/// Event-driven HTTP/1.1 connector.
///
/// Cheap to construct; holds only the runtime handle and an optional
/// per-dispatch deadline. One connector may serve any number of
/// concurrent dispatches.
pub struct HttpConnector {
    handle: tokio::runtime::Handle,
    deadline: Option<Duration>,
}

impl HttpConnector {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            deadline: None,
        }
    }

    /// Bound the whole exchange (connect through last body byte). An
    /// elapsed deadline surfaces as [`TransportError::Timeout`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Connector for HttpConnector {
    fn begin(&self, request: Request, mut delegate: Box<dyn ConnectionDelegate>) {
        let deadline = self.deadline;
        self.handle.spawn(async move {
            let result = match deadline {
                Some(limit) => {
                    match tokio::time::timeout(limit, exchange(&request, &mut *delegate)).await {
                        Ok(result) => result,
                        Err(_) => Err(TransportError::Timeout(format!(
                            "deadline {}ms elapsed",
                            limit.as_millis()
                        ))),
                    }
                }
                None => exchange(&request, &mut *delegate).await,
            };
            match result {
                Ok(()) => delegate.finished(),
                Err(error) => delegate.failed(error),
            }
        });
    }
}

/// Run one exchange, reporting the response line and body frames to the
/// delegate. The terminal event is the caller's responsibility.
async fn exchange(
    request: &Request,
    delegate: &mut dyn ConnectionDelegate,
) -> Result<(), TransportError> {
    let uri: Uri = request
        .url
        .parse()
        .map_err(|e| TransportError::InvalidRequest(format!("unparseable URL: {e}")))?;
    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(TransportError::Protocol(format!(
                "unsupported scheme \"{other}\""
            )))
        }
        None => {
            return Err(TransportError::InvalidRequest(
                "URL missing scheme".to_string(),
            ))
        }
    }
    let host = uri
        .host()
        .ok_or_else(|| TransportError::InvalidRequest("URL missing host".to_string()))?
        .to_string();
    let port = uri.port_u16().unwrap_or(80);
    let authority = uri
        .authority()
        .map(|a| a.to_string())
        .unwrap_or_else(|| host.clone());

    let stream = TcpStream::connect((host.as_str(), port))
        .await
        .map_err(|e| TransportError::Network(format!("connect {host}:{port}: {e}")))?;
    debug!(%host, port, "connected");

    let (mut sender, conn) = http1::handshake(TokioIo::new(stream))
        .await
        .map_err(|e| TransportError::Protocol(format!("handshake: {e}")))?;
    // Drive the connection until the exchange is over; errors it observes
    // resurface through send_request / frame below.
    tokio::spawn(async move {
        if let Err(error) = conn.await {
            debug!(%error, "connection task ended");
        }
    });

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    let mut builder = http::Request::builder()
        .method(http::Method::from(request.method))
        .uri(path)
        .header(http::header::HOST, authority);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let body = request.body.clone().unwrap_or_default();
    let wire_request = builder
        .body(Full::new(body))
        .map_err(|e| TransportError::InvalidRequest(format!("request assembly: {e}")))?;

    let response = sender.send_request(wire_request).await.map_err(classify)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    delegate.response_began(status, headers);

    let mut body = response.into_body();
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(classify)?;
        if let Some(data) = frame.data_ref() {
            delegate.data_received(data.clone());
        }
    }
    Ok(())
}

/// Map a hyper error to the transport taxonomy.
fn classify(error: hyper::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_parse() || error.is_incomplete_message() {
        TransportError::Protocol(error.to_string())
    } else if has_io_cause(&error) {
        TransportError::Network(error.to_string())
    } else {
        TransportError::Protocol(error.to_string())
    }
}

fn has_io_cause(error: &hyper::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if cause.is::<std::io::Error>() {
            return true;
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use bytes::Bytes;
    use tokio::sync::oneshot;

    /// Delegate that forwards only the terminal event to a oneshot.
    struct Probe {
        tx: Option<oneshot::Sender<Result<(), TransportError>>>,
    }

    impl ConnectionDelegate for Probe {
        fn response_began(&mut self, _status: u16, _headers: Vec<(String, String)>) {}
        fn data_received(&mut self, _chunk: Bytes) {}
        fn finished(&mut self) {
            if let Some(tx) = self.tx.take() {
                let _ = tx.send(Ok(()));
            }
        }
        fn failed(&mut self, error: TransportError) {
            if let Some(tx) = self.tx.take() {
                let _ = tx.send(Err(error));
            }
        }
    }

    fn probe() -> (Box<Probe>, oneshot::Receiver<Result<(), TransportError>>) {
        let (tx, rx) = oneshot::channel();
        (Box::new(Probe { tx: Some(tx) }), rx)
    }

    #[tokio::test]
    async fn https_scheme_is_a_protocol_error() {
        let connector = HttpConnector::new(tokio::runtime::Handle::current());
        let (delegate, rx) = probe();
        connector.begin(
            Request::new(Method::Get, "https://localhost/secure"),
            delegate,
        );
        let err = rx.await.unwrap().unwrap_err();
        assert!(err.is_protocol());
    }

    #[tokio::test]
    async fn unparseable_url_is_invalid_request() {
        let connector = HttpConnector::new(tokio::runtime::Handle::current());
        let (delegate, rx) = probe();
        connector.begin(Request::new(Method::Get, "http://[not a host/"), delegate);
        let err = rx.await.unwrap().unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[tokio::test]
    async fn url_without_scheme_is_invalid_request() {
        let connector = HttpConnector::new(tokio::runtime::Handle::current());
        let (delegate, rx) = probe();
        connector.begin(Request::new(Method::Get, "localhost/widgets"), delegate);
        let err = rx.await.unwrap().unwrap_err();
        assert!(err.is_invalid_request());
    }
}
