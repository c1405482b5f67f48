//! Plain-data HTTP request and response types.
//!
//! # Design
//! These types describe HTTP exchanges as owned data. A `Request` is built
//! by the resource-mapping layer above this crate and is never mutated by
//! the transport; a `Response` is assembled by the transport from delegate
//! events and handed to the caller whole. Bodies are `bytes::Bytes` so the
//! accumulated buffer transfers to the caller without copying.

use bytes::Bytes;

/// HTTP method for a request.
///
/// The variants cover the verbs a resource-oriented client issues. Use
/// [`Method::as_str`] or the `http::Method` conversion when handing the
/// request to a real network stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Head => http::Method::HEAD,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }
}

/// An HTTP request described as plain data.
///
/// Supplied fully formed by the caller before dispatch. The transport
/// validates the target URL but never rewrites any field.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl Request {
    /// A bodiless request for `url` with no extra headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Builder-style header addition.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Builder-style body attachment.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A complete HTTP response.
///
/// Assembled by the transport once the underlying exchange finishes. A
/// 4xx/5xx status is still a `Response`; interpreting status codes is the
/// resource-mapping layer's job.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    /// Lossy UTF-8 view of the body, for logging and assertions.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_as_str_matches_wire_form() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn method_converts_to_http_method() {
        assert_eq!(http::Method::from(Method::Put), http::Method::PUT);
        assert_eq!(http::Method::from(Method::Head), http::Method::HEAD);
    }

    #[test]
    fn request_builder_accumulates_headers_and_body() {
        let req = Request::new(Method::Post, "http://localhost/widgets")
            .header("content-type", "application/json")
            .body(&b"{\"name\":\"bolt\"}"[..]);
        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(req.body.as_deref(), Some(&b"{\"name\":\"bolt\"}"[..]));
    }

    #[test]
    fn response_text_is_lossy_utf8() {
        let resp = Response {
            status: 200,
            headers: Vec::new(),
            body: Bytes::from_static(b"hello"),
        };
        assert_eq!(resp.text(), "hello");
    }

    #[test]
    fn response_header_lookup_is_case_insensitive() {
        let resp = Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: Bytes::new(),
        };
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.header("x-missing"), None);
    }
}
