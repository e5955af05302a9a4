//! The transport contract the controller speaks.
//!
//! A client hands out one [`RequestHandle`] per exchange. The caller
//! registers a single completion callback, then starts the exchange; the
//! callback fires exactly once when the exchange completes, whatever the
//! HTTP status. Retries and timeouts are outside this contract —
//! implementations may add them without changing it.

/// A completed HTTP exchange.
///
/// `status` is the HTTP status code, or `0` when no response was received
/// at all (connection failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The single completion callback of a request.
pub type ResponseCallback = Box<dyn FnOnce(TransportResponse)>;

/// One in-flight exchange.
pub trait RequestHandle {
    /// Register the completion callback. Must be called before [`send`]
    /// for the callback to be guaranteed delivery.
    ///
    /// [`send`]: RequestHandle::send
    fn on_response(&mut self, callback: ResponseCallback);

    /// Start the exchange. Consumes the handle; delivery happens through
    /// the registered callback.
    fn send(self: Box<Self>);
}

/// Issues GET requests against absolute targets.
pub trait HttpClient {
    fn request(&self, target: &str) -> Box<dyn RequestHandle>;
}
