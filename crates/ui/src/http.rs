//! The real HTTP client behind the transport contract.
//!
//! `send` spawns a worker thread for the blocking GET; the worker only
//! fills a completion slot (and pokes the repaint waker). Callbacks run on
//! whichever thread calls [`UiHttpClient::pump`] — the UI thread — so all
//! table mutation stays single-threaded. Workers stamp each completion
//! with a shared monotonic sequence, so a single `pump` that finds several
//! finished exchanges delivers them in completion order, not send order,
//! and the last-completed response wins the visible state.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use perfdash_core::transport::{HttpClient, RequestHandle, ResponseCallback, TransportResponse};

/// What a worker leaves in the slot: the response plus its completion
/// stamp.
struct Completed {
    sequence: u64,
    response: TransportResponse,
}

type Slot = Arc<Mutex<Option<Completed>>>;
type Waker = Arc<dyn Fn() + Send + Sync>;

struct InFlight {
    slot: Slot,
    callback: Option<ResponseCallback>,
}

#[derive(Clone)]
pub struct UiHttpClient {
    pending: Rc<RefCell<Vec<InFlight>>>,
    sequence: Arc<AtomicU64>,
    waker: Option<Waker>,
}

impl UiHttpClient {
    /// `waker` is poked from the worker thread whenever a response lands,
    /// so the frontend can schedule a repaint.
    pub fn with_waker(waker: Waker) -> Self {
        Self {
            pending: Rc::new(RefCell::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(0)),
            waker: Some(waker),
        }
    }

    /// Deliver completed exchanges to their callbacks, in completion
    /// order. Returns the number of callbacks invoked.
    pub fn pump(&self) -> usize {
        let mut ready = Vec::new();
        {
            let mut pending = self.pending.borrow_mut();
            let mut index = 0;
            while index < pending.len() {
                let done = pending[index]
                    .slot
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .is_some();
                if done {
                    ready.push(pending.remove(index));
                } else {
                    index += 1;
                }
            }
        }
        // The pending borrow is released here: callbacks may issue new
        // requests through this same client.
        let mut completed = Vec::new();
        for mut entry in ready {
            let taken = entry
                .slot
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            if let (Some(callback), Some(done)) = (entry.callback.take(), taken) {
                completed.push((done.sequence, callback, done.response));
            }
        }
        completed.sort_by_key(|(sequence, _, _)| *sequence);
        let delivered = completed.len();
        for (_, callback, response) in completed {
            callback(response);
        }
        delivered
    }

    /// Exchanges started but not yet delivered.
    pub fn in_flight(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl HttpClient for UiHttpClient {
    fn request(&self, target: &str) -> Box<dyn RequestHandle> {
        Box::new(UiRequest {
            client: self.clone(),
            target: target.to_owned(),
            callback: None,
        })
    }
}

struct UiRequest {
    client: UiHttpClient,
    target: String,
    callback: Option<ResponseCallback>,
}

impl RequestHandle for UiRequest {
    fn on_response(&mut self, callback: ResponseCallback) {
        self.callback = Some(callback);
    }

    fn send(mut self: Box<Self>) {
        let slot: Slot = Arc::new(Mutex::new(None));
        self.client.pending.borrow_mut().push(InFlight {
            slot: Arc::clone(&slot),
            callback: self.callback.take(),
        });
        let sequence = Arc::clone(&self.client.sequence);
        let waker = self.client.waker.clone();
        let target = self.target;
        thread::spawn(move || {
            let response = fetch(&target);
            let stamp = sequence.fetch_add(1, Ordering::SeqCst);
            *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Completed {
                sequence: stamp,
                response,
            });
            if let Some(waker) = waker {
                waker();
            }
        });
    }
}

/// Perform the blocking GET. A connection-level failure (no HTTP response
/// at all) maps to status 0 with an empty body, per the transport
/// contract.
fn fetch(target: &str) -> TransportResponse {
    match reqwest::blocking::get(target) {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            log::debug!("GET {target} -> {status}");
            TransportResponse { status, body }
        }
        Err(err) => {
            log::warn!("GET {target} failed: {err}");
            TransportResponse::new(0, "")
        }
    }
}
