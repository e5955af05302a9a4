//! End-to-end controller/table flow against a fake HTTP client: one
//! trigger issues one request, valid responses render, invalid ones leave
//! the previous render standing, and overlapping requests resolve
//! last-delivered-wins.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use perfdash_core::transport::{HttpClient, RequestHandle, ResponseCallback};
use perfdash_core::{DataTable, SummaryController, TransportResponse};
use perfdash_protocol::ColumnDefinition;

/// Fake client that answers each `send` immediately with the next
/// prepared response.
#[derive(Default)]
struct FakeHttpClient {
    responses: RefCell<VecDeque<TransportResponse>>,
    requested_targets: RefCell<Vec<String>>,
}

impl FakeHttpClient {
    fn prepare_response(&self, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .push_back(TransportResponse::new(status, body));
    }
}

struct FakeRequest {
    client: Rc<FakeHttpClient>,
    target: String,
    callback: Option<ResponseCallback>,
}

/// Newtype so the foreign `HttpClient` trait can be implemented for a
/// shared `FakeHttpClient` without tripping the orphan rules.
struct SharedFakeClient(Rc<FakeHttpClient>);

impl HttpClient for SharedFakeClient {
    fn request(&self, target: &str) -> Box<dyn RequestHandle> {
        Box::new(FakeRequest {
            client: Rc::clone(&self.0),
            target: target.to_owned(),
            callback: None,
        })
    }
}

impl RequestHandle for FakeRequest {
    fn on_response(&mut self, callback: ResponseCallback) {
        self.callback = Some(callback);
    }

    fn send(mut self: Box<Self>) {
        self.client
            .requested_targets
            .borrow_mut()
            .push(self.target.clone());
        let response = self
            .client
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| TransportResponse::new(200, r#"{"measurements": []}"#));
        if let Some(callback) = self.callback.take() {
            callback(response);
        }
    }
}

fn summary_columns() -> Arc<Vec<ColumnDefinition>> {
    Arc::new(vec![
        ColumnDefinition::new("Method", "method", "string"),
        ColumnDefinition::new("Name", "name", "string"),
        ColumnDefinition::new("Avg. response time", "avgElapsed", "time"),
    ])
}

#[test]
fn one_trigger_issues_one_request_and_renders_the_rows() {
    let client = Rc::new(FakeHttpClient::default());
    client.prepare_response(
        200,
        r#"{"measurements": [
            {"method": "GET", "name": "index", "avgElapsed": 0.004},
            {"method": "POST", "name": "login", "avgElapsed": 0.12}
        ]}"#,
    );

    let table = Rc::new(RefCell::new(DataTable::new()));
    let controller = SummaryController::new(
        Rc::clone(&table),
        Rc::new(SharedFakeClient(Rc::clone(&client))),
        "http://profiler.test/api/measurements/summary",
        summary_columns(),
    );

    controller.request_remote_data();

    assert_eq!(
        *client.requested_targets.borrow(),
        ["http://profiler.test/api/measurements/summary"]
    );

    let table = table.borrow();
    let labels: Vec<&str> = table
        .document()
        .header
        .iter()
        .map(|cell| cell.label.as_str())
        .collect();
    assert_eq!(labels, ["Method", "Name", "Avg. response time"]);
    assert_eq!(table.document().body.len(), 2);
    assert_eq!(table.document().body[0].cells, ["GET", "index", "4.000 ms"]);
    assert_eq!(table.document().body[1].cells, ["POST", "login", "120.000 ms"]);
}

#[test]
fn failed_responses_keep_the_previous_render() {
    let client = Rc::new(FakeHttpClient::default());
    client.prepare_response(200, r#"{"measurements": [{"method": "GET", "name": "index"}]}"#);
    client.prepare_response(500, r#"{"measurements": []}"#);
    client.prepare_response(200, r#"{"measurements": 3}"#);

    let table = Rc::new(RefCell::new(DataTable::new()));
    let controller = SummaryController::new(
        Rc::clone(&table),
        Rc::new(SharedFakeClient(Rc::clone(&client))),
        "http://profiler.test/api/measurements/summary",
        summary_columns(),
    );

    controller.request_remote_data();
    assert_eq!(table.borrow().document().body.len(), 1);

    // Server error, then schema-invalid body: both dropped.
    controller.request_remote_data();
    assert_eq!(table.borrow().document().body.len(), 1);
    controller.request_remote_data();
    assert_eq!(table.borrow().document().body.len(), 1);
}

/// Fake client that parks every sent request until the test delivers a
/// response to it, so completion order can differ from send order.
#[derive(Default)]
struct DeferredHttpClient {
    parked: RefCell<Vec<Option<ResponseCallback>>>,
}

impl DeferredHttpClient {
    fn deliver(&self, index: usize, response: TransportResponse) {
        let callback = self.parked.borrow_mut()[index]
            .take()
            .expect("response already delivered");
        callback(response);
    }
}

struct DeferredRequest {
    client: Rc<DeferredHttpClient>,
    callback: Option<ResponseCallback>,
}

/// Newtype counterpart of `SharedFakeClient` for the deferred client.
struct SharedDeferredClient(Rc<DeferredHttpClient>);

impl HttpClient for SharedDeferredClient {
    fn request(&self, _target: &str) -> Box<dyn RequestHandle> {
        Box::new(DeferredRequest {
            client: Rc::clone(&self.0),
            callback: None,
        })
    }
}

impl RequestHandle for DeferredRequest {
    fn on_response(&mut self, callback: ResponseCallback) {
        self.callback = Some(callback);
    }

    fn send(mut self: Box<Self>) {
        self.client.parked.borrow_mut().push(self.callback.take());
    }
}

#[test]
fn overlapping_requests_resolve_last_delivered_wins() {
    let client = Rc::new(DeferredHttpClient::default());
    let table = Rc::new(RefCell::new(DataTable::new()));
    let controller = SummaryController::new(
        Rc::clone(&table),
        Rc::new(SharedDeferredClient(Rc::clone(&client))),
        "http://profiler.test/api/measurements/summary",
        summary_columns(),
    );

    controller.request_remote_data();
    controller.request_remote_data();
    assert_eq!(client.parked.borrow().len(), 2);

    // The second-sent request completes first; the first-sent one
    // completes last and wins the visible state.
    client.deliver(
        1,
        TransportResponse::new(200, r#"{"measurements": [{"name": "second"}]}"#),
    );
    assert_eq!(table.borrow().document().body[0].cells[1], "second");

    client.deliver(
        0,
        TransportResponse::new(
            200,
            r#"{"measurements": [{"name": "first-a"}, {"name": "first-b"}]}"#,
        ),
    );
    let table = table.borrow();
    assert_eq!(table.document().body.len(), 2);
    assert_eq!(table.document().body[0].cells[1], "first-a");
}
