//! The summary controller: one request/response cycle per call, feeding
//! validated measurements into a data table.
//!
//! Error policy favors availability over visibility: a failed or invalid
//! response never disturbs the previously rendered table and is never
//! surfaced to the user — the log is the only witness. Overlapping
//! `request_remote_data` calls are not cancelled or coordinated; their
//! callbacks fire in completion order and the last one delivered wins the
//! visible table state. That race is part of the original design and is
//! kept deliberately.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use perfdash_protocol::{ColumnDefinition, Row, Value};
use thiserror::Error;

use crate::format::ConfigurationError;
use crate::table::DataTable;
use crate::transport::{HttpClient, RequestHandle, TransportResponse};

#[derive(Debug, Error)]
pub enum SummaryError {
    /// The response body was not valid JSON. Fatal to the call that saw
    /// it, not to the controller.
    #[error("malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    /// A column definition names an unknown format kind.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// What a valid call to [`SummaryController::update_summary_data`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The table was updated from the response.
    Updated,
    /// The response was dropped (non-200 status or invalid schema); the
    /// previous render stands.
    Ignored,
}

pub struct SummaryController {
    table: Rc<RefCell<DataTable>>,
    client: Rc<dyn HttpClient>,
    request_target: String,
    columns: Arc<Vec<ColumnDefinition>>,
}

impl SummaryController {
    pub fn new(
        table: Rc<RefCell<DataTable>>,
        client: Rc<dyn HttpClient>,
        request_target: impl Into<String>,
        columns: Arc<Vec<ColumnDefinition>>,
    ) -> Self {
        Self {
            table,
            client,
            request_target: request_target.into(),
            columns,
        }
    }

    /// Issue one GET to the configured target and apply the response to
    /// the bound table when it arrives.
    pub fn request_remote_data(&self) {
        log::debug!("requesting {}", self.request_target);
        let mut request = self.client.request(&self.request_target);
        let table = Rc::clone(&self.table);
        let columns = Arc::clone(&self.columns);
        let target = self.request_target.clone();
        request.on_response(Box::new(move |response| {
            match apply_response(&table, &columns, &response) {
                Ok(UpdateOutcome::Updated) => {}
                Ok(UpdateOutcome::Ignored) => {
                    log::debug!("{target}: dropped response with status {}", response.status);
                }
                Err(err) => log::error!("{target}: {err}"),
            }
        }));
        request.send();
    }

    /// Apply one response to the bound table.
    ///
    /// Non-200 statuses and bodies without an array `measurements` field
    /// are dropped without touching the table. An unparsable body is an
    /// error of this call only.
    pub fn update_summary_data(
        &self,
        response: &TransportResponse,
    ) -> Result<UpdateOutcome, SummaryError> {
        apply_response(&self.table, &self.columns, response)
    }
}

fn apply_response(
    table: &Rc<RefCell<DataTable>>,
    columns: &Arc<Vec<ColumnDefinition>>,
    response: &TransportResponse,
) -> Result<UpdateOutcome, SummaryError> {
    if response.status != 200 {
        return Ok(UpdateOutcome::Ignored);
    }
    let json: serde_json::Value = serde_json::from_str(&response.body)?;
    let Some(measurements) = json.get("measurements").and_then(|m| m.as_array()) else {
        return Ok(UpdateOutcome::Ignored);
    };
    let rows: Vec<Row> = measurements.iter().map(row_from_json).collect();
    table.borrow_mut().update_elements(rows, columns)?;
    Ok(UpdateOutcome::Updated)
}

fn row_from_json(measurement: &serde_json::Value) -> Row {
    match measurement.as_object() {
        Some(object) => object
            .iter()
            .map(|(attribute, value)| (attribute.clone(), value_from_json(value)))
            .collect(),
        // A non-object measurement has no attributes to read; it renders
        // as an all-empty row rather than poisoning the whole response.
        None => Row::new(),
    }
}

fn value_from_json(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Num(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::Str(s.clone()),
        // Nested structures are flattened to their JSON text so they still
        // format, filter, and sort as text.
        nested => Value::Str(nested.to_string()),
    }
}
