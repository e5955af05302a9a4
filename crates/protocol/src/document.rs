use serde::{Deserialize, Serialize};

/// A rendered header cell. `attribute` is the sort key a frontend passes
/// back when the cell is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub label: String,
    pub attribute: String,
}

/// One rendered body row: the formatted cell text in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRow {
    pub cells: Vec<String>,
}

/// The rendered output of a data table.
///
/// The table component emits a `TableDocument`; frontends draw it without
/// touching table state. The header is the skeleton built once per column
/// configuration; the body is replaced wholesale on every redraw, so a
/// document never mixes rows derived from different state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    pub header: Vec<HeaderCell>,
    pub body: Vec<BodyRow>,
}

impl TableDocument {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.body.is_empty()
    }
}
