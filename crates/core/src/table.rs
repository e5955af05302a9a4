//! The data-table component: a state machine over rows, column
//! definitions, filter text, and sort order, plus the derivation of the
//! rendered row set from that state.
//!
//! The rendered [`TableDocument`] always reflects the current
//! filter + sort + data atomically: every redraw derives the visible set
//! from the full current rows (never incrementally from the previous
//! visible set) and swaps the whole body in one pass.

use std::sync::Arc;

use perfdash_protocol::{BodyRow, ColumnDefinition, HeaderCell, Row, TableDocument, Value};

use crate::format::{self, ConfigurationError, Formatter};

/// A column definition with its format tag resolved to a formatter.
struct ResolvedColumn {
    label: String,
    attribute: String,
    format: Formatter,
}

/// The table widget. Frontends drive it through [`update_elements`],
/// [`set_filter`], and [`set_sorting_order`] / [`cycle_sort`], and draw
/// whatever [`document`] currently holds.
///
/// [`update_elements`]: DataTable::update_elements
/// [`set_filter`]: DataTable::set_filter
/// [`set_sorting_order`]: DataTable::set_sorting_order
/// [`cycle_sort`]: DataTable::cycle_sort
/// [`document`]: DataTable::document
pub struct DataTable {
    columns: Vec<ResolvedColumn>,
    /// Identity of the installed definitions. Replacement is decided by
    /// `Arc` identity, not content equality.
    column_identity: Option<Arc<Vec<ColumnDefinition>>>,
    rows: Option<Vec<Row>>,
    filter_text: String,
    sort_attribute: Option<String>,
    sort_ascending: bool,
    document: TableDocument,
}

impl Default for DataTable {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            column_identity: None,
            rows: None,
            filter_text: String::new(),
            sort_attribute: None,
            sort_ascending: true,
            document: TableDocument::default(),
        }
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new row set and, when the definitions differ by identity
    /// from the installed ones, a new column configuration.
    ///
    /// A definition change discards the whole document and rebuilds the
    /// header skeleton before the body is drawn. An unknown format tag
    /// aborts before any state is touched.
    pub fn update_elements(
        &mut self,
        rows: Vec<Row>,
        columns: &Arc<Vec<ColumnDefinition>>,
    ) -> Result<(), ConfigurationError> {
        let unchanged = self
            .column_identity
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, columns));
        if !unchanged {
            let resolved = resolve_columns(columns)?;
            self.column_identity = Some(Arc::clone(columns));
            self.columns = resolved;
            self.document = TableDocument::default();
            self.rebuild_header();
        }
        self.rows = Some(rows);
        self.redraw_body();
        Ok(())
    }

    /// Store new filter text and redraw the body.
    ///
    /// Filtering is a case-sensitive substring match against the
    /// space-joined *formatted* text of a row, so it matches what the
    /// user sees, not the raw values.
    pub fn set_filter(&mut self, text: &str) {
        self.filter_text = text.to_owned();
        self.redraw_body();
    }

    /// Store a sort attribute and direction and redraw the body.
    pub fn set_sorting_order(&mut self, attribute: &str, ascending: bool) {
        self.sort_attribute = Some(attribute.to_owned());
        self.sort_ascending = ascending;
        self.redraw_body();
    }

    /// Header-activation entry point. The table owns direction state:
    /// activating the current sort attribute flips the direction, any
    /// other attribute starts ascending.
    pub fn cycle_sort(&mut self, attribute: &str) {
        let ascending = match self.sort_attribute.as_deref() {
            Some(current) if current == attribute => !self.sort_ascending,
            _ => true,
        };
        self.set_sorting_order(attribute, ascending);
    }

    /// The current rendered output.
    pub fn document(&self) -> &TableDocument {
        &self.document
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Current sort attribute and direction, if a sort is applied.
    pub fn sort_state(&self) -> Option<(&str, bool)> {
        self.sort_attribute
            .as_deref()
            .map(|attribute| (attribute, self.sort_ascending))
    }

    fn rebuild_header(&mut self) {
        self.document.header = self
            .columns
            .iter()
            .map(|column| HeaderCell {
                label: column.label.clone(),
                attribute: column.attribute.clone(),
            })
            .collect();
    }

    fn redraw_body(&mut self) {
        if self.column_identity.is_none() {
            return;
        }
        let Some(rows) = &self.rows else {
            return;
        };
        let sort = self
            .sort_attribute
            .as_deref()
            .map(|attribute| (attribute, self.sort_ascending));
        self.document.body = derive_body(rows, &self.columns, &self.filter_text, sort);
    }
}

fn resolve_columns(
    definitions: &[ColumnDefinition],
) -> Result<Vec<ResolvedColumn>, ConfigurationError> {
    definitions
        .iter()
        .map(|definition| {
            Ok(ResolvedColumn {
                label: definition.label.clone(),
                attribute: definition.attribute.clone(),
                format: format::lookup(&definition.format)?,
            })
        })
        .collect()
}

/// Derive the visible body: filter first, then a stable sort, always from
/// the full row set.
fn derive_body(
    rows: &[Row],
    columns: &[ResolvedColumn],
    filter: &str,
    sort: Option<(&str, bool)>,
) -> Vec<BodyRow> {
    let mut visible: Vec<&Row> = rows
        .iter()
        .filter(|row| row_text(row, columns).contains(filter))
        .collect();
    if let Some((attribute, ascending)) = sort {
        visible.sort_by(|a, b| {
            let left = a.get(attribute).unwrap_or(&Value::Null);
            let right = b.get(attribute).unwrap_or(&Value::Null);
            let ordering = left.compare(right);
            if ascending { ordering } else { ordering.reverse() }
        });
    }
    visible
        .into_iter()
        .map(|row| render_row(row, columns))
        .collect()
}

fn render_row(row: &Row, columns: &[ResolvedColumn]) -> BodyRow {
    BodyRow {
        cells: columns
            .iter()
            .map(|column| (column.format)(cell_value(row, &column.attribute)))
            .collect(),
    }
}

/// The formatted text a filter is matched against.
fn row_text(row: &Row, columns: &[ResolvedColumn]) -> String {
    columns
        .iter()
        .map(|column| (column.format)(cell_value(row, &column.attribute)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell_value<'a>(row: &'a Row, attribute: &str) -> &'a Value {
    row.get(attribute).unwrap_or(&Value::Null)
}
