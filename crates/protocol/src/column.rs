use serde::{Deserialize, Serialize};

/// Configuration for one table column.
///
/// `attribute` is the key used to read a value out of a row; `format` is a
/// format-kind tag (`string`, `number`, `time`, `datetime`) resolved to a
/// formatter function at configuration time, not at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub label: String,
    pub attribute: String,
    pub format: String,
}

impl ColumnDefinition {
    pub fn new(label: &str, attribute: &str, format: &str) -> Self {
        Self {
            label: label.to_owned(),
            attribute: attribute.to_owned(),
            format: format.to_owned(),
        }
    }
}
