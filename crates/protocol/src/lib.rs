pub mod column;
pub mod document;
pub mod value;

pub use column::ColumnDefinition;
pub use document::{BodyRow, HeaderCell, TableDocument};
pub use value::{Row, Value};
