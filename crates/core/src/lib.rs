pub mod controller;
pub mod format;
pub mod table;
pub mod transport;

pub use controller::{SummaryController, SummaryError, UpdateOutcome};
pub use format::ConfigurationError;
pub use table::DataTable;
pub use transport::{HttpClient, RequestHandle, TransportResponse};
