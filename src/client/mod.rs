//! Dashboard side: upload, filter, chart, table and CSV export.
//!
//! Everything here except [`AnalyzerClient::analyze`] is pure and synchronous.

pub mod charts;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod upload;

pub use dashboard::Dashboard;
pub use export::{to_csv, EXPORT_FILE_NAME};
pub use filter::filter_reviews;
pub use upload::{AnalyzerClient, ClientError, UploadFile};
