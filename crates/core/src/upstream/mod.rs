//! Upstream collaborator interfaces and their failure taxonomy.

mod error;
mod http_mapping;
mod traits;

pub use error::{Result, SummaryError, UpstreamError};
pub use http_mapping::{bill_failure_from_status, summary_failure_from_status};
pub use traits::{BillSource, Summarizer};
