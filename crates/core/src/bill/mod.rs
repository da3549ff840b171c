mod error;
mod fixtures;
mod hash;
mod payload;
mod types;

pub use error::{BillIdError, PayloadError};
pub use fixtures::{sample_bill, sample_payload};
pub use hash::source_hash;
pub use payload::parse_bill_payload;
pub use types::{
    BillId, BillRecord, BillView, GeneratedSummary, SourceHash, Sponsor, SummaryRecord,
    SummaryRequest, VoteTally, MAX_BILL_ID_LEN, MAX_SUMMARY_INPUT_CHARS,
};
