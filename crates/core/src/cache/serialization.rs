//! JSON encoding of cached records for byte-oriented backends.

use crate::bill::{BillRecord, SummaryRecord};

use super::CacheError;

/// Serializes a bill record to JSON.
pub fn serialize_bill(bill: &BillRecord) -> Result<String, CacheError> {
    serde_json::to_string(bill).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes a bill record from JSON.
pub fn deserialize_bill(json: &str) -> Result<BillRecord, CacheError> {
    serde_json::from_str(json).map_err(|e| CacheError::Serialization(e.to_string()))
}

pub fn serialize_summary(summary: &SummaryRecord) -> Result<String, CacheError> {
    serde_json::to_string(summary).map_err(|e| CacheError::Serialization(e.to_string()))
}

pub fn deserialize_summary(json: &str) -> Result<SummaryRecord, CacheError> {
    serde_json::from_str(json).map_err(|e| CacheError::Serialization(e.to_string()))
}
