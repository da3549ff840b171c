//! Cache Store interface and invalidation primitives.

mod error;
mod invalidation;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use invalidation::{InvalidationReport, InvalidationRequest, InvalidationScope};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_bill, deserialize_summary, serialize_bill, serialize_summary};
pub use traits::{BillStore, StoreSnapshot};
