//! Content fingerprinting for upstream bill payloads.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::SourceHash;

/// Computes the source hash of a raw upstream payload.
///
/// The whole payload is hashed as serialized by `serde_json`. With the default
/// `BTreeMap`-backed maps keys come out sorted, so key order in the response
/// does not matter; if `serde_json/preserve_order` is enabled anywhere in the
/// build, the hash follows the key order the API used.
///
/// # Examples
///
/// ```
/// use billwatch_core::bill::source_hash;
/// use serde_json::json;
///
/// let a = source_hash(&json!({"id": "1", "title": "A"}));
/// assert_eq!(a, source_hash(&json!({"id": "1", "title": "A"})));
///
/// let c = source_hash(&json!({"id": "1", "title": "B"}));
/// assert_ne!(a, c);
/// ```
pub fn source_hash(payload: &Value) -> SourceHash {
    let digest = Sha256::digest(payload.to_string().as_bytes());
    SourceHash::from_hex(hex::encode(digest))
}
