use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key/value map of client-supplied record fields.
pub type Fields = Map<String, Value>;

/// A stored customer or product.
///
/// Apart from the two server-assigned fields the record shape is whatever
/// the client posted; no schema is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    // ---
    /// Server-assigned id, unique and strictly increasing per store.
    pub id: u64,

    /// Client-supplied fields, serialized inline.
    #[serde(flatten)]
    pub fields: Fields,

    /// Insertion timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Record {
    // ---
    /// Keys owned by the server; client values under these keys are dropped.
    pub const RESERVED_KEYS: [&'static str; 2] = ["id", "createdAt"];

    pub fn new(id: u64, mut fields: Fields) -> Self {
        // ---
        for key in Self::RESERVED_KEYS {
            fields.remove(key);
        }
        Self {
            id,
            fields,
            created_at: Utc::now(),
        }
    }
}
