//! Parse — strict decoding of a serialized viewer table.
//!
//! Decoding tools trust this table to reconstruct log text, so a corrupt
//! table must fail the decode, never produce wrong text silently. Unknown
//! extra fields inside an entry are the one tolerated deviation, for forward
//! compatibility.

use serde::Deserialize;
use thiserror::Error;

use crate::hash::MessageId;
use crate::severity::Severity;

use super::model::{DecodedTable, TableEntry};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("viewer table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("viewer table root must be a JSON object")]
    NotAnObject,

    #[error("identifier `{0}` is not a decimal 64-bit integer")]
    BadIdentifier(String),

    #[error("entry {id}: {source}")]
    BadEntry {
        id: MessageId,
        #[source]
        source: serde_json::Error,
    },

    #[error("entry {id}: unknown severity `{level}`")]
    UnknownLevel { id: MessageId, level: String },
}

/// Raw wire shape of one entry. `deserialize` rejects a missing or
/// wrong-typed required field and ignores anything extra.
#[derive(Deserialize)]
struct RawEntry {
    message: String,
    level: String,
    tag: String,
}

/// Decode a serialized viewer table back into its identifier-keyed map.
///
/// Exact inverse of the builder's serialization: every identifier present in
/// the built table comes back with all three fields intact. Performs no
/// enablement filtering; that already happened at build time.
pub fn parse_table(input: &str) -> Result<DecodedTable, ParseError> {
    let root: serde_json::Value = serde_json::from_str(input)?;
    let object = match root {
        serde_json::Value::Object(object) => object,
        _ => return Err(ParseError::NotAnObject),
    };

    let mut table = DecodedTable::with_capacity(object.len());
    for (key, value) in object {
        let id: MessageId = key
            .parse()
            .map_err(|_| ParseError::BadIdentifier(key.clone()))?;
        let raw: RawEntry = serde_json::from_value(value)
            .map_err(|source| ParseError::BadEntry { id, source })?;
        let severity = Severity::parse(&raw.level).ok_or_else(|| ParseError::UnknownLevel {
            id,
            level: raw.level.clone(),
        })?;
        table.insert(
            id,
            TableEntry {
                message: raw.message,
                severity,
                tag: raw.tag,
            },
        );
    }
    Ok(table)
}
