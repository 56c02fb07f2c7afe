//! Model — viewer table entries.

use std::collections::HashMap;

use crate::hash::MessageId;
use crate::severity::Severity;

/// One row of the viewer table.
///
/// Identity is the identifier computed from `message` and `severity`; `tag`
/// rides along for downstream filtering and is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// The format string exactly as written at the call site.
    pub message: String,
    pub severity: Severity,
    /// Tag of the group that owned the call site when it was processed.
    pub tag: String,
}

/// Decoded form of a serialized viewer table.
pub type DecodedTable = HashMap<MessageId, TableEntry>;
