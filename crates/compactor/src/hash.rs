//! Hash — stable message identifiers.
//!
//! The identifier is the only thing a compacted binary logs at runtime, so
//! it must be reproducible across builds, platforms, and toolchains: a
//! table generated next year still has to decode identifiers shipped today.

use sha2::{Digest, Sha256};

use crate::severity::Severity;

/// Stable identifier of a (message template, severity) pair.
pub type MessageId = u64;

/// Map a (message template, severity) pair to its identifier.
///
/// The digest input is `message ++ 0x00 ++ wire name`; severity names never
/// contain NUL, so the framing is unambiguous. The identifier is the
/// big-endian u64 of the first 8 digest bytes.
pub fn message_id(message: &str, severity: Severity) -> MessageId {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.update([0u8]);
    hasher.update(severity.as_str().as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}
