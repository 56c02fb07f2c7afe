//! Group — logging category descriptor.

/// A named logging category as declared by the build.
///
/// Group names are not required to be unique across the call sites observed
/// in one build; only `enabled` and `tag` influence table construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroup {
    pub name: String,
    /// Gate for compaction: when false, no call site of this group enters
    /// the table, regardless of severity.
    pub enabled: bool,
    /// Mirror the group's call sites to the plain-text log sink at runtime.
    /// Has no effect on table membership.
    pub mirror: bool,
    /// Copied verbatim into every entry produced for this group. May be
    /// empty.
    pub tag: String,
}

impl LogGroup {
    /// Enabled, non-mirrored group. Tests and scanners that need other
    /// combinations set the fields directly.
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            mirror: false,
            tag: tag.into(),
        }
    }
}
