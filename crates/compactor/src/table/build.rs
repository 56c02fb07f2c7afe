//! Build — call-site accumulation and viewer table serialization.
//!
//! The builder never touches AST machinery: an external scanner walks each
//! compilation unit and reports call sites through [`CallSiteSink`]. The
//! builder filters by group enablement, keys entries by their stable
//! identifier, and renders the accumulated table on demand.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::group::LogGroup;
use crate::hash::{message_id, MessageId};
use crate::severity::Severity;

use super::model::TableEntry;

/// Location of one logging call site. Opaque to table construction; carried
/// for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Compilation unit the call site was discovered in.
    pub unit: &'a str,
    pub line: u32,
}

/// Receiver half of the call-site discovery contract.
pub trait CallSiteSink {
    /// Invoked by the scanner once per discovered call site, synchronously,
    /// in discovery order within a unit.
    fn call_discovered(
        &mut self,
        site: CallSite<'_>,
        message: &str,
        severity: Severity,
        group: &LogGroup,
    );
}

/// Driver half of the discovery contract: walks one compilation unit and
/// reports every logging call site to the sink. Parsing mechanics and the
/// unit representation stay on this side of the seam.
pub trait SourceScanner {
    type Unit;

    fn scan(&mut self, unit: &Self::Unit, sink: &mut dyn CallSiteSink);
}

/// Accumulates discovered call sites into the identifier-keyed viewer table.
///
/// State only grows between [`build`](Self::build) calls; discarding the
/// builder is the only teardown.
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: BTreeMap<MessageId, TableEntry>,
    collisions: u64,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one compilation unit: hand this builder to the scanner as the
    /// discovery sink.
    pub fn process_source<S: SourceScanner>(&mut self, scanner: &mut S, unit: &S::Unit) {
        scanner.scan(unit, self);
    }

    /// Number of distinct identifiers accumulated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifier collisions observed between distinct (message, severity)
    /// pairs. Diagnostic only; the table keeps the last write.
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Render the accumulated table as the serialized artifact.
    ///
    /// Snapshot semantics: accumulated state is kept, so call sites
    /// processed afterwards land in a later `build()`. Keys are emitted in
    /// sorted order, making identical input produce byte-identical output.
    pub fn build(&self) -> String {
        let mut root = Map::new();
        for (id, entry) in &self.entries {
            root.insert(
                id.to_string(),
                json!({
                    "message": entry.message,
                    "level": entry.severity.as_str(),
                    "tag": entry.tag,
                }),
            );
        }
        format!("{:#}", Value::Object(root))
    }

    /// Insert/overwrite step shared by every discovery. Last write wins for
    /// a given identifier; a genuine collision (different pair, same
    /// identifier) only bumps the diagnostic counter.
    fn record(&mut self, id: MessageId, entry: TableEntry, site: CallSite<'_>) {
        match self.entries.get(&id) {
            Some(prev) if prev.message != entry.message || prev.severity != entry.severity => {
                self.collisions += 1;
                tracing::warn!(
                    id = id,
                    unit = site.unit,
                    line = site.line,
                    evicted = %prev.message,
                    kept = %entry.message,
                    "identifier collision, keeping the later entry"
                );
            }
            Some(_) => {}
            None => {
                tracing::debug!(
                    id = id,
                    level = %entry.severity,
                    tag = %entry.tag,
                    unit = site.unit,
                    line = site.line,
                    "new table entry"
                );
            }
        }
        self.entries.insert(id, entry);
    }
}

impl CallSiteSink for TableBuilder {
    fn call_discovered(
        &mut self,
        site: CallSite<'_>,
        message: &str,
        severity: Severity,
        group: &LogGroup,
    ) {
        if !group.enabled {
            tracing::trace!(
                group = %group.name,
                unit = site.unit,
                line = site.line,
                "call site skipped, group disabled"
            );
            return;
        }
        let id = message_id(message, severity);
        let entry = TableEntry {
            message: message.to_string(),
            severity,
            tag: group.tag.clone(),
        };
        self.record(id, entry, site);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> CallSite<'static> {
        CallSite { unit: "src/service.rs", line: 42 }
    }

    fn feed(builder: &mut TableBuilder, message: &str, severity: Severity, group: &LogGroup) {
        builder.call_discovered(site(), message, severity, group);
    }

    /// Scanner over an in-memory unit, standing in for the real AST walker.
    struct VecScanner;

    struct Unit {
        path: &'static str,
        sites: Vec<(&'static str, Severity, LogGroup)>,
    }

    impl SourceScanner for VecScanner {
        type Unit = Unit;

        fn scan(&mut self, unit: &Unit, sink: &mut dyn CallSiteSink) {
            for (line, (message, severity, group)) in unit.sites.iter().enumerate() {
                let site = CallSite { unit: unit.path, line: line as u32 + 1 };
                sink.call_discovered(site, message, *severity, group);
            }
        }
    }

    // ── Accumulation ─────────────────────────────────────────────

    #[test]
    fn process_source_accumulates_discovered_sites() {
        let mut builder = TableBuilder::new();
        let unit = Unit {
            path: "src/window.rs",
            sites: vec![
                ("test1", Severity::Info, LogGroup::new("TEST_GROUP", "WM_TEST")),
                ("test2", Severity::Debug, LogGroup::new("DEBUG_GROUP", "WM_DEBUG")),
                ("test3", Severity::Error, LogGroup::new("DEBUG_GROUP", "WM_DEBUG")),
            ],
        };
        builder.process_source(&mut VecScanner, &unit);
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.collisions(), 0);
    }

    #[test]
    fn repeated_triple_produces_one_entry() {
        let mut builder = TableBuilder::new();
        let group = LogGroup::new("TEST_GROUP", "WM_TEST");
        for _ in 0..3 {
            feed(&mut builder, "retrying connection", Severity::Warn, &group);
        }
        assert_eq!(builder.len(), 1);
        // Same-pair re-observation is deduplication, not a collision.
        assert_eq!(builder.collisions(), 0);
    }

    #[test]
    fn same_message_at_two_severities_is_two_entries() {
        let mut builder = TableBuilder::new();
        let group = LogGroup::new("TEST_GROUP", "WM_TEST");
        feed(&mut builder, "shutting down", Severity::Info, &group);
        feed(&mut builder, "shutting down", Severity::Warn, &group);
        assert_eq!(builder.len(), 2);
    }

    // ── Group gating ─────────────────────────────────────────────

    #[test]
    fn disabled_group_is_excluded() {
        let mut builder = TableBuilder::new();
        let mut group = LogGroup::new("QUIET", "WM_QUIET");
        group.enabled = false;
        feed(&mut builder, "never compacted", Severity::Error, &group);
        assert!(builder.is_empty());
    }

    #[test]
    fn disabled_group_is_excluded_even_with_mirror_set() {
        let mut builder = TableBuilder::new();
        let mut group = LogGroup::new("QUIET", "WM_QUIET");
        group.enabled = false;
        group.mirror = true;
        feed(&mut builder, "never compacted", Severity::Error, &group);
        assert!(builder.is_empty());
    }

    #[test]
    fn mirror_flag_does_not_gate_membership() {
        for mirror in [false, true] {
            let mut builder = TableBuilder::new();
            let mut group = LogGroup::new("TEST_GROUP", "WM_TEST");
            group.mirror = mirror;
            feed(&mut builder, "mirrored or not", Severity::Info, &group);
            assert_eq!(builder.len(), 1, "mirror = {mirror}");
        }
    }

    #[test]
    fn last_group_tag_wins_for_duplicate_pair() {
        let mut builder = TableBuilder::new();
        feed(
            &mut builder,
            "shared message",
            Severity::Info,
            &LogGroup::new("FIRST", "WM_FIRST"),
        );
        feed(
            &mut builder,
            "shared message",
            Severity::Info,
            &LogGroup::new("SECOND", "WM_SECOND"),
        );
        assert_eq!(builder.len(), 1);
        let rendered = builder.build();
        assert!(rendered.contains("WM_SECOND"));
        assert!(!rendered.contains("WM_FIRST"));
    }

    // ── Collision policy ─────────────────────────────────────────

    #[test]
    fn colliding_identifier_keeps_last_write_and_counts() {
        let mut builder = TableBuilder::new();
        let first = TableEntry {
            message: "first".to_string(),
            severity: Severity::Info,
            tag: "WM_TEST".to_string(),
        };
        let second = TableEntry {
            message: "second".to_string(),
            severity: Severity::Warn,
            tag: "WM_TEST".to_string(),
        };
        builder.record(7, first, site());
        builder.record(7, second.clone(), site());
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.collisions(), 1);
        assert_eq!(builder.entries.get(&7), Some(&second));
    }

    // ── Serialization snapshot ───────────────────────────────────

    #[test]
    fn empty_builder_renders_empty_object() {
        assert_eq!(TableBuilder::new().build(), "{}");
    }

    #[test]
    fn build_is_a_non_clearing_snapshot() {
        let mut builder = TableBuilder::new();
        let group = LogGroup::new("TEST_GROUP", "WM_TEST");
        feed(&mut builder, "first", Severity::Info, &group);
        let once = builder.build();
        assert_eq!(builder.build(), once);

        feed(&mut builder, "second", Severity::Info, &group);
        assert_eq!(builder.len(), 2);
        assert_ne!(builder.build(), once);
    }

    #[test]
    fn identical_input_renders_identical_bytes() {
        let group = LogGroup::new("TEST_GROUP", "WM_TEST");
        let mut a = TableBuilder::new();
        let mut b = TableBuilder::new();
        // Feed the two builders in different orders.
        feed(&mut a, "alpha", Severity::Info, &group);
        feed(&mut a, "beta", Severity::Warn, &group);
        feed(&mut b, "beta", Severity::Warn, &group);
        feed(&mut b, "alpha", Severity::Info, &group);
        assert_eq!(a.build(), b.build());
    }

    #[test]
    fn rendered_entry_carries_all_three_fields() {
        let mut builder = TableBuilder::new();
        feed(
            &mut builder,
            "Starting service",
            Severity::Info,
            &LogGroup::new("TEST_GROUP", "WM_TEST"),
        );
        let rendered = builder.build();
        let root: serde_json::Value =
            serde_json::from_str(&rendered).expect("builder output is valid JSON");
        let entry = &root["3162114101398777028"];
        assert_eq!(entry["message"], "Starting service");
        assert_eq!(entry["level"], "INFO");
        assert_eq!(entry["tag"], "WM_TEST");
    }
}
