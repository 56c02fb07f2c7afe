//! Shared — thread-safe discovery sink for parallel unit processing.
//!
//! Builds that scan compilation units on multiple threads share one table,
//! and the insert step is the only shared mutable state. Serializing writers
//! is a correctness requirement, not an optimization: two racing writes to
//! the SAME identifier must land in a defined order for the build to be
//! reproducible.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::group::LogGroup;
use crate::severity::Severity;

use super::build::{CallSite, CallSiteSink, TableBuilder};

/// Cheap-to-clone handle over a mutex-guarded [`TableBuilder`]. Each scanner
/// thread gets its own clone and reports discoveries through it.
#[derive(Clone)]
pub struct SharedSink {
    inner: Arc<Mutex<TableBuilder>>,
}

impl SharedSink {
    pub fn new(builder: TableBuilder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(builder)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn collisions(&self) -> u64 {
        self.inner.lock().collisions()
    }

    /// Snapshot of the accumulated table; same semantics as
    /// [`TableBuilder::build`].
    pub fn build(&self) -> String {
        self.inner.lock().build()
    }

    /// Recover the builder once scanning is done. `None` while other handles
    /// are still alive.
    pub fn into_inner(self) -> Option<TableBuilder> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}

impl Default for SharedSink {
    fn default() -> Self {
        Self::new(TableBuilder::new())
    }
}

impl CallSiteSink for SharedSink {
    fn call_discovered(
        &mut self,
        site: CallSite<'_>,
        message: &str,
        severity: Severity,
        group: &LogGroup,
    ) {
        self.inner
            .lock()
            .call_discovered(site, message, severity, group);
    }
}
