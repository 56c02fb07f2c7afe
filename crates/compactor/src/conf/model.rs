//! Model — GroupRegistry and per-group declarations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::group::LogGroup;

/// Log groups a build declares, keyed by group name.
///
/// ```toml
/// [groups.DEBUG_GROUP]
/// enabled = true
/// mirror = false
/// tag = "WM_DEBUG"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupRegistry {
    #[serde(default)]
    pub groups: HashMap<String, GroupSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSpec {
    pub enabled: bool,
    pub mirror: bool,
    pub tag: String,
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            mirror: false,
            tag: String::new(),
        }
    }
}

impl GroupRegistry {
    /// Materialize the declared group `name`, or `None` if the build never
    /// declared it.
    pub fn resolve(&self, name: &str) -> Option<LogGroup> {
        self.groups.get(name).map(|spec| LogGroup {
            name: name.to_string(),
            enabled: spec.enabled,
            mirror: spec.mirror,
            tag: spec.tag.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
