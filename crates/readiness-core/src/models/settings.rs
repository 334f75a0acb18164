//! Readiness check settings

use serde::{Deserialize, Serialize};

/// Which readiness checks are enabled.
///
/// Stored as a flat camelCase record. A flag missing from a stored or submitted
/// record is treated as enabled, the same as a missing record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub check_description: bool,
    pub check_assignee: bool,
    pub check_priority: bool,
    pub check_labels: bool,
}

impl Settings {
    /// Settings with every check turned off
    pub fn none() -> Self {
        Self {
            check_description: false,
            check_assignee: false,
            check_priority: false,
            check_labels: false,
        }
    }

    /// Number of enabled checks
    pub fn enabled_count(&self) -> usize {
        [
            self.check_description,
            self.check_assignee,
            self.check_priority,
            self.check_labels,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_description: true,
            check_assignee: true,
            check_priority: true,
            check_labels: true,
        }
    }
}
