//! Turns a version map into display rows.

use crate::model::{ObjectVersion, VersionMap};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// One row per key: its current version, and nothing for deleted keys.
    #[default]
    Latest,
    /// Every version record.
    AllVersions,
}

impl ViewMode {
    pub fn from_show_all(show_all_versions: bool) -> Self {
        if show_all_versions {
            ViewMode::AllVersions
        } else {
            ViewMode::Latest
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Latest => ViewMode::AllVersions,
            ViewMode::AllVersions => ViewMode::Latest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Latest => "latest",
            ViewMode::AllVersions => "all versions",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Row {
    pub key: String,
    pub version_id: String,
    pub size: u64,
    pub size_display: String,
    pub last_modified: String,
    pub is_latest: bool,
    pub is_delete_marker: bool,
}

impl Row {
    fn from_version(key: &str, v: &ObjectVersion) -> Self {
        Self {
            key: key.to_string(),
            version_id: v.version_id.clone(),
            size: v.size,
            size_display: if v.is_delete_marker {
                "-".to_string()
            } else {
                format_size(v.size)
            },
            last_modified: v.last_modified.clone(),
            is_latest: v.is_latest,
            is_delete_marker: v.is_delete_marker,
        }
    }
}

/// Rows sorted by key; within a key, in the order the store holds them.
pub fn project(versions: &VersionMap, mode: ViewMode) -> Vec<Row> {
    let mut keys: Vec<&String> = versions.keys().collect();
    keys.sort();

    let mut rows = Vec::new();
    for key in keys {
        let list = &versions[key];
        match mode {
            ViewMode::AllVersions => {
                rows.extend(list.iter().map(|v| Row::from_version(key, v)));
            }
            ViewMode::Latest => {
                if let Some(v) = list.iter().find(|v| v.is_latest)
                    && !v.is_delete_marker
                {
                    rows.push(Row::from_version(key, v));
                }
            }
        }
    }
    rows
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
