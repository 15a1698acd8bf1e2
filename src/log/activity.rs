/// Calibration activity log
///
/// Every change to the calibration registry during a session is recorded with:
/// - Timestamp
/// - Operation name
/// - Description of the affected profile
/// - Sequential order
///
/// The log can be exported as human-readable text or JSON. It is an audit
/// trail of the session only; calibrations are not restored from it.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::calibration::profile::CalibrationProfile;
use crate::calibration::store::CalibrationEvent;

/// A single recorded operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Sequential operation number (1-based)
    pub sequence: usize,
    pub timestamp: DateTime<Local>,
    pub operation: String,
    pub description: String,
}

impl ActivityEntry {
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.description
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub software_version: String,
    pub entries: Vec<ActivityEntry>,
}

fn describe(profile: &CalibrationProfile) -> String {
    format!(
        "#{} {} — x {:.4}, y {:.4} {} ({})",
        profile.id,
        profile.magnification_label,
        profile.x_axis_ratio,
        profile.y_axis_ratio,
        profile.unit,
        profile.created_date
    )
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, operation: &str, description: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(ActivityEntry {
            sequence: seq,
            timestamp: Local::now(),
            operation: operation.to_string(),
            description: description.to_string(),
        });
        log::info!("[LOG {:03}] {} — {}", seq, operation, description);
    }

    /// Record a registry change
    pub fn record(&mut self, event: &CalibrationEvent) {
        match event {
            CalibrationEvent::Added(p) => self.add_entry("Add Calibration", &describe(p)),
            CalibrationEvent::Evicted(p) => {
                let mut desc = describe(p);
                if p.is_active {
                    desc.push_str("; active calibration cleared");
                }
                self.add_entry("Evict Calibration", &desc)
            }
            CalibrationEvent::Activated(p) => self.add_entry("Activate Calibration", &describe(p)),
            CalibrationEvent::Removed { profile, was_active } => {
                let mut desc = describe(profile);
                if *was_active {
                    desc.push_str("; active calibration cleared");
                }
                self.add_entry("Delete Calibration", &desc)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str("  Calibration Activity Log\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str(&format!("  Session ID:  {}\n", self.session_id));
        out.push_str(&format!(
            "  Started:     {}\n",
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("  Software:    Envision v{}\n", self.software_version));
        out.push_str(&format!("  Operations:  {}\n", self.entries.len()));
        out.push_str("───────────────────────────────────────────────────────────────\n\n");

        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    pub fn save_text(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_text())
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
