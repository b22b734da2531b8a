use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of a bounded append-only JSON log (cycle audit trail, or the
/// high-risk alert feed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub status: String,
    pub details: serde_json::Value,
}

/// A bounded, file-backed append-only log: keeps only the most recent
/// `capacity` entries, in memory and on disk. Used both for the Ingestor's
/// per-cycle audit trail (capacity 100) and the out-of-band high-risk
/// alert feed (capacity 20) — same shape, different retention.
pub struct BoundedAuditLog {
    path: PathBuf,
    capacity: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl BoundedAuditLog {
    /// Load existing entries from `path` if present; a missing or corrupt
    /// file starts empty rather than failing — the log is best-effort
    /// observability, not a source of truth.
    pub fn load(path: impl AsRef<Path>, capacity: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<VecDeque<AuditEntry>>(&text).ok())
            .unwrap_or_default();
        Self {
            path,
            capacity,
            entries: Mutex::new(entries),
        }
    }

    /// Append `entry`, evicting the oldest entry if over capacity, then
    /// persist the whole log back to disk.
    pub fn append(&self, entry: AuditEntry) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        let serialized = serde_json::to_string_pretty(&*entries)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: &str) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            event_type: "ingest_cycle".to_string(),
            status: status.to_string(),
            details: serde_json::json!({}),
        }
    }

    #[test]
    fn retains_only_the_most_recent_capacity_entries() {
        let dir = tempdir();
        let log = BoundedAuditLog::load(dir.join("log.json"), 3);
        for i in 0..5 {
            log.append(entry(&format!("ok-{i}"))).unwrap();
        }
        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].status, "ok-2");
        assert_eq!(entries[2].status, "ok-4");
    }

    #[test]
    fn persists_and_reloads_across_instances() {
        let dir = tempdir();
        let path = dir.join("log.json");
        {
            let log = BoundedAuditLog::load(&path, 10);
            log.append(entry("first")).unwrap();
        }
        let reloaded = BoundedAuditLog::load(&path, 10);
        assert_eq!(reloaded.entries().len(), 1);
    }

    fn tempdir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "riftwatch-audit-log-test-{}",
            uuid_like_suffix()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn uuid_like_suffix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    }
}
