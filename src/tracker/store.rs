use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// Records & events
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Url,
}

/// Stored QR code record. The tracker reads it by identifier and bumps the
/// scan counters; creation and deletion live outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrRecord {
    pub id: String,
    pub owner: String,
    pub content: String,
    pub kind: ContentKind,
    pub image_ref: Option<String>,
    pub tracking_url: Option<String>,
    pub scan_count: u64,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub is_tracked: bool,
}

/// One append-only scan occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    pub qr_code_id: String,
    pub scanned_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub ip_address: Option<String>,
    /// Fresh per scan, never reused.
    pub session_id: String,
}

impl ScanEvent {
    pub fn new(
        qr_code_id: impl Into<String>,
        user_agent: Option<String>,
        referrer: Option<String>,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            qr_code_id: qr_code_id.into(),
            scanned_at: Utc::now(),
            user_agent,
            referrer,
            ip_address,
            session_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Aggregate scan figures for one QR code.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ScanAnalytics {
    pub total_scans: u64,
    pub today_scans: u64,
    pub week_scans: u64,
    pub month_scans: u64,
    pub unique_sessions: u64,
}

// Store interface
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("write rejected: {0}")]
    WriteFailed(String),
}

/// Backing record store. Implementations must be safe to share across
/// request handlers; writes are primitive single-record operations.
pub trait RecordStore: Send + Sync {
    fn get(&self, id: &str) -> Option<QrRecord>;

    /// Appends one scan event. Callers treat this as best-effort.
    fn append_scan(&self, event: ScanEvent) -> Result<(), StoreError>;

    /// Server-side atomic bump of `scan_count` and `last_scanned_at`.
    fn increment_counters(&self, id: &str) -> Result<(), StoreError>;

    fn analytics(&self, id: &str) -> ScanAnalytics;
}

// In-memory implementation
//------------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    records: HashMap<String, QrRecord>,
    scans: Vec<ScanEvent>,
}

/// Process-local store used by the demo server and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: QrRecord) {
        self.inner.write().records.insert(record.id.clone(), record);
    }

    pub fn scan_events(&self, id: &str) -> Vec<ScanEvent> {
        self.inner.read().scans.iter().filter(|e| e.qr_code_id == id).cloned().collect()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &str) -> Option<QrRecord> {
        self.inner.read().records.get(id).cloned()
    }

    fn append_scan(&self, event: ScanEvent) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.records.contains_key(&event.qr_code_id) {
            return Err(StoreError::NotFound);
        }
        inner.scans.push(event);
        Ok(())
    }

    fn increment_counters(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let record = inner.records.get_mut(id).ok_or(StoreError::NotFound)?;
        record.scan_count += 1;
        record.last_scanned_at = Some(Utc::now());
        Ok(())
    }

    fn analytics(&self, id: &str) -> ScanAnalytics {
        let inner = self.inner.read();
        let now = Utc::now();
        let today = now.date_naive();
        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);

        let mut analytics = ScanAnalytics::default();
        let mut sessions = HashSet::new();
        for event in inner.scans.iter().filter(|e| e.qr_code_id == id) {
            analytics.total_scans += 1;
            if event.scanned_at.date_naive() == today {
                analytics.today_scans += 1;
            }
            if event.scanned_at >= week_ago {
                analytics.week_scans += 1;
            }
            if event.scanned_at >= month_ago {
                analytics.month_scans += 1;
            }
            sessions.insert(event.session_id.clone());
        }
        analytics.unique_sessions = sessions.len() as u64;
        analytics
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;

    pub(crate) fn record(id: &str, content: &str, tracked: bool) -> QrRecord {
        QrRecord {
            id: id.to_string(),
            owner: "owner-1".to_string(),
            content: content.to_string(),
            kind: ContentKind::Url,
            image_ref: None,
            tracking_url: None,
            scan_count: 0,
            last_scanned_at: None,
            is_tracked: tracked,
        }
    }

    #[test]
    fn test_get_roundtrip() {
        let store = MemoryStore::new();
        store.insert(record("abc123", "https://example.com", true));
        let fetched = store.get("abc123").unwrap();
        assert_eq!(fetched.content, "https://example.com");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_session_ids_are_fresh() {
        let a = ScanEvent::new("abc123", None, None, None);
        let b = ScanEvent::new("abc123", None, None, None);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_append_requires_record() {
        let store = MemoryStore::new();
        let err = store.append_scan(ScanEvent::new("ghost", None, None, None)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_increment_counters() {
        let store = MemoryStore::new();
        store.insert(record("abc123", "https://example.com", true));
        store.increment_counters("abc123").unwrap();
        store.increment_counters("abc123").unwrap();
        let fetched = store.get("abc123").unwrap();
        assert_eq!(fetched.scan_count, 2);
        assert!(fetched.last_scanned_at.is_some());
    }

    #[test]
    fn test_analytics_counts() {
        let store = MemoryStore::new();
        store.insert(record("abc123", "https://example.com", true));
        store.insert(record("other", "https://other.example", true));
        for _ in 0..3 {
            store.append_scan(ScanEvent::new("abc123", None, None, None)).unwrap();
        }
        store.append_scan(ScanEvent::new("other", None, None, None)).unwrap();

        // An old event outside every window except the total.
        let mut stale = ScanEvent::new("abc123", None, None, None);
        stale.scanned_at = Utc::now() - Duration::days(90);
        store.append_scan(stale).unwrap();

        let analytics = store.analytics("abc123");
        assert_eq!(analytics.total_scans, 4);
        assert_eq!(analytics.today_scans, 3);
        assert_eq!(analytics.week_scans, 3);
        assert_eq!(analytics.month_scans, 3);
        assert_eq!(analytics.unique_sessions, 4);
    }
}
