use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Fixed key the serialized store lives under.
pub const STORAGE_KEY: &str = "link_analytics";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal key-value persistence seam. Injected so tests (and the
/// analytics-disabled mode) can run against memory instead of disk.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// One JSON file per key under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory backend for tests and for running with analytics disabled.
#[derive(Default)]
pub struct MemoryStorage {
    map: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Rough class of the clicking device, kept in the recorded facets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

/// Counters for one link. Field names follow the persisted blob's shape.
///
/// Invariant: `clicks == devices.mobile + devices.desktop == sum over
/// daily_clicks`, maintained because every increment updates all facets in
/// the same logical operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub clicks: u64,
    /// Keyed by ISO-8601 date. Sorted order equals insertion order because
    /// entries are only ever appended for the current day.
    pub daily_clicks: BTreeMap<String, u64>,
    pub devices: DeviceCounts,
    pub referrers: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCounts {
    pub mobile: u64,
    pub desktop: u64,
}

impl LinkStats {
    /// Sum of the last 7 recorded daily entries. Deliberately "last 7 days
    /// with any click", not the last 7 calendar days.
    pub fn last_seven_days(&self) -> u64 {
        self.daily_clicks.values().rev().take(7).sum()
    }
}

/// The aggregator. All mutation funnels through [`AnalyticsStore::record_click`].
pub struct AnalyticsStore<S: Storage> {
    storage: S,
}

impl<S: Storage> AnalyticsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the full store. A missing or corrupt blob yields an empty map;
    /// first runs and damaged storage must not take the page down.
    pub fn get_all(&self) -> BTreeMap<String, LinkStats> {
        self.storage
            .get(STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Record one click for `slug` under today's date.
    ///
    /// A single atomic read-modify-write of the whole blob. Persistence
    /// failures are logged and swallowed: recording must never block the
    /// click's primary action.
    pub fn record_click(&mut self, slug: &str, device: DeviceClass, referrer: &str) {
        self.record_click_on(slug, device, referrer, &today_key());
    }

    /// Same as [`record_click`](Self::record_click) with an explicit date
    /// key, so multi-day histories are testable.
    pub fn record_click_on(
        &mut self,
        slug: &str,
        device: DeviceClass,
        referrer: &str,
        date: &str,
    ) {
        let mut all = self.get_all();
        let entry = all.entry(slug.to_string()).or_default();

        entry.clicks += 1;
        *entry.daily_clicks.entry(date.to_string()).or_insert(0) += 1;
        match device {
            DeviceClass::Mobile => entry.devices.mobile += 1,
            DeviceClass::Desktop => entry.devices.desktop += 1,
        }
        *entry.referrers.entry(referrer.to_string()).or_insert(0) += 1;

        match serde_json::to_string(&all) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(STORAGE_KEY, &raw) {
                    warn!("failed to persist analytics for {slug}: {e}");
                }
            }
            Err(e) => warn!("failed to serialize analytics: {e}"),
        }
    }
}

/// Today's date key, ISO-8601 local date.
pub fn today_key() -> String {
    chrono::Local::now().date_naive().to_string()
}
