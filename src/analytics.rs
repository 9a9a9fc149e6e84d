//! Click analytics: durable per-link counters behind a pluggable storage
//! backend, with a flat CSV export.
//!
//! The whole store is one serialized blob under a fixed key. Every click is
//! a full read-modify-write; concurrent writers are not coordinated (last
//! write wins, a documented limitation).

mod export;
mod store;

pub use export::export_filename;
pub use store::{
    AnalyticsStore, DeviceClass, DeviceCounts, FileStorage, LinkStats, MemoryStorage, STORAGE_KEY,
    Storage, StorageError, today_key,
};
