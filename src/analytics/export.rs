//! Flat CSV export of the analytics store.

use super::store::{AnalyticsStore, Storage, today_key};

impl<S: Storage> AnalyticsStore<S> {
    /// One header row plus one row per tracked slug.
    ///
    /// `Last 7 Days` sums the last 7 recorded daily entries, matching the
    /// dashboard's column of the same name.
    pub fn export_csv(&self) -> String {
        let mut rows = vec!["Slug,Total Clicks,Mobile,Desktop,Last 7 Days".to_string()];

        for (slug, stats) in self.get_all() {
            rows.push(format!(
                "{},{},{},{},{}",
                slug,
                stats.clicks,
                stats.devices.mobile,
                stats.devices.desktop,
                stats.last_seven_days()
            ));
        }

        rows.join("\n")
    }
}

/// Suggested filename for a CSV download: `analytics_<ISODate>.csv`.
pub fn export_filename() -> String {
    format!("analytics_{}.csv", today_key())
}
