use chrono::{DateTime, Utc};

/// What the local replica currently holds.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    /// Dataset version of the cached catalog, if one was ever synced.
    pub version: Option<u64>,
    pub synced_at: Option<DateTime<Utc>>,
    pub has_catalog: bool,
}

impl SyncStatus {
    pub fn age_minutes(&self) -> Option<i64> {
        self.synced_at.map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        let Some(minutes) = self.age_minutes() else {
            return "never".to_string();
        };
        if minutes < 1 {
            // Negative ages come from clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}
