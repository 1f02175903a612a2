//! Cache invalidation wiring
//!
//! The realtime layer's only built-in side effect is telling the
//! data-fetching layer which cached queries went stale. The key names are a
//! contract with that layer; the invalidator itself is an injected opaque
//! capability.

use crate::realtime::event::tags;
use tracing::debug;

/// Names of the cached queries the realtime layer can invalidate
pub mod query_keys {
    pub const BOOKINGS: &str = "bookings";
    pub const ADMIN_BOOKINGS: &str = "admin-bookings";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const NOTIFICATIONS_UNREAD: &str = "notifications-unread";
    pub const DASHBOARD_STATS: &str = "dashboard-stats";
    pub const VEHICLE_POSITIONS: &str = "vehicle-positions";
}

/// Key-based invalidation into the data-fetching layer
pub trait QueryInvalidator: Send + Sync {
    /// Mark the cached query behind `key` as stale
    fn invalidate(&self, key: &str);
}

/// Cache keys invalidated for a given event tag; `None` for unknown tags
pub fn keys_for_tag(tag: &str) -> Option<&'static [&'static str]> {
    match tag {
        tags::BOOKING_UPDATE => Some(&[query_keys::BOOKINGS, query_keys::ADMIN_BOOKINGS]),
        tags::NOTIFICATION => {
            Some(&[query_keys::NOTIFICATIONS, query_keys::NOTIFICATIONS_UNREAD])
        }
        tags::DASHBOARD_UPDATE => Some(&[query_keys::DASHBOARD_STATS]),
        tags::VEHICLE_LOCATION => Some(&[query_keys::VEHICLE_POSITIONS]),
        _ => None,
    }
}

/// An invalidator that does nothing
pub struct NoopInvalidator;

impl QueryInvalidator for NoopInvalidator {
    fn invalidate(&self, _key: &str) {}
}

/// An invalidator that only logs, for headless consumers with no cache
pub struct TracingInvalidator;

impl QueryInvalidator for TracingInvalidator {
    fn invalidate(&self, key: &str) {
        debug!(%key, "cache key invalidated");
    }
}
