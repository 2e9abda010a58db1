//! Orphan detection rules

use crate::model::{LoadBalancer, ReservedIp, Snapshot, Volume};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_SNAPSHOT_AGE_DAYS: u32 = 90;

/// Volumes with no attached droplet
pub fn unattached_volumes(volumes: &[Volume]) -> Vec<&Volume> {
    volumes.iter().filter(|v| !v.is_attached()).collect()
}

/// Reserved IPs not bound to a droplet
pub fn unassigned_ips(ips: &[ReservedIp]) -> Vec<&ReservedIp> {
    ips.iter().filter(|ip| !ip.is_assigned()).collect()
}

/// Load balancers with no backend droplets
pub fn empty_load_balancers(load_balancers: &[LoadBalancer]) -> Vec<&LoadBalancer> {
    load_balancers.iter().filter(|lb| !lb.has_backends()).collect()
}

pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Snapshots created strictly before `now - days`
///
/// A snapshot exactly `days` old is kept. Unparseable timestamps never match.
/// A threshold reaching past the earliest representable date matches nothing.
pub fn snapshots_older_than(snapshots: &[Snapshot], days: u32, now: DateTime<Utc>) -> Vec<&Snapshot> {
    let Some(cutoff) =
        Duration::try_days(i64::from(days)).and_then(|age| now.checked_sub_signed(age))
    else {
        return Vec::new();
    };
    snapshots
        .iter()
        .filter(|s| parse_timestamp(&s.created_at).is_some_and(|created| created < cutoff))
        .collect()
}
