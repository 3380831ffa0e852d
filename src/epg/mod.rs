//! EPG (Electronic Program Guide) module
//!
//! Contains the window loader and the time-shift merge used to answer
//! EPG queries.

mod parser;

pub use parser::{parse_epg, EpgLoader};

use crate::models::EpgEntry;

/// Seconds per minute of EPG shift
const SECONDS_PER_MINUTE: i64 = 60;

/// Select and shift entries for the window `[start, end)`.
///
/// Entries are expected in start-time order. Entries whose shifted end is
/// before `start` are skipped; scanning stops after the first emitted entry
/// whose shifted start is past `end`.
pub fn shift_window(
    entries: &[EpgEntry],
    shift_minutes: i32,
    start: i64,
    end: i64,
) -> Vec<EpgEntry> {
    let shift = i64::from(shift_minutes) * SECONDS_PER_MINUTE;
    let mut result = Vec::new();

    for entry in entries {
        // Provider timestamps are unchecked i64 values
        if entry.end.saturating_add(shift) < start {
            continue;
        }

        let mut shifted = entry.clone();
        shifted.start = shifted.start.saturating_add(shift);
        shifted.end = shifted.end.saturating_add(shift);
        let past_window = shifted.start > end;
        result.push(shifted);

        if past_window {
            break;
        }
    }

    result
}

/// Format a Unix timestamp as local time HH:MM
pub fn format_time(ts: i64) -> String {
    use chrono::{Local, TimeZone};

    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => ts.to_string(),
    }
}

/// Format a Unix timestamp as local datetime YYYY-MM-DD HH:MM
pub fn format_datetime(ts: i64) -> String {
    use chrono::{Local, TimeZone};

    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i32, start: i64, end: i64) -> EpgEntry {
        EpgEntry {
            broadcast_id: id,
            start,
            end,
            title: format!("Show {}", id),
            ..Default::default()
        }
    }

    fn schedule() -> Vec<EpgEntry> {
        vec![
            entry(1, 0, 3600),
            entry(2, 3600, 7200),
            entry(3, 7200, 10800),
            entry(4, 10800, 14400),
            entry(5, 14400, 18000),
        ]
    }

    #[test]
    fn test_window_without_shift() {
        let emitted = shift_window(&schedule(), 0, 4000, 9000);
        let ids: Vec<i32> = emitted.iter().map(|e| e.broadcast_id).collect();
        // 1 ended before the window, 4 starts past it and stops the scan
        assert_eq!(ids, vec![2, 3, 4]);
        assert!(emitted.iter().all(|e| e.end >= 4000));
    }

    #[test]
    fn test_window_with_shift() {
        let emitted = shift_window(&schedule(), 60, 4000, 9000);
        assert_eq!(emitted[0].broadcast_id, 1);
        assert_eq!(emitted[0].start, 3600);
        assert_eq!(emitted[0].end, 7200);

        let ids: Vec<i32> = emitted.iter().map(|e| e.broadcast_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_shift() {
        let emitted = shift_window(&schedule(), -30, 0, 2000);
        assert_eq!(emitted[0].broadcast_id, 1);
        assert_eq!(emitted[0].start, -1800);
        assert_eq!(emitted[0].end, 1800);
    }

    #[test]
    fn test_scan_does_not_sort() {
        let entries = vec![entry(1, 20000, 21000), entry(2, 0, 3600)];
        let emitted = shift_window(&entries, 0, 0, 10000);
        let ids: Vec<i32> = emitted.iter().map(|e| e.broadcast_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_extreme_timestamps_saturate() {
        let entries = vec![entry(1, i64::MAX - 807, i64::MAX)];
        let emitted = shift_window(&entries, 60, 0, 10);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].start, i64::MAX);
        assert_eq!(emitted[0].end, i64::MAX);

        let entries = vec![entry(1, i64::MIN, i64::MIN + 10)];
        assert!(shift_window(&entries, -60, 0, 10).is_empty());
    }

    #[test]
    fn test_empty_entries() {
        assert!(shift_window(&[], 15, 0, 100).is_empty());
    }

    #[test]
    fn test_format_time_invalid_timestamp() {
        assert_eq!(format_datetime(i64::MAX), i64::MAX.to_string());
        assert_eq!(format_time(i64::MAX), i64::MAX.to_string());
    }
}
