use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::engine::error::EngineError;
use crate::model::timesheet::{EntryType, TimesheetEntry};

/// Parses the period bounds arriving from the wire as `YYYY-MM-DD` strings.
/// A blank or unparseable bound is an [`EngineError::InvalidRange`].
pub fn parse_period(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), EngineError> {
    Ok((parse_bound("period_start", start)?, parse_bound("period_end", end)?))
}

fn parse_bound(label: &str, value: &str) -> Result<NaiveDate, EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidRange(format!("{label} is missing")));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidRange(format!("{label} is not a valid date: {value}")))
}

fn default_entry(date: NaiveDate) -> TimesheetEntry {
    let (entry_type, hours) = match date.weekday() {
        Weekday::Sun => (EntryType::Sunday, 0.0),
        Weekday::Sat => (EntryType::Saturday, 0.0),
        _ => (EntryType::Regular, 8.0),
    };
    TimesheetEntry {
        id: Uuid::new_v4(),
        date,
        entry_type,
        hours,
    }
}

/// Regenerates a timesheet's entry set to exactly cover `period_start..=period_end`
/// while preserving per-date data.
///
/// Every calendar date in the range appears exactly once as a group, ascending.
/// Pre-existing entries for a date are kept unchanged, in their original
/// relative order; a date with none gets one synthesized entry (Sunday/Saturday
/// at 0 hours, otherwise Regular at 8). Entries dated outside the range are
/// dropped: the output is rebuilt from scratch on every call. An inverted range
/// (`period_end < period_start`) yields no entries and is not an error.
pub fn reconcile(
    period_start: NaiveDate,
    period_end: NaiveDate,
    existing: &[TimesheetEntry],
) -> Vec<TimesheetEntry> {
    let mut by_date: HashMap<NaiveDate, Vec<TimesheetEntry>> = HashMap::new();
    for entry in existing {
        by_date.entry(entry.date).or_default().push(entry.clone());
    }

    let mut entries = Vec::new();
    let mut day = period_start;
    while day <= period_end {
        match by_date.remove(&day) {
            Some(kept) => entries.extend(kept),
            None => entries.push(default_entry(day)),
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break, // calendar overflow, nothing beyond NaiveDate::MAX
        };
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(d: NaiveDate, entry_type: EntryType, hours: f64) -> TimesheetEntry {
        TimesheetEntry {
            id: Uuid::new_v4(),
            date: d,
            entry_type,
            hours,
        }
    }

    #[test]
    fn covers_every_date_in_range_exactly_once() {
        // 2026-01-05 is a Monday.
        let entries = reconcile(date(2026, 1, 5), date(2026, 1, 11), &[]);
        assert_eq!(entries.len(), 7, "one entry per calendar day");

        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        let expected: Vec<NaiveDate> = (5..=11).map(|d| date(2026, 1, d)).collect();
        assert_eq!(dates, expected, "ascending, no gaps, no duplicates");
    }

    #[test]
    fn synthesized_defaults_by_day_of_week() {
        let entries = reconcile(date(2026, 1, 5), date(2026, 1, 11), &[]);

        for e in &entries {
            match e.date.weekday() {
                Weekday::Sat => {
                    assert_eq!(e.entry_type, EntryType::Saturday);
                    assert_eq!(e.hours, 0.0);
                }
                Weekday::Sun => {
                    assert_eq!(e.entry_type, EntryType::Sunday);
                    assert_eq!(e.hours, 0.0);
                }
                _ => {
                    assert_eq!(e.entry_type, EntryType::Regular);
                    assert_eq!(e.hours, 8.0);
                }
            }
        }
    }

    #[test]
    fn preserves_in_range_entries_unchanged() {
        let monday = entry(date(2026, 1, 5), EntryType::Leave, 8.0);
        let entries = reconcile(date(2026, 1, 5), date(2026, 1, 7), &[monday.clone()]);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], monday, "same id, type and hours");
        assert_eq!(entries[1].entry_type, EntryType::Regular);
    }

    #[test]
    fn a_date_may_hold_several_entries_in_original_order() {
        let work = entry(date(2026, 1, 6), EntryType::Regular, 8.0);
        let allowance = entry(date(2026, 1, 6), EntryType::ShiftAllowance, 2.0);
        let entries = reconcile(
            date(2026, 1, 6),
            date(2026, 1, 6),
            &[work.clone(), allowance.clone()],
        );

        assert_eq!(entries, vec![work, allowance]);
    }

    #[test]
    fn drops_entries_outside_the_new_range() {
        let stale = entry(date(2026, 1, 1), EntryType::Regular, 8.0);
        let entries = reconcile(date(2026, 1, 5), date(2026, 1, 6), &[stale.clone()]);

        assert_eq!(entries.len(), 2);
        assert!(
            entries.iter().all(|e| e.id != stale.id),
            "off-range entry must not survive"
        );
    }

    #[test]
    fn inverted_range_yields_no_entries() {
        let kept = entry(date(2026, 1, 5), EntryType::Regular, 8.0);
        let entries = reconcile(date(2026, 1, 11), date(2026, 1, 5), &[kept]);
        assert!(entries.is_empty());
    }

    #[test]
    fn single_day_range_yields_one_entry() {
        let entries = reconcile(date(2026, 1, 5), date(2026, 1, 5), &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, date(2026, 1, 5));
    }

    #[test]
    fn parse_period_rejects_blank_and_garbage_bounds() {
        assert!(matches!(
            parse_period("", "2026-01-11"),
            Err(EngineError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_period("2026-01-05", "not-a-date"),
            Err(EngineError::InvalidRange(_))
        ));
        assert_eq!(
            parse_period("2026-01-05", "2026-01-11").unwrap(),
            (date(2026, 1, 5), date(2026, 1, 11))
        );
    }
}
