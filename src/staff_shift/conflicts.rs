use crate::staff_shift::shift;
use shift::{RawShift, Shift};
use std::{
    collections::{BTreeMap, BTreeSet},
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Error};
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

pub fn read_shifts(path: &Path, timezone: Option<Tz>) -> Result<Vec<Shift>, Error> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.to_string_lossy()))?;

    let reader = BufReader::new(file);
    let raw_shifts: Vec<RawShift> = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to decode shifts from {}", path.to_string_lossy()))?;

    tracing::debug!(count = raw_shifts.len(), path = %path.display(), "read shifts");
    Ok(raw_shifts
        .into_iter()
        .map(|raw| Shift::from_raw(raw, timezone))
        .collect())
}

/// Ids of every shift that overlaps the next one (by start time) for the same
/// staff member on the same day.
///
/// Only adjacent pairs are compared, and a shift ending exactly when the next
/// one starts does not count. Shifts without a day or a full time range never
/// show up in the result.
pub fn detect_conflicts(shifts: &[Shift]) -> BTreeSet<String> {
    let mut groups: BTreeMap<(NaiveDate, &str), Vec<(NaiveDateTime, NaiveDateTime, &str)>> =
        BTreeMap::new();
    for shift in shifts {
        let Some(day) = shift.day else {
            continue;
        };
        let (Some(start), Some(end)) = (shift.start, shift.end) else {
            continue;
        };
        groups
            .entry((day, shift.user_id.as_str()))
            .or_default()
            .push((start, end, shift.id.as_str()));
    }

    let mut conflicts = BTreeSet::new();
    for group in groups.values_mut() {
        // stable, so equal starts keep their list order
        group.sort_by_key(|(start, _, _)| *start);

        for pair in group.windows(2) {
            let (_, earlier_end, earlier_id) = pair[0];
            let (later_start, _, later_id) = pair[1];
            if earlier_end > later_start {
                conflicts.insert(earlier_id.to_string());
                conflicts.insert(later_id.to_string());
            }
        }
    }

    tracing::debug!(
        shifts = shifts.len(),
        groups = groups.len(),
        conflicts = conflicts.len(),
        "detected shift conflicts"
    );
    conflicts
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, str::FromStr};

    use chrono_tz::America::Denver;

    use super::*;
    use crate::staff_shift::shift::ShiftStatus;

    fn shift(id: &str, user: &str, date: &str, start: &str, end: &str) -> Shift {
        Shift::from_raw(
            RawShift {
                id: id.to_string(),
                user_id: user.to_string(),
                shift_date: Some(date.to_string()),
                start_time: Some(start.to_string()),
                end_time: Some(end.to_string()),
                role: None,
                status: ShiftStatus::Scheduled,
                scheduled_minutes: None,
                actual_minutes: None,
            },
            None,
        )
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_overlapping_shifts_are_flagged() {
        let shifts = [
            shift("A", "u1", "2024-01-01", "09:00", "13:00"),
            shift("B", "u1", "2024-01-01", "12:00", "17:00"),
        ];

        assert_eq!(detect_conflicts(&shifts), ids(&["A", "B"]));
    }

    #[test]
    fn test_back_to_back_shifts_are_not_flagged() {
        let shifts = [
            shift("A", "u1", "2024-01-01", "09:00", "13:00"),
            shift("B", "u1", "2024-01-01", "13:00", "17:00"),
        ];

        assert!(detect_conflicts(&shifts).is_empty());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let shifts = [
            shift("B", "u1", "2024-01-01", "12:00", "17:00"),
            shift("C", "u1", "2024-01-01", "18:00", "20:00"),
            shift("A", "u1", "2024-01-01", "09:00", "13:00"),
        ];

        assert_eq!(detect_conflicts(&shifts), ids(&["A", "B"]));
    }

    #[test]
    fn test_different_staff_or_days_never_conflict() {
        let shifts = [
            shift("A", "u1", "2024-01-01", "09:00", "13:00"),
            shift("B", "u2", "2024-01-01", "10:00", "14:00"),
            shift("C", "u1", "2024-01-02", "10:00", "14:00"),
        ];

        assert!(detect_conflicts(&shifts).is_empty());
    }

    #[test]
    fn test_day_is_truncated_from_date_time() {
        let shifts = [
            shift("A", "u1", "2024-01-01T00:00:00.000Z", "09:00", "13:00"),
            shift("B", "u1", "2024-01-01", "12:00", "17:00"),
        ];

        assert_eq!(detect_conflicts(&shifts), ids(&["A", "B"]));
    }

    #[test]
    fn test_only_adjacent_pairs_are_compared() {
        // C overlaps A but sits after B, which ends before C starts
        let shifts = [
            shift("A", "u1", "2024-01-01", "08:00", "18:00"),
            shift("B", "u1", "2024-01-01", "09:00", "10:00"),
            shift("C", "u1", "2024-01-01", "12:00", "13:00"),
        ];

        assert_eq!(detect_conflicts(&shifts), ids(&["A", "B"]));
    }

    #[test]
    fn test_chain_of_overlaps() {
        let shifts = [
            shift("A", "u1", "2024-01-01", "08:00", "10:00"),
            shift("B", "u1", "2024-01-01", "09:00", "12:00"),
            shift("C", "u1", "2024-01-01", "11:00", "14:00"),
        ];

        assert_eq!(detect_conflicts(&shifts), ids(&["A", "B", "C"]));
    }

    #[test]
    fn test_shifts_missing_times_or_day_are_excluded() {
        let shifts = [
            shift("A", "u1", "2024-01-01", "09:00", "13:00"),
            shift("B", "u1", "2024-01-01", "", "17:00"),
            shift("C", "u1", "", "10:00", "11:00"),
            shift("D", "u1", "garbage", "10:00", "11:00"),
        ];

        assert!(detect_conflicts(&shifts).is_empty());
    }

    #[test]
    fn test_detect_conflicts_is_idempotent() {
        let shifts = [
            shift("A", "u1", "2024-01-01", "09:00", "13:00"),
            shift("B", "u1", "2024-01-01", "12:00", "17:00"),
            shift("C", "u2", "2024-01-01", "12:00", "17:00"),
        ];

        assert_eq!(detect_conflicts(&shifts), detect_conflicts(&shifts));
    }

    #[test]
    fn test_empty_input() {
        assert!(detect_conflicts(&[]).is_empty());
    }

    #[test]
    fn test_read_shifts() {
        let path = PathBuf::from_str("./test_datasets/shifts_week.json").unwrap();
        let shifts = read_shifts(&path, None).unwrap();

        assert_eq!(shifts.len(), 7);
        assert_eq!(shifts[0].id, "s-100");
        assert_eq!(shifts[0].user_id, "staff-1");
        assert_eq!(shifts[0].day, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(shifts[0].role.as_deref(), Some("front_desk"));
        assert_eq!(shifts[0].status, ShiftStatus::Approved);
    }

    #[test]
    fn test_conflicts_from_json_file() {
        let path = PathBuf::from_str("./test_datasets/shifts_week.json").unwrap();
        let shifts = read_shifts(&path, None).unwrap();

        assert_eq!(detect_conflicts(&shifts), ids(&["s-100", "s-101"]));
    }

    #[test]
    fn test_park_timezone_keeps_shift_days() {
        let path = PathBuf::from_str("./test_datasets/shifts_week.json").unwrap();
        let shifts = read_shifts(&path, Some(Denver)).unwrap();

        assert_eq!(shifts[1].day, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(detect_conflicts(&shifts), ids(&["s-100", "s-101"]));
    }

    #[test]
    fn test_park_timezone_lines_up_instants_with_clock_times() {
        let path = PathBuf::from_str("./test_datasets/shifts_instants.json").unwrap();

        // read as UTC the instant shift starts after midnight
        let shifts = read_shifts(&path, None).unwrap();
        assert!(detect_conflicts(&shifts).is_empty());

        // 02:30 UTC is 20:30 in Denver, inside the 20:00-22:00 shift
        let shifts = read_shifts(&path, Some(Denver)).unwrap();
        assert_eq!(detect_conflicts(&shifts), ids(&["i-1", "i-2"]));
    }

    #[test]
    fn test_unknown_status_does_not_block_the_file() {
        let path = PathBuf::from_str("./test_datasets/shifts_unknown_status.json").unwrap();
        let shifts = read_shifts(&path, None).unwrap();

        assert_eq!(shifts.len(), 3);
        assert_eq!(shifts[2].status, ShiftStatus::Unknown);
        assert_eq!(detect_conflicts(&shifts), ids(&["A", "B"]));
    }

    #[test]
    fn test_read_missing_file() {
        let path = PathBuf::from_str("./test_datasets/does_not_exist.json").unwrap();
        assert!(read_shifts(&path, None).is_err());
    }
}
