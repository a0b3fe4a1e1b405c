use crate::staff_shift::{conflicts::detect_conflicts, shift::Shift};
use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSummary {
    pub user_id: String,
    pub start_of_week: String,
    pub shift_count: usize,
    pub scheduled_minutes: i64,
    pub actual_minutes: i64,
    pub conflicting_shifts: Vec<String>,
}

/// Per staff member and week totals for the scheduling view. Conflicting
/// shifts are listed but left out of the minute totals.
pub fn summarize_shifts(shifts: &[Shift]) -> Vec<ShiftSummary> {
    let conflicts = detect_conflicts(shifts);

    let mut summaries: BTreeMap<(String, NaiveDate), ShiftSummary> = BTreeMap::new();
    for shift in shifts {
        let Some(day) = shift.day else {
            continue;
        };
        let Some(start_of_week) = start_of_week(day) else {
            tracing::debug!(shift_id = %shift.id, %day, "shift day has no start of week");
            continue;
        };

        let summary = summaries
            .entry((shift.user_id.clone(), start_of_week))
            .or_insert_with(|| ShiftSummary {
                user_id: shift.user_id.clone(),
                start_of_week: start_of_week.to_string(),
                shift_count: 0,
                scheduled_minutes: 0,
                actual_minutes: 0,
                conflicting_shifts: vec![],
            });
        summary.shift_count += 1;

        if conflicts.contains(&shift.id) {
            summary.conflicting_shifts.push(shift.id.clone());
            continue;
        }

        summary.scheduled_minutes = summary
            .scheduled_minutes
            .saturating_add(scheduled_minutes(shift));
        summary.actual_minutes = summary
            .actual_minutes
            .saturating_add(shift.actual_minutes.unwrap_or(0));
    }

    summaries.into_values().collect()
}

fn scheduled_minutes(shift: &Shift) -> i64 {
    shift
        .scheduled_minutes
        .or_else(|| shift.span_minutes())
        .unwrap_or(0)
}

// weeks start on Sunday
fn start_of_week(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(day.weekday().num_days_from_sunday() as u64))
}
