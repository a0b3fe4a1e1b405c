use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Scheduled,
    InProgress,
    Submitted,
    Approved,
    Rejected,
    /// Anything the API sends that is not one of the above. Never transitions.
    #[serde(other)]
    Unknown,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("shift cannot move from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: ShiftStatus,
    pub to: ShiftStatus,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown shift status: {0}")]
pub struct ParseStatusError(pub String);

impl ShiftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::InProgress => "in_progress",
            ShiftStatus::Submitted => "submitted",
            ShiftStatus::Approved => "approved",
            ShiftStatus::Rejected => "rejected",
            ShiftStatus::Unknown => "unknown",
        }
    }

    pub fn can_transition_to(self, next: ShiftStatus) -> bool {
        use ShiftStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (Scheduled, Submitted)
                | (InProgress, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
        )
    }

    pub fn transition(self, next: ShiftStatus) -> Result<ShiftStatus, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scheduled" => Ok(ShiftStatus::Scheduled),
            "in_progress" => Ok(ShiftStatus::InProgress),
            "submitted" => Ok(ShiftStatus::Submitted),
            "approved" => Ok(ShiftStatus::Approved),
            "rejected" => Ok(ShiftStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Shift as served by `/api/staff/shifts`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawShift {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub shift_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub status: ShiftStatus,
    #[serde(default)]
    pub scheduled_minutes: Option<i64>,
    #[serde(default)]
    pub actual_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub id: String,
    pub user_id: String,
    pub day: Option<NaiveDate>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub role: Option<String>,
    pub status: ShiftStatus,
    pub scheduled_minutes: Option<i64>,
    pub actual_minutes: Option<i64>,
}

impl Shift {
    /// Anything that fails to parse becomes `None` rather than an error.
    pub fn from_raw(raw: RawShift, timezone: Option<Tz>) -> Shift {
        let day = raw.shift_date.as_deref().and_then(parse_shift_day);
        if day.is_none() {
            tracing::debug!(shift_id = %raw.id, shift_date = ?raw.shift_date, "shift has no usable day");
        }

        let start = raw
            .start_time
            .as_deref()
            .and_then(|value| parse_shift_time(value, day, timezone));
        let end = raw
            .end_time
            .as_deref()
            .and_then(|value| parse_shift_time(value, day, timezone));
        if start.is_none() || end.is_none() {
            tracing::debug!(
                shift_id = %raw.id,
                start_time = ?raw.start_time,
                end_time = ?raw.end_time,
                "shift has no usable time range"
            );
        }

        Shift {
            id: raw.id,
            user_id: raw.user_id,
            day,
            start,
            end,
            role: raw.role,
            status: raw.status,
            scheduled_minutes: raw.scheduled_minutes,
            actual_minutes: raw.actual_minutes,
        }
    }

    /// Length of the time range in minutes, when both ends are known and in order.
    pub fn span_minutes(&self) -> Option<i64> {
        let minutes = (self.end? - self.start?).num_minutes();
        (minutes > 0).then_some(minutes)
    }
}

/// Calendar day of a shift: the date component as written. Date-only days
/// arrive as midnight UTC, so no timezone is applied here.
pub fn parse_shift_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Clock times are anchored on the shift's day, so a shift without a day
/// only gets a time when it was sent as a full instant. Full instants are
/// moved into the park timezone when one is given.
pub fn parse_shift_time(
    value: &str,
    day: Option<NaiveDate>,
    timezone: Option<Tz>,
) -> Option<NaiveDateTime> {
    let value = value.trim();
    for format in ["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"] {
        if let Ok(time) = NaiveTime::parse_from_str(value, format) {
            return day.map(|day| day.and_time(time));
        }
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(match timezone {
            Some(tz) => instant.with_timezone(&tz).naive_local(),
            None => instant.naive_local(),
        });
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
