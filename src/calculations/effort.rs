use crate::calendar::BusinessCalendar;
use chrono::NaiveDate;

/// Tolerance for float drift when effort is consumed day by day.
pub(crate) const EPSILON: f64 = 1e-9;

/// Wider than any span `NaiveDate` can represent.
const MAX_SPAN_DAYS: f64 = 1.0e9;

/// Where a dependent task begins and how much of that day is already taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartSlot {
    pub start_date: NaiveDate,
    pub used_capacity: f64,
}

/// Date on which `effort` working days are fully consumed, or `None` when
/// that date lies past the end of the calendar.
///
/// The start day offers `1 - used_capacity`; every following business day
/// offers a full day. Effort that exactly exhausts a day ends on that day.
pub fn compute_end_date(
    calendar: &BusinessCalendar,
    start_date: NaiveDate,
    effort: f64,
    used_capacity: f64,
) -> Option<NaiveDate> {
    let available = 1.0 - used_capacity;
    let remaining = effort - effort.min(available);
    if remaining <= EPSILON {
        return Some(start_date);
    }

    let extra_days = (remaining - EPSILON).ceil();
    if !extra_days.is_finite() || extra_days > MAX_SPAN_DAYS {
        return None;
    }
    calendar.advance_business_days(start_date, extra_days as u64)
}

/// Capacity left on the end date for whichever task starts there.
///
/// `1 - (effort mod 1) + predecessor_remaining`, folded into `[0, 1)` by
/// dropping whole days. Whole-day effort therefore leaves nothing behind.
pub fn remaining_capacity_at_end(effort: f64, predecessor_remaining: f64) -> f64 {
    let fractional = effort % 1.0;
    let remaining = 1.0 - fractional + predecessor_remaining;
    let folded = if remaining >= 1.0 {
        remaining - remaining.floor()
    } else {
        remaining
    };

    if folded < EPSILON || folded > 1.0 - EPSILON {
        0.0
    } else {
        folded
    }
}

/// Start slot for a task that follows a dependency ending on `dependency_end`.
pub fn resolve_next_available(
    calendar: &BusinessCalendar,
    dependency_end: NaiveDate,
    dependency_remaining: f64,
) -> Option<StartSlot> {
    if dependency_remaining > 0.0 {
        Some(StartSlot {
            start_date: dependency_end,
            used_capacity: 1.0 - dependency_remaining,
        })
    } else {
        Some(StartSlot {
            start_date: calendar.next_business_day(dependency_end)?,
            used_capacity: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shared_day_consumes_predecessor_leftover() {
        let cal = BusinessCalendar::new();
        // 0.3 days left on Tuesday, 0.5 effort spills 0.2 into Wednesday
        let end = compute_end_date(&cal, d(2024, 1, 2), 0.5, 0.7);
        assert_eq!(end, Some(d(2024, 1, 3)));
        assert!((remaining_capacity_at_end(0.5, 0.3) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn float_drift_does_not_spill_into_next_day() {
        let cal = BusinessCalendar::new();
        let leftover = remaining_capacity_at_end(0.3, 0.0);
        let slot = resolve_next_available(&cal, d(2024, 1, 2), leftover).unwrap();
        let end = compute_end_date(&cal, slot.start_date, 0.7, slot.used_capacity);
        assert_eq!(end, Some(d(2024, 1, 2)));
        assert_eq!(remaining_capacity_at_end(0.7, leftover), 0.0);
    }
}
