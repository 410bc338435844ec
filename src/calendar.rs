use bdays::HolidayCalendar;
use bdays::calendars::WeekendsOnly;
use chrono::{Days, NaiveDate};

/// Monday to Friday work week. Weekends carry no capacity and there is no
/// holiday table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusinessCalendar;

impl BusinessCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Check if a date carries working capacity
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        WeekendsOnly.is_bday(date)
    }

    /// Find the first business day strictly after `from`, `None` past the
    /// last representable date.
    pub fn next_business_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from.succ_opt()?;
        while !self.is_business_day(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// Step forward `steps` business days from `from`.
    ///
    /// Whole weeks are skipped in one jump, so the cost does not grow with
    /// the distance travelled.
    pub fn advance_business_days(&self, from: NaiveDate, steps: u64) -> Option<NaiveDate> {
        if steps == 0 {
            return Some(from);
        }
        // land on a business day first so a week is exactly five steps
        let mut current = self.next_business_day(from)?;
        let rest = steps - 1;
        current = current.checked_add_days(Days::new((rest / 5).checked_mul(7)?))?;
        for _ in 0..rest % 5 {
            current = self.next_business_day(current)?;
        }
        Some(current)
    }
}

/// Shorthand for [`BusinessCalendar::next_business_day`] on the default calendar.
pub fn next_business_day(date: NaiveDate) -> Option<NaiveDate> {
    BusinessCalendar::new().next_business_day(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, Weekday};

    #[test]
    fn every_weekday_advances_to_a_weekday() {
        let cal = BusinessCalendar::new();
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for _ in 0..14 {
            let next = cal.next_business_day(date).unwrap();
            assert!(next > date);
            assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
            date += Duration::days(1);
        }
    }

    #[test]
    fn week_jumps_match_single_steps() {
        let cal = BusinessCalendar::new();
        // Saturday start exercises the initial landing step
        for start in [(2024, 1, 1), (2024, 1, 5), (2024, 1, 6)] {
            let from = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
            let mut stepped = from;
            for steps in 1..=23 {
                stepped = cal.next_business_day(stepped).unwrap();
                assert_eq!(cal.advance_business_days(from, steps), Some(stepped));
            }
        }
    }

    #[test]
    fn stepping_past_the_last_date_is_none() {
        let cal = BusinessCalendar::new();
        assert_eq!(cal.next_business_day(NaiveDate::MAX), None);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(cal.advance_business_days(start, u64::MAX), None);
    }
}
