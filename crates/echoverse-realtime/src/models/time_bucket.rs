use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Named time range a notification is grouped under. Iteration order is
/// fixed regardless of member counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    Earlier,
}

impl TimeBucket {
    pub const ORDER: [TimeBucket; 5] = [
        Self::Today,
        Self::Yesterday,
        Self::ThisWeek,
        Self::ThisMonth,
        Self::Earlier,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::Earlier => "Earlier",
        }
    }

    /// Assign `ts` to the first matching bucket, comparing against four
    /// boundaries derived from `now`: start of today, today minus 24h,
    /// today minus 7 days, and the first of the calendar month.
    pub fn for_timestamp(now: DateTime<Utc>, ts: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let start_of_today = today.and_time(NaiveTime::MIN).and_utc();
        let start_of_yesterday = start_of_today - Duration::hours(24);
        let start_of_week = start_of_today - Duration::days(7);
        let start_of_month = today
            .with_day(1)
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
            .and_utc();

        if ts >= start_of_today {
            Self::Today
        } else if ts >= start_of_yesterday {
            Self::Yesterday
        } else if ts >= start_of_week {
            Self::ThisWeek
        } else if ts >= start_of_month {
            Self::ThisMonth
        } else {
            Self::Earlier
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn buckets_assign_by_boundary() {
        let now = at(2024, 6, 10, 12);
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 6, 10, 8)),
            TimeBucket::Today
        );
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 6, 9, 9)),
            TimeBucket::Yesterday
        );
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 6, 4, 9)),
            TimeBucket::ThisWeek
        );
        // Within 30 days but a different calendar month: not "This Month".
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 5, 2, 9)),
            TimeBucket::Earlier
        );
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 6, 1, 9)),
            TimeBucket::ThisMonth
        );
    }

    #[test]
    fn boundary_timestamps_belong_to_the_newer_bucket() {
        let now = at(2024, 6, 10, 12);
        let midnight = at(2024, 6, 10, 0);
        assert_eq!(TimeBucket::for_timestamp(now, midnight), TimeBucket::Today);
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 6, 9, 0)),
            TimeBucket::Yesterday
        );
        assert_eq!(
            TimeBucket::for_timestamp(now, at(2024, 6, 3, 0)),
            TimeBucket::ThisWeek
        );
    }

    #[test]
    fn order_is_fixed() {
        assert_eq!(TimeBucket::ORDER[0], TimeBucket::Today);
        assert_eq!(TimeBucket::ORDER[4], TimeBucket::Earlier);
    }
}
