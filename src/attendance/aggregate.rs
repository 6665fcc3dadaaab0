use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::shift::{ShiftConfig, ShiftRecord, ShiftStatus};

/// Status of a calendar day once all of its shift records are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DailyStatus {
    Completed,
    Pending,
    Absent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "total_shifts": 2,
    "completed_shifts": 1,
    "pending_shifts": 0,
    "absent_shifts": 1
}))]
pub struct MonthlyStats {
    /// Distinct days with at least one record
    pub total_shifts: u32,
    pub completed_shifts: u32,
    pub pending_shifts: u32,
    pub absent_shifts: u32,
}

/// Combines every record of one day into a single status.
///
/// The whole set is consulted, so the result does not depend on order.
/// Returns `None` for an empty set.
pub fn aggregate_day<'a, I>(records: I) -> Option<DailyStatus>
where
    I: IntoIterator<Item = &'a ShiftRecord>,
{
    let mut seen = false;
    let mut all_absent = true;
    let mut all_completed = true;
    let mut any_open = false;

    for record in records {
        seen = true;
        all_absent &= record.status == ShiftStatus::Absent;
        all_completed &= record.status == ShiftStatus::Completed;
        any_open |= matches!(record.status, ShiftStatus::CheckedIn | ShiftStatus::Pending);
    }

    if !seen {
        return None;
    }

    let status = if all_absent {
        DailyStatus::Absent
    } else if all_completed {
        DailyStatus::Completed
    } else if any_open {
        DailyStatus::Pending
    } else {
        DailyStatus::Absent
    };
    Some(status)
}

fn group_by_date<'a>(
    records: impl IntoIterator<Item = &'a ShiftRecord>,
) -> BTreeMap<NaiveDate, Vec<&'a ShiftRecord>> {
    let mut days: BTreeMap<NaiveDate, Vec<&ShiftRecord>> = BTreeMap::new();
    for record in records {
        days.entry(record.date).or_default().push(record);
    }
    days
}

/// One status per date that has records. Dates without records are left out.
pub fn aggregate_daily(records: &[ShiftRecord]) -> BTreeMap<NaiveDate, DailyStatus> {
    group_by_date(records)
        .into_iter()
        .filter_map(|(date, day)| aggregate_day(day).map(|status| (date, status)))
        .collect()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Day counters for the calendar month containing `reference`.
pub fn monthly_stats(records: &[ShiftRecord], reference: NaiveDate) -> MonthlyStats {
    let first = start_of_month(reference);
    let last = end_of_month(reference);

    let in_month = records.iter().filter(|r| r.date >= first && r.date <= last);

    let mut stats = MonthlyStats::default();
    for (_, day) in group_by_date(in_month) {
        let Some(status) = aggregate_day(day) else {
            continue;
        };
        stats.total_shifts += 1;
        match status {
            DailyStatus::Completed => stats.completed_shifts += 1,
            DailyStatus::Pending => stats.pending_shifts += 1,
            DailyStatus::Absent => stats.absent_shifts += 1,
        }
    }
    stats
}

/// Status shown for one configured shift on a given day.
///
/// Unlike [`aggregate_day`] this looks at the clock: a shift with no check-in
/// whose scheduled end has passed is shown as absent.
pub fn shift_display_status(
    config: &ShiftConfig,
    record: Option<&ShiftRecord>,
    date: NaiveDate,
    now: NaiveDateTime,
) -> ShiftStatus {
    let checked_in = record.is_some_and(|r| r.check_in.is_some());
    if !checked_in && now > date.and_time(config.end_time) {
        return ShiftStatus::Absent;
    }
    record.map_or(ShiftStatus::Pending, |r| r.status)
}

/// Window used when listing attendance history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryPeriod {
    Today,
    Week,
    #[default]
    Month,
    All,
}

impl HistoryPeriod {
    /// Weeks run Sunday through Saturday.
    pub fn contains(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        match self {
            HistoryPeriod::Today => date == reference,
            HistoryPeriod::Week => {
                let offset = reference.weekday().num_days_from_sunday() as i64;
                let start = reference
                    .checked_sub_signed(Duration::days(offset))
                    .unwrap_or(NaiveDate::MIN);
                let end = start
                    .checked_add_signed(Duration::days(6))
                    .unwrap_or(NaiveDate::MAX);
                date >= start && date <= end
            }
            HistoryPeriod::Month => {
                date >= start_of_month(reference) && date <= end_of_month(reference)
            }
            HistoryPeriod::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::ShiftType;
    use chrono::{NaiveTime, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(day: NaiveDate, shift_type: ShiftType, status: ShiftStatus) -> ShiftRecord {
        ShiftRecord {
            status,
            ..ShiftRecord::new(1, day, shift_type)
        }
    }

    fn day_of(statuses: &[ShiftStatus]) -> Vec<ShiftRecord> {
        let shifts = [ShiftType::Morning, ShiftType::Afternoon, ShiftType::Overtime];
        statuses
            .iter()
            .zip(shifts)
            .map(|(s, t)| rec(date(2026, 1, 5), t, *s))
            .collect()
    }

    #[test]
    fn all_completed_day_is_completed() {
        let records = day_of(&[ShiftStatus::Completed, ShiftStatus::Completed]);
        assert_eq!(aggregate_day(&records), Some(DailyStatus::Completed));
    }

    #[test]
    fn all_absent_day_is_absent() {
        let records = day_of(&[ShiftStatus::Absent, ShiftStatus::Absent]);
        assert_eq!(aggregate_day(&records), Some(DailyStatus::Absent));
    }

    #[test]
    fn completed_and_pending_day_is_pending() {
        let records = day_of(&[ShiftStatus::Completed, ShiftStatus::Pending]);
        assert_eq!(aggregate_day(&records), Some(DailyStatus::Pending));
    }

    #[test]
    fn checked_in_day_is_pending() {
        let records = day_of(&[ShiftStatus::CheckedIn]);
        assert_eq!(aggregate_day(&records), Some(DailyStatus::Pending));
    }

    #[test]
    fn completed_and_absent_day_falls_back_to_absent() {
        let records = day_of(&[ShiftStatus::Completed, ShiftStatus::Absent]);
        assert_eq!(aggregate_day(&records), Some(DailyStatus::Absent));
    }

    #[test]
    fn unrecognized_status_falls_back_to_absent() {
        let records = day_of(&[ShiftStatus::Completed, ShiftStatus::Unrecognized]);
        assert_eq!(aggregate_day(&records), Some(DailyStatus::Absent));
    }

    #[test]
    fn day_rule_ignores_order() {
        let mut records = day_of(&[ShiftStatus::Absent, ShiftStatus::CheckedIn, ShiftStatus::Completed]);
        let forward = aggregate_day(&records);
        records.reverse();
        assert_eq!(aggregate_day(&records), forward);
        assert_eq!(forward, Some(DailyStatus::Pending));
    }

    #[test]
    fn empty_input_has_no_days() {
        assert_eq!(aggregate_day(&[]), None);
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn daily_aggregation_groups_by_date() {
        let records = vec![
            rec(date(2026, 1, 5), ShiftType::Morning, ShiftStatus::Completed),
            rec(date(2026, 1, 6), ShiftType::Morning, ShiftStatus::Absent),
            rec(date(2026, 1, 5), ShiftType::Afternoon, ShiftStatus::Completed),
        ];
        let daily = aggregate_daily(&records);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[&date(2026, 1, 5)], DailyStatus::Completed);
        assert_eq!(daily[&date(2026, 1, 6)], DailyStatus::Absent);
        assert!(!daily.contains_key(&date(2026, 1, 7)));
    }

    #[test]
    fn daily_aggregation_is_idempotent() {
        let records = vec![
            rec(date(2026, 1, 5), ShiftType::Morning, ShiftStatus::Completed),
            rec(date(2026, 1, 5), ShiftType::Afternoon, ShiftStatus::Pending),
            rec(date(2026, 1, 9), ShiftType::Overtime, ShiftStatus::Absent),
        ];
        assert_eq!(aggregate_daily(&records), aggregate_daily(&records));
    }

    #[test]
    fn monthly_stats_counts_days() {
        let records = vec![
            rec(date(2026, 2, 2), ShiftType::Morning, ShiftStatus::Completed),
            rec(date(2026, 2, 2), ShiftType::Afternoon, ShiftStatus::Completed),
            rec(date(2026, 2, 3), ShiftType::Morning, ShiftStatus::Absent),
        ];
        assert_eq!(
            monthly_stats(&records, date(2026, 2, 15)),
            MonthlyStats {
                total_shifts: 2,
                completed_shifts: 1,
                pending_shifts: 0,
                absent_shifts: 1,
            }
        );
    }

    #[test]
    fn monthly_stats_includes_both_month_edges_only() {
        let records = vec![
            rec(date(2026, 1, 31), ShiftType::Morning, ShiftStatus::Completed),
            rec(date(2026, 2, 1), ShiftType::Morning, ShiftStatus::Completed),
            rec(date(2026, 2, 28), ShiftType::Morning, ShiftStatus::CheckedIn),
            rec(date(2026, 3, 1), ShiftType::Morning, ShiftStatus::Absent),
        ];
        let stats = monthly_stats(&records, date(2026, 2, 10));
        assert_eq!(stats.total_shifts, 2);
        assert_eq!(stats.completed_shifts, 1);
        assert_eq!(stats.pending_shifts, 1);
        assert_eq!(stats.absent_shifts, 0);
    }

    #[test]
    fn month_bounds_handle_december_and_leap_years() {
        assert_eq!(end_of_month(date(2026, 12, 9)), date(2026, 12, 31));
        assert_eq!(end_of_month(date(2028, 2, 1)), date(2028, 2, 29));
        assert_eq!(start_of_month(date(2026, 7, 19)), date(2026, 7, 1));
    }

    fn morning_config() -> ShiftConfig {
        ShiftConfig {
            shift_type: ShiftType::Morning,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            required: true,
        }
    }

    #[test]
    fn missed_shift_shows_absent_after_end_time() {
        let today = date(2026, 1, 5);
        let after_end = today.and_hms_opt(12, 30, 0).unwrap();
        let before_end = today.and_hms_opt(11, 0, 0).unwrap();

        assert_eq!(
            shift_display_status(&morning_config(), None, today, after_end),
            ShiftStatus::Absent
        );
        assert_eq!(
            shift_display_status(&morning_config(), None, today, before_end),
            ShiftStatus::Pending
        );
    }

    #[test]
    fn checked_in_shift_keeps_stored_status() {
        let today = date(2026, 1, 5);
        let mut record = rec(today, ShiftType::Morning, ShiftStatus::CheckedIn);
        record.check_in = Some(Utc.with_ymd_and_hms(2026, 1, 5, 8, 2, 0).unwrap());

        let late = today.and_hms_opt(18, 0, 0).unwrap();
        assert_eq!(
            shift_display_status(&morning_config(), Some(&record), today, late),
            ShiftStatus::CheckedIn
        );
    }

    #[test]
    fn display_rule_differs_from_day_rule() {
        let today = date(2026, 1, 5);
        let record = rec(today, ShiftType::Morning, ShiftStatus::Pending);
        let late = today.and_hms_opt(18, 0, 0).unwrap();

        assert_eq!(
            shift_display_status(&morning_config(), Some(&record), today, late),
            ShiftStatus::Absent
        );
        assert_eq!(aggregate_day([&record]), Some(DailyStatus::Pending));
    }

    #[test]
    fn week_at_calendar_edges_does_not_overflow() {
        assert!(HistoryPeriod::Week.contains(NaiveDate::MIN, NaiveDate::MIN));
        assert!(HistoryPeriod::Week.contains(NaiveDate::MAX, NaiveDate::MAX));
        assert!(!HistoryPeriod::Week.contains(date(2026, 1, 5), NaiveDate::MAX));
        assert!(HistoryPeriod::Month.contains(NaiveDate::MAX, NaiveDate::MAX));
    }

    #[test]
    fn history_week_runs_sunday_to_saturday() {
        // 2026-01-07 is a Wednesday
        let reference = date(2026, 1, 7);
        assert!(HistoryPeriod::Week.contains(date(2026, 1, 4), reference));
        assert!(HistoryPeriod::Week.contains(date(2026, 1, 10), reference));
        assert!(!HistoryPeriod::Week.contains(date(2026, 1, 3), reference));
        assert!(!HistoryPeriod::Week.contains(date(2026, 1, 11), reference));
        assert!(HistoryPeriod::Today.contains(reference, reference));
        assert!(HistoryPeriod::All.contains(date(2001, 1, 1), reference));
    }
}
