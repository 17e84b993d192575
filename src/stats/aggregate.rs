// src/stats/aggregate.rs
// Pure shaping of aggregate query rows

use chrono::{Days, NaiveDate};
use std::collections::HashMap;

use super::types::{ActivityEntry, ChangeBreakdown, TrendPoint};
use crate::comparison::ChangeType;

/// Trend window length, today included
pub const TREND_DAYS: u64 = 7;

/// First day of the trend window ending on `today`
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(TREND_DAYS - 1)).unwrap_or(today)
}

/// One point per day of the window, oldest first; days without rows count zero
pub fn zero_fill_trend(today: NaiveDate, counts: &[(NaiveDate, i64)]) -> Vec<TrendPoint> {
    let by_day: HashMap<NaiveDate, i64> = counts.iter().copied().collect();

    window_start(today)
        .iter_days()
        .take(TREND_DAYS as usize)
        .map(|date| TrendPoint {
            date,
            issues: by_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

pub fn breakdown(counts: &[(ChangeType, i64)]) -> ChangeBreakdown {
    counts
        .iter()
        .fold(ChangeBreakdown::default(), |mut acc, (change_type, count)| {
            match change_type {
                ChangeType::Improved => acc.improved += count,
                ChangeType::Unchanged => acc.unchanged += count,
                ChangeType::Worsened => acc.worsened += count,
            }
            acc
        })
}

/// Merge both feeds newest first and keep at most `limit` entries.
/// Equal timestamps keep analyses ahead of comparisons.
pub fn merge_activity(
    analyses: Vec<ActivityEntry>,
    comparisons: Vec<ActivityEntry>,
    limit: usize,
) -> Vec<ActivityEntry> {
    let mut merged: Vec<ActivityEntry> = analyses.into_iter().chain(comparisons).collect();
    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::types::ActivityKind;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_fill_without_activity() {
        let today = day(2025, 3, 10);
        let trend = zero_fill_trend(today, &[]);

        assert_eq!(trend.len(), 7);
        assert!(trend.iter().all(|p| p.issues == 0));
        assert_eq!(trend.first().unwrap().date, day(2025, 3, 4));
        assert_eq!(trend.last().unwrap().date, today);
        for pair in trend.windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
    }

    #[test]
    fn test_zero_fill_places_counts_and_drops_outside_days() {
        let today = day(2025, 1, 2);
        let counts = [(day(2024, 12, 31), 4), (day(2025, 1, 2), 1), (day(2024, 12, 1), 99)];
        let trend = zero_fill_trend(today, &counts);

        assert_eq!(trend[0].date, day(2024, 12, 27));
        assert_eq!(trend[4].issues, 4);
        assert_eq!(trend[6].issues, 1);
        assert_eq!(trend.iter().map(|p| p.issues).sum::<i64>(), 5);
    }

    #[test]
    fn test_breakdown_counts_each_change_type() {
        let counts = [
            (ChangeType::Improved, 3),
            (ChangeType::Worsened, 2),
            (ChangeType::Unchanged, 1),
        ];
        assert_eq!(
            breakdown(&counts),
            ChangeBreakdown {
                improved: 3,
                unchanged: 1,
                worsened: 2
            }
        );
        assert_eq!(breakdown(&[]), ChangeBreakdown::default());
    }

    #[test]
    fn test_merge_activity_orders_newest_first_and_truncates() {
        let entry = |kind, minute| ActivityEntry {
            kind,
            project_name: "p".to_string(),
            version_label: None,
            issue_count: None,
            result_count: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap(),
        };

        let merged = merge_activity(
            vec![entry(ActivityKind::Analysis, 10), entry(ActivityKind::Analysis, 1)],
            vec![entry(ActivityKind::Comparison, 5), entry(ActivityKind::Comparison, 20)],
            3,
        );

        let minutes: Vec<_> = merged
            .iter()
            .map(|e| e.created_at.format("%M").to_string())
            .collect();
        assert_eq!(minutes, vec!["20", "10", "05"]);
        assert_eq!(merged[0].kind, ActivityKind::Comparison);
    }
}
