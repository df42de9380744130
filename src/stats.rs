use chrono::{Duration as ChronoDuration, NaiveDate};
use itertools::Itertools;

use crate::domain::Session;

pub const WEEK_DAYS: usize = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub label: String,
    pub focus_sec: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryShare {
    pub name: String,
    pub focus_sec: u64,
    pub percent: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusSummary {
    pub today_focus_sec: u64,
    pub all_time_focus_sec: u64,
    pub all_time_distractions: u64,
    pub session_count: usize,
    pub completed_count: usize,
    pub last_seven_days: Vec<DayBucket>,
    pub by_category: Vec<CategoryShare>,
}

pub fn summarize(sessions: &[Session], today: NaiveDate) -> FocusSummary {
    let days: Vec<(&Session, Option<NaiveDate>)> =
        sessions.iter().map(|s| (s, s.local_day())).collect();

    let today_focus_sec: u64 = days
        .iter()
        .filter(|(_, day)| *day == Some(today))
        .map(|(s, _)| s.duration_sec)
        .sum();

    let last_seven_days: Vec<DayBucket> = (0..WEEK_DAYS)
        .rev()
        .map(|back| {
            let date = today - ChronoDuration::days(back as i64);
            let focus_sec: u64 = days
                .iter()
                .filter(|(_, day)| *day == Some(date))
                .map(|(s, _)| s.duration_sec)
                .sum();
            DayBucket {
                date,
                label: date.format("%a").to_string(),
                focus_sec,
            }
        })
        .collect();

    FocusSummary {
        today_focus_sec,
        all_time_focus_sec: sessions.iter().map(|s| s.duration_sec).sum(),
        all_time_distractions: sessions.iter().map(|s| u64::from(s.distractions)).sum(),
        session_count: sessions.len(),
        completed_count: sessions.iter().filter(|s| s.completed).count(),
        last_seven_days,
        by_category: category_shares(sessions),
    }
}

fn category_shares(sessions: &[Session]) -> Vec<CategoryShare> {
    let totals: Vec<(String, u64)> = sessions
        .iter()
        .map(|s| (s.category.clone(), s.duration_sec))
        .into_grouping_map()
        .sum()
        .into_iter()
        .sorted_by(|(a_name, a_secs), (b_name, b_secs)| {
            b_secs.cmp(a_secs).then_with(|| a_name.cmp(b_name))
        })
        .collect();

    let secs: Vec<u64> = totals.iter().map(|(_, secs)| *secs).collect();
    let percents = largest_remainder_percents(&secs);

    totals
        .into_iter()
        .zip(percents)
        .map(|((name, focus_sec), percent)| CategoryShare {
            name,
            focus_sec,
            percent,
        })
        .collect()
}

fn largest_remainder_percents(values: &[u64]) -> Vec<u8> {
    let total: u128 = values.iter().map(|&v| u128::from(v)).sum();
    if total == 0 {
        return vec![0; values.len()];
    }

    let scaled: Vec<(u128, u128)> = values
        .iter()
        .map(|&v| {
            let numerator = u128::from(v) * 100;
            (numerator / total, numerator % total)
        })
        .collect();

    let mut percents: Vec<u8> = scaled.iter().map(|(floor, _)| *floor as u8).collect();
    let assigned: u128 = scaled.iter().map(|(floor, _)| floor).sum();
    let missing = (100 - assigned) as usize;

    let order = (0..values.len())
        .sorted_by(|&a, &b| scaled[b].1.cmp(&scaled[a].1).then(a.cmp(&b)));
    for index in order.take(missing) {
        percents[index] += 1;
    }
    percents
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    fn session_on(date: NaiveDate, category: &str, seconds: u64, distractions: u32) -> Session {
        let at = Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap();
        Session {
            id: format!("{}-{}", date, seconds),
            category: category.to_string(),
            duration_sec: seconds,
            distractions,
            date: at.to_rfc3339(),
            completed: true,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_all_time_totals() {
        let today = day(2026, 10, 16);
        let sessions = vec![
            session_on(today, "Study", 600, 1),
            session_on(day(2026, 10, 15), "Study", 300, 2),
        ];

        let summary = summarize(&sessions, today);
        assert_eq!(summary.today_focus_sec, 600);
        assert_eq!(summary.all_time_focus_sec, 900);
        assert_eq!(summary.all_time_distractions, 3);
        assert_eq!(summary.session_count, 2);
        assert_eq!(summary.completed_count, 2);
    }

    #[test]
    fn test_week_buckets_cover_seven_days_with_zero_gaps() {
        let today = day(2026, 10, 16);
        let sessions = vec![
            session_on(today, "Study", 60, 0),
            session_on(day(2026, 10, 14), "Coding", 120, 0),
            session_on(day(2026, 10, 14), "Study", 30, 0),
            session_on(day(2026, 10, 1), "Study", 999, 0),
        ];

        let week = summarize(&sessions, today).last_seven_days;
        assert_eq!(week.len(), WEEK_DAYS);
        assert_eq!(week.first().map(|b| b.date), Some(day(2026, 10, 10)));
        assert_eq!(week.last().map(|b| b.date), Some(today));
        assert_eq!(week[6].focus_sec, 60);
        assert_eq!(week[6].label, "Fri");
        assert_eq!(week[4].focus_sec, 150);
        assert_eq!(week[5].focus_sec, 0);
        assert_eq!(week.iter().map(|b| b.focus_sec).sum::<u64>(), 210);
    }

    #[test]
    fn test_category_shares_sum_and_sort() {
        let today = day(2026, 10, 16);
        let sessions = vec![
            session_on(today, "Reading", 100, 0),
            session_on(today, "Coding", 100, 0),
            session_on(today, "Study", 100, 0),
            session_on(today, "Coding", 50, 0),
        ];

        let shares = summarize(&sessions, today).by_category;
        let names: Vec<_> = shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Coding", "Reading", "Study"]);
        assert_eq!(shares[0].focus_sec, 150);
        assert_eq!(shares.iter().map(|s| u32::from(s.percent)).sum::<u32>(), 100);
        assert_eq!(shares[0].percent, 43);
    }

    #[test]
    fn test_zero_focus_gives_zero_percent() {
        let today = day(2026, 10, 16);
        let sessions = vec![session_on(today, "Other", 0, 0)];
        let shares = summarize(&sessions, today).by_category;
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].percent, 0);
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(&[], day(2026, 1, 1));
        assert_eq!(summary.all_time_focus_sec, 0);
        assert!(summary.by_category.is_empty());
        assert!(summary.last_seven_days.iter().all(|b| b.focus_sec == 0));
    }

    #[test]
    fn test_unparsable_dates_count_only_toward_all_time() {
        let today = day(2026, 10, 16);
        let mut broken = session_on(today, "Study", 500, 0);
        broken.date = "not a date".to_string();

        let summary = summarize(&[broken], today);
        assert_eq!(summary.today_focus_sec, 0);
        assert_eq!(summary.all_time_focus_sec, 500);
        assert_eq!(summary.by_category[0].percent, 100);
    }

    #[test]
    fn test_largest_remainder_percents() {
        assert_eq!(largest_remainder_percents(&[1, 1, 1]), vec![34, 33, 33]);
        assert_eq!(largest_remainder_percents(&[3, 0]), vec![100, 0]);
        assert_eq!(largest_remainder_percents(&[]), Vec::<u8>::new());
        assert_eq!(largest_remainder_percents(&[2, 1]), vec![67, 33]);
    }
}
