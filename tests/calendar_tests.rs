use attendance_calendar::calendar::{BlockReason, EditRejection, RuleEngine, SwapStatus};
use attendance_calendar::{HolidayCalendar, WorkdaySwapRegistry, YearOverrides};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_engine_weekends_blocked() {
    let engine = RuleEngine::default();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    assert_eq!(
        engine.block_reason(date(2025, 1, 4)),
        Some(BlockReason::Weekend)
    );
    assert!(engine.is_blocked(date(2025, 1, 5)));
}

#[test]
fn working_saturday_is_forced_open() {
    let engine = RuleEngine::default();
    let saturday = date(2025, 5, 17);
    assert_eq!(saturday.weekday(), Weekday::Sat);
    assert!(!engine.is_blocked(saturday));
}

#[test]
fn shifted_rest_day_is_forced_closed() {
    let engine = RuleEngine::default();
    let friday = date(2025, 5, 2);
    assert_eq!(friday.weekday(), Weekday::Fri);
    assert_eq!(engine.block_reason(friday), Some(BlockReason::RestDay));
}

#[test]
fn public_holiday_wins_over_working_weekend() {
    // 2025-03-15 (National Day) is a Saturday.
    let holiday_saturday = date(2025, 3, 15);
    let swaps = WorkdaySwapRegistry::new(BTreeMap::from([(
        2025,
        YearOverrides::new([holiday_saturday], [date(2025, 3, 14)]),
    )]))
    .unwrap();
    let engine = RuleEngine::new(HolidayCalendar::hungary(), swaps);
    let rules = engine.rule_set_for(2025);
    assert!(rules.working_weekends().contains(&holiday_saturday));
    assert!(rules.public_holidays().contains(&holiday_saturday));
    assert_eq!(
        engine.block_reason(holiday_saturday),
        Some(BlockReason::PublicHoliday)
    );
}

#[test]
fn rest_day_reported_before_weekend_and_after_holiday() {
    // 2026-12-24 is a Thursday rest day; 2026-12-25 is Christmas.
    let engine = RuleEngine::default();
    assert_eq!(
        engine.block_reason(date(2026, 12, 24)),
        Some(BlockReason::RestDay)
    );
    assert_eq!(
        engine.block_reason(date(2026, 12, 25)),
        Some(BlockReason::PublicHoliday)
    );
}

#[test]
fn plain_weekdays_are_never_blocked() {
    let engine = RuleEngine::default();
    for year in [2024, 2025, 2026, 2031] {
        let rules = engine.rule_set_for(year);
        let mut day = date(year, 1, 1);
        while day.year() == year {
            let weekday = !matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
            if weekday
                && !rules.public_holidays().contains(&day)
                && !rules.rest_days().contains(&day)
            {
                assert!(!engine.is_blocked(day), "{day} should be editable");
            }
            day = day.succ_opt().unwrap();
        }
    }
}

#[test]
fn rule_set_is_memoized_and_equal() {
    let engine = RuleEngine::default();
    let first = engine.rule_set_for(2025);
    let second = engine.rule_set_for(2025);
    assert_eq!(*first, *second);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.year(), 2025);
    assert_eq!(first.swap_status(), SwapStatus::Ok);
}

#[test]
fn year_without_overrides_reports_missing() {
    let engine = RuleEngine::default();
    let rules = engine.rule_set_for(2030);
    assert_eq!(rules.swap_status(), SwapStatus::Missing);
    assert!(rules.working_weekends().is_empty());
    assert!(rules.rest_days().is_empty());
    assert!(!rules.public_holidays().is_empty());
}

#[test]
fn replacing_overrides_invalidates_cache() {
    let engine = RuleEngine::default();
    assert_eq!(engine.rule_set_for(2027).swap_status(), SwapStatus::Missing);
    // 2027-01-02 is a Saturday
    let saturday = date(2027, 1, 2);
    assert!(engine.is_blocked(saturday));

    let mut table = WorkdaySwapRegistry::hungary().table().clone();
    table.insert(2027, YearOverrides::new([saturday], [date(2027, 1, 8)]));
    engine.replace_overrides(WorkdaySwapRegistry::new(table).unwrap());

    assert_eq!(engine.rule_set_for(2027).swap_status(), SwapStatus::Ok);
    assert!(!engine.is_blocked(saturday));
    assert_eq!(
        engine.block_reason(date(2027, 1, 8)),
        Some(BlockReason::RestDay)
    );
}

#[test]
fn reconfigure_swaps_holiday_locale() {
    let engine = RuleEngine::default();
    let national_day = date(2027, 3, 15); // Monday
    assert!(engine.is_blocked(national_day));
    engine.reconfigure(
        HolidayCalendar::new(Vec::new(), Vec::new()).unwrap(),
        WorkdaySwapRegistry::default(),
    );
    assert!(!engine.is_blocked(national_day));
}

#[test]
fn past_month_lock_only_allows_current_month() {
    let engine = RuleEngine::default();
    let today = date(2025, 5, 10);
    let this_month = date(2025, 5, 5);
    let last_month = date(2025, 4, 7);
    let next_month = date(2025, 6, 2);

    assert!(engine.is_editable(last_month, today, false));
    assert!(engine.is_editable(this_month, today, true));
    assert_eq!(
        engine.check_editable(last_month, today, true),
        Err(EditRejection::MonthLocked)
    );
    assert_eq!(
        engine.check_editable(next_month, today, true),
        Err(EditRejection::MonthLocked)
    );
    // Same month number in a different year is still another month.
    assert!(!engine.is_editable(date(2024, 5, 6), today, true));
}

#[test]
fn blocked_rejection_takes_precedence_over_month_lock() {
    let engine = RuleEngine::default();
    let today = date(2025, 5, 10);
    assert_eq!(
        engine.check_editable(date(2025, 4, 21), today, true),
        Err(EditRejection::Blocked(BlockReason::PublicHoliday))
    );
}

#[test]
fn working_days_in_range_skips_blocked_days() {
    let engine = RuleEngine::default();
    let start = date(2025, 5, 1);
    let end = date(2025, 5, 31);
    let days = engine.working_days_in_range(start, end);
    assert!(days.iter().all(|d| !engine.is_blocked(*d)));
    assert!(!days.contains(&date(2025, 5, 1)));
    assert!(engine.working_days_in_range(end, start).is_empty());
    assert_eq!(days.len(), 21);
    assert_eq!(days.first().copied(), Some(date(2025, 5, 5)));
    assert!(days.contains(&date(2025, 5, 17)));
}

#[test]
fn concurrent_lookups_share_one_consistent_cache() {
    let engine = RuleEngine::default();
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| engine.rule_set_for(2026)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for rules in &results {
        assert_eq!(**rules, *results[0]);
    }
    assert!(Arc::ptr_eq(&engine.rule_set_for(2026), &engine.rule_set_for(2026)));
}
