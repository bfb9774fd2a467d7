use attendance_calendar::holidays::{FIRST_GREGORIAN_YEAR, hungarian_fixed_holidays};
use attendance_calendar::{EasterHoliday, FixedHoliday, HolidayCalendar, easter_sunday};
use chrono::{Datelike, NaiveDate, Weekday};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn easter_matches_known_dates() {
    let known = [
        (1818, date(1818, 3, 22)),
        (1943, date(1943, 4, 25)),
        (2000, date(2000, 4, 23)),
        (2019, date(2019, 4, 21)),
        (2024, date(2024, 3, 31)),
        (2025, date(2025, 4, 20)),
        (2026, date(2026, 4, 5)),
        (2038, date(2038, 4, 25)),
        (2285, date(2285, 3, 22)),
    ];
    for (year, expected) in known {
        assert_eq!(easter_sunday(year), Some(expected), "easter {year}");
    }
}

#[test]
fn easter_is_always_a_sunday_between_march_22_and_april_25() {
    for year in FIRST_GREGORIAN_YEAR..=4099 {
        let easter = easter_sunday(year).unwrap();
        assert_eq!(easter.weekday(), Weekday::Sun, "easter {year}");
        assert!(easter >= date(year, 3, 22), "easter {year} too early");
        assert!(easter <= date(year, 4, 25), "easter {year} too late");
    }
}

#[test]
fn easter_undefined_before_gregorian_reform() {
    assert_eq!(easter_sunday(1582), None);
    assert_eq!(easter_sunday(1000), None);
}

#[test]
fn movable_holidays_for_2025() {
    let holidays = HolidayCalendar::hungary().public_holidays(2025);
    assert!(holidays.contains(&date(2025, 4, 18)), "Good Friday");
    assert!(holidays.contains(&date(2025, 4, 21)), "Easter Monday");
    assert!(holidays.contains(&date(2025, 6, 9)), "Pentecost Monday");
    assert!(!holidays.contains(&date(2025, 4, 20)), "Easter Sunday itself");
    assert_eq!(holidays.len(), 11);
}

#[test]
fn fixed_holidays_present_every_year() {
    let calendar = HolidayCalendar::hungary();
    for year in [1583, 1900, 2000, 2024, 2025, 2026, 2100, 9999] {
        let holidays = calendar.public_holidays(year);
        for fixed in hungarian_fixed_holidays() {
            assert!(
                holidays.contains(&date(year, fixed.month, fixed.day)),
                "{} missing in {year}",
                fixed.name
            );
        }
    }
}

#[test]
fn named_holidays_are_sorted_and_labelled() {
    let calendar = HolidayCalendar::hungary();
    let named = calendar.named_holidays(2026);
    let dates: Vec<NaiveDate> = named.iter().map(|(d, _)| *d).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
    assert_eq!(named.first().unwrap(), &(date(2026, 1, 1), "New Year's Day"));
    assert!(named.contains(&(date(2026, 4, 3), "Good Friday")));
    assert!(named.contains(&(date(2026, 5, 25), "Pentecost Monday")));
}

#[test]
fn custom_locale_substitutes_its_own_lists() {
    let calendar = HolidayCalendar::new(
        vec![FixedHoliday::new(7, 4, "Independence Day")],
        vec![EasterHoliday::new(39, "Ascension Day")],
    )
    .unwrap();
    let holidays = calendar.public_holidays(2025);
    assert_eq!(
        holidays.into_iter().collect::<Vec<_>>(),
        vec![date(2025, 5, 29), date(2025, 7, 4)]
    );
}

#[test]
fn leap_day_holiday_skipped_in_common_years() {
    let calendar =
        HolidayCalendar::new(vec![FixedHoliday::new(2, 29, "Leap Day")], Vec::new()).unwrap();
    assert!(calendar.public_holidays(2025).is_empty());
    assert!(calendar.public_holidays(2024).contains(&date(2024, 2, 29)));
}

#[test]
fn impossible_fixed_holiday_rejected() {
    let err = HolidayCalendar::new(vec![FixedHoliday::new(4, 31, "Nope")], Vec::new())
        .unwrap_err();
    assert!(err.to_string().contains("4/31"));
}

#[test]
fn years_before_reform_only_get_fixed_holidays() {
    let holidays = HolidayCalendar::hungary().public_holidays(1500);
    assert_eq!(holidays.len(), hungarian_fixed_holidays().len());
}
