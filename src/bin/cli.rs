use attendance_calendar::{
    AttendanceCalendar, CalendarConfig, DayState, StatsReport, SwapStatus, load_records_from_csv,
    load_records_from_json, logging, open_store, save_records_to_csv, save_records_to_json,
    today_override,
};
use chrono::{Datelike, Days, Local, NaiveDate};
use std::io::{self, Write};
use std::path::PathBuf;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.trim().split_once('-')?;
    let year = y.parse::<i32>().ok()?;
    let month = m.parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

fn state_marker(state: DayState) -> char {
    match state {
        DayState::Empty => '.',
        DayState::Office => 'o',
        DayState::Home => 'h',
        DayState::DayOff => 'x',
    }
}

/// Monday-first month grid; `with_weeks` prepends the ISO week number.
fn render_month(
    calendar: &AttendanceCalendar,
    year: i32,
    month: u32,
    today: NaiveDate,
    with_weeks: bool,
) -> String {
    let states = match calendar.month_states(year, month) {
        Ok(states) => states,
        Err(e) => return format!("Error loading {year}-{month:02}: {e}\n"),
    };
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return format!("Invalid month {year}-{month:02}\n");
    };
    let offset = u64::from(first.weekday().num_days_from_monday());
    let Some(mut monday) = first.checked_sub_days(Days::new(offset)) else {
        return format!("Invalid month {year}-{month:02}\n");
    };

    let mut out = String::new();
    out.push_str(&format!("{year} - {}\n", month_name(month)));
    if with_weeks {
        out.push_str("Week ");
    }
    for name in WEEKDAYS {
        out.push_str(&format!(" {name} "));
    }
    out.push('\n');

    loop {
        if with_weeks {
            out.push_str(&format!("{:>4} ", monday.iso_week().week()));
        }
        for date in monday.iter_days().take(7) {
            if date.month() != month {
                out.push_str("     ");
                continue;
            }
            let marker = if calendar.engine().is_blocked(date) {
                '#'
            } else {
                states
                    .days
                    .get(&date.day())
                    .copied()
                    .map(state_marker)
                    .unwrap_or('.')
            };
            if date == today {
                out.push_str(&format!("[{:>2}{marker}]", date.day()));
            } else {
                out.push_str(&format!(" {:>2}{marker} ", date.day()));
            }
        }
        out.push('\n');

        match monday.checked_add_days(Days::new(7)) {
            Some(next) if next.year() == year && next.month() == month => monday = next,
            _ => break,
        }
    }
    out
}

fn print_stats(title: &str, report: &StatsReport) {
    let stats = &report.stats;
    println!("{title}");
    println!("  Office: {}%", stats.office);
    println!("  Home: {}%", stats.home);
    println!("  Total Working Days: {}", stats.total_working_days);
    println!(
        "  Office target: {}",
        if report.meets_office_target {
            "met"
        } else {
            "not met"
        }
    );
}

fn print_period_stats(calendar: &AttendanceCalendar, year: i32, month: Option<u32>) {
    if let Some(month) = month {
        match calendar.stats(year, Some(month)) {
            Ok(report) => print_stats(
                &format!("Monthly Statistics ({year}-{month:02})"),
                &report,
            ),
            Err(e) => println!("Error computing statistics: {e}"),
        }
    }
    match calendar.stats(year, None) {
        Ok(report) => print_stats(&format!("Yearly Statistics ({year})"), &report),
        Err(e) => println!("Error computing statistics: {e}"),
    }
}

fn print_rules(calendar: &AttendanceCalendar, year: i32) {
    let rules = match calendar.year_rules(year) {
        Ok(rules) => rules,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };
    let status = match rules.swap_status {
        SwapStatus::Ok => "ok",
        SwapStatus::Missing => "missing",
    };
    println!("Rules for {year} (swap data: {status})");
    println!("Public holidays:");
    for holiday in &rules.holidays {
        println!(
            "  {} {}  {}",
            holiday.date,
            holiday.date.format("%a"),
            holiday.name
        );
    }
    let join = |dates: &[NaiveDate]| {
        if dates.is_empty() {
            "-".to_string()
        } else {
            dates
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    println!("Working weekends: {}", join(&rules.working_weekends));
    println!("Rest days: {}", join(&rules.rest_days));
    if rules.swap_status == SwapStatus::Missing {
        println!(
            "Warning: no workday swap data for {year}; working weekends and rest days may be incomplete."
        );
    }
}

fn show_month(calendar: &AttendanceCalendar, year: i32, month: u32, today: NaiveDate) {
    print!("{}", render_month(calendar, year, month, today, true));
    println!("Legend: o office, h home, x day off, . empty, # blocked, [ ] today");
    print_period_stats(calendar, year, Some(month));
}

fn shift_month((year, month): (i32, u32), forward: bool) -> (i32, u32) {
    match (forward, month) {
        (true, 12) => (year + 1, 1),
        (true, m) => (year, m + 1),
        (false, 1) => (year - 1, 12),
        (false, m) => (year, m - 1),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show [YYYY-MM]                     Show a month (default: current view)\n  next | prev | today                Move the month view\n  year [YYYY]                        Show all months of a year (read-only)\n  rules [YYYY]                       List holidays, working weekends and rest days\n  stats [YYYY|YYYY-MM]               Show attendance statistics\n  set <YYYY-MM-DD> <state>           Set a day (empty, office, home, day_off)\n  toggle <YYYY-MM-DD>                Cycle a day: empty > office > home > day_off\n  editable <YYYY-MM-DD>              Check whether a day can be modified\n  lock [on|off]                      Show or change the past-month lock\n  save <json|csv> <path>             Export all recorded days\n  load <json|csv> <path>             Import recorded days\n  config <json_path>                 Reload calendar configuration\n  quit|exit                          Exit"
    );
}

fn main() {
    logging::init(logging::verbosity_from_env());

    let config = match std::env::var_os("ATTENDANCE_CALENDAR_CONFIG") {
        Some(path) => match CalendarConfig::from_json_file(PathBuf::from(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {e}");
                std::process::exit(1);
            }
        },
        None => CalendarConfig::default(),
    };
    let data_path = std::env::var_os("ATTENDANCE_CALENDAR_DATA").map(PathBuf::from);
    let store = match open_store(data_path.as_deref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening day state store: {e}");
            std::process::exit(1);
        }
    };
    let mut calendar = match AttendanceCalendar::from_config(&config, store) {
        Ok(calendar) => calendar,
        Err(e) => {
            eprintln!("Error building calendar: {e}");
            std::process::exit(1);
        }
    };

    let today = today_override().unwrap_or_else(|| Local::now().date_naive());
    let mut view = (today.year(), today.month());

    println!("Attendance Calendar (CLI) - type 'help' for commands\n");
    show_month(&calendar, view.0, view.1, today);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => {
                if let Some(arg) = parts.next() {
                    match parse_year_month(arg) {
                        Some(ym) => view = ym,
                        None => {
                            println!("Usage: show [YYYY-MM]");
                            continue;
                        }
                    }
                }
                show_month(&calendar, view.0, view.1, today);
            }
            "next" | "prev" => {
                view = shift_month(view, cmd == "next");
                show_month(&calendar, view.0, view.1, today);
            }
            "today" => {
                view = (today.year(), today.month());
                show_month(&calendar, view.0, view.1, today);
            }
            "year" => {
                let year = match parts.next().map(str::parse::<i32>) {
                    None => view.0,
                    Some(Ok(year)) => year,
                    Some(Err(_)) => {
                        println!("Usage: year [YYYY]");
                        continue;
                    }
                };
                if let Err(e) = attendance_calendar::validate_year(year) {
                    println!("Error: {e}");
                    continue;
                }
                println!("{year} - All Year");
                for month in 1..=12 {
                    print!("{}", render_month(&calendar, year, month, today, false));
                    println!();
                }
                print_period_stats(&calendar, year, None);
            }
            "rules" => match parts.next().map(str::parse::<i32>) {
                None => print_rules(&calendar, view.0),
                Some(Ok(year)) => print_rules(&calendar, year),
                Some(Err(_)) => println!("Usage: rules [YYYY]"),
            },
            "stats" => match parts.next() {
                None => print_period_stats(&calendar, view.0, Some(view.1)),
                Some(arg) => {
                    if let Some((year, month)) = parse_year_month(arg) {
                        print_period_stats(&calendar, year, Some(month));
                    } else if let Ok(year) = arg.parse::<i32>() {
                        print_period_stats(&calendar, year, None);
                    } else {
                        println!("Usage: stats [YYYY|YYYY-MM]");
                    }
                }
            },
            "set" => {
                let date = parts.next().and_then(parse_date);
                let state = parts.next().map(str::parse::<DayState>);
                match (date, state) {
                    (Some(date), Some(Ok(state))) => {
                        match calendar.set_day_state(date, state, today) {
                            Ok(stored) => println!("Set {date} to {stored}."),
                            Err(e) => println!("Cannot modify {date}: {e}"),
                        }
                    }
                    (Some(_), Some(Err(e))) => println!("{e}"),
                    _ => println!("Usage: set <YYYY-MM-DD> <empty|office|home|day_off>"),
                }
            }
            "toggle" => match parts.next().and_then(parse_date) {
                Some(date) => match calendar.cycle_day_state(date, today) {
                    Ok(stored) => println!("{date} is now {stored}."),
                    Err(e) => println!("Cannot modify {date}: {e}"),
                },
                None => println!("Usage: toggle <YYYY-MM-DD>"),
            },
            "editable" => match parts.next().and_then(parse_date) {
                Some(date) => match calendar.check_editable(date, today) {
                    Ok(()) => println!("{date} is editable."),
                    Err(rejection) => println!("{date} is not editable ({rejection})."),
                },
                None => println!("Usage: editable <YYYY-MM-DD>"),
            },
            "lock" => {
                match parts.next() {
                    None => {}
                    Some("on") => calendar.set_lock_past_months(true),
                    Some("off") => calendar.set_lock_past_months(false),
                    Some(_) => {
                        println!("Usage: lock [on|off]");
                        continue;
                    }
                }
                let label = if calendar.lock_past_months() {
                    "on"
                } else {
                    "off"
                };
                println!("Past-month lock: {label}");
            }
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some(fmt @ ("json" | "csv")), Some(path)) => {
                        let result = calendar.export_records().map_err(|e| e.to_string()).and_then(
                            |records| {
                                let written = if fmt == "json" {
                                    save_records_to_json(&records, path)
                                } else {
                                    save_records_to_csv(&records, path)
                                };
                                written.map(|_| records.len()).map_err(|e| e.to_string())
                            },
                        );
                        match result {
                            Ok(count) => println!("Saved {count} records to {path}"),
                            Err(e) => println!("Error saving records: {e}"),
                        }
                    }
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some(fmt @ ("json" | "csv")), Some(path)) => {
                        let loaded = if fmt == "json" {
                            load_records_from_json(path)
                        } else {
                            load_records_from_csv(path)
                        };
                        let result = loaded
                            .map_err(|e| e.to_string())
                            .and_then(|records| {
                                calendar.import_records(&records).map_err(|e| e.to_string())
                            });
                        match result {
                            Ok(count) => println!("Loaded {count} records from {path}"),
                            Err(e) => println!("Error loading records: {e}"),
                        }
                    }
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            "config" => match parts.next() {
                Some(path) => match CalendarConfig::from_json_file(path)
                    .and_then(|config| calendar.reload_config(&config))
                {
                    Ok(()) => println!("Configuration reloaded from {path}"),
                    Err(e) => println!("Error loading configuration: {e}"),
                },
                None => println!("Usage: config <json_path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
