#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use attendance_calendar::{
        AttendanceCalendar, CalendarConfig, http_api, logging, open_store, today_override,
    };

    logging::init(logging::verbosity_from_env());

    let addr: SocketAddr = std::env::var("ATTENDANCE_CALENDAR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
        .parse()?;

    let config = match std::env::var_os("ATTENDANCE_CALENDAR_CONFIG") {
        Some(path) => CalendarConfig::from_json_file(PathBuf::from(path))?,
        None => CalendarConfig::default(),
    };
    let data_path = std::env::var_os("ATTENDANCE_CALENDAR_DATA").map(PathBuf::from);
    let store = open_store(data_path.as_deref())?;
    let calendar = AttendanceCalendar::from_config(&config, store)?;

    let today = today_override();
    if let Some(today) = today {
        println!("Using pinned date {today}");
    }
    println!("attendance-calendar HTTP API listening on http://{addr}");
    let state = http_api::AppState::new(calendar).with_today_override(today);
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
