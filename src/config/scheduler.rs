use std::env;

/// Reminder scheduler timing.
///
/// With the defaults the dispatch window is twenty minutes wide and scanned
/// every minute, so a pending lesson gets roughly twenty delivery attempts
/// before it can drift out of the window.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub tick_interval_secs: u64,
    pub window_start_mins: i64,
    pub window_end_mins: i64,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            tick_interval_secs: env::var("REMINDER_TICK_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            window_start_mins: env::var("REMINDER_WINDOW_START_MINS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            window_end_mins: env::var("REMINDER_WINDOW_END_MINS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}
