//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ourdays_core` wiring.
//! - Print the day counter and next milestone for a quick local sanity check.

use ourdays_core::{
    calendar::{day_count, format_date, next_milestone},
    core_version, init_logging, CoreConfig,
};
use std::fs::File;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(message) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging setup failed: {message}");
            return ExitCode::FAILURE;
        }
    }

    let today = chrono::Local::now().date_naive();
    let days = day_count(today, config.start_date);
    let milestone = next_milestone(days, config.start_date);

    println!("ourdays_core version={}", core_version());
    println!(
        "together since {} (day {days})",
        format_date(config.start_date)
    );
    println!(
        "next up: {} on {} ({} days left)",
        milestone.label(),
        format_date(milestone.date),
        milestone.days_left
    );

    ExitCode::SUCCESS
}

/// Loads the JSON config given as the first argument, or defaults.
fn load_config() -> Result<CoreConfig, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file =
                File::open(&path).map_err(|err| format!("cannot open config `{path}`: {err}"))?;
            serde_json::from_reader(file)
                .map_err(|err| format!("cannot parse config `{path}`: {err}"))
        }
        None => Ok(CoreConfig::default()),
    }
}
