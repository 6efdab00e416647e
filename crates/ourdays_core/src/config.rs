//! Core configuration.
//!
//! One deserializable struct instead of scattered bootstrap arguments; every
//! field has a default so a missing config file still yields a working app.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration consumed by shells (CLI, future UI hosts).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// The day the relationship started; day 1 of every counter.
    pub start_date: NaiveDate,
    /// SQLite database file. `None` means in-memory (throwaway runs).
    pub db_path: Option<PathBuf>,
    /// Where rolling log files go. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            db_path: None,
            log_dir: None,
            log_level: crate::logging::default_log_level().to_string(),
        }
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 8).expect("valid built-in start date")
}
