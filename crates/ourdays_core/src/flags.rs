//! Injectable key-value flag store and once-per-day gating.
//!
//! # Responsibility
//! - Replace ad-hoc global "already shown today" state with an explicit
//!   store abstraction, so popup gating is testable without a UI runtime.
//!
//! # Invariants
//! - Flag keys are non-empty.
//! - [`DailyFlag::claim`] returns true at most once per key per calendar day
//!   against a given store.

use crate::calendar::format_date;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type FlagResult<T> = Result<T, FlagError>;

/// Flag store failure.
#[derive(Debug)]
pub enum FlagError {
    /// The key is empty or whitespace-only.
    InvalidKey(String),
    /// The backing store failed.
    Storage(String),
}

impl Display for FlagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid flag key: `{key}`"),
            Self::Storage(message) => write!(f, "flag storage failure: {message}"),
        }
    }
}

impl Error for FlagError {}

impl From<rusqlite::Error> for FlagError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

/// String key-value store behind the flag logic. Implementations must treat
/// `set` as an upsert.
pub trait FlagStore {
    fn get_flag(&self, key: &str) -> FlagResult<Option<String>>;
    fn set_flag(&self, key: &str, value: &str) -> FlagResult<()>;
}

/// In-memory store for tests and UI shells without a database.
#[derive(Default)]
pub struct MemoryFlagStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_flag(&self, key: &str) -> FlagResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| FlagError::Storage("flag store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set_flag(&self, key: &str, value: &str) -> FlagResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| FlagError::Storage("flag store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite-backed store over the `app_flags` table.
pub struct SqliteFlagStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFlagStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FlagStore for SqliteFlagStore<'_> {
    fn get_flag(&self, key: &str) -> FlagResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_flags WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        Ok(value)
    }

    fn set_flag(&self, key: &str, value: &str) -> FlagResult<()> {
        self.conn.execute(
            "INSERT INTO app_flags (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            [key, value],
        )?;
        Ok(())
    }
}

/// Once-per-day gate for a named UI moment (holiday popup, install banner).
///
/// The stored value is the formatted day the flag last fired, so a new day
/// naturally re-arms the gate.
#[derive(Debug, Clone)]
pub struct DailyFlag {
    key: String,
}

impl DailyFlag {
    pub fn new(key: impl Into<String>) -> FlagResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(FlagError::InvalidKey(key));
        }
        Ok(Self { key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the flag already fired on `today`.
    pub fn fired_on(&self, store: &dyn FlagStore, today: NaiveDate) -> FlagResult<bool> {
        Ok(store.get_flag(&self.key)? == Some(format_date(today)))
    }

    /// Check-and-set: returns true exactly when this call claimed `today`,
    /// false when some earlier call already did.
    pub fn claim(&self, store: &dyn FlagStore, today: NaiveDate) -> FlagResult<bool> {
        if self.fired_on(store, today)? {
            return Ok(false);
        }
        store.set_flag(&self.key, &format_date(today))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{DailyFlag, FlagError, FlagStore, MemoryFlagStore};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn set_then_get_roundtrip() {
        let store = MemoryFlagStore::new();
        assert_eq!(store.get_flag("greeting").unwrap(), None);

        store.set_flag("greeting", "hello").unwrap();
        assert_eq!(
            store.get_flag("greeting").unwrap(),
            Some("hello".to_string())
        );

        store.set_flag("greeting", "replaced").unwrap();
        assert_eq!(
            store.get_flag("greeting").unwrap(),
            Some("replaced".to_string())
        );
    }

    #[test]
    fn daily_flag_claims_once_per_day() {
        let store = MemoryFlagStore::new();
        let flag = DailyFlag::new("holiday_popup").unwrap();
        let today = date(2026, 2, 14);

        assert!(!flag.fired_on(&store, today).unwrap());
        assert!(flag.claim(&store, today).unwrap());
        assert!(flag.fired_on(&store, today).unwrap());
        assert!(!flag.claim(&store, today).unwrap());
    }

    #[test]
    fn daily_flag_rearms_on_a_new_day() {
        let store = MemoryFlagStore::new();
        let flag = DailyFlag::new("holiday_popup").unwrap();

        assert!(flag.claim(&store, date(2026, 2, 14)).unwrap());
        assert!(flag.claim(&store, date(2026, 2, 15)).unwrap());
        assert!(!flag.claim(&store, date(2026, 2, 15)).unwrap());
    }

    #[test]
    fn empty_keys_are_rejected() {
        assert!(matches!(
            DailyFlag::new("   "),
            Err(FlagError::InvalidKey(_))
        ));
    }

    #[test]
    fn independent_flags_do_not_interfere() {
        let store = MemoryFlagStore::new();
        let popup = DailyFlag::new("holiday_popup").unwrap();
        let banner = DailyFlag::new("install_banner").unwrap();
        let today = date(2026, 2, 14);

        assert!(popup.claim(&store, today).unwrap());
        assert!(banner.claim(&store, today).unwrap());
        assert!(!popup.claim(&store, today).unwrap());
    }
}
