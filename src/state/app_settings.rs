use crate::state::loader::SnapshotSource;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

pub const EVENT_JSON_VAR: &str = "FRCTUI_EVENT_JSON";
pub const REFRESH_SECS_VAR: &str = "FRCTUI_REFRESH_SECS";
pub const LOG_LEVEL_VAR: &str = "FRCTUI_LOG_LEVEL";

const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub source: SnapshotSource,
    /// `None` turns periodic reloading off.
    pub refresh_period: Option<Duration>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            source: SnapshotSource::Demo,
            refresh_period: Some(Duration::from_secs(DEFAULT_REFRESH_SECS)),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let source = get(EVENT_JSON_VAR)
            .map(|path| SnapshotSource::File(PathBuf::from(path)))
            .unwrap_or(defaults.source);

        let refresh_period = match get(REFRESH_SECS_VAR).map(|v| v.parse::<u64>()) {
            Some(Ok(0)) => None,
            Some(Ok(secs)) => Some(Duration::from_secs(secs)),
            Some(Err(_)) | None => defaults.refresh_period,
        };

        let log_level = get(LOG_LEVEL_VAR).and_then(|v| v.parse::<LevelFilter>().ok());

        Self { full_screen: false, log_level, source, refresh_period }
    }

    /// Periodic reloads only make sense for a file another process may rewrite.
    pub fn effective_refresh_period(&self) -> Option<Duration> {
        self.refresh_period.filter(|_| self.source.is_refreshable())
    }
}
