//! Configuration for the race feed (persisted as `racefeed.toml`).
//!
//! Only types, defaults and fallbacks live here. Locating and reading the file
//! is done by the daemon crate.

use serde::{Deserialize, Serialize};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "racefeed.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySetting>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed: FeedSettings::default(),
            source: SourceSettings::default(),
            categories: default_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedSettings {
    #[serde(default = "default_fetch_interval")]
    pub fetch_interval_secs: u64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// How long an event stays listed after its advertised start.
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: i64,
    #[serde(default = "default_max_display")]
    pub max_display: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            fetch_interval_secs: default_fetch_interval(),
            tick_interval_secs: default_tick_interval(),
            grace_period_secs: default_grace_period(),
            max_display: default_max_display(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Result-count hint passed to the `nextraces` endpoint.
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            count: default_count(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Human label for an opaque category id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySetting {
    pub label: String,
    pub id: String,
}

impl FeedConfig {
    /// Map a label (case-insensitive) or a raw id to a category id.
    ///
    /// Unknown values pass through untouched so new categories work without
    /// a config change.
    pub fn resolve_category(&self, value: &str) -> String {
        self.categories
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(value) || c.id == value)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| value.to_string())
    }

    pub fn category_label(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.label.as_str())
    }
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_fetch_interval() -> u64 {
    60
}
fn default_tick_interval() -> u64 {
    1
}
fn default_grace_period() -> i64 {
    60
}
fn default_max_display() -> usize {
    5
}
fn default_base_url() -> String {
    "https://api.neds.com.au/rest/v1".to_string()
}
fn default_count() -> u32 {
    10
}
fn default_timeout() -> u64 {
    10
}

pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Greyhound", "9daef0d7-bf3c-4f50-921d-8e818c60fe61"),
    ("Harness", "161d9be2-e909-4326-8c2c-35ed71fb460b"),
    ("Horse", "4a2788f8-e825-4d36-9894-efd4baf1cfae"),
];

pub fn default_categories() -> Vec<CategorySetting> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(label, id)| CategorySetting {
            label: (*label).to_string(),
            id: (*id).to_string(),
        })
        .collect()
}

/// Replace values the runtime cannot work with by their defaults.
/// Returns true when any field was updated.
pub fn apply_fallbacks(config: &mut FeedConfig) -> bool {
    let mut changed = false;

    // tokio intervals panic on a zero period
    if config.feed.fetch_interval_secs == 0 {
        config.feed.fetch_interval_secs = default_fetch_interval();
        changed = true;
    }
    if config.feed.tick_interval_secs == 0 {
        config.feed.tick_interval_secs = default_tick_interval();
        changed = true;
    }
    if config.feed.grace_period_secs < 0 {
        config.feed.grace_period_secs = default_grace_period();
        changed = true;
    }
    if config.source.timeout_secs == 0 {
        config.source.timeout_secs = default_timeout();
        changed = true;
    }
    if config.categories.is_empty() {
        config.categories = default_categories();
        changed = true;
    }

    changed
}
