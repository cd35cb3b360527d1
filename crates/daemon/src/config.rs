use anyhow::{Context, Result};
use racefeed_core::CategoryId;
use racefeed_runtime_config::{CONFIG_FILE_NAME, FeedConfig, apply_fallbacks};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "RACEFEED_CONFIG";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("racefeed"))
}

/// Resolve the config file path: explicit path, then `$RACEFEED_CONFIG`,
/// then the per-user default.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load config from disk. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<FeedConfig> {
    if !path.exists() {
        return Ok(FeedConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let mut config: FeedConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    if apply_fallbacks(&mut config) {
        warn!(
            "Config at {} had unusable values; defaults were substituted",
            path.display()
        );
    }
    Ok(config)
}

/// Interpret a typed filter: `all` clears it, anything else goes through the
/// category table. Blank input means "no change".
pub fn parse_filter_input(input: &str, config: &FeedConfig) -> Option<Option<CategoryId>> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }
    if value.eq_ignore_ascii_case("all") {
        return Some(None);
    }
    Some(Some(CategoryId::from(config.resolve_category(value))))
}
