//! Application configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then the user's
//! `config.toml`, then `MUSEJAM_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::info;

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "musejam";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "MUSEJAM";

const DEFAULT_CONFIG: &str = r##"# musejam configuration

# Default jam length on the create screen, in minutes.
default_jam_minutes = 5

# Countdown tick period in milliseconds.
tick_interval_ms = 1000

# How long the idea roulette "rolls" before landing, in milliseconds.
roulette_delay_ms = 1500

# Cosmetic activity simulation on the profile "loops created" stat.
simulate_activity = true
activity_interval_ms = 5000

# Screen shown on start: home, create, community or profile.
initial_screen = "home"

# Optional JSON file replacing the built-in catalog.
# catalog_path = "/path/to/catalog.json"

# Fixed seed for the idea roulette (random when unset).
# rng_seed = 42

log_level = "info"

[theme]
accent = "#FF9500"
# background = "#000000"
# foreground = "#FFFFFF"
"##;

/// Optional colour overrides for the terminal front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    /// Accent colour as `#RRGGBB` or `#RGB`.
    pub accent: Option<String>,
    /// Background colour.
    pub background: Option<String>,
    /// Foreground colour.
    pub foreground: Option<String>,
}

/// Runtime configuration for a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Minutes used by the plain "start jam" action.
    pub default_jam_minutes: u32,
    /// Countdown tick period.
    pub tick_interval_ms: u64,
    /// Roulette rolling delay.
    pub roulette_delay_ms: u64,
    /// Period of the activity simulation.
    pub activity_interval_ms: u64,
    /// Whether the activity simulation runs at all.
    pub simulate_activity: bool,
    /// Identifier of the first screen.
    pub initial_screen: String,
    /// Replacement catalog file.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Seed for the roulette RNG.
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Front-end colours.
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_jam_minutes: 5,
            tick_interval_ms: 1000,
            roulette_delay_ms: 1500,
            activity_interval_ms: 5000,
            simulate_activity: true,
            initial_screen: "home".to_string(),
            catalog_path: None,
            rng_seed: None,
            log_level: "info".to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration layering `path` (if present) over the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(path.as_ref(), environment())
    }

    fn load_layered(path: &Path, env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Countdown tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Roulette rolling delay.
    pub fn roulette_delay(&self) -> Duration {
        Duration::from_millis(self.roulette_delay_ms)
    }

    /// Activity simulation period.
    pub fn activity_interval(&self) -> Duration {
        Duration::from_millis(self.activity_interval_ms.max(1))
    }
}

/// `MUSEJAM_LOG_LEVEL` sets `log_level`; `MUSEJAM_THEME__ACCENT` sets `theme.accent`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Location of the user's configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_file() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.default_jam_minutes, 5);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.roulette_delay(), Duration::from_millis(1500));
        assert_eq!(config.initial_screen, "home");
        assert_eq!(config.theme.accent.as_deref(), Some("#FF9500"));
        assert!(config.catalog_path.is_none());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default_jam_minutes = 8\ninitial_screen = \"community\"\nrng_seed = 7\n[theme]\naccent = \"#00FF00\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.default_jam_minutes, 8);
        assert_eq!(config.initial_screen, "community");
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.theme.accent.as_deref(), Some("#00FF00"));
        assert_eq!(config.roulette_delay_ms, 1500);
        Ok(())
    }

    #[test]
    fn environment_overrides_nested_keys() -> Result<()> {
        let dir = tempdir()?;
        let vars = ::config::Map::from([
            ("MUSEJAM_THEME__FOREGROUND".to_string(), "#101010".to_string()),
            ("MUSEJAM_DEFAULT_JAM_MINUTES".to_string(), "12".to_string()),
        ]);
        let config = AppConfig::load_layered(
            &dir.path().join("absent.toml"),
            environment().source(Some(vars)),
        )?;
        assert_eq!(config.theme.foreground.as_deref(), Some("#101010"));
        assert_eq!(config.theme.accent.as_deref(), Some("#FF9500"));
        assert_eq!(config.default_jam_minutes, 12);
        Ok(())
    }

    #[test]
    fn default_config_written_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        assert!(path.exists());

        fs::write(&path, "default_jam_minutes = 3\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "default_jam_minutes = 3\n");

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.default_jam_minutes, 3);
        Ok(())
    }
}
