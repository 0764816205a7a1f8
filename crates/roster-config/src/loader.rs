use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::RosterConfig;

/// Loads the Roster configuration.
pub struct ConfigLoader {
    config: RosterConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path:
    /// explicit path > ROSTER_CONFIG env > ./roster.toml > ~/.roster/roster.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("ROSTER_CONFIG") {
            return PathBuf::from(p);
        }
        let local = PathBuf::from("roster.toml");
        if local.exists() {
            return local;
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".roster")
            .join("roster.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> roster_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw, &config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            RosterConfig::default()
        };

        // Apply environment variable overrides
        let config = Self::apply_env_overrides(config);

        // Validate config: log warnings, fail on errors
        for w in config.validate()? {
            warn!("{}", w);
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Get a copy of the loaded config.
    pub fn get(&self) -> RosterConfig {
        self.config.clone()
    }

    /// Path the config was resolved to (it may not exist).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn parse(raw: &str, config_path: &Path) -> roster_core::Result<RosterConfig> {
        toml::from_str::<RosterConfig>(raw).map_err(|e| {
            roster_core::RosterError::Config(format!(
                "failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })
    }

    /// Apply env var overrides (ROSTER_AGENTS_DIR, ROSTER_PROGRESS_FILE, ROSTER_LOG_LEVEL).
    fn apply_env_overrides(mut config: RosterConfig) -> RosterConfig {
        if let Ok(v) = std::env::var("ROSTER_AGENTS_DIR") {
            config.agents.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ROSTER_PROGRESS_FILE") {
            config.progress.file = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ROSTER_LOG_LEVEL") {
            config.logging.level = v;
        }
        config
    }
}
