use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Struct defaults, overlaid by the optional config file, overlaid by
    /// `TRACKDECK__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TRACKDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.server.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err("server.base_url must start with http:// or https://".to_string());
        }
        if self.playback.poll_interval_ms == 0 {
            return Err("playback.poll_interval_ms must be >= 1".to_string());
        }
        if self.server.timeout_secs == 0 {
            return Err("server.timeout_secs must be >= 1".to_string());
        }
        Ok(())
    }

    /// Downloads directory: the configured one, else `<data dir>/trackdeck/downloads`.
    pub fn downloads_dir(&self) -> Option<PathBuf> {
        self.library
            .downloads_dir
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("downloads")))
    }
}

/// Resolve the config path from `TRACKDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TRACKDECK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/trackdeck/config.toml`
/// or `~/.config/trackdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("trackdeck").join("config.toml"))
}

/// `$XDG_DATA_HOME/trackdeck` or `~/.local/share/trackdeck`.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("trackdeck"))
}
