use super::logging;
use trackdeck::config;

/// Load settings; failures fall back to defaults with a message for the log.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            (
                config::Settings::default(),
                Some(format!("failed to load config, using defaults: {e}")),
            )
        }
    }
}

/// Settings plus logging, reporting any config problem once logging is up.
pub fn bootstrap() -> config::Settings {
    let (settings, problem) = load_settings();
    logging::init(&settings.logging);
    if let Some(msg) = problem {
        tracing::warn!("{msg}");
        eprintln!("trackdeck: {msg}");
    }
    settings
}
