use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use trackdeck::config::{LoggingSettings, default_data_dir};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured filter. Output goes to the log file;
/// if it cannot be opened, to stderr.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let path = settings
        .file
        .clone()
        .or_else(|| default_data_dir().map(|d| d.join("trackdeck.log")));

    let file = path.and_then(|p| {
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(p).ok()
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match file {
        Some(f) => builder.with_ansi(false).with_writer(Mutex::new(f)).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(e) = result {
        eprintln!("trackdeck: logging disabled: {e}");
    }
}
