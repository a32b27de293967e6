use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use crate::library::TrackSource;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn config_path_resolution_order() {
    let _lock = env_lock();
    let _home = EnvGuard::set("HOME", "/tmp/home-dir");
    let _xdg = EnvGuard::remove("XDG_CONFIG_HOME");
    let _explicit = EnvGuard::remove("TRACKDECK_CONFIG_PATH");

    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/trackdeck/config.toml")
    );

    let _xdg = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config");
    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config/trackdeck/config.toml")
    );

    let _explicit = EnvGuard::set("TRACKDECK_CONFIG_PATH", "/etc/trackdeck.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/etc/trackdeck.toml")
    );
}

#[test]
fn downloads_dir_lives_under_the_data_dir_unless_configured() {
    let _lock = env_lock();
    let _home = EnvGuard::set("HOME", "/tmp/home-dir");
    let _xdg = EnvGuard::remove("XDG_DATA_HOME");

    assert_eq!(
        Settings::default().downloads_dir().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/share/trackdeck/downloads")
    );

    let _xdg = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");
    assert_eq!(
        default_data_dir().unwrap(),
        PathBuf::from("/tmp/xdg-data/trackdeck")
    );

    let s = Settings {
        library: LibrarySettings {
            downloads_dir: Some("/srv/music".into()),
            ..LibrarySettings::default()
        },
        ..Settings::default()
    };
    assert_eq!(s.downloads_dir().unwrap(), PathBuf::from("/srv/music"));
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _path = EnvGuard::set(
        "TRACKDECK_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _url = EnvGuard::remove("TRACKDECK__SERVER__BASE_URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "http://localhost:8080");
    assert_eq!(s.playback.start_source, TrackSource::Home);
    assert!(s.playback.auto_advance);
    assert_eq!(s.logging.file, None);
}

#[test]
fn catalog_and_playback_settings_load_from_file() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_config(
        dir.path(),
        r#"
[server]
base_url = "https://music.example.com"
timeout_secs = 5

[playback]
auto_advance = false
seek_step_secs = 9
start_source = "favorites"

[library]
downloads_dir = "/tmp/dl"
extensions = ["mp3"]
include_hidden = true

[logging]
filter = "debug"
file = "/tmp/trackdeck.log"
"#,
    );

    let _path = EnvGuard::set("TRACKDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _url = EnvGuard::remove("TRACKDECK__SERVER__BASE_URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "https://music.example.com");
    assert_eq!(s.server.timeout_secs, 5);
    assert_eq!(s.server.connect_timeout_secs, 10);
    assert!(!s.playback.auto_advance);
    assert_eq!(s.playback.seek_step_secs, 9);
    assert_eq!(s.playback.poll_interval_ms, 200);
    assert_eq!(s.playback.start_source, TrackSource::Favorites);
    assert_eq!(s.library.downloads_dir, Some(PathBuf::from("/tmp/dl")));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.include_hidden);
    assert_eq!(s.logging.filter, "debug");
    assert_eq!(s.logging.file, Some(PathBuf::from("/tmp/trackdeck.log")));
    assert!(s.validate().is_ok());
}

#[test]
fn server_url_and_start_source_from_environment() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_config(
        dir.path(),
        r#"
[server]
base_url = "http://from-file:8080"

[playback]
start_source = "home"
"#,
    );

    let _path = EnvGuard::set("TRACKDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _url = EnvGuard::set("TRACKDECK__SERVER__BASE_URL", "http://music.lan:9000");
    let _src = EnvGuard::set("TRACKDECK__PLAYBACK__START_SOURCE", "downloads");
    let _step = EnvGuard::set("TRACKDECK__PLAYBACK__SEEK_STEP_SECS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "http://music.lan:9000");
    assert_eq!(s.playback.start_source, TrackSource::Downloads);
    assert_eq!(s.playback.seek_step_secs, 30);
}

#[test]
fn validate_checks_url_poll_interval_and_timeout() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.server.base_url = "ftp://example.com".into();
    assert!(s.validate().unwrap_err().contains("base_url"));

    s.server.base_url = "http://example.com".into();
    s.playback.poll_interval_ms = 0;
    assert!(s.validate().unwrap_err().contains("poll_interval_ms"));

    s.playback.poll_interval_ms = 100;
    s.server.timeout_secs = 0;
    assert!(s.validate().unwrap_err().contains("timeout_secs"));
}
