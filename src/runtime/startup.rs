use tracing::{info, warn};

use trackdeck::app::{Action, App};
use trackdeck::config;
use trackdeck::library::Downloads;
use trackdeck::store::TrackStateStore;

/// Build the app model from settings; returns it with the initial load.
pub fn build_app(settings: &config::Settings) -> (App, Vec<Action>) {
    let mut app = App::new(TrackStateStore::new());
    app.auto_advance = settings.playback.auto_advance;
    app.seek_step_secs = settings.playback.seek_step_secs;

    match settings.downloads_dir() {
        Some(dir) => {
            let downloads = Downloads::new(dir, &settings.library);
            info!(
                dir = %downloads.dir().display(),
                files = downloads.index().len(),
                "Downloads directory"
            );
            app = app.with_downloads(downloads);
        }
        None => warn!("No downloads directory; downloading is disabled"),
    }

    let actions = app.load(settings.playback.start_source);
    (app, actions)
}
