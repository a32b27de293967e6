//! Binary wiring: settings, logging, the tokio executor for gateway calls,
//! the playback controller and the key-driven loop on the main thread.

use std::env;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::info;

use trackdeck::app::AppEvent;
use trackdeck::audio::PlaybackController;
use trackdeck::gateway::{ApiClient, RemoteTrackGateway};

mod event_loop;
mod logging;
mod requests;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::bootstrap();

    // The only CLI surface: an optional server URL.
    if let Some(url) = env::args().nth(1) {
        settings.server.base_url = url;
    }

    let executor = tokio::runtime::Runtime::new()?;
    let api = ApiClient::new(&settings.server)?;
    info!(base_url = api.base_url(), "Using track server");
    let tracks = RemoteTrackGateway::new(api);

    let (player, player_events) = PlaybackController::new(&settings);
    let (mut app, initial) = startup::build_app(&settings);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let dispatcher = requests::Dispatcher::new(
        executor.handle().clone(),
        tracks,
        app.downloads().cloned(),
        event_tx,
        &player,
    );

    let mut state = event_loop::EventLoopState::new(&mut app);
    dispatcher.dispatch(initial);

    enable_raw_mode()?;
    let run_result = event_loop::run(
        &mut app,
        &player,
        &player_events,
        &event_rx,
        &dispatcher,
        &mut state,
    );
    disable_raw_mode()?;
    println!();

    player.shutdown();
    executor.shutdown_timeout(Duration::from_secs(1));
    info!("Shut down");

    run_result
}
