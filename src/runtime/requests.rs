use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use trackdeck::app::{Action, AppEvent};
use trackdeck::audio::{PlaybackController, PlayerEvent};
use trackdeck::gateway::RemoteTrackGateway;
use trackdeck::library::{Downloads, Track, extension_for};

/// Carries out the app's [`Action`]s.
///
/// Gateway work is spawned on the tokio runtime and reported back as an
/// [`AppEvent`] on `events`; player commands go to the controller directly.
pub struct Dispatcher<'a> {
    handle: Handle,
    tracks: RemoteTrackGateway,
    downloads: Option<Downloads>,
    events: Sender<AppEvent>,
    player: &'a PlaybackController,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        handle: Handle,
        tracks: RemoteTrackGateway,
        downloads: Option<Downloads>,
        events: Sender<AppEvent>,
        player: &'a PlaybackController,
    ) -> Self {
        Self {
            handle,
            tracks,
            downloads,
            events,
            player,
        }
    }

    pub fn dispatch(&self, actions: Vec<Action>) {
        for action in actions {
            self.dispatch_one(action);
        }
    }

    fn dispatch_one(&self, action: Action) {
        debug!(?action, "Dispatching");
        let result = match action {
            Action::Play { track, location } => match location {
                Some(path) => self
                    .player
                    .play_from(track, path.to_string_lossy().into_owned()),
                None => self.player.play(track),
            },
            Action::TogglePause => self.player.toggle_pause(),
            Action::Seek(ms) => self.player.seek(ms),
            Action::SeekBy(secs) => self.player.seek_by(secs),
            Action::Stop => self.player.stop(),
            other => {
                self.spawn_request(other);
                Ok(())
            }
        };

        if let Err(e) = result {
            // Surface it like any other playback failure.
            let _ = self.events.send(AppEvent::Player(PlayerEvent::Failed {
                track: None,
                reason: e.to_string(),
            }));
        }
    }

    fn spawn_request(&self, action: Action) {
        let tracks = self.tracks.clone();
        let downloads = self.downloads.clone();
        let tx = self.events.clone();

        self.handle.spawn(async move {
            let event = match action {
                Action::Fetch(source) => AppEvent::TracksLoaded {
                    source,
                    result: tracks.list_tracks().await,
                },
                Action::Search { query, source } => AppEvent::SearchResults {
                    source,
                    result: tracks.search_tracks(&query).await,
                },
                Action::Create(track) => AppEvent::TrackCreated(tracks.create_track(&track).await),
                Action::Update(track) => update(&tracks, track).await,
                Action::Delete(id) => AppEvent::TrackDeleted {
                    id,
                    result: tracks.delete_track(id).await,
                },
                Action::Download(track) => {
                    match download(&tracks, downloads.as_ref(), &track).await {
                        Ok(()) => update(&tracks, track).await,
                        Err(reason) => AppEvent::DownloadFailed {
                            id: track.id,
                            reason,
                        },
                    }
                }
                Action::RemoveDownload(track) => match remove_local(downloads.as_ref(), &track) {
                    Ok(()) => update(&tracks, track).await,
                    Err(reason) => AppEvent::DownloadFailed {
                        id: track.id,
                        reason,
                    },
                },
                Action::Play { .. }
                | Action::TogglePause
                | Action::Seek(_)
                | Action::SeekBy(_)
                | Action::Stop => return,
            };

            // The receiver is gone only when the UI is shutting down.
            let _ = tx.send(event);
        });
    }
}

async fn update(tracks: &RemoteTrackGateway, track: Track) -> AppEvent {
    let result = tracks.update_track(track.id, &track).await.map(|()| track);
    AppEvent::TrackUpdated(result)
}

/// Delete the local copy of `track`; the server keeps `downloaded` until this succeeds.
fn remove_local(downloads: Option<&Downloads>, track: &Track) -> Result<(), String> {
    let Some(downloads) = downloads else {
        return Ok(());
    };
    match downloads.remove(track.id) {
        Ok(removed) => {
            debug!(id = track.id, removed, "Local copy removed");
            Ok(())
        }
        Err(e) => {
            warn!(id = track.id, error = %e, "Failed to remove local copy");
            Err(e.to_string())
        }
    }
}

/// Fetch the audio of `track` into the downloads directory.
async fn download(
    tracks: &RemoteTrackGateway,
    downloads: Option<&Downloads>,
    track: &Track,
) -> Result<(), String> {
    let downloads = downloads.ok_or_else(|| "no downloads directory".to_string())?;
    let location = track
        .file_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| "track has no audio location".to_string())?;

    let bytes = tracks
        .fetch_audio(location)
        .await
        .map_err(|e| e.to_string())?;
    let path = downloads
        .save(track.id, &extension_for(location), &bytes)
        .map_err(|e| e.to_string())?;
    debug!(id = track.id, path = %path.display(), "Download saved");
    Ok(())
}
