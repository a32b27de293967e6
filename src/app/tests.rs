use super::*;
use crate::audio::{PlaybackState, PlayerEvent};
use crate::config::LibrarySettings;
use crate::error::GatewayError;
use crate::library::{Downloads, Track, TrackSource};
use crate::store::TrackStateStore;

fn t(id: i64) -> Track {
    Track::new(id, format!("T{id}"), "Artist", 60).with_file_path(format!("http://cdn/{id}.mp3"))
}

fn app_with(ids: &[i64]) -> App {
    let mut store = TrackStateStore::new();
    store.set_tracks(ids.iter().map(|&i| t(i)).collect());
    App::new(store)
}

fn server_error() -> GatewayError {
    GatewayError::Server {
        status: 500,
        message: "boom".into(),
    }
}

#[test]
fn load_marks_loading_and_requests_fetch() {
    let mut app = app_with(&[]);
    let actions = app.load(TrackSource::Favorites);
    assert_eq!(actions, vec![Action::Fetch(TrackSource::Favorites)]);
    assert!(app.store.state().loading);
    assert_eq!(app.store.state().source, TrackSource::Favorites);
}

#[test]
fn loaded_tracks_are_filtered_by_source() {
    let mut app = app_with(&[]);
    app.load(TrackSource::Favorites);

    let mut fav = t(2);
    fav.favorite = true;
    app.handle(AppEvent::TracksLoaded {
        source: TrackSource::Favorites,
        result: Ok(vec![t(1), fav.clone()]),
    });

    assert!(!app.store.state().loading);
    assert_eq!(app.store.tracks(), &[fav]);
}

#[test]
fn stale_source_results_are_ignored() {
    let mut app = app_with(&[1]);
    app.load(TrackSource::Downloads);
    app.handle(AppEvent::TracksLoaded {
        source: TrackSource::Home,
        result: Ok(vec![t(5), t(6)]),
    });
    assert_eq!(app.store.tracks().len(), 1);
}

#[test]
fn load_failure_becomes_transient_message() {
    let mut app = app_with(&[1]);
    app.load(TrackSource::Home);
    app.handle(AppEvent::TracksLoaded {
        source: TrackSource::Home,
        result: Err(server_error()),
    });

    assert!(!app.store.state().loading);
    assert_eq!(app.store.tracks().len(), 1);
    let msg = app.take_error().unwrap();
    assert!(msg.contains("boom"));
    assert!(app.take_error().is_none());
}

#[test]
fn blank_search_reloads_current_source() {
    let mut app = app_with(&[]);
    assert_eq!(app.search("  "), vec![Action::Fetch(TrackSource::Home)]);
    assert_eq!(
        app.search(" jazz "),
        vec![Action::Search {
            query: "jazz".into(),
            source: TrackSource::Home,
        }]
    );

    app.handle(AppEvent::SearchResults {
        source: TrackSource::Home,
        result: Ok(vec![t(9)]),
    });
    assert_eq!(app.store.tracks(), &[t(9)]);
    assert!(!app.store.state().loading);
}

#[test]
fn search_answer_after_source_switch_is_dropped() {
    let mut app = app_with(&[]);
    app.search("One");
    app.load(TrackSource::Favorites);

    let mut fav = t(1);
    fav.favorite = true;
    app.handle(AppEvent::TracksLoaded {
        source: TrackSource::Favorites,
        result: Ok(vec![fav.clone()]),
    });
    app.handle(AppEvent::SearchResults {
        source: TrackSource::Home,
        result: Ok(vec![t(2), t(3)]),
    });

    assert_eq!(app.store.state().source, TrackSource::Favorites);
    assert_eq!(app.store.tracks(), &[fav]);
}

#[test]
fn search_answer_after_reload_is_dropped() {
    let mut app = app_with(&[]);
    app.search("One");
    app.reload();
    app.handle(AppEvent::TracksLoaded {
        source: TrackSource::Home,
        result: Ok(vec![t(1)]),
    });
    app.handle(AppEvent::SearchResults {
        source: TrackSource::Home,
        result: Ok(vec![t(2)]),
    });
    assert_eq!(app.store.tracks(), &[t(1)]);
}

#[test]
fn search_results_follow_the_source_filter() {
    let mut app = app_with(&[]);
    app.load(TrackSource::Favorites);
    app.search("T");

    let mut fav = t(4);
    fav.favorite = true;
    app.handle(AppEvent::SearchResults {
        source: TrackSource::Favorites,
        result: Ok(vec![t(2), fav.clone()]),
    });
    assert_eq!(app.store.tracks(), &[fav]);
}

#[test]
fn huge_seek_step_saturates() {
    let mut app = app_with(&[]);
    app.seek_step_secs = u64::MAX;
    assert_eq!(app.seek_forward(), vec![Action::SeekBy(i64::MAX)]);
    assert_eq!(app.seek_backward(), vec![Action::SeekBy(-i64::MAX)]);
}

#[test]
fn ready_sets_current_and_playing() {
    let mut app = app_with(&[1, 2]);
    let actions = app.play_id(2);
    assert_eq!(
        actions,
        vec![Action::Play {
            track: t(2),
            location: None
        }]
    );
    // Not current until the player confirms.
    assert!(app.store.current().is_none());

    app.handle(AppEvent::Player(PlayerEvent::Ready(t(2))));
    assert_eq!(app.store.current(), Some(&t(2)));
    assert!(app.store.is_playing());
}

#[test]
fn finished_advances_with_wrap_around() {
    let mut app = app_with(&[1, 2, 3]);
    app.handle(AppEvent::Player(PlayerEvent::Ready(t(3))));

    let actions = app.handle(AppEvent::Player(PlayerEvent::Finished(t(3))));
    assert!(!app.store.is_playing());
    assert_eq!(
        actions,
        vec![Action::Play {
            track: t(1),
            location: None
        }]
    );
}

#[test]
fn finished_without_auto_advance_just_stops() {
    let mut app = app_with(&[1, 2]);
    app.auto_advance = false;
    app.handle(AppEvent::Player(PlayerEvent::Ready(t(1))));
    let actions = app.handle(AppEvent::Player(PlayerEvent::Finished(t(1))));
    assert!(actions.is_empty());
}

#[test]
fn player_failure_keeps_current_track() {
    let mut app = app_with(&[1, 2]);
    app.handle(AppEvent::Player(PlayerEvent::Ready(t(1))));

    app.handle(AppEvent::Player(PlayerEvent::Failed {
        track: Some(t(2)),
        reason: "File path is invalid".into(),
    }));

    assert_eq!(app.store.current(), Some(&t(1)));
    assert!(app.store.is_playing());
    assert_eq!(app.take_error().as_deref(), Some("File path is invalid"));
}

#[test]
fn next_and_previous_follow_store() {
    let mut app = app_with(&[1, 2]);
    assert!(app.play_next().is_empty());

    app.handle(AppEvent::Player(PlayerEvent::Ready(t(1))));
    assert!(matches!(
        app.play_next().as_slice(),
        [Action::Play { track, .. }] if track.id == 2
    ));
    assert!(matches!(
        app.play_previous().as_slice(),
        [Action::Play { track, .. }] if track.id == 2
    ));
}

#[test]
fn play_or_toggle_picks_first_track_when_idle() {
    let mut app = app_with(&[4, 5]);
    let idle = PlaybackState::default();
    assert!(matches!(
        app.play_or_toggle(&idle).as_slice(),
        [Action::Play { track, .. }] if track.id == 4
    ));

    let loaded = PlaybackState {
        track: Some(t(4)),
        playing: true,
        loaded: true,
        ..PlaybackState::default()
    };
    assert_eq!(app.play_or_toggle(&loaded), vec![Action::TogglePause]);
}

#[test]
fn toggle_favorite_updates_store_only_after_server_ok() {
    let mut app = app_with(&[1]);
    let actions = app.toggle_favorite(1);
    let expected = t(1).with_favorite_toggled();
    assert_eq!(actions, vec![Action::Update(expected.clone())]);
    assert!(!app.store.track(1).unwrap().favorite);

    app.handle(AppEvent::TrackUpdated(Err(server_error())));
    assert!(!app.store.track(1).unwrap().favorite);
    assert!(app.take_error().is_some());

    app.handle(AppEvent::TrackUpdated(Ok(expected)));
    assert!(app.store.track(1).unwrap().favorite);

    // Toggling back restores the original track.
    let back = match app.toggle_favorite(1).as_slice() {
        [Action::Update(track)] => track.clone(),
        other => panic!("unexpected {other:?}"),
    };
    app.handle(AppEvent::TrackUpdated(Ok(back)));
    assert_eq!(app.store.track(1), Some(&t(1)));
}

#[test]
fn unfavorited_track_leaves_favorites_view() {
    let mut app = app_with(&[]);
    app.load(TrackSource::Favorites);
    let mut fav = t(1);
    fav.favorite = true;
    app.handle(AppEvent::TracksLoaded {
        source: TrackSource::Favorites,
        result: Ok(vec![fav.clone()]),
    });

    app.handle(AppEvent::TrackUpdated(Ok(fav.with_favorite_toggled())));
    assert!(app.store.tracks().is_empty());
}

#[test]
fn toggle_download_requires_directory() {
    let mut app = app_with(&[1]);
    assert!(app.toggle_download(1).is_empty());
    assert!(app.take_error().is_some());
}

#[test]
fn downloaded_track_plays_from_local_copy() {
    let dir = tempfile::tempdir().unwrap();
    let downloads = Downloads::new(dir.path(), &LibrarySettings::default());
    let path = downloads.save(1, "mp3", b"data").unwrap();

    let mut store = TrackStateStore::new();
    let mut dl = t(1);
    dl.downloaded = true;
    store.set_tracks(vec![dl.clone(), t(2)]);
    let mut app = App::new(store).with_downloads(downloads);

    assert_eq!(
        app.play_id(1),
        vec![Action::Play {
            track: dl.clone(),
            location: Some(path)
        }]
    );
    assert_eq!(app.toggle_download(1), vec![Action::RemoveDownload(t(1))]);
    assert_eq!(
        app.toggle_download(2),
        vec![Action::Download(t(2).with_downloaded_toggled())]
    );
}

#[test]
fn create_and_delete_round_trip_through_store() {
    let mut app = app_with(&[1]);
    assert_eq!(app.add_track(t(0)), vec![Action::Create(t(0))]);
    app.handle(AppEvent::TrackCreated(Ok(t(7))));
    assert_eq!(app.store.tracks().len(), 2);

    assert_eq!(app.delete_track(7), vec![Action::Delete(7)]);
    app.handle(AppEvent::TrackDeleted {
        id: 7,
        result: Err(server_error()),
    });
    assert_eq!(app.store.tracks().len(), 2);
    app.handle(AppEvent::TrackDeleted { id: 7, result: Ok(()) });
    assert_eq!(app.store.tracks().len(), 1);
}

#[test]
fn assign_playlist_sends_update() {
    let mut app = app_with(&[1]);
    let actions = app.assign_playlist(1, "Road");
    match actions.as_slice() {
        [Action::Update(track)] => assert_eq!(track.playlist_name.as_deref(), Some("Road")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(app.assign_playlist(42, "Road").is_empty());
}

#[test]
fn sync_playback_mirrors_flag_once() {
    let mut app = app_with(&[1]);
    let count = std::sync::Arc::new(std::sync::Mutex::new(0));
    let c = count.clone();
    app.store.subscribe(move |_, _| *c.lock().unwrap() += 1);

    let playing = PlaybackState {
        playing: true,
        ..PlaybackState::default()
    };
    app.sync_playback(&playing);
    app.sync_playback(&playing);
    assert!(app.store.is_playing());
    assert_eq!(*count.lock().unwrap(), 1);
}
