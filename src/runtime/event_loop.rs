use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use trackdeck::app::{App, AppEvent};
use trackdeck::audio::{PlaybackController, PlaybackState, PlayerEvent};
use trackdeck::library::{TrackId, TrackSource};
use trackdeck::store::StoreChange;

use super::requests::Dispatcher;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Cursor into the shown list.
    pub selected: usize,
    /// Title query being typed after `/`; `None` outside search mode.
    pub search: Option<String>,
    /// Set by the store observer when the list must be printed again.
    list_dirty: Arc<AtomicBool>,
    last_status: String,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` and hook it to the store of `app`.
    pub fn new(app: &mut App) -> Self {
        let list_dirty = Arc::new(AtomicBool::new(true));
        let flag = list_dirty.clone();
        app.store.subscribe(move |_, change| {
            if matches!(change, StoreChange::Tracks | StoreChange::Source) {
                flag.store(true, Ordering::Relaxed);
            }
        });
        Self {
            selected: 0,
            search: None,
            list_dirty,
            last_status: String::new(),
        }
    }

    fn selected_id(&self, app: &App) -> Option<TrackId> {
        app.store.tracks().get(self.selected).map(|t| t.id)
    }
}

/// Main terminal event loop: drains background results, redraws and handles
/// keys. Returns `Ok(())` when the user quits.
pub fn run(
    app: &mut App,
    player: &PlaybackController,
    player_events: &Receiver<PlayerEvent>,
    app_events: &Receiver<AppEvent>,
    dispatcher: &Dispatcher<'_>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout();

    loop {
        while let Ok(ev) = player_events.try_recv() {
            let actions = app.handle(AppEvent::Player(ev));
            dispatcher.dispatch(actions);
        }
        while let Ok(ev) = app_events.try_recv() {
            let actions = app.handle(ev);
            dispatcher.dispatch(actions);
        }

        let playback = player.state();
        app.sync_playback(&playback);

        let len = app.store.tracks().len();
        if state.selected >= len {
            state.selected = len.saturating_sub(1);
        }

        if state.list_dirty.swap(false, Ordering::Relaxed) {
            draw_list(&mut out, app)?;
            state.last_status.clear();
        }
        if let Some(msg) = app.take_error() {
            draw_line(&mut out, &format!("! {msg}"))?;
            out.write_all(b"\r\n")?;
            state.last_status.clear();
        }
        let status = status_line(app, &playback, state);
        if status != state.last_status {
            draw_line(&mut out, &status)?;
            state.last_status = status;
        }
        out.flush()?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, &playback, dispatcher, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    playback: &PlaybackState,
    dispatcher: &Dispatcher<'_>,
    state: &mut EventLoopState,
) -> bool {
    if let Some(query) = state.search.as_mut() {
        match key.code {
            KeyCode::Esc => state.search = None,
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Enter => {
                let query = state.search.take().unwrap_or_default();
                state.selected = 0;
                dispatcher.dispatch(app.search(&query));
            }
            KeyCode::Char(c) if !c.is_control() => query.push(c),
            _ => {}
        }
        return false;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    let actions = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            state.search = Some(String::new());
            Vec::new()
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if state.selected + 1 < app.store.tracks().len() {
                state.selected += 1;
            }
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.selected = state.selected.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Enter => match state.selected_id(app) {
            Some(id) => app.play_id(id),
            None => Vec::new(),
        },
        KeyCode::Char(' ') => app.play_or_toggle(playback),
        KeyCode::Char('n') => app.play_next(),
        KeyCode::Char('p') => app.play_previous(),
        KeyCode::Char('l') | KeyCode::Right => app.seek_forward(),
        KeyCode::Char('h') | KeyCode::Left => app.seek_backward(),
        KeyCode::Char('x') => app.stop(),
        KeyCode::Char('f') => match state.selected_id(app) {
            Some(id) => app.toggle_favorite(id),
            None => Vec::new(),
        },
        KeyCode::Char('d') => match state.selected_id(app) {
            Some(id) => app.toggle_download(id),
            None => Vec::new(),
        },
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char(c @ '1'..='3') => {
            state.selected = 0;
            let source = match c {
                '1' => TrackSource::Home,
                '2' => TrackSource::Favorites,
                _ => TrackSource::Downloads,
            };
            app.load(source)
        }
        _ => Vec::new(),
    };

    dispatcher.dispatch(actions);
    false
}

fn draw_line(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(text)
    )
}

fn draw_list(out: &mut impl Write, app: &App) -> io::Result<()> {
    let s = app.store.state();
    draw_line(out, &format!("== {} ({} tracks) ==", s.source, s.tracks.len()))?;
    out.write_all(b"\r\n")?;

    for (i, t) in s.tracks.iter().enumerate() {
        let fav = if t.favorite { '*' } else { ' ' };
        let dl = if t.downloaded { 'D' } else { ' ' };
        queue!(
            out,
            Print(format!(
                "{fav}{dl} {:>3}. {} [{}]\r\n",
                i + 1,
                t.display(),
                t.formatted_duration()
            ))
        )?;
    }
    Ok(())
}

fn status_line(app: &App, playback: &PlaybackState, state: &EventLoopState) -> String {
    if let Some(q) = &state.search {
        return format!("search: {q}");
    }

    let s = app.store.state();
    let selected = s
        .tracks
        .get(state.selected)
        .map(|t| format!("{}. {}", state.selected + 1, t.display()))
        .unwrap_or_default();
    let now = match (&s.current, playback.loaded) {
        (Some(t), true) => {
            let pos = playback.position.as_secs();
            let icon = if playback.playing { "▶" } else { "⏸" };
            format!(
                "{icon} {} {}:{:02}/{}",
                t.display(),
                pos / 60,
                pos % 60,
                t.formatted_duration()
            )
        }
        _ => "■ stopped".to_string(),
    };
    let loading = if s.loading { " (loading…)" } else { "" };

    format!("[{}]{loading} {now} | > {selected}", s.source)
}
