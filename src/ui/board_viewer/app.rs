use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::analytics::Analytics;
use crate::board::{ListId, Task};
use crate::config::{Config, Theme};
use crate::drag::{DragController, DragState};
use crate::error::Result;
use crate::history;
use crate::render::BoardView;
use crate::session::{Outcome, Session};
use crate::toast::Toaster;

use super::editor::{EditorAction, EditorKind, EditorState};
use super::model::{self, Cursor};
use super::view;

const EVENT_POLL_MS: u64 = 120;
const WATCH_DEBOUNCE_MS: u64 = 200;

enum UiMsg {
    SnapshotChanged,
    WatchError(String),
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: String,
    pub(crate) text: String,
}

pub(crate) struct HistoryState {
    pub(crate) task_id: String,
    pub(crate) text: String,
    pub(crate) lines: Vec<String>,
    /// Entries scrolled up from the newest one
    pub(crate) scroll: usize,
}

pub struct AppState {
    pub(crate) session: Session,
    pub(crate) view: BoardView,
    pub(crate) analytics: Analytics,
    pub(crate) cursor: Cursor,
    pub(crate) drag: DragController,
    pub(crate) toaster: Toaster,
    pub(crate) theme: Theme,
    pub(crate) editor: Option<EditorState>,
    pub(crate) history: Option<HistoryState>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    default_list: ListId,
    status_message: Option<String>,
    watch_error: Option<String>,
}

impl AppState {
    pub(crate) fn new(session: Session, config: &Config) -> Self {
        let view = session.view();
        let analytics = session.analytics();
        let mut app = Self {
            session,
            view,
            analytics,
            cursor: Cursor::new(config.ui.default_list),
            drag: DragController::new(),
            toaster: Toaster::new(config.ui.toast_ms),
            theme: config.ui.theme,
            editor: None,
            history: None,
            delete_confirm: None,
            default_list: config.ui.default_list,
            status_message: None,
            watch_error: None,
        };
        app.cursor = model::clamp(app.session.board(), app.cursor);
        app
    }

    pub(crate) fn selected_task_id(&self) -> Option<&str> {
        model::selected_task_id(self.session.board(), self.cursor)
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected_task_id()
            .and_then(|id| self.session.board().task(id))
    }

    /// Rebuild the rendered board and keep the cursor on `focus` if given.
    fn refresh(&mut self, focus: Option<String>) {
        let focus = focus.or_else(|| self.selected_task_id().map(str::to_string));
        self.view = self.session.view();
        self.analytics = self.session.analytics();
        self.cursor = model::select_by_id(self.session.board(), focus.as_deref(), self.cursor);
    }

    fn reload(&mut self) {
        self.session.reload();
        self.refresh(None);
    }

    fn apply_outcome(&mut self, result: Result<Outcome>, now: Instant) {
        match result {
            Ok(outcome) => {
                if let Some(message) = outcome.message {
                    self.toaster.show(message, now);
                }
                self.status_message = None;
                self.refresh(outcome.task_id);
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
                self.refresh(None);
            }
        }
    }

    /// List a drag is hovering, or the list it started from.
    pub(crate) fn drag_anchor(&self) -> ListId {
        match self.drag.state() {
            DragState::Dragging { over: Some(over), .. } => *over,
            DragState::Dragging { origin, .. } => *origin,
            DragState::Idle => self.cursor.list,
        }
    }

    pub(crate) fn status_line(&self, now: Instant) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(error) = self.watch_error.as_ref() {
            return Some((error.clone(), StatusKind::Error));
        }
        self.toaster
            .message(now)
            .map(|message| (message.to_string(), StatusKind::Info))
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        if self.delete_confirm.is_some() {
            return "y confirm delete  esc cancel";
        }
        if self.history.is_some() {
            return "j/k scroll  esc close";
        }
        if let Some(editor) = self.editor.as_ref() {
            return match editor.kind() {
                EditorKind::NewTask => "enter save  tab list  esc cancel",
                EditorKind::EditTask => "enter save  esc cancel",
            };
        }
        if self.drag.is_dragging() {
            return "h/l or 1-3 choose list  enter drop  esc cancel";
        }
        "h/l list  j/k card  n new  e edit  d delete  H history  space move  t theme  q quit"
    }
}

pub fn run(session: Session, config: Config) -> Result<()> {
    session.store().storage().init()?;
    let snapshot = session.store().snapshot_path();
    let root = session.store().storage().root().to_path_buf();

    let (ui_tx, ui_rx) = mpsc::channel();
    spawn_watch(root, snapshot, ui_tx);

    let mut app = AppState::new(session, &config);
    run_terminal(&mut app, ui_rx)
}

fn run_terminal(app: &mut AppState, ui_rx: Receiver<UiMsg>) -> Result<()> {
    enable_raw_mode()?;
    let mut terminal = or_restore(enter_screen(), restore_screen)?;

    let result = run_loop(&mut terminal, app, ui_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_screen() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Pass `setup` through, running `restore` first when it failed.
fn or_restore<T>(setup: Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup.map_err(|err| {
        restore();
        err
    })
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
            dirty = true;
        }

        if app.toaster.tick(Instant::now()) {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app, Instant::now()))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key, Instant::now()) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_ui_msg(app: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::SnapshotChanged => {
            tracing::debug!("snapshot changed on disk, reloading");
            app.reload();
        }
        UiMsg::WatchError(err) => {
            app.watch_error = Some(format!("watch error: {err}"));
        }
    }
}

/// Apply one key press. Returns true when the board should close.
fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(confirm) = app.delete_confirm.take() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let result = app.session.delete(&confirm.task_id);
                app.apply_outcome(result, now);
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {}
            _ => app.delete_confirm = Some(confirm),
        }
        return false;
    }

    if let Some(state) = app.history.as_mut() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('H') => {
                app.history = None;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.scroll = (state.scroll + 1).min(state.lines.len().saturating_sub(1));
            }
            KeyCode::Char('j') | KeyCode::Down => {
                state.scroll = state.scroll.saturating_sub(1);
            }
            _ => {}
        }
        return false;
    }

    if let Some(editor) = app.editor.as_mut() {
        match editor.handle_key(key) {
            EditorAction::None => {}
            EditorAction::Cancel => app.editor = None,
            EditorAction::Submit => {
                if let Some(editor) = app.editor.take() {
                    let submit = editor.build_submit();
                    let result = match editor.task_id() {
                        Some(task_id) => app.session.edit(task_id, &submit.text),
                        None => app.session.create(submit.list, &submit.text),
                    };
                    app.apply_outcome(result, now);
                }
            }
        }
        return false;
    }

    if app.drag.is_dragging() {
        handle_drag_key(app, key, now);
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('h') | KeyCode::Left => {
            app.cursor = model::move_list(app.session.board(), app.cursor, -1);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.cursor = model::move_list(app.session.board(), app.cursor, 1);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor = model::move_card(app.session.board(), app.cursor, 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = model::move_card(app.session.board(), app.cursor, -1);
        }
        KeyCode::Char(ch @ '1'..='3') => {
            if let Some(list) = ListId::from_index(ch as usize - '1' as usize) {
                app.cursor = model::clamp(app.session.board(), Cursor::new(list));
            }
        }
        KeyCode::Char('n') => app.editor = Some(EditorState::new_task(app.default_list)),
        KeyCode::Char('e') => {
            let list = app.cursor.list;
            if let Some(task) = app.selected_task() {
                app.editor = Some(EditorState::edit_task(task, list));
            }
        }
        KeyCode::Char('d') => {
            let confirm = app.selected_task().map(|task| DeleteConfirmState {
                task_id: task.id.clone(),
                text: task.text.clone(),
            });
            if confirm.is_some() {
                app.delete_confirm = confirm;
            }
        }
        KeyCode::Char('H') => {
            let state = app.selected_task().map(|task| HistoryState {
                task_id: task.id.clone(),
                text: task.text.clone(),
                lines: history::render(task),
                scroll: 0,
            });
            if state.is_some() {
                app.history = state;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.selected_task_id().map(str::to_string) {
                if let Err(err) = app.session.start_drag(&mut app.drag, &id) {
                    app.status_message = Some(err.to_string());
                }
            }
        }
        KeyCode::Char('t') => app.theme = app.theme.toggled(),
        _ => {}
    }
    false
}

fn handle_drag_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.drag.cancel();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let target = model::step_list(app.drag_anchor(), -1);
            app.drag.enter(target);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            let target = model::step_list(app.drag_anchor(), 1);
            app.drag.enter(target);
        }
        KeyCode::Char(ch @ '1'..='3') => {
            if let Some(list) = ListId::from_index(ch as usize - '1' as usize) {
                app.drag.enter(list);
            }
        }
        KeyCode::Backspace => app.drag.leave(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let target = app.drag.hovered();
            let result = app.session.drop_on(&mut app.drag, target);
            app.apply_outcome(result, now);
        }
        _ => {}
    }
}

fn spawn_watch(root: PathBuf, snapshot: PathBuf, ui_tx: Sender<UiMsg>) {
    if !root.exists() {
        return;
    }

    thread::spawn(move || {
        let (event_tx, event_rx) = mpsc::channel();
        let watcher: notify::Result<RecommendedWatcher> = notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        });

        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(err) => {
                let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                return;
            }
        };

        if let Err(err) = watcher.watch(&root, RecursiveMode::NonRecursive) {
            let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
            return;
        }

        let debounce = Duration::from_millis(WATCH_DEBOUNCE_MS);
        let mut pending: Option<Instant> = None;

        loop {
            let timeout = pending
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(Duration::from_secs(3600));
            match event_rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    // Lock files and temp files live next to the snapshot.
                    if event.paths.iter().any(|path| path == &snapshot) {
                        pending = Some(Instant::now() + debounce);
                    }
                }
                Ok(Err(err)) => {
                    let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if pending.take().is_some() && ui_tx.send(UiMsg::SnapshotChanged).is_err() {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    });
}
