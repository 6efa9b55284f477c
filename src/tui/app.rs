use std::error::Error;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use chrono::Local;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use tracing::{debug, error, info, warn};

use super::keys::{Key, KeyCode, TerminalKeys};
use super::modes::{MessageMode, Mode, NormalMode, Transition, finish_frame};
use super::screen::Screen;
use super::session::Session;
use super::theme::Theme;
use super::ui::Ui;
use crate::io::settings_io::SettingsError;
use crate::io::{logging, todo_io};
use crate::model::Settings;

/// The mode stack over one session
pub struct App {
    pub session: Session,
    modes: Vec<Mode>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let normal = NormalMode::new(&session);
        App {
            session,
            modes: vec![Mode::Normal(normal)],
        }
    }

    /// Show `message` in a box over the current mode.
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.modes.push(Mode::Message(MessageMode::new(message)));
    }

    /// Mode names from the bottom of the stack up
    pub fn mode_names(&self) -> Vec<&'static str> {
        self.modes.iter().map(Mode::name).collect()
    }

    /// Render the current screen. A message box is drawn over the mode
    /// below it.
    pub fn frame(&mut self, width: usize, height: usize) -> Vec<String> {
        let session = &self.session;
        match self.modes.split_last_mut() {
            Some((Mode::Message(message), rest)) => {
                let base = match rest.last_mut() {
                    Some(mode) => mode.render(session, width, height),
                    None => finish_frame(Vec::new(), width, height, session.status.as_deref()),
                };
                message.overlay(base, width, height)
            }
            Some((top, _)) => top.render(session, width, height),
            None => Vec::new(),
        }
    }

    /// Handle one key. Returns false once the app should exit.
    pub fn handle_key(&mut self, key: Key, ui: &mut Ui) -> io::Result<bool> {
        match key.code {
            // The screen already took the new size
            KeyCode::Resize(..) => {
                self.refresh_top();
                return Ok(true);
            }
            KeyCode::F(5) => {
                ui.screen.clear()?;
                self.refresh_top();
                return Ok(true);
            }
            _ => {}
        }

        self.session.status = None;
        let Some(top) = self.modes.last_mut() else {
            return Ok(false);
        };
        let transition = if key.is_letter('q') {
            top.on_quit(&self.session)
        } else {
            top.handle_key(key, &mut self.session, ui)?
        };
        self.apply(transition, ui)
    }

    fn refresh_top(&mut self) {
        if let Some(top) = self.modes.last_mut() {
            top.refresh(&self.session);
        }
    }

    fn pop(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(mode) = self.modes.pop() {
                debug!(mode = mode.name(), "pop");
            }
        }
        self.refresh_top();
    }

    fn apply(&mut self, mut transition: Transition, ui: &mut Ui) -> io::Result<bool> {
        loop {
            match transition {
                Transition::Stay => {}
                Transition::Quit => {
                    info!("quit");
                    self.modes.clear();
                }
                Transition::Pop => self.pop(1),
                Transition::PopMany(count) => self.pop(count),
                Transition::Push(mode) => {
                    debug!(mode = mode.name(), "push");
                    self.modes.push(mode);
                    if let Some(top) = self.modes.last_mut() {
                        // Prompt modes finish inside on_enter
                        transition = top.on_enter(&mut self.session, ui)?;
                        continue;
                    }
                }
            }
            return Ok(!self.modes.is_empty());
        }
    }

    /// Draw, read a key, handle it, until the mode stack is empty.
    pub fn run_loop(&mut self, ui: &mut Ui) -> io::Result<()> {
        loop {
            let frame = self.frame(ui.width(), ui.height());
            ui.screen.draw(&frame)?;
            let key = ui.next_key()?;
            if !self.handle_key(key, ui)? {
                return Ok(());
            }
            self.session.checkpoint(Local::now());
        }
    }

    /// Write what is in memory to a timestamped backup, for when the UI
    /// went down.
    fn rescue(&self) -> String {
        match todo_io::emergency_backup(&self.session.path, &self.session.list) {
            Ok(path) => format!("unsaved items were written to {}", path.display()),
            Err(e) => format!("emergency backup failed: {}", e),
        }
    }
}

/// Run the terminal UI on `data_path`.
pub fn run(
    data_path: &Path,
    settings: Settings,
    settings_error: Option<SettingsError>,
) -> Result<(), Box<dyn Error>> {
    if let Some(log) = logging::init(data_path, settings.trace)? {
        info!(log = %log.display(), "logging enabled");
    }

    let loaded = todo_io::load(data_path)?;
    let theme = Theme::from_settings(&settings);
    let session = Session::new(
        loaded.list,
        data_path.to_path_buf(),
        theme,
        settings.backup_interval_minutes,
    );

    let mut app = App::new(session);
    if let Some(e) = settings_error {
        warn!(error = %e, "settings ignored");
        app.push_message(format!("{}. Using default settings.", e));
    }
    if let Some(warning) = loaded.warning {
        app.push_message(warning);
    }

    // Setup terminal
    let (cols, rows) = terminal::size()?;
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;

    // Install panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut ui = Ui::new(
        Screen::new(Box::new(io::stdout()), cols, rows),
        Box::new(TerminalKeys),
    )
    .attached();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ui.screen.clear()?;
        app.run_loop(&mut ui)
    }));

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "terminal failure");
            Err(format!("terminal failure: {}; {}", e, app.rescue()).into())
        }
        Err(_) => {
            error!("ui panicked");
            Err(format!("the UI crashed; {}", app.rescue()).into())
        }
    }
}
