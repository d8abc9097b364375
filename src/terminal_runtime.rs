use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use log::{debug, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode, alternate screen, key-release
/// reporting) for the whole run.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
    release_events: bool,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let release_events = request_release_events(&mut stdout);

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self {
                terminal,
                release_events,
            }),
            Err(error) => {
                let _ = cleanup_terminal_best_effort(release_events);
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }

    /// Whether the terminal reports key releases.
    #[must_use]
    pub fn release_events(&self) -> bool {
        self.release_events
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = cleanup_terminal_best_effort(self.release_events);
    }
}

fn request_release_events(stdout: &mut io::Stdout) -> bool {
    match supports_keyboard_enhancement() {
        Ok(true) => {}
        Ok(false) => {
            debug!("terminal does not report key releases");
            return false;
        }
        Err(error) => {
            warn!("probing keyboard enhancement failed: {error}");
            return false;
        }
    }

    let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
    match execute!(stdout, PushKeyboardEnhancementFlags(flags)) {
        Ok(()) => true,
        Err(error) => {
            warn!("enabling key release reporting failed: {error}");
            false
        }
    }
}

/// Restores the terminal; safe to call from a panic hook.
pub fn cleanup_terminal_best_effort(release_events: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if release_events {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    execute!(stdout, Show, LeaveAlternateScreen)
}
