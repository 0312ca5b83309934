pub mod app;
pub mod events;
pub mod widgets;

use std::io::{self, Write};

use anyhow::{Error, Result};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub use app::App;

/// Chart title listing the keywords, e.g. `Retweet counts for tweets containing: "rust", "tui"`.
pub fn chart_title(keywords: &[String]) -> String {
    let quoted: Vec<String> = keywords.iter().map(|k| format!("\"{}\"", k)).collect();
    format!("Retweet counts for tweets containing: {}", quoted.join(", "))
}

/// Status line naming the accounts that could not be fetched, with the
/// reason for the first of them.
pub fn failure_status(failures: &[(String, Error)]) -> Option<String> {
    let (_, first) = failures.first()?;
    let names: Vec<String> = failures.iter().map(|(id, _)| format!("@{}", id)).collect();
    Some(format!(
        "Could not fetch {} ({:#}) | Esc clear | q quit",
        names.join(", "),
        first
    ))
}

/// Undoes raw mode, the alternate screen and mouse capture when dropped, so
/// an early return or a panic still hands back a usable shell.
struct TerminalGuard<W: Write> {
    out: W,
    active: bool,
}

impl TerminalGuard<io::Stdout> {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut guard = TerminalGuard {
            out: io::stdout(),
            active: true,
        };
        execute!(guard.out, EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl<W: Write> TerminalGuard<W> {
    fn leave(&mut self) -> Result<()> {
        self.active = false;
        let raw = disable_raw_mode();
        execute!(
            self.out,
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        )?;
        raw?;
        Ok(())
    }

    /// Restore the terminal and report what went wrong doing so.
    fn restore(mut self) -> Result<()> {
        self.leave()
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Best effort, we may already be unwinding
        if self.active {
            let _ = self.leave();
        }
    }
}

/// Take over the terminal until the user quits, then restore it.
pub fn run(app: App) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = app.run(&mut terminal);
    guard.restore()?;

    result
}
