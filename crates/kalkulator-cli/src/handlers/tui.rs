//! Interactive terminal calculator

use std::io::{self, Write};

use crossterm::{
    cursor::Show,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kalkulator::tui::{render, CalculatorApp, InputHandler};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};

use crate::commands::TuiArgs;
use crate::error::CliResult;

/// Raw mode plus alternate screen, undone on drop whichever way the session ends
#[derive(Debug)]
struct TerminalGuard {
    mouse: bool,
}

impl TerminalGuard {
    fn enter(mouse: bool) -> CliResult<Self> {
        enable_raw_mode()?;
        let mut guard = Self { mouse: false };
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if mouse {
            execute!(stdout, EnableMouseCapture)?;
            guard.mouse = true;
        }
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal(&mut io::stdout(), self.mouse);
    }
}

/// Runs every restore step even when an earlier one fails
fn restore_terminal<W: Write>(out: &mut W, mouse: bool) {
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "failed to leave raw mode");
    }
    if mouse {
        if let Err(e) = execute!(out, DisableMouseCapture) {
            warn!(error = %e, "failed to release the mouse");
        }
    }
    if let Err(e) = execute!(out, LeaveAlternateScreen, Show) {
        warn!(error = %e, "failed to leave the alternate screen");
    }
}

/// Runs the calculator until the user quits; the terminal is restored even on error
pub fn execute_tui(args: &TuiArgs) -> CliResult<()> {
    let guard = TerminalGuard::enter(!args.no_mouse)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    info!(mouse = guard.mouse, "interactive session started");

    let mut app = CalculatorApp::new();
    let result = run_app(&mut terminal, &mut app);

    drop(terminal);
    drop(guard);
    info!(
        calculations = app.engine().history().len(),
        "interactive session ended"
    );
    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut CalculatorApp) -> CliResult<()> {
    let input = InputHandler::new();

    while !app.should_quit() {
        terminal.draw(|frame| {
            let keypad_area = render(app, frame);
            app.set_keypad_area(keypad_area);
        })?;

        let event = event::read()?;
        let action = input.handle_event(&event);
        debug!(?action, "input");
        app.handle_action(action);
    }
    Ok(())
}
