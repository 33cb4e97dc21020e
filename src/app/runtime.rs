//! Terminal runtime
//!
//! Everything runs on this thread: draw, wait for a key, dispatch it. Git
//! calls block the loop while they run.

use super::Gui;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;

/// Take over the terminal until the user quits
pub fn run_tui(mut gui: Gui) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut gui);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, gui: &mut Gui) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, gui))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    gui.handle_key(key);
                }
                // something may have changed the repo while we were away
                Event::FocusGained => {
                    let result = gui.refresh();
                    gui.report(result);
                }
                _ => {}
            }
        }

        if gui.should_quit() {
            return Ok(());
        }
    }
}
