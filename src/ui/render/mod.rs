mod footer;
mod main_view;
mod overlays;
mod windows;

use crate::app::focus::SIDE_WINDOWS;
use crate::app::Gui;
use crate::context::ScreenMode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use footer::render_footer;
use main_view::render_main_view;
use overlays::render_popups;
use windows::render_window;

/// Main render function
pub fn render(frame: &mut Frame, gui: &mut Gui) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let body = layout[0];
    match gui.screen_mode() {
        ScreenMode::Normal => {
            let side_percent = gui.config.gui.side_panel_percent();
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(side_percent),
                    Constraint::Percentage(100 - side_percent),
                ])
                .split(body);
            render_side_column(frame, columns[0], gui);
            render_main_view(frame, columns[1], gui);
        }
        ScreenMode::Half => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(body);
            render_focused_window(frame, columns[0], gui);
            render_main_view(frame, columns[1], gui);
        }
        ScreenMode::Full => render_focused_window(frame, body, gui),
    }

    render_footer(frame, layout[1], gui);
    render_popups(frame, body, gui);
}

/// All four side windows stacked; stash stays short unless focused
fn render_side_column(frame: &mut Frame, area: Rect, gui: &mut Gui) {
    let focused = focused_window(gui);
    let constraints: Vec<Constraint> = SIDE_WINDOWS
        .iter()
        .map(|window| match *window {
            "stash" if focused != "stash" => Constraint::Length(3),
            w if w == focused => Constraint::Fill(2),
            _ => Constraint::Fill(1),
        })
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (window, rect) in SIDE_WINDOWS.iter().zip(rows.iter()) {
        render_window(frame, *rect, gui, window);
    }
}

fn render_focused_window(frame: &mut Frame, area: Rect, gui: &mut Gui) {
    let window = focused_window(gui);
    render_window(frame, area, gui, window);
}

fn focused_window(gui: &Gui) -> &'static str {
    gui.registry()
        .get(gui.focus().current_side())
        .map(|c| c.window_name())
        .unwrap_or("files")
}
