use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mandel_view_core::{Surface, ViewerSession};
use mandel_view_protocol::ImageRequest;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::surface::TerminalSurface;

pub fn run_tui(session: &mut ViewerSession<TerminalSurface>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    session: &mut ViewerSession<TerminalSurface>,
) -> Result<()> {
    let mut status = String::from("ready");

    loop {
        if session.surface_mut().poll_loaded() {
            session.on_image_load();
        }

        let lines = describe(session, &status);
        terminal.draw(|frame| {
            let [header_area, body_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());

            let header = Block::default()
                .title(" mandel-view | ←↑↓→ pan | +/- zoom | enter apply | 0 reset | q quit ")
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let body = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            frame.render_widget(body, body_area);
        })?;

        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let surface = session.surface_mut();
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Left => surface.pan(-1, 0),
                KeyCode::Right => surface.pan(1, 0),
                KeyCode::Up => surface.pan(0, -1),
                KeyCode::Down => surface.pan(0, 1),
                KeyCode::Char('+') | KeyCode::Char('=') => surface.zoom_in(),
                KeyCode::Char('-') => surface.zoom_out(),
                KeyCode::Enter => {
                    status = match session.on_gesture() {
                        Ok(state) => format!("applied, zoom {:.4}", state.zoom),
                        Err(e) => e.to_string(),
                    };
                }
                KeyCode::Char('0') => {
                    session.reset();
                    status = "reset".into();
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn describe(session: &ViewerSession<TerminalSurface>, status: &str) -> Vec<Line<'static>> {
    let state = session.state();
    let ext = session.extents();
    let transform = session.surface().current_transform();
    let (off_x, off_y) = session.surface().pending_offset();
    let image = session
        .surface()
        .image()
        .map(ImageRequest::to_path)
        .unwrap_or_else(|| "-".into());

    vec![
        Line::from(format!(
            "center  {:+.12}, {:+.12}",
            state.center_x, state.center_y
        )),
        Line::from(format!("zoom    {:.6}", state.zoom)),
        Line::from(format!(
            "plane   x [{:+.9}, {:+.9}]  y [{:+.9}, {:+.9}]",
            ext.min_x,
            ext.max_x(),
            ext.min_y,
            ext.max_y()
        )),
        Line::from(""),
        Line::from(format!(
            "pending pan {:+.2} x {:+.2} viewports, level {}",
            off_x, off_y, transform.zoom_level
        )),
        Line::from(""),
        Line::from(format!("image   {image}")),
        Line::from(format!("status  {status}")),
    ]
}
