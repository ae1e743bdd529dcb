//! TUI rendering with ratatui
//!
//! Board, keyboard and alert panels for the sealed game.

use super::app::{App, Phase};
use crate::core::{GameProgressState, LetterVerdict, MatchStatus};
use crate::output::AlertKind;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Main UI rendering function
pub fn ui<G>(f: &mut Frame, app: &App<G>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board and side panels
            Constraint::Length(3), // Pending indicator
            Constraint::Length(1), // Help
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_board(f, app, main_chunks[0]);
    render_side_panel(f, app, main_chunks[1]);
    render_pending(f, app, chunks[2]);
    render_help(f, chunks[3]);
}

fn render_header<G>(f: &mut Frame, app: &App<G>, area: Rect) {
    let (phase, color) = match app.phase {
        Phase::Connecting => ("connecting…", Color::Yellow),
        Phase::Connected => (app.controller.status().name(), status_color(app.controller.status())),
        Phase::Failed => ("offline, Ctrl-R to retry", Color::Red),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("SEALED WORDLE #{}", app.epoch),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(phase, Style::default().fg(color)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn render_board<G>(f: &mut Frame, app: &App<G>, area: Rect) {
    let progress = app.controller.progress();
    let mut lines = vec![Line::from("")];

    for (index, record) in progress.guesses().iter().enumerate() {
        let Some(feedback) = progress.verdicts(index) else {
            continue;
        };
        let mut spans: Vec<Span> = record
            .word()
            .letters()
            .iter()
            .zip(feedback.verdicts())
            .map(|(letter, &verdict)| tile(letter, Some(verdict)))
            .collect();
        if progress.divergent_guesses().contains(&index) {
            spans.push(Span::styled(" ⚠", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
    }

    let mut rows = progress.guesses().len();
    if accepts_input(progress) {
        let typed: Vec<&str> = app.controller.input().text().graphemes(true).collect();
        lines.push(blank_row(&typed, progress.solution_length()));
        rows += 1;
    }
    for _ in rows..progress.max_attempts() {
        lines.push(blank_row(&[], progress.solution_length()));
    }

    let board = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(format!(
                " Guesses {}/{} ",
                progress.attempts_used(),
                progress.max_attempts()
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(board, area);
}

fn render_side_panel<G>(f: &mut Frame, app: &App<G>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    render_keyboard(f, app, chunks[0]);
    render_alerts(f, app, chunks[1]);
}

fn render_keyboard<G>(f: &mut Frame, app: &App<G>, area: Rect) {
    let statuses: FxHashMap<String, LetterVerdict> = app.controller.keyboard().unwrap_or_default();

    let lines: Vec<Line> = KEYBOARD_ROWS
        .iter()
        .map(|row| {
            Line::from(
                row.graphemes(true)
                    .map(|key| tile(key, statuses.get(key).copied()))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let keyboard = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Keyboard ").borders(Borders::ALL));
    f.render_widget(keyboard, area);
}

fn render_alerts<G>(f: &mut Frame, app: &App<G>, area: Rect) {
    let items: Vec<ListItem> = app
        .alerts
        .iter()
        .rev()
        .map(|alert| {
            let style = match alert.kind() {
                AlertKind::Info => Style::default().fg(Color::White),
                AlertKind::Success => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                AlertKind::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(alert.text().to_string()).style(style)
        })
        .collect();

    let alerts = List::new(items).block(Block::default().title(" Messages ").borders(Borders::ALL));
    f.render_widget(alerts, area);
}

fn render_pending<G>(f: &mut Frame, app: &App<G>, area: Rect) {
    let (text, color) = if app.controller.is_submission_pending() {
        ("⏳ Waiting for the ledger…", Color::Yellow)
    } else if app.syncing {
        ("↻ Refreshing…", Color::DarkGray)
    } else if !app.controller.progress().is_started() && app.phase == Phase::Connected {
        ("Press Ctrl-S to start the match", Color::Cyan)
    } else {
        ("", Color::Reset)
    };

    let pending = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(color)),
        );
    f.render_widget(pending, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new("Enter: Submit | Backspace: Delete | Ctrl-S: Start | Ctrl-R: Refresh | Esc: Quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}

fn accepts_input(progress: &GameProgressState) -> bool {
    !progress.status().is_terminal() && progress.attempts_used() < progress.max_attempts()
}

fn blank_row(typed: &[&str], length: usize) -> Line<'static> {
    Line::from(
        (0..length)
            .map(|i| match typed.get(i) {
                Some(letter) => Span::styled(
                    format!(" {} ", letter.to_uppercase()),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                None => Span::styled(" · ", Style::default().fg(Color::DarkGray)),
            })
            .collect::<Vec<_>>(),
    )
}

fn tile(letter: &str, verdict: Option<LetterVerdict>) -> Span<'static> {
    let style = match verdict {
        Some(LetterVerdict::Correct) => Style::default().fg(Color::Black).bg(Color::Green),
        Some(LetterVerdict::Present) => Style::default().fg(Color::Black).bg(Color::Yellow),
        Some(LetterVerdict::Absent) => Style::default().fg(Color::White).bg(Color::DarkGray),
        None => Style::default().fg(Color::White),
    };
    Span::styled(
        format!(" {} ", letter.to_uppercase()),
        style.add_modifier(Modifier::BOLD),
    )
}

const fn status_color(status: MatchStatus) -> Color {
    match status {
        MatchStatus::NotStarted => Color::DarkGray,
        MatchStatus::InProgress => Color::Cyan,
        MatchStatus::Won => Color::Green,
        MatchStatus::Lost => Color::Red,
    }
}
