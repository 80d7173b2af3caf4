pub mod charting;
pub mod seat_grid;

use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use crate::{
    app::App,
    config::Config,
    game::{Phase, RoundResult, WaitState},
    round::Round,
    util::format_thousands,
};

use self::seat_grid::{SeatGrid, SeatGridLayout};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const WAITING_LEGEND: &str = "(c)lear stats / (esc)ape";
const TICKETING_LEGEND: &str =
    "←↑↓→ move / (space) select / (enter) reserve / click a seat / (esc)ape";
const TICKETING_LEGEND_SHORT: &str = "←↑↓→ / (space) / (enter) / (esc)";
const RESULT_LEGEND: &str = "(r)etry / (c)lear stats / (t)weet / (esc)ape";
const RESULT_LEGEND_NO_BROWSER: &str = "(r)etry / (c)lear stats / (esc)ape";
const CONFIRM_LEGEND: &str = "Clear all statistics? (y)es / (n)o";

/// stats bar, notice, body, legend
fn screen_chunks(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area)
}

/// title, padding, grid, selection status
fn ticketing_chunks(body: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(body)
}

/// Where the seat grid lands for a terminal of size `area`
pub fn seat_grid_layout(area: Rect, config: &Config) -> SeatGridLayout {
    let body = screen_chunks(area)[2];
    let grid = ticketing_chunks(body)[2];
    SeatGridLayout::new(grid, config.total_seats, config.columns)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let chunks = screen_chunks(area);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        Paragraph::new(Span::styled(game.summary().to_string(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        if let Some(notice) = &self.notice {
            Paragraph::new(Span::styled(
                notice.as_str(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        }

        let legend = match game.phase() {
            Phase::Waiting(wait) => {
                render_waiting(wait, chunks[2], buf);
                WAITING_LEGEND
            }
            Phase::Ticketing(round) => {
                let layout = seat_grid_layout(area, game.config());
                render_ticketing(round, layout, self.cursor, chunks[2], buf);
                fit_legend(TICKETING_LEGEND, TICKETING_LEGEND_SHORT, chunks[3].width)
            }
            Phase::Result(result) => {
                render_result(result, &game.trend(), chunks[2], buf);
                if Browser::is_available() {
                    RESULT_LEGEND
                } else {
                    RESULT_LEGEND_NO_BROWSER
                }
            }
        };

        let legend = if self.confirm_reset {
            Span::styled(
                CONFIRM_LEGEND,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(legend, italic_style)
        };
        Paragraph::new(legend).render(chunks[3], buf);
    }
}

fn fit_legend<'a>(full: &'a str, short: &'a str, width: u16) -> &'a str {
    if full.width() <= width as usize {
        full
    } else {
        short
    }
}

fn render_waiting(wait: &WaitState, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Get ready, tickets go on sale any moment...",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        wait.countdown_label(),
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_ticketing(
    round: &Round,
    layout: SeatGridLayout,
    cursor: u32,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = ticketing_chunks(area);

    Paragraph::new(Line::from(vec![
        Span::raw("Seat "),
        Span::styled(
            round.target.to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" is on sale, grab it!"),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    SeatGrid {
        round,
        layout,
        cursor,
    }
    .render(chunks[2], buf);

    let status = match round.selected {
        None => Span::styled(
            format!("{} open seats left, pick yours", round.available.len()),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Some(seat) if seat == round.target => Span::styled(
            format!("Seat {seat} selected, press (enter) to reserve"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Some(seat) => Span::styled(
            format!("Seat {seat} is not the one you came for"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };
    Paragraph::new(status)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}

fn render_result(
    result: &RoundResult,
    trend: &crate::trend::TrendChart,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let magenta_bold = bold_style.fg(Color::Magenta);
    let blue_bold = bold_style.fg(Color::Blue);

    Paragraph::new(Line::from(vec![
        Span::raw("Seat "),
        Span::styled(result.seat.to_string(), bold_style),
        Span::raw(" reserved in "),
        Span::styled(format!("{} ms", result.attempt.reaction_time), blue_bold),
        Span::raw("   queue position "),
        Span::styled(
            format!("#{}", format_thousands(result.attempt.queue_position)),
            magenta_bold,
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        result.verdict.message(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[1], buf);

    charting::render_trend(trend, chunks[3], buf);
}
