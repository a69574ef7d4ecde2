use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::app::{App, Screen};
use crate::clock::TimeSource;
use crate::format::{
    format_distance, format_pace, format_percentage, format_projected_time, format_speed,
    format_time,
};
use crate::lap::Lap;
use crate::stats::{lap_comparison, RunStats, SplitType};
use crate::storage::KeyValueStore;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl<S: KeyValueStore, T: TimeSource> Widget for &App<S, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Tracking => render_tracking(self, area, buf),
            Screen::Summary => render_summary(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn render_tracking<S: KeyValueStore, T: TimeSource>(app: &App<S, T>, area: Rect, buf: &mut Buffer) {
    let timer = &app.timer;
    let stats = app.stats();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(1), // lap distance
            Constraint::Length(5), // clocks
            Constraint::Length(1), // key help
            Constraint::Length(if timer.has_laps() { 6 } else { 0 }),
            Constraint::Min(0), // laps
        ])
        .split(area);

    let greeting = match &app.profile {
        Some(profile) => format!("Let's run, {}!", profile.name),
        None => "Indoor Run Tracker".to_string(),
    };
    Paragraph::new(vec![
        Line::from(Span::styled("LapTrack", bold().fg(Color::Cyan))),
        Line::from(Span::styled(greeting, dim())),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let distance_hint = if timer.has_started() {
        ""
    } else {
        "  (+/- to change)"
    };
    Paragraph::new(format!("Lap distance: {} m{}", timer.lap_distance(), distance_hint))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let state_style = if timer.is_running() {
        bold().fg(Color::Green)
    } else {
        bold().fg(Color::Yellow)
    };
    Paragraph::new(vec![
        Line::from(Span::styled(format_time(timer.session().elapsed_time), state_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("Lap {}  ", timer.laps().len() + 1), dim()),
            Span::raw(format_time(timer.session().current_lap_time)),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
    .render(chunks[2], buf);

    let help = match (timer.has_started(), timer.is_running()) {
        (false, _) => "space start · q quit",
        (true, true) => "space pause · l lap · u undo · f finish · q quit",
        (true, false) => "space resume · u undo · r reset · f finish · q quit",
    };
    Paragraph::new(Span::styled(help, dim()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    if timer.has_laps() {
        stats_block(&stats).render(chunks[4], buf);
        lap_table(timer.laps(), &stats).render(chunks[5], buf);
    }
}

fn stats_block<'a>(stats: &RunStats<'_>) -> Paragraph<'a> {
    let mut lines = vec![Line::from(format!(
        "Distance {}   Time {}   Pace {}/km   Speed {} km/h",
        format_distance(stats.total_distance),
        format_time(stats.total_time),
        format_pace(stats.average_pace),
        format_speed(stats.average_speed),
    ))];

    if let (Some(fastest), Some(slowest)) = (stats.fastest_lap, stats.slowest_lap) {
        lines.push(Line::from(format!(
            "Fastest {} (lap {})   Slowest {} (lap {})   Consistency {:.1}%   Range {:.0}s",
            format_time(fastest.time),
            fastest.lap_number,
            format_time(slowest.time),
            slowest.lap_number,
            stats.pace_consistency,
            stats.pace_range,
        )));
    }

    if let Some(split) = stats.split_analysis {
        let color = match split.split_type {
            SplitType::Negative => Color::Green,
            SplitType::Positive => Color::Red,
            SplitType::Even => Color::Blue,
        };
        lines.push(Line::from(vec![
            Span::raw(format!(
                "Split {} → {}  ",
                format_pace(split.first_half_pace),
                format_pace(split.second_half_pace)
            )),
            Span::styled(
                format!(
                    "{} ({})",
                    split.split_type,
                    format_percentage(split.split_difference)
                ),
                Style::default().fg(color),
            ),
        ]));
    }

    if !stats.projected_times.is_empty() {
        let projections = stats
            .projected_times
            .iter()
            .map(|p| format!("{} {}", p.target, format_projected_time(p.time)))
            .collect::<Vec<_>>()
            .join("   ");
        lines.push(Line::from(format!("Projected  {}", projections)));
    }

    if let Some(kcal) = stats.calories_burned {
        lines.push(Line::from(format!("Calories {:.0} kcal", kcal)));
    }

    Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title("Stats"))
}

fn lap_table<'a>(laps: &[Lap], stats: &RunStats<'_>) -> Table<'a> {
    let fastest = stats.fastest_lap.map(|l| l.lap_number);
    let slowest = stats.slowest_lap.map(|l| l.lap_number);

    // newest first
    let rows = laps.iter().rev().map(|lap| {
        let style = if laps.len() > 1 && Some(lap.lap_number) == fastest {
            Style::default().fg(Color::Green)
        } else if laps.len() > 1 && Some(lap.lap_number) == slowest {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(format!("#{}", lap.lap_number)),
            Cell::from(format_time(lap.time)),
            Cell::from(format!("{}/km", format_pace(lap.pace))),
            Cell::from(format_percentage(lap_comparison(lap.time, stats.average_lap_time))),
        ])
        .style(style)
    });

    Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["Lap", "Time", "Pace", "vs avg"]).style(bold().fg(Color::Yellow)))
    .block(Block::default().borders(Borders::TOP).title("Laps"))
}

fn render_summary<S: KeyValueStore, T: TimeSource>(app: &App<S, T>, area: Rect, buf: &mut Buffer) {
    let stats = app.stats();
    let name = app
        .profile
        .as_ref()
        .map_or("Runner", |profile| profile.name.as_str());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled("Race Complete!", bold().fg(Color::Green))),
        Line::from(format!("Great run, {}!", name)),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    stats_block(&stats).render(chunks[1], buf);
    lap_table(&app.final_laps, &stats).render(chunks[2], buf);

    Paragraph::new(Span::styled("n new race · q quit", dim()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}
