//! Main UI rendering logic

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, AppMode};
use super::utils::{gauge_ratio, get_message_style, progress_color};
use crate::progress::ProgressReport;
use crate::report::{format_optional_percent, format_percent};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Apartment input
            Constraint::Length(5), // Summary metrics
            Constraint::Min(6),    // Activity table
            Constraint::Length(4), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0]);
    render_input(f, app, chunks[1]);

    match app.mode {
        AppMode::Help => {
            let help_area = Rect {
                height: chunks[2].height + chunks[3].height,
                ..chunks[2]
            };
            render_help(f, help_area);
        }
        AppMode::Normal => match &app.report {
            Some(report) => {
                render_metrics(f, app, report, chunks[2]);
                render_activity_table(f, app, report, chunks[3]);
            }
            None => render_not_found(f, app, chunks[2]),
        },
    }

    render_messages(f, app, chunks[4]);
    render_footer(f, app, chunks[5]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let summary = app.ctx.summary();
    let title = format!(
        " {} - {} apartments - loaded {} ",
        app.ctx.config.title,
        summary.rows_kept,
        summary.loaded_at.format("%Y-%m-%d %H:%M")
    );
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (min, max) = app.range();
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll = app.input.visual_scroll(inner_width);

    let input = Paragraph::new(app.input.value())
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Enter Apartment No ({}-{}) ", min, max))
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(input, area);

    if app.mode == AppMode::Normal {
        let cursor = app.input.visual_cursor().saturating_sub(scroll) as u16;
        f.set_cursor(area.x + 1 + cursor, area.y + 1);
    }
}

fn render_metrics(f: &mut Frame, app: &App, report: &ProgressReport, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let identity = Paragraph::new(vec![
        Line::from(Span::styled(
            report.apartment.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Floor: "),
            Span::styled(
                report.floor.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Apartment No ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(identity, columns[0]);

    let gauges = [
        (" Apartment Total Progress ".to_string(), report.apartment_overall),
        (
            format!(" {} Overall Progress ", app.ctx.config.building_label),
            report.dataset_overall,
        ),
    ];
    for ((title, value), area) in gauges.into_iter().zip(columns.iter().skip(1)) {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .gauge_style(Style::default().fg(progress_color(value)))
            .ratio(gauge_ratio(value))
            .label(format_percent(value));
        f.render_widget(gauge, *area);
    }
}

fn render_activity_table(f: &mut Frame, app: &App, report: &ProgressReport, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Activity"),
        Cell::from("Apartment Progress"),
        Cell::from(format!("{} Avg", app.ctx.config.building_label)),
    ])
    .style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let rows: Vec<Row> = report
        .activities
        .iter()
        .map(|a| {
            let apt_style = match a.apartment_value {
                Some(v) if v + 1e-9 < a.dataset_mean => Style::default().fg(Color::Yellow),
                Some(_) => Style::default().fg(Color::Green),
                None => Style::default().fg(Color::DarkGray),
            };
            Row::new(vec![
                Cell::from(a.name.clone()),
                Cell::from(format_optional_percent(a.apartment_value)).style(apt_style),
                Cell::from(format_percent(a.dataset_mean)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Activity-wise Comparison ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_not_found(f: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Apartment {} not found in data.", app.selected),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(paragraph, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("  0-9 / Backspace   Edit apartment number"),
        Line::from("  Enter             Show typed apartment"),
        Line::from("  ↑/↓               Next / previous number"),
        Line::from("  PgUp/PgDn         Jump by 10"),
        Line::from("  Home/End          First / last apartment"),
        Line::from("  n/p               Next / previous existing apartment"),
        Line::from("  q or Esc          Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to return...",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

/// Render the messages pane
fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = app
        .messages
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|msg| {
            let style = get_message_style(msg.message_type);
            Line::from(vec![
                Span::styled(format!("{} ", msg.icon()), style),
                Span::styled(msg.text.as_str(), style),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

/// Render the footer with keyboard shortcuts
fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.mode {
        AppMode::Normal => {
            "[0-9] Type  [Enter] Show  [↑↓] ±1  [PgUp/PgDn] ±10  [n/p] Next/prev existing  [?] help  [q]uit"
        }
        AppMode::Help => "Press any key to return",
    };

    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(footer, area);
}
