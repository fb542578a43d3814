use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
    Frame,
};
use tasklist_core::{FilterStatus, Priority};
use unicode_width::UnicodeWidthChar;

use crate::tui::app::{App, InputMode};

struct Theme {
    accent: Color,
    text: Color,
    muted: Color,
    high: Color,
    medium: Color,
    overdue: Color,
}

fn theme(dark_mode: bool) -> Theme {
    if dark_mode {
        Theme {
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::DarkGray,
            high: Color::Red,
            medium: Color::Yellow,
            overdue: Color::LightRed,
        }
    } else {
        Theme {
            accent: Color::Blue,
            text: Color::Black,
            muted: Color::Gray,
            high: Color::Red,
            medium: Color::Magenta,
            overdue: Color::Red,
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let theme = theme(app.dark_mode);
    let size = f.area();

    let input_active = app.input_mode != InputMode::Normal;
    let mut constraints = vec![Constraint::Length(3)];
    if app.show_stats {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(1));
    if input_active {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let mut next = 0;
    draw_header(f, app, &theme, chunks[next]);
    next += 1;

    if app.show_stats {
        draw_stats(f, app, &theme, chunks[next]);
        next += 1;
    }

    draw_task_list(f, app, &theme, chunks[next]);
    next += 1;

    if input_active {
        draw_input(f, app, &theme, chunks[next]);
        next += 1;
    }

    draw_footer(f, app, &theme, chunks[next]);
}

fn draw_header(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mode = if app.dark_mode { "dark" } else { "light" };
    let header = Paragraph::new(format!("TASKLIST ({})", mode))
        .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, area);
}

fn draw_stats(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let stats = app.store.stats();
    let line = Line::from(vec![
        Span::styled("Total: ", Style::default().fg(theme.muted)),
        Span::raw(stats.total.to_string()),
        Span::styled("  Completed: ", Style::default().fg(theme.muted)),
        Span::raw(stats.completed.to_string()),
        Span::styled("  Active: ", Style::default().fg(theme.muted)),
        Span::raw(stats.active.to_string()),
        Span::styled("  High priority: ", Style::default().fg(theme.muted)),
        Span::raw(stats.high_priority.to_string()),
        Span::styled("  Overdue: ", Style::default().fg(theme.overdue)),
        Span::raw(stats.overdue.to_string()),
    ]);
    let panel = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(panel, area);
}

fn draw_task_list(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let now = Utc::now();
    let rows: Vec<Row> = app
        .visible()
        .iter()
        .map(|task| {
            let status_icon = if task.completed { "✔" } else { "☐" };

            let (pri_str, pri_style) = match task.priority {
                Priority::High => ("H", Style::default().fg(theme.high)),
                Priority::Medium => ("M", Style::default().fg(theme.medium)),
                Priority::None => ("-", Style::default().fg(theme.muted)),
            };

            let due_str = task
                .due_date
                .map(|d| d.with_timezone(&Local).format("%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let due_style = if task.is_overdue(now) {
                Style::default().fg(theme.overdue)
            } else {
                Style::default().fg(theme.text)
            };

            let text_style = if task.completed {
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(theme.text)
            };

            Row::new(vec![
                Span::raw(status_icon),
                Span::styled(pri_str, pri_style),
                Span::styled(due_str, due_style),
                Span::styled(task.text.clone(), text_style),
            ])
        })
        .collect();

    let filter_label = match app.criteria.status {
        FilterStatus::All => "All",
        FilterStatus::Active => "Active",
        FilterStatus::Completed => "Completed",
    };
    let title = if app.criteria.query.is_empty() {
        format!(" Tasks — {} ", filter_label)
    } else {
        format!(" Tasks — {} /{} ", filter_label, app.criteria.query)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(3), // Status
            Constraint::Length(3), // Priority
            Constraint::Length(6), // Due
            Constraint::Min(10),   // Text
        ],
    )
    .header(Row::new(vec!["St", "Pr", "Due", "Task"]).style(Style::default().fg(theme.accent)))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = match app.input_mode {
        InputMode::Adding => " New task ",
        InputMode::Editing => " Edit task ",
        InputMode::Searching => " Search ",
        InputMode::SettingDue => " Due date (today, +3d, 2025-01-31; empty clears) ",
        InputMode::Normal => "",
    };
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent)),
        );
    f.render_widget(input, area);
    let col = cursor_column(&app.input, app.cursor_position);
    // Clamp inside the box borders for input wider than the bar.
    let max_col = area.width.saturating_sub(2);
    f.set_cursor_position(Position::new(area.x + 1 + col.min(max_col), area.y + 1));
}

/// Display column of the cursor: rendered width of the chars before
/// it, not the char count (CJK and emoji are two cells wide).
fn cursor_column(input: &str, cursor_position: usize) -> u16 {
    input
        .chars()
        .take(cursor_position)
        .map(|c| c.width().unwrap_or(0) as u16)
        .sum()
}

fn draw_footer(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let footer = match (&app.message, app.input_mode) {
        (Some(message), _) => Paragraph::new(message.as_str())
            .style(Style::default().fg(theme.overdue))
            .alignment(Alignment::Center),
        (None, InputMode::Normal) => Paragraph::new(
            "j/k: move | space: done | a: add | e: edit | d: delete | p: priority | o: due | \
             J/K: reorder | f: filter | /: search | s: stats | t: theme | C: all done | \
             D: clear done | q: quit",
        )
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center),
        (None, _) => Paragraph::new("Enter: confirm | Esc: cancel")
            .style(Style::default().fg(theme.muted))
            .alignment(Alignment::Center),
    };
    f.render_widget(footer, area);
}
