use super::app::{App, Screen, View, detail_fields};
use crate::utils::{StatusTone, status_tone};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Tabs},
};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], app);
    match app.screen {
        Screen::List => draw_table(frame, chunks[1], app),
        Screen::Detail(_) => draw_detail(frame, chunks[1], app),
    }
    draw_footer(frame, chunks[2], app);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
    let selected = View::ALL.iter().position(|v| *v == app.view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" dom - DigitalOcean "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App) {
    let headers = app.view.headers();
    let header = Row::new(headers.to_vec()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let status_column = headers.iter().position(|h| *h == "Status");
    let rows = app.rows.iter().map(|row| {
        let style = status_column
            .and_then(|i| row.get(i))
            .map(|s| Style::default().fg(status_color(s)))
            .unwrap_or_default();
        Row::new(row.clone()).style(style)
    });

    let table = Table::new(rows, vec![Constraint::Fill(1); headers.len()])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.view.title())),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(droplet) = app.detail() else {
        return;
    };

    let lines: Vec<Line> = detail_fields(droplet)
        .into_iter()
        .map(|(label, value)| {
            let value_style = if label == "Status" {
                Style::default().fg(status_color(&value))
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", format!("{}:", label)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    let detail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Droplet: {} ", droplet.name)),
    );
    frame.render_widget(detail, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let keys = match app.screen {
        Screen::List => "d/v/o/f/b: views  Tab: next  r: refresh  ↑↓/jk: move  Enter: select  q: quit",
        Screen::Detail(_) => "Esc: back  s: ssh  R: reboot  P: power off  O: power on  q: quit",
    };

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(keys, Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

fn status_color(status: &str) -> Color {
    match status_tone(status) {
        StatusTone::Good => Color::Green,
        StatusTone::Pending => Color::Yellow,
        StatusTone::Bad => Color::Red,
        StatusTone::Unknown => Color::Gray,
    }
}
