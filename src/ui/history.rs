use chrono_tz::Tz;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{Focus, ViewState};
use crate::{
    domain::{ClassificationResult, ClassificationType},
    session::Session,
};

fn icon(kind: &ClassificationType) -> (&'static str, Color) {
    match kind {
        ClassificationType::Spam => ("⚠", Color::Yellow),
        ClassificationType::Phishing => ("☠", Color::Red),
        ClassificationType::Ham => ("✔", Color::Green),
        _ => ("?", Color::DarkGray),
    }
}

pub fn display_subject(item: &ClassificationResult) -> &str {
    if item.subject.is_empty() {
        "(No Subject)"
    } else {
        &item.subject
    }
}

pub fn display_time(item: &ClassificationResult, tz: &Tz) -> String {
    item.timestamp.with_timezone(tz).format("%H:%M").to_string()
}

fn entry<'a>(item: &'a ClassificationResult, active: bool, tz: &Tz) -> ListItem<'a> {
    let (glyph, color) = icon(&item.kind);
    let preview = item.content.lines().next().unwrap_or_default();
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{glyph} "), Style::default().fg(color)),
            Span::styled(
                display_time(item, tz),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            display_subject(item),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(preview, Style::default().fg(Color::Gray))),
    ];
    let item = ListItem::new(lines);
    if active {
        item.style(Style::default().bg(Color::Indexed(236)))
    } else {
        item
    }
}

pub fn render_history(f: &mut Frame, area: Rect, session: &Session, view: &ViewState) {
    let border = if view.focus == Focus::History {
        Style::default().fg(Color::Indexed(99))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Recent Analysis ");

    let history = session.history();
    if history.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No analysis history yet.",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block),
            area,
        );
        return;
    }

    let active_id = session.current_result().map(|r| r.id);
    let items: Vec<ListItem> = history
        .iter()
        .map(|item| entry(item, Some(item.id) == active_id, &view.timezone))
        .collect();

    let mut state = ListState::default();
    if view.focus == Focus::History {
        state.select(Some(view.history_cursor.min(history.len() - 1)));
    }
    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, area, &mut state);
}
