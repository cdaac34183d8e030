use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Focus;
use crate::session::Session;

const CARET: &str = "▏";

pub fn render_header(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " ◆ Chatrapati AI ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(61))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Tab focus · Ctrl+S classify · Ctrl+L clear · Ctrl+H history · Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn submit_label(session: &Session) -> &'static str {
    if session.is_busy() {
        "Analyzing Patterns..."
    } else {
        "Classify Email"
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Indexed(99))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ))
}

fn with_caret(text: &str, focused: bool) -> String {
    if focused {
        format!("{text}{CARET}")
    } else {
        text.to_string()
    }
}

/// Rows to skip so the last wrapped row, where the caret sits, stays visible.
fn tail_offset(body: &Paragraph, width: u16, height: u16) -> u16 {
    let rows = body.line_count(width);
    u16::try_from(rows.saturating_sub(height as usize)).unwrap_or(u16::MAX)
}

pub fn render_form(f: &mut Frame, areas: [Rect; 3], session: &Session, focus: Focus) {
    let [subject_area, content_area, actions_area] = areas;

    let subject_focused = focus == Focus::Subject;
    let subject = if session.subject().is_empty() && !subject_focused {
        Paragraph::new(Span::styled(
            "Enter email subject line...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(with_caret(session.subject(), subject_focused))
    };
    f.render_widget(
        subject.block(field_block(" Subject (Optional) ", subject_focused)),
        subject_area,
    );

    let content_focused = focus == Focus::Content;
    let block = field_block(" Email Body Content ", content_focused);
    let inner = block.inner(content_area);
    let body = if session.content().is_empty() && !content_focused {
        Paragraph::new(Span::styled(
            "Paste the full email text here, including any suspicious links or signatures...",
            Style::default().fg(Color::DarkGray),
        ))
        .wrap(Wrap { trim: false })
    } else {
        let body = Paragraph::new(with_caret(session.content(), content_focused))
            .wrap(Wrap { trim: false });
        let offset = tail_offset(&body, inner.width, inner.height);
        body.scroll((offset, 0))
    };
    f.render_widget(block, content_area);
    f.render_widget(body, inner);

    let button_style = if session.can_submit() {
        Style::default()
            .fg(Color::White)
            .bg(Color::Indexed(61))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    };
    let actions = Line::from(vec![
        Span::styled(
            " ⓘ Your data is analyzed via private API calls.  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!(" {} ", submit_label(session)), button_style),
    ]);
    f.render_widget(Paragraph::new(actions), actions_area);
}

pub fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled("✖ ", Style::default().fg(Color::Red)),
        Span::styled(
            message,
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(banner, area);
}
