mod form;
mod history;
mod result;

pub use result::result_line_count;

use chrono_tz::Tz;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::{domain::ClassificationResult, session::Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Subject,
    Content,
    History,
}

impl Focus {
    pub fn next(self, history_visible: bool) -> Self {
        match self {
            Self::Subject => Self::Content,
            Self::Content if history_visible => Self::History,
            Self::Content | Self::History => Self::Subject,
        }
    }
}

/// Transient UI state. None of it is part of the session.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub focus: Focus,
    pub history_cursor: usize,
    pub show_history: bool,
    pub result_scroll: u16,
    pub timezone: Tz,
}

impl ViewState {
    pub fn new(timezone: Tz) -> Self {
        Self {
            focus: Focus::Content,
            history_cursor: 0,
            show_history: true,
            result_scroll: 0,
            timezone,
        }
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        if !self.show_history && self.focus == Focus::History {
            self.focus = Focus::Content;
        }
    }

    pub fn cursor_down(&mut self, len: usize) {
        if len > 0 {
            self.history_cursor = (self.history_cursor + 1).min(len - 1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.history_cursor = self.history_cursor.saturating_sub(1);
    }

    /// `max` is the number of lines in the result body being scrolled.
    pub fn scroll_result_down(&mut self, step: u16, max: usize) {
        let max = u16::try_from(max.saturating_sub(1)).unwrap_or(u16::MAX);
        self.result_scroll = self.result_scroll.saturating_add(step).min(max);
    }

    pub fn scroll_result_up(&mut self, step: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(step);
    }
}

/// Which of the three mutually exclusive bodies is on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyView<'a> {
    Welcome,
    Loading,
    Result(&'a ClassificationResult),
}

pub fn body_view(session: &Session) -> BodyView<'_> {
    if session.is_busy() {
        return BodyView::Loading;
    }
    match session.current_result() {
        Some(result) => BodyView::Result(result),
        None => BodyView::Welcome,
    }
}

pub fn render(f: &mut Frame, session: &Session, view: &ViewState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(f.area());
    form::render_header(f, rows[0]);

    let main = if view.show_history {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(rows[1]);
        history::render_history(f, cols[0], session, view);
        cols[1]
    } else {
        rows[1]
    };

    let banner_height = if session.error().is_some() { 3 } else { 0 };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(0),
        ])
        .split(main);

    form::render_form(f, [sections[0], sections[1], sections[2]], session, view.focus);
    if let Some(error) = session.error() {
        form::render_error(f, sections[3], error);
    }

    match body_view(session) {
        BodyView::Welcome => result::render_welcome(f, sections[4]),
        BodyView::Loading => result::render_skeleton(f, sections[4]),
        BodyView::Result(item) => {
            result::render_result(f, sections[4], item, view.result_scroll)
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

    use super::*;
    use crate::{
        ai::ClassificationError,
        domain::{ClassificationType, ModelVerdict, SpamFeature},
    };

    fn verdict(kind: ClassificationType) -> ModelVerdict {
        ModelVerdict {
            kind,
            confidence: 92.4,
            explanation: "Credential harvesting attempt".into(),
            features: vec![SpamFeature {
                name: "Urgency".into(),
                score: 85.0,
                description: "Demands action now".into(),
            }],
            recommendation: "Delete immediately".into(),
        }
    }

    fn stored(session: &mut Session, subject: &str, kind: ClassificationType) {
        session.set_subject(subject);
        session.set_content("Click here to verify your account now");
        let pending = session.begin_submit().unwrap();
        session.complete(Ok(ClassificationResult::from_verdict(
            verdict(kind),
            pending.subject,
            pending.content,
        )));
    }

    fn draw_buffer(session: &Session, view: &ViewState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        terminal.draw(|f| render(f, session, view)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16, columns: std::ops::Range<u16>) -> String {
        columns.map(|x| buffer[(x, y)].symbol()).collect()
    }

    fn draw(session: &Session, view: &ViewState) -> String {
        let buffer = draw_buffer(session, view);
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn body_is_welcome_then_loading_then_result() {
        let mut session = Session::new();
        assert_eq!(body_view(&session), BodyView::Welcome);

        session.set_content("hello");
        let pending = session.begin_submit().unwrap();
        assert_eq!(body_view(&session), BodyView::Loading);

        session.complete(Ok(ClassificationResult::from_verdict(
            verdict(ClassificationType::Spam),
            pending.subject,
            pending.content,
        )));
        assert!(matches!(body_view(&session), BodyView::Result(_)));
    }

    #[test]
    fn loading_wins_over_an_existing_result() {
        let mut session = Session::new();
        stored(&mut session, "first", ClassificationType::Ham);
        session.begin_submit().unwrap();
        assert_eq!(body_view(&session), BodyView::Loading);
    }

    #[test]
    fn focus_skips_hidden_history() {
        assert_eq!(Focus::Content.next(true), Focus::History);
        assert_eq!(Focus::Content.next(false), Focus::Subject);
        assert_eq!(Focus::History.next(true), Focus::Subject);
    }

    #[test]
    fn hiding_history_moves_focus_away() {
        let mut view = ViewState::new(chrono_tz::UTC);
        view.focus = Focus::History;
        view.toggle_history();
        assert!(!view.show_history);
        assert_eq!(view.focus, Focus::Content);
    }

    #[test]
    fn history_cursor_stays_in_bounds() {
        let mut view = ViewState::new(chrono_tz::UTC);
        view.cursor_down(2);
        view.cursor_down(2);
        assert_eq!(view.history_cursor, 1);
        view.cursor_up();
        view.cursor_up();
        assert_eq!(view.history_cursor, 0);
    }

    #[test]
    fn welcome_screen_lists_capabilities() {
        let screen = draw(&Session::new(), &ViewState::new(chrono_tz::UTC));
        assert!(screen.contains("How it works"));
        assert!(screen.contains("No analysis history yet."));
    }

    #[test]
    fn result_screen_shows_verdict_and_indicators() {
        let mut session = Session::new();
        stored(&mut session, "Urgent", ClassificationType::Phishing);
        let screen = draw(&session, &ViewState::new(chrono_tz::UTC));
        assert!(screen.contains("PHISHING DETECTED"));
        assert!(screen.contains("Warning: High Risk Detected"));
        assert!(screen.contains("92%"));
        assert!(screen.contains("Key Indicators"));
        assert!(screen.contains("Urgency"));
        assert!(screen.contains("Delete immediately"));
    }

    #[test]
    fn error_banner_is_drawn() {
        let mut session = Session::new();
        session.set_content("body");
        session.begin_submit().unwrap();
        session.complete(Err(ClassificationError::EmptyResponse));
        let screen = draw(&session, &ViewState::new(chrono_tz::UTC));
        assert!(screen.contains("Failed to analyze email."));
    }

    #[test]
    fn history_sidebar_can_be_hidden() {
        let mut session = Session::new();
        stored(&mut session, "", ClassificationType::Ham);
        let mut view = ViewState::new(chrono_tz::UTC);
        assert!(draw(&session, &view).contains("(No Subject)"));
        view.toggle_history();
        assert!(!draw(&session, &view).contains("Recent Analysis"));
    }

    fn detailed_phishing(session: &mut Session) {
        session.set_subject("Account notice");
        session.set_content("Your mailbox is full, log in here");
        let pending = session.begin_submit().unwrap();
        let verdict = ModelVerdict {
            kind: ClassificationType::Phishing,
            confidence: 96.0,
            explanation: "The sender impersonates the mail administrator and points to a \
                look-alike domain. The message threatens account suspension within hours. \
                It asks for the current password on an external form. None of the links \
                resolve to the organisation's real login page."
                .into(),
            features: (1..=8)
                .map(|i| SpamFeature {
                    name: format!("Signal {i}"),
                    score: 10.0 * i as f64,
                    description: format!("observation #{i}."),
                })
                .collect(),
            recommendation: "Report and delete".into(),
        };
        session.complete(Ok(ClassificationResult::from_verdict(
            verdict,
            pending.subject,
            pending.content,
        )));
    }

    #[test]
    fn recommendation_stays_visible_with_long_explanation() {
        let mut session = Session::new();
        detailed_phishing(&mut session);
        let screen = draw(&session, &ViewState::new(chrono_tz::UTC));
        assert!(screen.contains("Report and delete"));
        assert!(screen.contains("observation #1."));
        assert!(screen.contains("Feature Decomposition"));
    }

    #[test]
    fn every_indicator_is_reachable_by_scrolling() {
        let mut session = Session::new();
        detailed_phishing(&mut session);
        let mut view = ViewState::new(chrono_tz::UTC);
        let total = result_line_count(session.current_result().unwrap());

        for step in 0..total {
            view.result_scroll = step as u16;
            if draw(&session, &view).contains("observation #8.") {
                assert!(draw(&session, &view).contains("Report and delete"));
                return;
            }
        }
        panic!("last indicator never came into view");
    }

    #[test]
    fn scroll_is_capped_by_body_length() {
        let mut session = Session::new();
        detailed_phishing(&mut session);
        let mut view = ViewState::new(chrono_tz::UTC);
        let total = result_line_count(session.current_result().unwrap());
        view.scroll_result_down(u16::MAX, total);
        assert_eq!(view.result_scroll as usize, total - 1);
        assert!(draw(&session, &view).contains("observation #8."));
        view.scroll_result_up(u16::MAX);
        assert_eq!(view.result_scroll, 0);
    }

    #[test]
    fn only_the_selected_history_entry_is_highlighted() {
        let mut session = Session::new();
        stored(&mut session, "older mail", ClassificationType::Spam);
        stored(&mut session, "newer mail", ClassificationType::Ham);
        assert!(session.select_history_at(1));

        let buffer = draw_buffer(&session, &ViewState::new(chrono_tz::UTC));
        // Only the sidebar columns; the restored subject also shows in the form.
        let subject_row = |subject: &str| {
            (0..buffer.area.height)
                .find(|&y| row_text(&buffer, y, 0..34).contains(subject))
                .unwrap()
        };
        let active = subject_row("older mail");
        let inactive = subject_row("newer mail");
        let highlight = Color::Indexed(236);

        for y in active - 1..=active + 1 {
            assert_eq!(buffer[(2, y)].bg, highlight, "row {y}");
        }
        for y in inactive - 1..=inactive + 1 {
            assert_ne!(buffer[(2, y)].bg, highlight, "row {y}");
        }
        let highlighted_rows = (0..buffer.area.height)
            .filter(|&y| buffer[(2, y)].bg == highlight)
            .count();
        assert_eq!(highlighted_rows, 3);
    }

    #[test]
    fn long_single_line_body_keeps_its_tail_in_view() {
        let mut session = Session::new();
        session.set_content(format!("{}TAILMARK", "word ".repeat(300)));
        let screen = draw(&session, &ViewState::new(chrono_tz::UTC));
        assert!(screen.contains("TAILMARK"));
    }
}
