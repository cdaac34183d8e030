use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{ClassificationResult, ClassificationType, SpamFeature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    fn color(self) -> Color {
        match self {
            Self::High => Color::Red,
            Self::Medium => Color::Yellow,
            Self::Low => Color::Green,
        }
    }
}

pub fn score_band(score: f64) -> ScoreBand {
    if score > 70.0 {
        ScoreBand::High
    } else if score > 30.0 {
        ScoreBand::Medium
    } else {
        ScoreBand::Low
    }
}

pub fn headline(kind: &ClassificationType) -> &'static str {
    match kind {
        ClassificationType::Ham => "This email looks legitimate.",
        _ => "Warning: High Risk Detected",
    }
}

/// Gauges need a ratio in [0, 1]; model scores are not range checked.
fn ratio(score: f64) -> f64 {
    if score.is_finite() {
        (score / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn accent(kind: &ClassificationType) -> Color {
    if kind.is_danger() {
        Color::Red
    } else {
        Color::Green
    }
}

pub fn render_welcome(f: &mut Frame, area: Rect) {
    let muted = Style::default().fg(Color::Gray);
    let mut lines = vec![
        Line::from(Span::styled(
            "✉  How it works",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Chatrapati AI uses large language models to extract semantic features from emails.",
            muted,
        )),
        Line::from(Span::styled(
            "Tone, intent, metadata patterns and psychological triggers are weighed to identify threats.",
            muted,
        )),
        Line::default(),
    ];
    for (title, desc) in [
        ("NLP Extraction", "Identifies linguistic anomalies"),
        ("URL Analysis", "Detects phishing proxies"),
        ("Risk Scoring", "Real-time probability calculation"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  • {title:<16}"),
                Style::default().fg(Color::Indexed(99)),
            ),
            Span::styled(desc, muted),
        ]));
    }
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

pub fn render_skeleton(f: &mut Frame, area: Rect) {
    let placeholder = Style::default().fg(Color::DarkGray);
    let bar = |width: usize| Line::from(Span::styled("░".repeat(width), placeholder));
    let lines = vec![
        bar(12),
        Line::default(),
        bar(48),
        bar(32),
        Line::default(),
        bar(60),
        bar(60),
        bar(60),
    ];
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(placeholder)
                .title(" Analyzing… "),
        ),
        area,
    );
}

const BAR_WIDTH: usize = 30;

fn score_bar(score: f64) -> String {
    let filled = (ratio(score) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Scrollable part of the result panel: verdict, explanation and every indicator.
fn result_lines(result: &ClassificationResult) -> Vec<Line<'_>> {
    let color = accent(&result.kind);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} DETECTED ", result.kind),
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  Analyzed via Gemini ML Engine",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            headline(&result.kind),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(result.explanation.as_str()),
        Line::default(),
        Line::from(Span::styled(
            "Key Indicators",
            Style::default()
                .fg(Color::Indexed(99))
                .add_modifier(Modifier::BOLD),
        )),
    ];

    if result.features.is_empty() {
        lines.push(Line::from(Span::styled(
            "No indicators reported.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for feature in &result.features {
        lines.extend(indicator_lines(feature));
    }
    lines
}

fn indicator_lines(feature: &SpamFeature) -> [Line<'_>; 3] {
    let band = score_band(feature.score);
    [
        Line::from(vec![
            Span::styled(
                feature.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}%", feature.score),
                Style::default().fg(band.color()),
            ),
        ]),
        Line::from(Span::styled(
            feature.description.as_str(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            score_bar(feature.score),
            Style::default().fg(band.color()),
        )),
    ]
}

/// Upper bound on the wrapped height of the scrollable body, used to cap scrolling.
pub fn result_line_count(result: &ClassificationResult) -> usize {
    result_lines(result)
        .iter()
        .map(|line| line.width() / 40 + 1)
        .sum()
}

pub fn render_result(f: &mut Frame, area: Rect, result: &ClassificationResult, scroll: u16) {
    let color = accent(&result.kind);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let certainty = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" Certainty "),
        )
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio(result.confidence))
        .label(format!("{}%", result.confidence.round()));
    f.render_widget(certainty, rows[0]);

    // Always on screen, whatever the explanation length.
    let recommendation = Paragraph::new(Line::from(Span::styled(
        format!(
            "{} {}",
            if result.kind.is_danger() { "⚠" } else { "✔" },
            result.recommendation
        ),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(" Recommendation "),
    );
    f.render_widget(recommendation, rows[1]);

    let (details_area, chart_area) = if rows[2].width >= 80 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        (cols[0], Some(cols[1]))
    } else {
        (rows[2], None)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(" Analysis · PgUp/PgDn scroll ");
    let inner = block.inner(details_area);
    let details = Paragraph::new(result_lines(result)).wrap(Wrap { trim: true });
    let overflow = details
        .line_count(inner.width)
        .saturating_sub(inner.height as usize);
    let scroll = scroll.min(u16::try_from(overflow).unwrap_or(u16::MAX));
    f.render_widget(block, details_area);
    f.render_widget(details.scroll((scroll, 0)), inner);

    if let Some(chart_area) = chart_area {
        render_decomposition(f, chart_area, &result.features);
    }
}

fn render_decomposition(f: &mut Frame, area: Rect, features: &[SpamFeature]) {
    let bars: Vec<Bar> = features
        .iter()
        .map(|feature| {
            let value = (ratio(feature.score) * 100.0).round() as u64;
            Bar::default()
                .value(value)
                .label(Line::from(feature.name.as_str()))
                .text_value(format!("{value}%"))
                .style(Style::default().fg(score_band(feature.score).color()))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Feature Decomposition "),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(100)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_strict_thresholds() {
        assert_eq!(score_band(71.0), ScoreBand::High);
        assert_eq!(score_band(70.0), ScoreBand::Medium);
        assert_eq!(score_band(31.0), ScoreBand::Medium);
        assert_eq!(score_band(30.0), ScoreBand::Low);
    }

    #[test]
    fn only_ham_gets_the_reassuring_headline() {
        assert_eq!(headline(&ClassificationType::Ham), "This email looks legitimate.");
        assert_eq!(headline(&ClassificationType::Unsure), "Warning: High Risk Detected");
        assert_eq!(
            headline(&ClassificationType::Other("NEWSLETTER".into())),
            "Warning: High Risk Detected"
        );
    }

    #[test]
    fn score_bar_fills_proportionally() {
        assert_eq!(score_bar(50.0).chars().filter(|c| *c == '█').count(), 15);
        assert_eq!(score_bar(250.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn every_feature_has_body_lines() {
        let result = ClassificationResult::from_verdict(
            crate::domain::ModelVerdict {
                kind: ClassificationType::Spam,
                confidence: 60.0,
                explanation: "promo".into(),
                features: (0..8)
                    .map(|i| SpamFeature {
                        name: format!("Feature {i}"),
                        score: 10.0 * i as f64,
                        description: format!("observation #{i}."),
                    })
                    .collect(),
                recommendation: "Move to spam".into(),
            },
            String::new(),
            "body".into(),
        );
        let lines = result_lines(&result);
        assert_eq!(lines.len(), 6 + 8 * 3);
        assert!(result_line_count(&result) >= lines.len());
    }

    #[test]
    fn ratio_clamps_out_of_range_scores() {
        assert_eq!(ratio(150.0), 1.0);
        assert_eq!(ratio(-3.0), 0.0);
        assert_eq!(ratio(f64::NAN), 0.0);
        assert_eq!(ratio(45.0), 0.45);
    }
}
