use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::{
    config::ThemeConfig,
    session::{EndReason, Phase},
    typing::TypingTest,
};

const HORIZONTAL_MARGIN: u16 = 5;

/// Styles handed to the renderer at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub correct: Style,
    pub incorrect: Style,
    pub untyped: Style,
    pub cursor: Style,
    pub status: Style,
    pub hint: Style,
}

impl Theme {
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let defaults = ThemeConfig::default();

        let correct_fg = parse_color(&cfg.correct_fg, &defaults.correct_fg);
        let incorrect_fg = parse_color(&cfg.incorrect_fg, &defaults.incorrect_fg);
        let incorrect_bg = parse_color(&cfg.incorrect_bg, &defaults.incorrect_bg);

        let untyped = Style::default().add_modifier(Modifier::DIM);

        Self {
            correct: bold_style.fg(correct_fg),
            incorrect: bold_style.fg(incorrect_fg).bg(incorrect_bg),
            untyped,
            cursor: untyped.add_modifier(Modifier::UNDERLINED),
            status: bold_style,
            hint: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn parse_color(value: &str, fallback: &str) -> Color {
    value.parse().unwrap_or_else(|_| {
        log::warn!("unknown color {value:?}, using {fallback:?}");
        fallback.parse().unwrap_or(Color::Reset)
    })
}

/// The reference text as styled spans: one per typed position, then the
/// cursor position and the untyped remainder.
///
/// Incorrect positions show what was typed rather than what was expected.
pub fn prompt_spans(reference: &[char], typed: &[char], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = typed
        .iter()
        .zip(reference.iter())
        .map(|(&t, &r)| {
            if t == r {
                Span::styled(r.to_string(), theme.correct)
            } else {
                let shown = match t {
                    ' ' => '·',
                    c => c,
                };
                Span::styled(shown.to_string(), theme.incorrect)
            }
        })
        .collect::<Vec<Span>>();

    let mut rest = reference.iter().skip(typed.len());
    if let Some(cursor) = rest.next() {
        spans.push(Span::styled(cursor.to_string(), theme.cursor));
    }
    let remainder: String = rest.collect();
    if !remainder.is_empty() {
        spans.push(Span::styled(remainder, theme.untyped));
    }

    spans
}

pub fn status_lines(wpm: f64, accuracy: f64) -> [String; 2] {
    [
        format!("Speed: {:.2} WPM", wpm),
        format!("Accuracy: {:.2}%", accuracy),
    ]
}

/// One frame of a typing test
pub struct SessionView<'a> {
    test: &'a TypingTest,
    theme: &'a Theme,
    now: Instant,
}

impl<'a> SessionView<'a> {
    pub fn new(test: &'a TypingTest, theme: &'a Theme, now: Instant) -> Self {
        Self { test, theme, now }
    }
}

impl Widget for SessionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.test.session();
        let theme = self.theme;

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = session.reference().width();
        let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            (prompt_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };
        // countdown + blank, prompt, blank + speed + accuracy + blank + hint
        let content_lines = 2 + prompt_occupied_lines + 5;
        let padding = area.height.saturating_sub(content_lines) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(padding),
                    Constraint::Length(2),
                    Constraint::Length(prompt_occupied_lines),
                    Constraint::Length(1),
                    Constraint::Length(2),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        let header = match session.phase() {
            Phase::Idle => Some(Span::styled("start typing", theme.hint)),
            Phase::Typing => self
                .test
                .seconds_remaining(self.now)
                .map(|secs| Span::styled(format!("{:.1}", secs), theme.untyped)),
            Phase::Done(EndReason::TimedOut) => Some(Span::styled("Time up", theme.status)),
            Phase::Done(_) => None,
        };
        if let Some(header) = header {
            Paragraph::new(header)
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
        }

        let spans = prompt_spans(session.reference_chars(), session.typed(), theme);
        Paragraph::new(Line::from(spans))
            .alignment(if prompt_occupied_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        let score = self.test.score(self.now);
        let lines = status_lines(score.wpm, score.accuracy)
            .into_iter()
            .map(|s| Line::from(Span::styled(s, theme.status)))
            .collect::<Vec<Line>>();
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        Paragraph::new(Span::styled("(esc) quit", theme.hint))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}
