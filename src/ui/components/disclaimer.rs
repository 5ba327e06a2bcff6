use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Welcome panel shown in the content pane while nothing is loaded.
pub struct Disclaimer<'a> {
    pub pattern_count: usize,
    pub problem_count: usize,
    pub theme: &'a Theme,
}

impl<'a> Disclaimer<'a> {
    pub fn new(pattern_count: usize, problem_count: usize, theme: &'a Theme) -> Self {
        Self {
            pattern_count,
            problem_count,
            theme,
        }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let muted = Style::default().fg(colors.text_muted());
        vec![
            Line::from(Span::styled(
                "patternbook",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Learn problem-solving patterns one problem at a time.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                format!(
                    "{} patterns, {} problems, each with JavaScript and C++ solutions.",
                    self.pattern_count, self.problem_count
                ),
                muted,
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Solutions are study material. Try each problem yourself first.",
                muted,
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", muted),
                Span::styled(
                    "[Enter]",
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start learning", muted),
            ]),
        ]
    }
}

impl Widget for Disclaimer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
