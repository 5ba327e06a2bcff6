use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::sidebar::{SidebarRow, progress_label};
use crate::ui::theme::Theme;

pub struct Sidebar<'a> {
    pub rows: &'a [SidebarRow],
    pub cursor: usize,
    pub focused: bool,
    /// Shown instead of the tree when the catalog failed to load.
    pub error: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(rows: &'a [SidebarRow], cursor: usize, theme: &'a Theme) -> Self {
        Self {
            rows,
            cursor,
            focused: false,
            error: None,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    fn row_line(&self, row: &SidebarRow, width: usize) -> Line<'static> {
        let colors = &self.theme.colors;
        match row {
            SidebarRow::Pattern {
                name,
                expanded,
                completed,
                total,
                ..
            } => {
                let arrow = if *expanded { "\u{25be} " } else { "\u{25b8} " };
                let counter = progress_label(*completed, *total);
                let used = arrow.chars().count() + name.chars().count();
                let gap = width.saturating_sub(used + counter.len());
                let counter_color = if *total > 0 && completed == total {
                    colors.completed()
                } else {
                    colors.text_muted()
                };
                let mut spans = vec![
                    Span::styled(arrow, Style::default().fg(colors.accent())),
                    Span::styled(
                        name.clone(),
                        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                    ),
                ];
                if gap > 0 {
                    spans.push(Span::raw(" ".repeat(gap)));
                    spans.push(Span::styled(counter, Style::default().fg(counter_color)));
                }
                Line::from(spans)
            }
            SidebarRow::Problem {
                name, completed, ..
            } => {
                let (mark, mark_color) = if *completed {
                    ("[x] ", colors.completed())
                } else {
                    ("[ ] ", colors.text_muted())
                };
                let name_style = if *completed {
                    Style::default().fg(colors.text_muted())
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(mark, Style::default().fg(mark_color)),
                    Span::styled(name.clone(), name_style),
                ])
            }
            SidebarRow::Language {
                language, active, ..
            } => {
                let style = if *active {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.accent_dim())
                };
                let bullet = if *active { "\u{25cf} " } else { "\u{25cb} " };
                Line::from(vec![
                    Span::raw("      "),
                    Span::styled(bullet, style),
                    Span::styled(language.label(), style),
                ])
            }
        }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(" Patterns ")
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if let Some(message) = self.error {
            Paragraph::new(Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(colors.error()),
            )))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        }

        if self.rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No patterns",
                Style::default().fg(colors.text_muted()),
            )))
            .render(inner, buf);
            return;
        }

        let height = inner.height as usize;
        let cursor = self.cursor.min(self.rows.len() - 1);
        let offset = cursor.saturating_sub(height.saturating_sub(1));

        for (i, row) in self.rows.iter().enumerate().skip(offset).take(height) {
            let y = inner.y + (i - offset) as u16;
            let line_area = Rect::new(inner.x, y, inner.width, 1);
            let line = self.row_line(row, inner.width as usize);
            if i == cursor {
                let style = if self.focused {
                    Style::default().bg(colors.selection_bg())
                } else {
                    Style::default().add_modifier(Modifier::DIM)
                };
                buf.set_style(line_area, style);
            }
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
