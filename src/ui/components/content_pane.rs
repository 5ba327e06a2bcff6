use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::content::{ContentState, ContentView};
use crate::ui::components::disclaimer::Disclaimer;
use crate::ui::components::nav_bar::NavBar;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Loaded content between a top and bottom nav bar, the load error block,
/// or the welcome panel.
pub struct ContentPane<'a> {
    pub view: &'a ContentView,
    pub title: String,
    pub focused: bool,
    pub disclaimer: Disclaimer<'a>,
    pub theme: &'a Theme,
}

impl<'a> ContentPane<'a> {
    pub fn new(view: &'a ContentView, disclaimer: Disclaimer<'a>, theme: &'a Theme) -> Self {
        Self {
            view,
            title: String::new(),
            focused: false,
            disclaimer,
            theme,
        }
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Largest scroll offset that still fills the pane drawn in `area`,
    /// counting wrapped rows and both nav bars.
    pub fn scroll_limit(view: &ContentView, area: Rect, theme: &Theme) -> u16 {
        let inner = Block::bordered().inner(area);
        if inner.width == 0 {
            return 0;
        }
        loaded_paragraph(view, inner.width, theme)
            .map(|p| overflow(&p, inner))
            .unwrap_or(0)
    }
}

/// Rows of `paragraph` that do not fit in `inner`.
fn overflow(paragraph: &Paragraph, inner: Rect) -> u16 {
    paragraph
        .line_count(inner.width)
        .saturating_sub(inner.height as usize)
        .min(u16::MAX as usize) as u16
}

/// Nav bar, blank, content, blank, nav bar. `None` unless content loaded.
fn loaded_paragraph(
    view: &ContentView,
    width: u16,
    theme: &Theme,
) -> Option<Paragraph<'static>> {
    let ContentState::Loaded { lines, .. } = &view.state else {
        return None;
    };
    let nav_line = NavBar::new(&view.adjacent, theme).line(width);
    let mut body = Vec::with_capacity(lines.len() + 4);
    body.push(nav_line.clone());
    body.push(Line::from(""));
    body.extend(lines.iter().cloned());
    body.push(Line::from(""));
    body.push(nav_line);
    Some(Paragraph::new(body).wrap(Wrap { trim: false }))
}

pub fn error_lines(
    pattern: &str,
    problem: &str,
    message: &str,
    tried: &[String],
    theme: &Theme,
) -> Vec<Line<'static>> {
    let colors = &theme.colors;
    let muted = Style::default().fg(colors.text_muted());
    let mut lines = vec![
        Line::from(Span::styled(
            "Error loading content",
            Style::default()
                .fg(colors.error())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "The requested content could not be loaded.",
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(format!("Error details: {message}"), muted)),
        Line::from(Span::styled(
            format!("Pattern: {pattern}, Problem: {problem}"),
            muted,
        )),
        Line::from(Span::styled("Tried:", muted)),
    ];
    lines.extend(tried.iter().map(|path| {
        Line::from(Span::styled(
            format!("  {path}"),
            Style::default().fg(colors.warning()),
        ))
    }));
    lines
}

impl Widget for ContentPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let mut block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        if !self.title.is_empty() {
            block = block.title(format!(" {} ", self.title));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        match &self.view.state {
            ContentState::Disclaimer => {
                let panel = centered_rect(80, 50, inner);
                self.disclaimer.render(panel, buf);
            }
            ContentState::Failed {
                pattern,
                problem,
                message,
                tried,
            } => {
                let error = error_lines(pattern, problem, message, tried, self.theme);
                let wrapped: usize = error
                    .iter()
                    .map(|l| l.width().max(1).div_ceil(inner.width as usize))
                    .sum();
                let error_height = (wrapped as u16 + 1).min(inner.height);
                let split = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(error_height), Constraint::Min(0)])
                    .split(inner);
                Paragraph::new(error)
                    .wrap(Wrap { trim: false })
                    .render(split[0], buf);
                if split[1].height > 0 {
                    self.disclaimer.render(split[1], buf);
                }
            }
            ContentState::Loaded { .. } => {
                if let Some(paragraph) = loaded_paragraph(self.view, inner.width, self.theme) {
                    let limit = overflow(&paragraph, inner);
                    paragraph
                        .scroll((self.view.scroll.min(limit), 0))
                        .render(inner, buf);
                }
            }
        }
    }
}
