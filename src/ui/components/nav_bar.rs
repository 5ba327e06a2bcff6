use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::engine::navigator::Adjacent;
use crate::ui::theme::Theme;

pub const PREV_LABEL: &str = "\u{2190} Previous";
pub const NEXT_LABEL: &str = "Next \u{2192}";

/// Previous/next controls. A missing neighbour is drawn disabled.
pub struct NavBar<'a> {
    pub adjacent: &'a Adjacent,
    pub theme: &'a Theme,
}

impl<'a> NavBar<'a> {
    pub fn new(adjacent: &'a Adjacent, theme: &'a Theme) -> Self {
        Self { adjacent, theme }
    }

    fn button_style(&self, enabled: bool) -> Style {
        let colors = &self.theme.colors;
        if enabled {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(colors.text_muted())
                .add_modifier(Modifier::DIM)
        }
    }

    /// The bar as a single line padded to `width`, with the buttons at
    /// either end.
    pub fn line(&self, width: u16) -> Line<'static> {
        let prev = format!("[{PREV_LABEL}]");
        let next = format!("[{NEXT_LABEL}]");
        let used = prev.chars().count() + next.chars().count();
        let gap = (width as usize).saturating_sub(used).max(1);
        Line::from(vec![
            Span::styled(prev, self.button_style(self.adjacent.prev.is_some())),
            Span::raw(" ".repeat(gap)),
            Span::styled(next, self.button_style(self.adjacent.next.is_some())),
        ])
    }
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let line = self.line(area.width);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
