use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// One-row gauge: `label [████░░░░] 12/40`.
pub struct ProgressBar<'a> {
    pub label: String,
    pub done: usize,
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, done: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            done: done.min(total),
            total,
            theme,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let prefix = format!("{} ", self.label);
        let suffix = format!(" {}/{}", self.done, self.total);
        let reserved = (prefix.chars().count() + suffix.len()) as u16;
        let bar_width = area.width.saturating_sub(reserved);

        let (x, _) = buf.set_stringn(
            area.x,
            area.y,
            &prefix,
            area.width as usize,
            Style::default().fg(colors.header_fg()),
        );
        if bar_width == 0 {
            return;
        }

        let filled_width = (self.ratio() * bar_width as f64) as u16;
        for dx in 0..bar_width {
            let style = if dx < filled_width {
                Style::default().fg(colors.bar_filled())
            } else {
                Style::default().fg(colors.bar_empty())
            };
            let symbol = if dx < filled_width { "\u{2588}" } else { "\u{2591}" };
            buf[(x + dx, area.y)].set_symbol(symbol).set_style(style);
        }
        buf.set_string(
            x + bar_width,
            area.y,
            &suffix,
            Style::default().fg(colors.text_muted()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_handles_empty_total() {
        let theme = Theme::default();
        assert_eq!(ProgressBar::new("Done", 0, 0, &theme).ratio(), 0.0);
        assert_eq!(ProgressBar::new("Done", 5, 4, &theme).ratio(), 1.0);
    }

    #[test]
    fn test_renders_fill_and_counts() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("Done", 1, 2, &theme).render(area, &mut buf);
        let text: String = (0..20).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(text.starts_with("Done "));
        assert!(text.ends_with(" 1/2"));
        assert_eq!(text.matches('\u{2588}').count(), 5);
        assert_eq!(text.matches('\u{2591}').count(), 6);
    }
}
