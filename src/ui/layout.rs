use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: sidebar + content side by side
    Medium, // 60-99 cols: narrower fixed sidebar + content
    Narrow, // <60 cols: one pane at a time, sidebar hidden by default
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_sidebar(&self) -> bool {
        *self != LayoutTier::Narrow
    }

    fn sidebar_width(&self, total: u16) -> u16 {
        match self {
            LayoutTier::Wide => (total * 32 / 100).clamp(30, 48),
            LayoutTier::Medium => 28,
            LayoutTier::Narrow => total,
        }
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub content: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    /// `sidebar_override` is the user's show/hide choice, if any; without
    /// one the tier decides.
    pub fn new(area: Rect, sidebar_override: Option<bool>) -> Self {
        let tier = LayoutTier::from_area(area);
        let show_sidebar = sidebar_override.unwrap_or(tier.show_sidebar());

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);
        let main = vertical[1];

        let (sidebar, content) = match (show_sidebar, tier) {
            (false, _) => (None, Some(main)),
            (true, LayoutTier::Narrow) => (Some(main), None),
            (true, _) => {
                let horizontal = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Length(tier.sidebar_width(main.width)),
                        Constraint::Min(20),
                    ])
                    .split(main);
                (Some(horizontal[0]), Some(horizontal[1]))
            }
        };

        Self {
            header: vertical[0],
            sidebar,
            content,
            footer: vertical[2],
            tier,
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_PANEL_WIDTH: u16 = 40;
    const MIN_PANEL_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_PANEL_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_PANEL_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
