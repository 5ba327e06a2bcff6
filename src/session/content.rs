use ratatui::text::Line;

use crate::catalog::Position;
use crate::content::{ContentLoadError, Language};
use crate::engine::navigator::Adjacent;

/// Problem and language of the last successful load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    pub position: Position,
    pub language: Language,
}

#[derive(Clone, Debug)]
pub enum ContentState {
    /// Welcome panel shown before anything has loaded.
    Disclaimer,
    Loaded {
        path: String,
        lines: Vec<Line<'static>>,
    },
    Failed {
        pattern: String,
        problem: String,
        message: String,
        tried: Vec<String>,
    },
}

/// What the content pane shows. Only changes when a load completes, so a
/// pending request leaves the previous content on screen.
#[derive(Clone, Debug)]
pub struct ContentView {
    pub state: ContentState,
    pub scroll: u16,
    pub adjacent: Adjacent,
    pub current: Option<NavigationState>,
    pub pending: Option<NavigationState>,
    /// Problem the pane is showing right now, loaded or failed.
    pub shown: Option<NavigationState>,
    /// Largest useful scroll offset at the last measured pane size.
    pub scroll_limit: Option<u16>,
}

impl Default for ContentView {
    fn default() -> Self {
        Self {
            state: ContentState::Disclaimer,
            scroll: 0,
            adjacent: Adjacent::default(),
            current: None,
            pending: None,
            shown: None,
            scroll_limit: None,
        }
    }
}

impl ContentView {
    pub fn begin(&mut self, position: Position, language: Language) {
        self.pending = Some(NavigationState { position, language });
    }

    pub fn show_loaded(
        &mut self,
        position: Position,
        language: Language,
        path: String,
        lines: Vec<Line<'static>>,
        adjacent: Adjacent,
    ) {
        self.state = ContentState::Loaded { path, lines };
        self.scroll = 0;
        self.adjacent = adjacent;
        self.current = Some(NavigationState { position, language });
        self.shown = self.current.clone();
        self.pending = None;
        self.scroll_limit = None;
    }

    /// Show the error block for `position`. `current` keeps pointing at the
    /// last successful load.
    pub fn show_failed(
        &mut self,
        position: Position,
        language: Language,
        error: &ContentLoadError,
    ) {
        let ContentLoadError::NotFound {
            pattern,
            problem,
            tried,
            ..
        } = error;
        self.state = ContentState::Failed {
            pattern: pattern.clone(),
            problem: problem.clone(),
            message: error.to_string(),
            tried: tried.clone(),
        };
        self.scroll = 0;
        self.adjacent = Adjacent::default();
        self.shown = Some(NavigationState { position, language });
        self.pending = None;
        self.scroll_limit = None;
    }

    /// The welcome panel is up until something loads, and again after a
    /// failed load.
    pub fn disclaimer_visible(&self) -> bool {
        !matches!(self.state, ContentState::Loaded { .. })
    }

    /// Prev/next controls are attached only to successfully loaded content.
    pub fn nav_attached(&self) -> bool {
        matches!(self.state, ContentState::Loaded { .. })
    }

    pub fn line_count(&self) -> usize {
        match &self.state {
            ContentState::Loaded { lines, .. } => lines.len(),
            _ => 0,
        }
    }

    /// Record the largest scroll offset for the current pane size.
    pub fn set_scroll_limit(&mut self, limit: u16) {
        self.scroll_limit = Some(limit);
        self.scroll = self.scroll.min(limit);
    }

    /// Falls back to one row per logical line until the pane is measured.
    fn max_scroll(&self) -> u16 {
        self.scroll_limit.unwrap_or_else(|| {
            self.line_count().saturating_sub(1).min(u16::MAX as usize) as u16
        })
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_add(amount).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(lines: usize) -> ContentView {
        let mut view = ContentView::default();
        view.show_loaded(
            Position::new("p1", "a"),
            Language::Cpp,
            "content/p1/a/cpp.html".into(),
            (0..lines).map(|i| Line::from(format!("line {i}"))).collect(),
            Adjacent {
                prev: None,
                next: Some(Position::new("p1", "b")),
            },
        );
        view
    }

    #[test]
    fn test_starts_on_disclaimer() {
        let view = ContentView::default();
        assert!(view.disclaimer_visible());
        assert!(!view.nav_attached());
        assert_eq!(view.current, None);
    }

    #[test]
    fn test_loaded_hides_disclaimer_and_resets_scroll() {
        let mut view = loaded(50);
        view.scroll_down(20);
        assert_eq!(view.scroll, 20);

        view.begin(Position::new("p1", "b"), Language::Cpp);
        view.show_loaded(
            Position::new("p1", "b"),
            Language::Cpp,
            "content/p1/b/cpp.html".into(),
            vec![Line::from("b")],
            Adjacent::default(),
        );
        assert_eq!(view.scroll, 0);
        assert!(!view.disclaimer_visible());
        assert!(view.nav_attached());
        assert_eq!(view.pending, None);
        assert_eq!(
            view.current.as_ref().map(|c| c.position.clone()),
            Some(Position::new("p1", "b"))
        );
    }

    #[test]
    fn test_failure_reshows_disclaimer_and_detaches_nav() {
        let mut view = loaded(3);
        let error = ContentLoadError::NotFound {
            pattern: "p1".into(),
            problem: "zz".into(),
            language: "cpp",
            tried: vec!["content/p1/zz/cpp.html".into()],
        };
        view.show_failed(Position::new("p1", "zz"), Language::Cpp, &error);

        assert!(view.disclaimer_visible());
        assert!(!view.nav_attached());
        assert_eq!(view.adjacent, Adjacent::default());
        let ContentState::Failed { pattern, problem, tried, .. } = &view.state else {
            panic!("expected failed state");
        };
        assert_eq!((pattern.as_str(), problem.as_str()), ("p1", "zz"));
        assert_eq!(tried.len(), 1);
        assert_eq!(
            view.current.as_ref().map(|c| c.position.clone()),
            Some(Position::new("p1", "a"))
        );
        assert_eq!(
            view.shown.as_ref().map(|s| s.position.clone()),
            Some(Position::new("p1", "zz"))
        );
    }

    #[test]
    fn test_measured_limit_replaces_line_count() {
        let mut view = loaded(3);
        view.set_scroll_limit(40);
        view.scroll_down(100);
        assert_eq!(view.scroll, 40);
        view.set_scroll_limit(10);
        assert_eq!(view.scroll, 10);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = loaded(5);
        view.scroll_down(100);
        assert_eq!(view.scroll, 4);
        view.scroll_up(100);
        assert_eq!(view.scroll, 0);
        view.scroll_down(3);
        view.scroll_to_top();
        assert_eq!(view.scroll, 0);
    }
}
