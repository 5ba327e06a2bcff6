use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::catalog::loader::load_catalog;
use crate::catalog::{Catalog, Position};
use crate::config::Config;
use crate::content::highlight::Highlighter;
use crate::content::render::render_fragment;
use crate::content::{ContentResponse, Language, LoadRequest, load_content, spawn_load};
use crate::engine::navigator::compute_adjacent;
use crate::event::AppEvent;
use crate::session::content::ContentView;
use crate::session::sidebar::SidebarState;
use crate::source::Fetcher;
use crate::store::completion::CompletionStore;
use crate::ui::theme::Theme;

/// Lines scrolled by PgUp/PgDn.
pub const PAGE_SIZE: u16 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

pub struct App {
    pub config: Config,
    pub theme: &'static Theme,
    pub catalog: Catalog,
    /// Why the catalog is empty, when loading it failed.
    pub catalog_error: Option<String>,
    pub completion: CompletionStore,
    pub sidebar: SidebarState,
    pub content: ContentView,
    pub highlighter: Highlighter,
    pub focus: Focus,
    /// The user's sidebar show/hide choice; `None` leaves it to the layout.
    pub sidebar_override: Option<bool>,
    pub should_quit: bool,
    fetcher: Arc<dyn Fetcher>,
    generation: u64,
    events: Option<Sender<AppEvent>>,
}

impl App {
    pub fn new(config: Config, fetcher: Arc<dyn Fetcher>, completion: CompletionStore) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            log::warn!("theme '{}' not found, using default", config.theme);
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let highlighter = Highlighter::new(&theme.code_theme);

        log::info!("loading catalog from {}", fetcher.describe());
        let (catalog, catalog_error) = match load_catalog(fetcher.as_ref(), &config.catalog_paths)
        {
            Ok(catalog) => (catalog, None),
            Err(e) => {
                log::error!("{e}");
                (Catalog::empty(), Some(format!("Failed to load patterns data: {e}")))
            }
        };
        let sidebar = SidebarState::build(&catalog);

        Self {
            config,
            theme,
            catalog,
            catalog_error,
            completion,
            sidebar,
            content: ContentView::default(),
            highlighter,
            focus: Focus::Sidebar,
            sidebar_override: None,
            should_quit: false,
            fetcher,
            generation: 0,
            events: None,
        }
    }

    /// Route content loads through worker threads that report back on
    /// `events`. Without a sender, loads run inline.
    pub fn with_event_sender(mut self, events: Sender<AppEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Language used when the user has not picked one.
    pub fn preferred_language(&self) -> Language {
        self.sidebar
            .active()
            .map(|(_, language)| language)
            .unwrap_or_else(|| self.config.language())
    }

    /// Start loading a problem. Any response to an earlier request that
    /// arrives after this one is discarded.
    pub fn open(&mut self, position: Position, language: Language) -> LoadRequest {
        self.generation += 1;
        let request = LoadRequest {
            position: position.clone(),
            language,
            generation: self.generation,
        };
        log::debug!(
            "request {} for {position} ({})",
            request.generation,
            language.to_key()
        );
        self.content.begin(position, language);

        if let Some(tx) = self.events.clone() {
            spawn_load(Arc::clone(&self.fetcher), request.clone(), move |response| {
                let _ = tx.send(AppEvent::ContentLoaded(response));
            });
        } else {
            let result = load_content(self.fetcher.as_ref(), &request);
            self.handle_content_loaded(ContentResponse {
                request: request.clone(),
                result,
            });
        }
        request
    }

    /// Apply a finished load. Returns `false` when the response was stale
    /// and dropped.
    pub fn handle_content_loaded(&mut self, response: ContentResponse) -> bool {
        let ContentResponse { request, result } = response;
        if request.generation != self.generation {
            log::debug!(
                "discarding stale response {} (current {})",
                request.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(loaded) => {
                let lines =
                    render_fragment(&loaded.html, request.language, &self.highlighter, self.theme);
                let position = request.position;
                let adjacent =
                    compute_adjacent(&self.catalog, &position.pattern_id, &position.problem_id);
                self.content
                    .show_loaded(position, request.language, loaded.path, lines, adjacent);
            }
            Err(e) => {
                log::warn!("{e}");
                self.content.show_failed(request.position, request.language, &e);
            }
        }
        true
    }

    pub fn go_next(&mut self) {
        if let Some(target) = self.content.adjacent.next.clone() {
            self.navigate_to(target);
        }
    }

    pub fn go_prev(&mut self) {
        if let Some(target) = self.content.adjacent.prev.clone() {
            self.navigate_to(target);
        }
    }

    /// Load `target` in the current language and make the sidebar follow.
    fn navigate_to(&mut self, target: Position) {
        let language = self
            .content
            .current
            .as_ref()
            .map(|c| c.language)
            .unwrap_or_else(|| self.preferred_language());
        self.sidebar.select_language(&target, language);
        self.sidebar.reveal(&self.catalog, &target);
        self.open(target, language);
    }

    /// Expand the first pattern and hand focus to the sidebar.
    pub fn start_learning(&mut self) {
        self.sidebar.expand_first(&self.catalog);
        self.focus = Focus::Sidebar;
    }

    /// Enter/Space on the sidebar row under the cursor.
    pub fn activate_sidebar(&mut self) {
        if let Some((position, language)) = self.sidebar.activate(&self.catalog) {
            self.open(position, language);
        }
    }

    /// Open the problem under the sidebar cursor in the preferred language.
    pub fn open_cursor_problem(&mut self) {
        if let Some(position) = self.sidebar.cursor_position(&self.catalog) {
            let language = self.preferred_language();
            self.sidebar.select_language(&position, language);
            self.sidebar.reveal(&self.catalog, &position);
            self.open(position, language);
        }
    }

    /// Reload the problem on screen in the other language.
    pub fn switch_language(&mut self) {
        let Some(current) = self.content.shown.clone() else {
            return;
        };
        let language = match current.language {
            Language::Cpp => Language::JavaScript,
            Language::JavaScript => Language::Cpp,
        };
        self.sidebar.select_language(&current.position, language);
        self.open(current.position, language);
    }

    /// Toggle completion of the focused problem: the sidebar row under the
    /// cursor, or the problem shown in the content pane.
    pub fn toggle_completion(&mut self) {
        let target = match self.focus {
            Focus::Sidebar => self.sidebar.cursor_position(&self.catalog),
            Focus::Content => self.content.shown.as_ref().map(|s| s.position.clone()),
        };
        if let Some(position) = target {
            let done = self.sidebar.toggle_completion(&mut self.completion, &position);
            log::info!("{position} marked {}", if done { "completed" } else { "not completed" });
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Content,
            Focus::Content => Focus::Sidebar,
        };
    }

    /// Show or hide the sidebar, starting from what is on screen now.
    pub fn toggle_sidebar(&mut self, currently_visible: bool) {
        let visible = !currently_visible;
        self.sidebar_override = Some(visible);
        if !visible {
            self.focus = Focus::Content;
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Sidebar => self.sidebar.cursor_up(),
            Focus::Content => self.content.scroll_up(1),
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Sidebar => self.sidebar.cursor_down(&self.catalog),
            Focus::Content => self.content.scroll_down(1),
        }
    }

    pub fn page_up(&mut self) {
        self.content.scroll_up(PAGE_SIZE);
    }

    pub fn page_down(&mut self) {
        self.content.scroll_down(PAGE_SIZE);
    }

    pub fn back_to_top(&mut self) {
        self.content.scroll_to_top();
    }

    /// Title of the content pane: pattern, problem and language.
    pub fn content_title(&self) -> String {
        if let Some(pending) = &self.content.pending {
            return format!("Loading {} ({})\u{2026}", pending.position, pending.language.label());
        }
        let Some(current) = &self.content.current else {
            return String::new();
        };
        if !self.content.nav_attached() {
            return String::new();
        }
        let position = &current.position;
        match self.catalog.pattern(&position.pattern_id) {
            Some(pattern) => {
                let problem = pattern
                    .problem(&position.problem_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or(&position.problem_id);
                format!(
                    "{} \u{203a} {} ({})",
                    pattern.name,
                    problem,
                    current.language.label()
                )
            }
            None => format!("{position} ({})", current.language.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoadError;
    use crate::session::content::ContentState;
    use crate::source::MemoryFetcher;
    use std::sync::mpsc;
    use std::time::Duration;

    const CATALOG: &str = r#"{
        "p1": {"id": "p1", "name": "Two Pointers", "number": 1,
               "problems": [{"id": "a", "name": "Pair Sum", "number": 1},
                            {"id": "b", "name": "Triplets", "number": 2}]},
        "p2": {"id": "p2", "name": "Sliding Window", "number": 2,
               "problems": [{"id": "c", "name": "Max Window", "number": 1}]}
    }"#;

    fn site() -> MemoryFetcher {
        MemoryFetcher::new()
            .with_file("content/patterns.json", CATALOG)
            .with_file("content/p1/a/cpp.html", "<h1>Pair Sum</h1>")
            .with_file("content/p1/a/javascript.html", "<h1>Pair Sum JS</h1>")
            .with_file("content/p1/b-(easy)/cpp.html", "<h1>Triplets</h1>")
            .with_file("content/p2/c-(hard)/cpp.html", "<h1>Max Window</h1>")
    }

    fn app_with(fetcher: MemoryFetcher) -> App {
        App::new(
            Config::default(),
            Arc::new(fetcher),
            CompletionStore::in_memory(),
        )
    }

    fn loaded_text(app: &App) -> String {
        match &app.content.state {
            ContentState::Loaded { lines, .. } => lines
                .iter()
                .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n"),
            other => panic!("expected loaded content, got {other:?}"),
        }
    }

    #[test]
    fn test_new_loads_catalog() {
        let app = app_with(site());
        assert_eq!(app.catalog.patterns().len(), 2);
        assert_eq!(app.catalog_error, None);
        assert!(app.content.disclaimer_visible());
    }

    #[test]
    fn test_missing_catalog_gives_inline_error() {
        let app = app_with(MemoryFetcher::new());
        assert!(app.catalog.is_empty());
        let error = app.catalog_error.as_deref().unwrap();
        assert!(error.starts_with("Failed to load patterns data"));
        assert!(error.contains("/patterns.json"));
    }

    #[test]
    fn test_open_renders_and_attaches_nav() {
        let mut app = app_with(site());
        app.open(Position::new("p1", "a"), Language::Cpp);

        assert!(loaded_text(&app).contains("Pair Sum"));
        assert!(!app.content.disclaimer_visible());
        assert_eq!(app.content.adjacent.prev, None);
        assert_eq!(app.content.adjacent.next, Some(Position::new("p1", "b")));
        assert_eq!(app.content_title(), "Two Pointers \u{203a} Pair Sum (C++)");
    }

    #[test]
    fn test_failed_open_shows_error_and_disclaimer() {
        let mut app = app_with(site());
        app.open(Position::new("p1", "b"), Language::JavaScript);

        assert!(app.content.disclaimer_visible());
        assert!(!app.content.nav_attached());
        let ContentState::Failed { tried, .. } = &app.content.state else {
            panic!("expected failure");
        };
        assert_eq!(tried.len(), 4);
    }

    #[test]
    fn test_next_walk_follows_catalog_and_sidebar() {
        let mut app = app_with(site());
        app.open(Position::new("p1", "a"), Language::Cpp);

        app.go_next();
        assert!(loaded_text(&app).contains("Triplets"));
        app.go_next();
        assert!(loaded_text(&app).contains("Max Window"));
        assert_eq!(app.content.adjacent.next, None);
        assert!(app.sidebar.is_expanded("p2"));
        assert_eq!(app.sidebar.open_panel(), Some(&Position::new("p2", "c")));
        assert_eq!(
            app.sidebar.active(),
            Some((&Position::new("p2", "c"), Language::Cpp))
        );

        app.go_prev();
        assert!(loaded_text(&app).contains("Triplets"));
    }

    #[test]
    fn test_navigation_keeps_language() {
        let mut app = app_with(site());
        app.open(Position::new("p1", "a"), Language::JavaScript);
        assert!(loaded_text(&app).contains("Pair Sum JS"));

        app.go_next();
        // p1/b has no JavaScript variant.
        assert!(matches!(app.content.state, ContentState::Failed { .. }));
        assert_eq!(app.sidebar.active().map(|(_, l)| l), Some(Language::JavaScript));
    }

    #[test]
    fn test_switch_language_reloads_current_problem() {
        let mut app = app_with(site());
        app.switch_language();
        assert!(app.content.disclaimer_visible());

        app.open(Position::new("p1", "a"), Language::Cpp);
        app.switch_language();
        assert!(loaded_text(&app).contains("Pair Sum JS"));
        assert_eq!(
            app.sidebar.active(),
            Some((&Position::new("p1", "a"), Language::JavaScript))
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut app = app_with(site());
        app.open(Position::new("p1", "a"), Language::Cpp);
        let current = app.generation();

        let stale = ContentResponse {
            request: LoadRequest {
                position: Position::new("p2", "c"),
                language: Language::Cpp,
                generation: current - 1,
            },
            result: Err(ContentLoadError::NotFound {
                pattern: "p2".into(),
                problem: "c".into(),
                language: "cpp",
                tried: Vec::new(),
            }),
        };
        assert!(!app.handle_content_loaded(stale));
        assert!(loaded_text(&app).contains("Pair Sum"));
    }

    #[test]
    fn test_worker_responses_arrive_on_event_channel() {
        let (tx, rx) = mpsc::channel();
        let mut app = app_with(site()).with_event_sender(tx);
        let first = app.open(Position::new("p1", "a"), Language::Cpp);
        let second = app.open(Position::new("p2", "c"), Language::Cpp);
        assert_eq!(second.generation, first.generation + 1);

        let mut applied = 0;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                AppEvent::ContentLoaded(response) => {
                    if app.handle_content_loaded(response) {
                        applied += 1;
                    }
                }
                _ => panic!("unexpected event"),
            }
        }
        assert_eq!(applied, 1);
        assert!(loaded_text(&app).contains("Max Window"));
    }

    #[test]
    fn test_toggle_completion_from_sidebar_and_content() {
        let mut app = app_with(site());
        app.start_learning();
        app.move_down();
        app.toggle_completion();
        assert!(app.completion.get("p1-a"));

        app.open(Position::new("p2", "c"), Language::Cpp);
        app.focus = Focus::Content;
        app.toggle_completion();
        assert!(app.completion.get("p2-c"));
        assert_eq!(app.completion.completed_total(&app.catalog), 2);
    }

    #[test]
    fn test_content_actions_follow_failed_problem() {
        let mut app = app_with(site());
        app.open(Position::new("p1", "a"), Language::Cpp);
        app.open(Position::new("p1", "b"), Language::JavaScript);
        assert!(!app.content.nav_attached());

        app.focus = Focus::Content;
        app.toggle_completion();
        assert!(app.completion.get("p1-b"));
        assert!(!app.completion.get("p1-a"));

        app.switch_language();
        assert!(loaded_text(&app).contains("Triplets"));
        assert_eq!(
            app.content.current.as_ref().map(|c| (c.position.clone(), c.language)),
            Some((Position::new("p1", "b"), Language::Cpp))
        );
    }

    #[test]
    fn test_activate_sidebar_opens_language() {
        let mut app = app_with(site());
        app.start_learning();
        app.move_down(); // p1/a
        app.activate_sidebar(); // open panel
        app.move_down(); // JavaScript
        app.move_down(); // C++
        app.activate_sidebar();
        assert!(loaded_text(&app).contains("Pair Sum"));
        assert_eq!(app.content.current.as_ref().map(|c| c.language), Some(Language::Cpp));
    }

    #[test]
    fn test_open_cursor_problem_uses_default_language() {
        let mut app = app_with(site());
        app.start_learning();
        app.move_down();
        app.open_cursor_problem();
        assert_eq!(app.content.current.as_ref().map(|c| c.language), Some(Language::Cpp));
    }

    #[test]
    fn test_hiding_sidebar_moves_focus() {
        let mut app = app_with(site());
        app.toggle_sidebar(true);
        assert_eq!(app.sidebar_override, Some(false));
        assert_eq!(app.focus, Focus::Content);
    }
}
