mod app;
mod catalog;
mod config;
mod content;
mod engine;
mod event;
mod session;
mod source;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, Focus};
use config::Config;
use event::{AppEvent, EventHandler};
use source::{Fetcher, FsFetcher};
use store::completion::CompletionStore;
use store::json_store::JsonStore;
use store::schema::CompletionStatus;
use ui::components::content_pane::ContentPane;
use ui::components::disclaimer::Disclaimer;
use ui::components::progress_bar::ProgressBar;
use ui::components::sidebar::Sidebar;
use ui::layout::{AppLayout, pack_hint_lines};

#[derive(Parser)]
#[command(
    name = "patternbook",
    version,
    about = "Terminal browser for coding patterns and practice problems"
)]
struct Cli {
    #[arg(short, long, help = "Local site directory holding content/ and patterns.json")]
    site: Option<PathBuf>,

    #[cfg(feature = "network")]
    #[arg(short, long, help = "Base URL of a hosted site (overrides --site)")]
    url: Option<String>,

    #[arg(short, long, help = "Default solution language (cpp, javascript)")]
    language: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_name = "FILE", help = "Write completion progress to FILE and exit")]
    export_progress: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Replace completion progress from FILE and exit")]
    import_progress: Option<PathBuf>,

    #[arg(long, help = "Clear all completion progress and exit")]
    reset_progress: bool,

    #[arg(long, value_name = "FILE", help = "Log file (filter with RUST_LOG)")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("warning: ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(language) = &cli.language {
        config.default_language = language.clone();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    config.normalize();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.log_file));
    if let Err(e) = init_logging(&log_path) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    if run_progress_command(&cli)? {
        return Ok(());
    }

    let fetcher = build_fetcher(&cli, &config)?;
    let completion = match JsonStore::new() {
        Ok(store) => CompletionStore::open(store),
        Err(e) => {
            log::warn!("completion data will not be saved: {e:#}");
            CompletionStore::in_memory()
        }
    };

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, fetcher, completion).with_event_sender(events.sender());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log dir {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Handle the export/import/reset flags. Returns `true` when one ran and
/// the UI should not start.
fn run_progress_command(cli: &Cli) -> Result<bool> {
    if cli.export_progress.is_none() && cli.import_progress.is_none() && !cli.reset_progress {
        return Ok(false);
    }
    let store = JsonStore::new()?;

    if let Some(path) = &cli.export_progress {
        let status = store.load_completion();
        store.export_completion(&status, path)?;
        log::info!("exported {} entries to {}", status.len(), path.display());
        println!("Exported {} entries to {}", status.len(), path.display());
    } else if let Some(path) = &cli.import_progress {
        let status = JsonStore::read_export(path)?;
        store.save_completion(&status)?;
        log::info!("imported {} entries from {}", status.len(), path.display());
        println!("Imported {} entries from {}", status.len(), path.display());
    } else {
        store.save_completion(&CompletionStatus::new())?;
        log::info!("completion progress reset");
        println!("Completion progress reset");
    }
    Ok(true)
}

fn build_fetcher(cli: &Cli, config: &Config) -> Result<Arc<dyn Fetcher>> {
    #[cfg(feature = "network")]
    if let Some(url) = cli.url.as_deref().or(config.base_url.as_deref()) {
        return Ok(Arc::new(source::HttpFetcher::new(url)?));
    }
    #[cfg(not(feature = "network"))]
    if config.base_url.is_some() {
        log::warn!("base_url is set but network support is not compiled in; using site_root");
    }

    let root = cli
        .site
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.site_root));
    Ok(Arc::new(FsFetcher::new(root)))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                let layout = AppLayout::new(area, app.sidebar_override);
                if let Some(content_area) = layout.content {
                    let limit = ContentPane::scroll_limit(&app.content, content_area, app.theme);
                    app.content.set_scroll_limit(limit);
                }
                handle_key(app, key, layout.sidebar.is_some());
            }
            AppEvent::ContentLoaded(response) => {
                app.handle_content_loaded(response);
            }
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, sidebar_visible: bool) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    let on_disclaimer =
        app.content.disclaimer_visible() && (app.focus == Focus::Content || !sidebar_visible);

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter if on_disclaimer => {
            app.start_learning();
            if !sidebar_visible {
                app.toggle_sidebar(false);
                app.focus = Focus::Sidebar;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Enter | KeyCode::Char(' ') if app.focus == Focus::Sidebar => {
            app.activate_sidebar();
        }
        KeyCode::Char('o') if app.focus == Focus::Sidebar => app.open_cursor_problem(),
        KeyCode::Char('x') => app.toggle_completion(),
        KeyCode::Tab => {
            if sidebar_visible {
                app.toggle_focus();
            }
        }
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::Char('g') | KeyCode::Home => app.back_to_top(),
        KeyCode::Char('b') => app.toggle_sidebar(sidebar_visible),
        KeyCode::Char('[') | KeyCode::Char('p') => app.go_prev(),
        KeyCode::Char(']') | KeyCode::Char('n') => app.go_next(),
        KeyCode::Char('l') => app.switch_language(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area, app.sidebar_override);

    render_header(frame, app, layout.header);

    if let Some(sidebar_area) = layout.sidebar {
        let rows = app.sidebar.rows(&app.catalog, &app.completion);
        let sidebar = Sidebar::new(&rows, app.sidebar.cursor, app.theme)
            .focused(app.focus == Focus::Sidebar || layout.content.is_none())
            .error(app.catalog_error.as_deref());
        frame.render_widget(sidebar, sidebar_area);
    }

    if let Some(content_area) = layout.content {
        let disclaimer = Disclaimer::new(
            app.catalog.patterns().len(),
            app.catalog.problem_count(),
            app.theme,
        );
        let pane = ContentPane::new(&app.content, disclaimer, app.theme)
            .title(app.content_title())
            .focused(app.focus == Focus::Content || layout.sidebar.is_none());
        frame.render_widget(pane, content_area);
    }

    let hints = [
        "[\u{2191}\u{2193}] Move",
        "[Enter] Open",
        "[x] Done",
        "[Tab] Focus",
        "[[ ]] Prev/Next",
        "[l] Language",
        "[g] Top",
        "[b] Sidebar",
        "[q] Quit",
    ];
    let footer_line = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_line,
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    let header_bg = Block::default().style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header_bg, area);

    let title = " patternbook ";
    let title_line = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title_line, area);

    let title_width = title.len() as u16;
    if area.width > title_width + 20 {
        let bar_area = Rect::new(
            area.x + title_width,
            area.y,
            (area.width - title_width).min(60),
            1,
        );
        let progress = ProgressBar::new(
            "Completed",
            app.completion.completed_total(&app.catalog),
            app.catalog.problem_count(),
            app.theme,
        );
        frame.render_widget(progress, bar_area);
    }
}
