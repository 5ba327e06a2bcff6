use std::collections::HashSet;

use crate::catalog::{Catalog, Position};
use crate::content::Language;
use crate::store::completion::CompletionStore;

/// Collapsible pattern tree shown beside the content pane.
///
/// Pattern expansion is independent per pattern. At most one problem has its
/// language panel open and at most one language option is active, across
/// the whole tree.
#[derive(Clone, Debug, Default)]
pub struct SidebarState {
    expanded: HashSet<String>,
    open_panel: Option<Position>,
    active: Option<(Position, Language)>,
    pub cursor: usize,
}

/// One visible line of the tree, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarRow {
    Pattern {
        id: String,
        name: String,
        expanded: bool,
        completed: usize,
        total: usize,
    },
    Problem {
        position: Position,
        name: String,
        completed: bool,
        panel_open: bool,
    },
    Language {
        position: Position,
        language: Language,
        active: bool,
    },
}

impl SidebarRow {
    pub fn position(&self) -> Option<&Position> {
        match self {
            SidebarRow::Pattern { .. } => None,
            SidebarRow::Problem { position, .. } | SidebarRow::Language { position, .. } => {
                Some(position)
            }
        }
    }
}

pub fn progress_label(completed: usize, total: usize) -> String {
    format!("{completed}/{total} completed")
}

/// Visible row by catalog indices, before completion data is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowRef {
    Pattern(usize),
    Problem(usize, usize),
    Language(usize, usize, Language),
}

impl SidebarState {
    /// Every pattern starts collapsed with no panel open.
    pub fn build(catalog: &Catalog) -> Self {
        log::debug!("building sidebar for {} patterns", catalog.patterns().len());
        Self::default()
    }

    pub fn is_expanded(&self, pattern_id: &str) -> bool {
        self.expanded.contains(pattern_id)
    }

    pub fn open_panel(&self) -> Option<&Position> {
        self.open_panel.as_ref()
    }

    pub fn active(&self) -> Option<(&Position, Language)> {
        self.active.as_ref().map(|(p, l)| (p, *l))
    }

    /// Returns whether the pattern is now expanded.
    pub fn toggle_pattern(&mut self, pattern_id: &str) -> bool {
        if self.expanded.remove(pattern_id) {
            false
        } else {
            self.expanded.insert(pattern_id.to_string());
            true
        }
    }

    /// Open this problem's language panel and close any other. Toggling the
    /// open panel closes it. Returns whether the panel is now open.
    pub fn toggle_language_panel(&mut self, position: &Position) -> bool {
        if self.open_panel.as_ref() == Some(position) {
            self.open_panel = None;
            false
        } else {
            self.open_panel = Some(position.clone());
            true
        }
    }

    /// Flip the problem's completion flag. The store persists it and the
    /// pattern counter is derived from the store on the next `rows` call.
    pub fn toggle_completion(&self, store: &mut CompletionStore, position: &Position) -> bool {
        store.toggle(&position.completion_key())
    }

    /// Mark a language option active and return what should be loaded.
    pub fn select_language(
        &mut self,
        position: &Position,
        language: Language,
    ) -> (Position, Language) {
        self.active = Some((position.clone(), language));
        (position.clone(), language)
    }

    /// Expand the pattern holding `position`, open its language panel and
    /// move the cursor onto the problem.
    pub fn reveal(&mut self, catalog: &Catalog, position: &Position) {
        self.expanded.insert(position.pattern_id.clone());
        self.open_panel = Some(position.clone());
        let target = self.visible(catalog).iter().position(|row| match *row {
            RowRef::Problem(p, q) => {
                let pattern = &catalog.patterns()[p];
                pattern.id == position.pattern_id && pattern.problems[q].id == position.problem_id
            }
            _ => false,
        });
        if let Some(index) = target {
            self.cursor = index;
        }
    }

    /// Expand the first pattern and put the cursor on it.
    pub fn expand_first(&mut self, catalog: &Catalog) {
        if let Some(first) = catalog.patterns().first() {
            self.expanded.insert(first.id.clone());
            self.cursor = 0;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, catalog: &Catalog) {
        let len = self.visible(catalog).len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Perform the click action of the row under the cursor. Returns the
    /// content to load when a language option was chosen.
    pub fn activate(&mut self, catalog: &Catalog) -> Option<(Position, Language)> {
        self.clamp_cursor(catalog);
        let row = *self.visible(catalog).get(self.cursor)?;
        match row {
            RowRef::Pattern(p) => {
                let id = catalog.patterns()[p].id.clone();
                self.toggle_pattern(&id);
                None
            }
            RowRef::Problem(p, q) => {
                let position = position_at(catalog, p, q);
                self.toggle_language_panel(&position);
                None
            }
            RowRef::Language(p, q, language) => {
                let position = position_at(catalog, p, q);
                Some(self.select_language(&position, language))
            }
        }
    }

    /// Problem under the cursor, for problem and language rows.
    pub fn cursor_position(&self, catalog: &Catalog) -> Option<Position> {
        match *self.visible(catalog).get(self.cursor)? {
            RowRef::Pattern(_) => None,
            RowRef::Problem(p, q) | RowRef::Language(p, q, _) => Some(position_at(catalog, p, q)),
        }
    }

    pub fn clamp_cursor(&mut self, catalog: &Catalog) {
        let len = self.visible(catalog).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Flattened visible rows with checkbox state and per-pattern counters.
    pub fn rows(&self, catalog: &Catalog, store: &CompletionStore) -> Vec<SidebarRow> {
        let patterns = catalog.patterns();
        self.visible(catalog)
            .into_iter()
            .map(|row| match row {
                RowRef::Pattern(p) => {
                    let pattern = &patterns[p];
                    SidebarRow::Pattern {
                        id: pattern.id.clone(),
                        name: pattern.name.clone(),
                        expanded: self.is_expanded(&pattern.id),
                        completed: store.completed_in(pattern),
                        total: pattern.problems.len(),
                    }
                }
                RowRef::Problem(p, q) => {
                    let position = position_at(catalog, p, q);
                    SidebarRow::Problem {
                        name: patterns[p].problems[q].name.clone(),
                        completed: store.get(&position.completion_key()),
                        panel_open: self.open_panel.as_ref() == Some(&position),
                        position,
                    }
                }
                RowRef::Language(p, q, language) => {
                    let position = position_at(catalog, p, q);
                    let active = self
                        .active
                        .as_ref()
                        .is_some_and(|(pos, lang)| *pos == position && *lang == language);
                    SidebarRow::Language {
                        position,
                        language,
                        active,
                    }
                }
            })
            .collect()
    }

    fn visible(&self, catalog: &Catalog) -> Vec<RowRef> {
        let mut rows = Vec::new();
        for (p, pattern) in catalog.patterns().iter().enumerate() {
            rows.push(RowRef::Pattern(p));
            if !self.is_expanded(&pattern.id) {
                continue;
            }
            for (q, problem) in pattern.problems.iter().enumerate() {
                rows.push(RowRef::Problem(p, q));
                let open = self
                    .open_panel
                    .as_ref()
                    .is_some_and(|o| o.pattern_id == pattern.id && o.problem_id == problem.id);
                if open {
                    rows.extend(
                        Language::SIDEBAR_ORDER
                            .iter()
                            .map(|&lang| RowRef::Language(p, q, lang)),
                    );
                }
            }
        }
        rows
    }
}

fn position_at(catalog: &Catalog, p: usize, q: usize) -> Position {
    let pattern = &catalog.patterns()[p];
    Position::new(&pattern.id, &pattern.problems[q].id)
}
