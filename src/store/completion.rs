use crate::catalog::{Catalog, Pattern, completion_key};
use crate::store::json_store::JsonStore;
use crate::store::schema::CompletionStatus;

/// Per-problem completion flags, written through to disk on every change.
///
/// Loaded once at start-up. Persist failures are logged and otherwise
/// ignored; the in-memory map stays authoritative for the session.
pub struct CompletionStore {
    status: CompletionStatus,
    backend: Option<JsonStore>,
}

impl CompletionStore {
    pub fn open(backend: JsonStore) -> Self {
        let status = backend.load_completion();
        log::debug!("loaded {} completion entries", status.len());
        Self {
            status,
            backend: Some(backend),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            status: CompletionStatus::new(),
            backend: None,
        }
    }

    pub fn get(&self, key: &str) -> bool {
        self.status.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, completed: bool) {
        self.status.insert(key.to_string(), completed);
        self.persist();
    }

    /// Flip a flag and return its new value.
    pub fn toggle(&mut self, key: &str) -> bool {
        let completed = !self.get(key);
        self.set(key, completed);
        completed
    }

    pub fn persist(&self) {
        if let Some(ref backend) = self.backend
            && let Err(e) = backend.save_completion(&self.status)
        {
            log::warn!("failed to persist completion status: {e:#}");
        }
    }

    pub fn completed_in(&self, pattern: &Pattern) -> usize {
        pattern
            .problems
            .iter()
            .filter(|problem| self.get(&completion_key(&pattern.id, &problem.id)))
            .count()
    }

    pub fn status(&self) -> &CompletionStatus {
        &self.status
    }

    /// Completed problems across the whole catalog. Keys for problems the
    /// catalog no longer lists are not counted.
    pub fn completed_total(&self, catalog: &Catalog) -> usize {
        catalog.patterns().iter().map(|p| self.completed_in(p)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Problem;
    use std::fs;
    use tempfile::TempDir;

    fn pattern(id: &str, problems: &[&str]) -> Pattern {
        Pattern {
            id: id.to_string(),
            name: id.to_uppercase(),
            number: 1.0,
            problems: problems
                .iter()
                .enumerate()
                .map(|(i, p)| Problem {
                    id: p.to_string(),
                    name: p.to_string(),
                    number: (i + 1) as f64,
                })
                .collect(),
        }
    }

    #[test]
    fn test_absent_key_is_not_completed() {
        let store = CompletionStore::in_memory();
        assert!(!store.get("p1-a"));
    }

    #[test]
    fn test_toggle_persist_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store =
            CompletionStore::open(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert!(store.toggle("p1-a"));
        assert!(store.get("p1-a"));

        let reloaded =
            CompletionStore::open(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert!(reloaded.get("p1-a"));
        assert!(!reloaded.get("p1-b"));
    }

    #[test]
    fn test_toggle_twice_stores_false_entry() {
        let mut store = CompletionStore::in_memory();
        store.toggle("p1-a");
        assert!(!store.toggle("p1-a"));
        assert_eq!(store.status().get("p1-a"), Some(&false));
    }

    #[test]
    fn test_completed_in_counts_only_own_pattern() {
        let mut store = CompletionStore::in_memory();
        let p1 = pattern("p1", &["a", "b", "c"]);
        store.set("p1-a", true);
        store.set("p1-c", true);
        store.set("p2-a", true);
        store.set("p1-b", false);
        assert_eq!(store.completed_in(&p1), 2);
    }

    #[test]
    fn test_completed_total_ignores_unknown_keys() {
        let mut store = CompletionStore::in_memory();
        let catalog = Catalog::from_patterns(vec![pattern("p1", &["a", "b"])]).unwrap();
        store.set("p1-a", true);
        store.set("gone-x", true);
        assert_eq!(store.completed_total(&catalog), 1);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let mut store =
            CompletionStore::open(JsonStore::with_base_dir(data_dir.clone()).unwrap());
        fs::remove_dir_all(&data_dir).unwrap();

        store.set("p1-a", true);
        assert!(store.get("p1-a"));
    }
}
