use crate::catalog::{Catalog, Position};

/// Neighbours of a problem in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacent {
    pub prev: Option<Position>,
    pub next: Option<Position>,
}

/// Find the problems before and after `(pattern_id, problem_id)`.
///
/// Order is by pattern number, then problem number, and it crosses pattern
/// boundaries: the last problem of one pattern is followed by the first
/// problem of the next non-empty pattern. Unknown positions have no
/// neighbours.
pub fn compute_adjacent(catalog: &Catalog, pattern_id: &str, problem_id: &str) -> Adjacent {
    let patterns = catalog.patterns();
    let Some(pattern_idx) = catalog.pattern_index(pattern_id) else {
        return Adjacent::default();
    };
    let pattern = &patterns[pattern_idx];
    let Some(problem_idx) = pattern.problem_index(problem_id) else {
        return Adjacent::default();
    };

    let prev = if problem_idx > 0 {
        let problem = &pattern.problems[problem_idx - 1];
        Some(Position::new(&pattern.id, &problem.id))
    } else {
        patterns[..pattern_idx].iter().rev().find_map(|p| {
            p.problems
                .last()
                .map(|problem| Position::new(&p.id, &problem.id))
        })
    };

    let next = if let Some(problem) = pattern.problems.get(problem_idx + 1) {
        Some(Position::new(&pattern.id, &problem.id))
    } else {
        patterns[pattern_idx + 1..].iter().find_map(|p| {
            p.problems
                .first()
                .map(|problem| Position::new(&p.id, &problem.id))
        })
    };

    Adjacent { prev, next }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Pattern, Problem};

    fn pattern(id: &str, number: u32, problems: &[&str]) -> Pattern {
        Pattern {
            id: id.to_string(),
            name: id.to_uppercase(),
            number: f64::from(number),
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

    fn two_pattern_catalog() -> Catalog {
        Catalog::from_patterns(vec![
            pattern("p2", 2, &["c"]),
            pattern("p1", 1, &["a", "b"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_crosses_into_next_pattern() {
        let catalog = two_pattern_catalog();
        let adjacent = compute_adjacent(&catalog, "p1", "b");
        assert_eq!(
            adjacent,
            Adjacent {
                prev: Some(Position::new("p1", "a")),
                next: Some(Position::new("p2", "c")),
            }
        );
    }

    #[test]
    fn test_crosses_back_into_previous_pattern() {
        let catalog = two_pattern_catalog();
        let adjacent = compute_adjacent(&catalog, "p2", "c");
        assert_eq!(adjacent.prev, Some(Position::new("p1", "b")));
        assert_eq!(adjacent.next, None);
    }

    #[test]
    fn test_first_problem_has_no_prev() {
        let catalog = two_pattern_catalog();
        let adjacent = compute_adjacent(&catalog, "p1", "a");
        assert_eq!(adjacent.prev, None);
        assert_eq!(adjacent.next, Some(Position::new("p1", "b")));
    }

    #[test]
    fn test_empty_patterns_are_skipped() {
        let catalog = Catalog::from_patterns(vec![
            pattern("p1", 1, &["a"]),
            pattern("empty", 2, &[]),
            pattern("p3", 3, &["z"]),
        ])
        .unwrap();
        assert_eq!(
            compute_adjacent(&catalog, "p1", "a").next,
            Some(Position::new("p3", "z"))
        );
        assert_eq!(
            compute_adjacent(&catalog, "p3", "z").prev,
            Some(Position::new("p1", "a"))
        );
    }

    #[test]
    fn test_unknown_position_has_no_neighbours() {
        let catalog = two_pattern_catalog();
        assert_eq!(compute_adjacent(&catalog, "p9", "a"), Adjacent::default());
        assert_eq!(compute_adjacent(&catalog, "p1", "zz"), Adjacent::default());
    }

    #[test]
    fn test_next_walk_visits_every_problem_once_in_order() {
        let catalog = Catalog::from_patterns(vec![
            pattern("sliding-window", 3, &["w1", "w2", "w3"]),
            pattern("two-pointers", 1, &["t1", "t2"]),
            pattern("empty", 2, &[]),
            pattern("dfs", 4, &["d1"]),
        ])
        .unwrap();

        let mut visited = Vec::new();
        let mut current = catalog.first_position();
        while let Some(position) = current {
            current = compute_adjacent(&catalog, &position.pattern_id, &position.problem_id).next;
            visited.push(position);
            assert!(visited.len() <= catalog.problem_count(), "walk did not terminate");
        }

        let expected: Vec<Position> = catalog.positions().collect();
        assert_eq!(visited, expected);
        assert_eq!(visited.len(), 6);
    }

    #[test]
    fn test_prev_walk_mirrors_next_walk() {
        let catalog = two_pattern_catalog();
        let mut visited = Vec::new();
        let mut current = Some(Position::new("p2", "c"));
        while let Some(position) = current {
            current = compute_adjacent(&catalog, &position.pattern_id, &position.problem_id).prev;
            visited.push(position);
        }
        visited.reverse();
        assert_eq!(visited, catalog.positions().collect::<Vec<_>>());
    }
}
