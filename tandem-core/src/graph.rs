//! Dependency ordering of apps.
//!
//! The graph is an index arena: every app gets a dense index in project
//! order, and edges are adjacency lists of indices. Ordering is Kahn's
//! algorithm with a min-heap ready set, so apps with no remaining constraint
//! come out in project order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::error::PlanError;
use crate::plan::ExecutionPlan;
use crate::types::{AppEntry, AppName};

/// Dependency graph over a fixed set of apps.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    nodes: Vec<&'a AppEntry>,
    /// `deps[i]` = indices `i` depends on (in-set only, deduplicated).
    deps: Vec<Vec<usize>>,
    /// `dependents[j]` = indices that depend on `j`.
    dependents: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph. Dependencies on apps outside `apps` are dropped.
    pub fn build(apps: &'a [AppEntry]) -> Self {
        let mut index: HashMap<&AppName, usize> = HashMap::with_capacity(apps.len());
        for (i, app) in apps.iter().enumerate() {
            index.entry(&app.name).or_insert(i);
        }

        let mut deps = vec![Vec::new(); apps.len()];
        let mut dependents = vec![Vec::new(); apps.len()];
        for (i, app) in apps.iter().enumerate() {
            for dep in &app.depends_on {
                let Some(&j) = index.get(dep) else {
                    tracing::warn!(
                        "app '{}' depends on '{}', which is not part of this run; ignoring",
                        app.name,
                        dep
                    );
                    continue;
                };
                if deps[i].contains(&j) {
                    continue;
                }
                deps[i].push(j);
                dependents[j].push(i);
            }
        }

        Self {
            nodes: apps.iter().collect(),
            deps,
            dependents,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices in dependency order.
    ///
    /// Fails with [`PlanError::CircularDependency`] if any node keeps a
    /// non-zero in-degree.
    pub fn topological_order(&self) -> Result<Vec<usize>, PlanError> {
        let mut in_degree: Vec<usize> = self.deps.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for &k in &self.dependents[i] {
                in_degree[k] -= 1;
                if in_degree[k] == 0 {
                    ready.push(Reverse(k));
                }
            }
        }

        if order.len() == self.nodes.len() {
            return Ok(order);
        }

        let unresolved: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] > 0)
            .collect();
        let cycle = self.find_cycle(&unresolved, &in_degree);
        Err(PlanError::CircularDependency {
            unresolved: unresolved
                .iter()
                .map(|&i| self.nodes[i].name.clone())
                .collect(),
            cycle: cycle.iter().map(|&i| self.nodes[i].name.clone()).collect(),
        })
    }

    /// Walk unresolved dependencies from the first unresolved node until a
    /// node repeats. Every unresolved node has an unresolved dependency, so
    /// the walk always closes a loop.
    fn find_cycle(&self, unresolved: &[usize], in_degree: &[usize]) -> Vec<usize> {
        let Some(&start) = unresolved.first() else {
            return Vec::new();
        };
        let mut path = vec![start];
        let mut current = start;
        loop {
            let Some(&next) = self.deps[current].iter().find(|&&d| in_degree[d] > 0) else {
                return path;
            };
            if let Some(pos) = path.iter().position(|&p| p == next) {
                let mut cycle = path.split_off(pos);
                cycle.push(next);
                return cycle;
            }
            path.push(next);
            current = next;
        }
    }
}

/// Order `apps` so every app comes after the in-set apps it depends on.
///
/// Ties are broken by position in `apps`.
pub fn resolve_order(apps: &[AppEntry]) -> Result<ExecutionPlan, PlanError> {
    let graph = DependencyGraph::build(apps);
    let order = graph.topological_order()?;
    Ok(ExecutionPlan {
        ordered_apps: order.into_iter().map(|i| apps[i].clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(name: &str, deps: &[&str]) -> AppEntry {
        AppEntry::new(AppName::parse(name).unwrap(), name)
            .with_depends_on(deps.iter().map(|d| AppName::parse(*d).unwrap()))
    }

    fn names(plan: &ExecutionPlan) -> Vec<&str> {
        plan.ordered_apps.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn independent_apps_keep_insertion_order() {
        let apps = vec![app("c", &[]), app("a", &[]), app("b", &[])];
        let plan = resolve_order(&apps).unwrap();
        assert_eq!(names(&plan), vec!["c", "a", "b"]);
    }

    #[test]
    fn dependency_moves_before_dependent() {
        let apps = vec![app("orders", &["customers"]), app("customers", &[])];
        let plan = resolve_order(&apps).unwrap();
        assert_eq!(names(&plan), vec!["customers", "orders"]);
    }

    #[test]
    fn ready_set_prefers_lowest_insertion_index() {
        // d is released after a; b and c were ready from the start.
        let apps = vec![
            app("a", &[]),
            app("d", &["a"]),
            app("b", &[]),
            app("c", &[]),
        ];
        let plan = resolve_order(&apps).unwrap();
        assert_eq!(names(&plan), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn out_of_set_dependencies_are_ignored() {
        let apps = vec![app("a", &["ghost"]), app("b", &["a"])];
        let plan = resolve_order(&apps).unwrap();
        assert_eq!(names(&plan), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_dependency_entries_count_once() {
        let apps = vec![app("b", &["a", "a"]), app("a", &[])];
        let plan = resolve_order(&apps).unwrap();
        assert_eq!(names(&plan), vec!["a", "b"]);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let apps = vec![app("a", &["a"]), app("b", &[])];
        let err = resolve_order(&apps).unwrap_err();
        match err {
            PlanError::CircularDependency { unresolved, cycle } => {
                assert_eq!(unresolved, vec![AppName::parse("a").unwrap()]);
                assert_eq!(
                    cycle,
                    vec![AppName::parse("a").unwrap(), AppName::parse("a").unwrap()]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cycle_reports_unresolved_set_and_loop() {
        // x -> y -> z -> y, w depends on x and is blocked too.
        let apps = vec![
            app("ok", &[]),
            app("x", &["y"]),
            app("y", &["z"]),
            app("z", &["y"]),
            app("w", &["x"]),
        ];
        let err = resolve_order(&apps).unwrap_err();
        let PlanError::CircularDependency { unresolved, cycle } = err.clone() else {
            panic!("expected cycle error");
        };
        let unresolved: Vec<&str> = unresolved.iter().map(AppName::as_str).collect();
        assert_eq!(unresolved, vec!["x", "y", "z", "w"]);
        let cycle: Vec<&str> = cycle.iter().map(AppName::as_str).collect();
        assert_eq!(cycle, vec!["y", "z", "y"]);
        assert!(err.to_string().contains("y -> z -> y"), "got: {err}");
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        let plan = resolve_order(&[]).unwrap();
        assert!(plan.ordered_apps.is_empty());
    }
}
