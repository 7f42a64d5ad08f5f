//! Plan ordering properties over hand-built dependency graphs.

use rstest::rstest;
use tandem_core::{
    resolve_plan, AppEntry, AppName, ExecutionPlan, PlanError, PlanScope, ProjectConfig,
};

fn name(s: &str) -> AppName {
    AppName::parse(s).expect("valid app name")
}

fn project(spec: &[(&str, &[&str])]) -> ProjectConfig {
    ProjectConfig {
        apps: spec
            .iter()
            .enumerate()
            .map(|(i, (app, deps))| {
                AppEntry::new(name(app), (i + 1).to_string())
                    .with_depends_on(deps.iter().map(|d| name(d)))
            })
            .collect(),
        ..ProjectConfig::default()
    }
}

/// Every in-plan dependency sits at a strictly earlier index.
fn assert_topologically_valid(plan: &ExecutionPlan) {
    for (i, app) in plan.ordered_apps.iter().enumerate() {
        for dep in &app.depends_on {
            if let Some(j) = plan.position(dep.as_str()) {
                assert!(j < i, "'{}' at {i} must follow '{dep}' at {j}", app.name);
            }
        }
    }
}

#[rstest]
#[case::chain(&[("c", &["b"][..]), ("b", &["a"][..]), ("a", &[][..])])]
#[case::diamond(&[("d", &["b", "c"][..]), ("b", &["a"][..]), ("c", &["a"][..]), ("a", &[][..])])]
#[case::forest(&[("x", &[][..]), ("y", &["x"][..]), ("p", &[][..]), ("q", &["p", "y"][..])])]
#[case::external_dep(&[("a", &["elsewhere"][..]), ("b", &["a"][..])])]
#[case::wide(&[("h", &["a", "b", "c", "d", "e", "f", "g"][..]), ("a", &[][..]), ("b", &[][..]), ("c", &["a"][..]), ("d", &[][..]), ("e", &["d"][..]), ("f", &[][..]), ("g", &["f"][..])])]
fn all_mode_plans_are_topologically_valid(#[case] spec: &[(&str, &[&str])]) {
    let project = project(spec);
    let plan = resolve_plan(&project, &PlanScope::All).expect("plan");
    assert_eq!(plan.len(), spec.len(), "no app may be dropped");
    assert_topologically_valid(&plan);
}

#[test]
fn diamond_breaks_ties_by_project_order() {
    let project = project(&[
        ("d", &["b", "c"]),
        ("c", &["a"]),
        ("b", &["a"]),
        ("a", &[]),
    ]);
    let plan = resolve_plan(&project, &PlanScope::All).expect("plan");
    let order: Vec<&str> = plan.ordered_apps.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(order, vec!["a", "c", "b", "d"]);
}

#[test]
fn resolution_is_deterministic() {
    let project = project(&[("b", &["a"]), ("c", &[]), ("a", &[]), ("d", &["c", "b"])]);
    let first = resolve_plan(&project, &PlanScope::All).expect("first");
    for _ in 0..10 {
        assert_eq!(resolve_plan(&project, &PlanScope::All).expect("again"), first);
    }
}

#[test]
fn cycle_is_reported_not_truncated() {
    let project = project(&[("a", &["c"]), ("b", &["a"]), ("c", &["b"]), ("free", &[])]);
    let err = resolve_plan(&project, &PlanScope::All).unwrap_err();
    match &err {
        PlanError::CircularDependency { unresolved, cycle } => {
            assert_eq!(unresolved, &vec![name("a"), name("b"), name("c")]);
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(cycle.len(), 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("circular dependency"));
}

#[test]
fn single_app_mode_ignores_cycles_elsewhere() {
    let project = project(&[("a", &["b"]), ("b", &["a"]), ("solo", &[])]);
    let plan = resolve_plan(&project, &PlanScope::App("a".into())).expect("plan");
    assert_eq!(plan.len(), 1);
}
