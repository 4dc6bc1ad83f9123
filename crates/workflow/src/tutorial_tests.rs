//! Scenario tests for the tutorial workflow and the invariants every
//! defined workflow holds.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};

use crate::builder::{define_workflow, DependencyConfig, TaskConfig, WorkflowConfig};
use crate::tutorial::{tutorial_config, tutorial_workflow, TUTORIAL_WORKFLOW_ID};
use crate::{add_dependency, validate_workflow, DefinitionError, Schedule, WorkflowSpec};

/// Every dependency endpoint is a declared task, and task IDs are unique.
fn assert_invariants(spec: &WorkflowSpec) {
    let ids: HashSet<&str> = spec.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), spec.tasks.len(), "task IDs must be unique");

    for edge in &spec.dependencies {
        assert!(ids.contains(edge.upstream.as_str()), "unknown upstream {}", edge.upstream);
        assert!(ids.contains(edge.downstream.as_str()), "unknown downstream {}", edge.downstream);
    }
}

// ============================================================
// The tutorial workflow
// ============================================================

#[test]
fn tutorial_has_three_tasks_and_a_fan_out() {
    let spec = tutorial_workflow().expect("tutorial workflow should be valid");
    assert_invariants(&spec);

    assert_eq!(spec.tasks.len(), 3);
    assert_eq!(spec.dependencies.len(), 2);
    assert!(spec.dependencies.iter().all(|e| e.upstream == "print_date"));

    let mut downstream = spec.downstream_of("print_date");
    downstream.sort_unstable();
    assert_eq!(downstream, vec!["echo_execution_date", "sleep"]);
}

#[test]
fn tutorial_metadata_matches_declaration() {
    let spec = tutorial_workflow().unwrap();

    assert_eq!(spec.id, TUTORIAL_WORKFLOW_ID);
    assert_eq!(spec.description, "A simple tutorial DAG");
    assert_eq!(spec.schedule, Schedule::daily());
    assert_eq!(spec.start_date, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
    assert!(!spec.catchup);
    assert!(spec.tags.contains("example_tag"));
}

#[test]
fn tutorial_tasks_carry_commands_and_retries() {
    let spec = tutorial_workflow().unwrap();

    let print_date = spec.task("print_date").unwrap();
    assert_eq!(print_date.command_template, "date");
    assert_eq!(print_date.retries, 0);

    let sleep = spec.task("sleep").unwrap();
    assert_eq!(sleep.command_template, "sleep 5");
    assert_eq!(sleep.retries, 3);

    let echo = spec.task("echo_execution_date").unwrap();
    assert_eq!(echo.placeholders(), vec!["ds"]);
    assert_eq!(echo.retries, 0);
}

#[test]
fn tutorial_runs_print_date_first() {
    let spec = tutorial_workflow().unwrap();
    let order = validate_workflow(&spec).expect("tutorial should validate");

    assert_eq!(order, vec!["print_date", "sleep", "echo_execution_date"]);
    assert_eq!(
        spec.roots().iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec!["print_date"]
    );
}

#[test]
fn tutorial_survives_a_json_round_trip() {
    let spec = tutorial_workflow().unwrap();
    let json = serde_json::to_string_pretty(&spec).unwrap();
    let back: WorkflowSpec = serde_json::from_str(&json).unwrap();

    assert_eq!(back, spec);
    assert!(validate_workflow(&back).is_ok());
}

// ============================================================
// Failure scenarios
// ============================================================

#[test]
fn dependency_on_missing_successor_is_unknown_task() {
    let mut spec = tutorial_workflow().unwrap();
    let before = spec.dependencies.clone();

    let err = add_dependency(&mut spec, "print_date", &["missing"]).unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::UnknownTask { ref task_id, .. } if task_id == "missing"
    ));
    assert_eq!(spec.dependencies, before);
    assert_invariants(&spec);
}

#[test]
fn declaring_the_fan_out_the_wrong_way_round_is_a_cycle() {
    let mut config = tutorial_config();
    config
        .dependencies
        .push(DependencyConfig::new("sleep", ["print_date"]));

    assert!(matches!(
        define_workflow(config),
        Err(DefinitionError::CycleDetected { .. })
    ));
}

#[test]
fn invariants_hold_for_a_larger_definition() {
    let config = WorkflowConfig {
        id: "etl".into(),
        tasks: ["extract", "clean", "enrich", "load", "notify"]
            .into_iter()
            .map(|id| TaskConfig::bash(id, format!("echo {id}")))
            .collect(),
        dependencies: vec![
            DependencyConfig::new("extract", ["clean", "enrich"]),
            DependencyConfig::new("clean", ["load"]),
            DependencyConfig::new("enrich", ["load"]),
            DependencyConfig::new("load", ["notify"]),
        ],
        ..WorkflowConfig::default()
    };

    let spec = define_workflow(config).unwrap();
    assert_invariants(&spec);
    assert_eq!(
        validate_workflow(&spec).unwrap(),
        vec!["extract", "clean", "enrich", "load", "notify"]
    );
    assert_eq!(spec.upstream_of("load"), vec!["clean", "enrich"]);
}
