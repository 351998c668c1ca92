use std::path::Path;
use wbsmatrix_core::{
    build, build_file, BuildError, NodeKind, NodeLevel, Responsibility, Role, ValidationError,
    ValidationErrorKind,
};

const ALL_EMPTY: &str =
    "{project_manager: '', hardware: '', software: '', testing: '', sponsor: '', other: ''}";

fn validation_error(input: &str) -> ValidationError {
    match build(input) {
        Err(BuildError::Validation(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn scenario() -> &'static str {
    "project:\n  Root:\n    TaskA:\n      responsibilities: {project_manager: L, hardware: P, software: '', testing: '', sponsor: '', other: ''}\n      duration: 2\n      labor: 16\n    TaskB:\n      responsibilities: {project_manager: R, hardware: L, software: '', testing: '', sponsor: '', other: ''}\n      duration: 3\n      labor: 24\n"
}

#[test]
fn scenario_rolls_up_duration_labor_and_role_counts() {
    let project = build(scenario()).unwrap();
    let root = project.find(&["project", "Root"]).unwrap();
    let aggregate = root.aggregate();

    assert_eq!(aggregate.total_duration, 5);
    assert_eq!(aggregate.total_labor, 40);
    assert_eq!(aggregate.role_counts.get(Role::ProjectManager), 2);
    // Both work packages hold a hardware code (P and L).
    assert_eq!(aggregate.role_counts.get(Role::Hardware), 2);
    assert_eq!(aggregate.role_counts.get(Role::Software), 0);
    assert_eq!(project.aggregate(), root.aggregate());
}

#[test]
fn interior_aggregates_equal_sums_over_leaf_descendants() {
    let root = build_file(Path::new("tests/fixtures/sample_plan.yaml")).unwrap();
    for node in root.descendants() {
        let leaves: Vec<_> = node.leaves().filter_map(|leaf| leaf.leaf_data()).collect();
        let duration: u64 = leaves.iter().map(|leaf| leaf.duration).sum();
        let labor: u64 = leaves.iter().map(|leaf| leaf.labor).sum();
        assert_eq!(node.aggregate().total_duration, duration, "{}", node.path());
        assert_eq!(node.aggregate().total_labor, labor, "{}", node.path());
        for role in Role::ALL {
            let involved = leaves
                .iter()
                .filter(|leaf| leaf.responsibilities.get(role).is_involved())
                .count() as u32;
            assert_eq!(node.aggregate().role_counts.get(role), involved);
        }
    }
}

#[test]
fn fixture_builds_with_display_name_and_levels() {
    let root = build_file(Path::new("tests/fixtures/sample_plan.yaml")).unwrap();
    assert_eq!(root.name(), "SelfiePod Camera");
    assert_eq!(root.level(), NodeLevel::Project);
    assert_eq!(root.aggregate().total_duration, 30);
    assert_eq!(root.aggregate().total_labor, 240);
    assert_eq!(root.aggregate().role_counts.get(Role::Testing), 1);
    assert_eq!(root.aggregate().role_counts.get(Role::Other), 0);

    let names: Vec<&str> = root.children().iter().map(|child| child.name()).collect();
    assert_eq!(names, ["Design", "Validation"]);

    let architecture = root
        .find(&["SelfiePod Camera", "Design", "Architecture"])
        .unwrap();
    assert_eq!(architecture.level(), NodeLevel::Activity);
    assert_eq!(architecture.path().to_string(), "SelfiePod Camera / Design / Architecture");

    let firmware = architecture.children().last().unwrap();
    assert_eq!(firmware.level(), NodeLevel::WorkPackage);
    let data = firmware.leaf_data().unwrap();
    assert_eq!(data.responsibilities.get(Role::Software), Responsibility::Lead);
    assert_eq!(data.responsibilities.get(Role::Testing), Responsibility::None);
    assert!(matches!(firmware.kind(), NodeKind::Leaf(_)));
}

#[test]
fn building_twice_yields_equal_trees() {
    assert_eq!(build(scenario()).unwrap(), build(scenario()).unwrap());
}

#[test]
fn zero_case_aggregates_to_zero() {
    let input = format!("Root:\n  Only:\n    responsibilities: {ALL_EMPTY}\n    duration: 0\n    labor: 0\n");
    let root = build(&input).unwrap();
    assert_eq!(root.aggregate().total_duration, 0);
    assert_eq!(root.aggregate().total_labor, 0);
    assert!(root.aggregate().role_counts.iter().all(|(_, count)| count == 0));
}

#[test]
fn null_codes_mean_no_involvement() {
    let input = "Root:\n  A:\n    responsibilities: {project_manager: L, hardware: ~, software: '', testing: '', sponsor: '', other: ''}\n    duration: 1\n    labor: 1\n";
    let root = build(input).unwrap();
    let leaf = root.children()[0].leaf_data().unwrap();
    assert_eq!(leaf.responsibilities.get(Role::Hardware), Responsibility::None);
}

#[test]
fn missing_leaf_field_is_reported_at_the_leaf() {
    let input = format!("Root:\n  A:\n    responsibilities: {ALL_EMPTY}\n    duration: 1\n");
    let err = validation_error(&input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::MissingField {
            field: "labor".to_string()
        }
    );
    assert_eq!(err.path.to_string(), "Root / A");
}

#[test]
fn omitted_role_is_a_missing_field() {
    let input = "Root:\n  A:\n    responsibilities: {project_manager: L, hardware: '', software: '', testing: '', sponsor: ''}\n    duration: 1\n    labor: 1\n";
    let err = validation_error(input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::MissingField {
            field: "responsibilities.other".to_string()
        }
    );
}

#[test]
fn negative_duration_is_rejected() {
    let input = format!("Root:\n  A:\n    responsibilities: {ALL_EMPTY}\n    duration: -1\n    labor: 4\n");
    let err = validation_error(&input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::NegativeValue {
            field: "duration",
            value: "-1".to_string()
        }
    );
    assert_eq!(err.path.to_string(), "Root / A");
}

#[test]
fn negative_labor_is_rejected() {
    let input = format!("Root:\n  A:\n    responsibilities: {ALL_EMPTY}\n    duration: 1\n    labor: -1\n");
    let err = validation_error(&input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::NegativeValue {
            field: "labor",
            value: "-1".to_string()
        }
    );
    assert_eq!(err.path.to_string(), "Root / A");
}

#[test]
fn negative_fractional_duration_is_a_negative_value() {
    let input = format!("Root:\n  A:\n    responsibilities: {ALL_EMPTY}\n    duration: -0.5\n    labor: 4\n");
    let err = validation_error(&input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::NegativeValue {
            field: "duration",
            value: "-0.5".to_string()
        }
    );
}

#[test]
fn rollup_overflow_is_rejected_at_the_summing_node() {
    let input = format!(
        "Root:\n  A:\n    responsibilities: {ALL_EMPTY}\n    duration: {}\n    labor: 0\n  B:\n    responsibilities: {ALL_EMPTY}\n    duration: 1\n    labor: 0\n",
        u64::MAX
    );
    let err = validation_error(&input);
    assert!(matches!(err.kind, ValidationErrorKind::Malformed { .. }));
    assert_eq!(err.path.to_string(), "Root");
}

#[test]
fn unknown_role_is_rejected() {
    let input = "Root:\n  A:\n    responsibilities: {project_manager: L, designer: P, hardware: '', software: '', testing: '', sponsor: '', other: ''}\n    duration: 1\n    labor: 1\n";
    let err = validation_error(input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::UnknownRole {
            role: "designer".to_string()
        }
    );
}

#[test]
fn invalid_code_is_rejected() {
    let input = "Root:\n  A:\n    responsibilities: {project_manager: L, hardware: X, software: '', testing: '', sponsor: '', other: ''}\n    duration: 1\n    labor: 1\n";
    let err = validation_error(input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::InvalidCode {
            role: Role::Hardware,
            code: "X".to_string()
        }
    );
    assert_eq!(err.kind.name(), "InvalidCode");
}

#[test]
fn interior_without_children_is_rejected() {
    let err = validation_error("Root:\n  Phase: {}\n");
    assert_eq!(err.kind, ValidationErrorKind::EmptyInterior);
    assert_eq!(err.path.to_string(), "Root / Phase");
}

#[test]
fn duplicate_sibling_names_the_parent_path() {
    let input = format!(
        "Root:\n  Phase:\n    TaskA:\n      responsibilities: {ALL_EMPTY}\n      duration: 1\n      labor: 1\n    TaskA:\n      responsibilities: {ALL_EMPTY}\n      duration: 2\n      labor: 2\n"
    );
    let err = validation_error(&input);
    assert_eq!(
        err.kind,
        ValidationErrorKind::DuplicateSibling {
            name: "TaskA".to_string()
        }
    );
    assert_eq!(err.path.to_string(), "Root / Phase");
    assert!(err.to_string().contains("DuplicateSibling"));
}

#[test]
fn leaf_fields_without_responsibilities_are_a_mis_typed_leaf() {
    let err = validation_error("Root:\n  A:\n    duration: 3\n    labor: 24\n");
    assert_eq!(
        err.kind,
        ValidationErrorKind::MissingField {
            field: "responsibilities".to_string()
        }
    );
    assert_eq!(err.path.to_string(), "Root / A");
}

#[test]
fn document_must_have_exactly_one_root() {
    let err = validation_error("A: {}\nB: {}\n");
    assert!(matches!(err.kind, ValidationErrorKind::Malformed { .. }));
    assert_eq!(err.path.to_string(), "<document>");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = build_file(Path::new("tests/fixtures/does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));
    assert!(err.validation().is_none());
}
