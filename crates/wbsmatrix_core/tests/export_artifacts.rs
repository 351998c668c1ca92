use std::path::Path;
use wbsmatrix_core::{
    build, build_file, export, render_artifacts, Artifact, ArtifactKind, ExportConfig, ExportError,
    GraphDirection, Node,
};

fn sample() -> Node {
    build_file(Path::new("tests/fixtures/sample_plan.yaml")).unwrap()
}

fn config_for(dir: &Path) -> ExportConfig {
    ExportConfig {
        out_dir: dir.join("out"),
        ..ExportConfig::default()
    }
}

#[test]
fn export_writes_six_artifacts_named_after_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let report = export(&sample(), &config_for(dir.path())).unwrap();

    let names: Vec<String> = report
        .written
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "SelfiePod_Camera_wbs.dot",
            "SelfiePod_Camera_ram.dot",
            "SelfiePod_Camera_wbs.csv",
            "SelfiePod_Camera_ram.csv",
            "SelfiePod_Camera_wbs.xlsx",
            "SelfiePod_Camera_ram.xlsx",
        ]
    );
    assert!(report.rendered.is_empty());
    for path in &report.written {
        assert!(path.is_file(), "{} should exist", path.display());
    }
}

#[test]
fn explicit_stem_overrides_project_name() {
    let config = ExportConfig {
        stem: Some("camera v2".to_string()),
        ..ExportConfig::default()
    };
    let artifacts = render_artifacts(&sample(), &config).unwrap();
    assert_eq!(artifacts[0].file_name, "camera_v2_wbs.dot");
    assert_eq!(artifacts[5].file_name, "camera_v2_ram.xlsx");
}

#[test]
fn wbs_dot_honours_direction_and_lists_every_node() {
    let config = ExportConfig {
        direction: GraphDirection::LeftRight,
        ..ExportConfig::default()
    };
    let artifacts = render_artifacts(&sample(), &config).unwrap();
    let wbs = artifacts
        .iter()
        .find(|artifact| artifact.kind == ArtifactKind::WbsDiagram)
        .unwrap()
        .text()
        .unwrap();
    assert!(wbs.contains("rankdir=LR"));
    assert!(wbs.contains("  n_1_2_2 [label=\"Firmware (1.2.2)\\nPM:R HW:I SW:L\""));
    assert!(wbs.contains("  n_2 -> n_2_1;"));
}

#[test]
fn ram_dot_contains_matrix_summary_and_legend() {
    let artifacts = render_artifacts(&sample(), &ExportConfig::default()).unwrap();
    assert_eq!(artifacts[1].kind, ArtifactKind::RamDiagram);
    let ram = artifacts[1].text().unwrap();
    assert!(ram.starts_with("digraph ram {"));
    assert!(ram.contains("SelfiePod Camera - Responsibility Assignment Matrix"));
    assert!(ram.contains("Phase Totals"));
    assert!(ram.contains("Total Work Packages:"));
    assert!(ram.contains("L = Lead"));
    assert!(ram.contains("ram_table -> ram_summary [style=invis];"));
}

#[test]
fn ram_csv_lists_rows_then_project_totals() {
    let artifacts = render_artifacts(&sample(), &ExportConfig::default()).unwrap();
    let csv = artifacts[3].text().unwrap();
    let lines: Vec<&str> = csv.split("\r\n").collect();

    assert_eq!(
        lines[0],
        "WBS Element/Personnel,Work Package Type,Work Package,Project Manager,Hardware,Software,Testing,Sponsor,Other,Work Package Duration (Days),Work Package Labor (Person Hours)"
    );
    assert_eq!(lines[1], "\"        Requirements\",Subtask,1.1,L,P,P,,R,,5,40");
    assert_eq!(lines[4], "\"        Architecture\",Activity Totals,1.2,2,2,2,0,0,0,18,144");
    assert_eq!(lines[8], "SelfiePod Camera,Project Totals,,4,4,4,1,1,0,30,240");
    assert_eq!(lines[9], ",,,,,,,,,,");
    assert!(lines.contains(&"Total Labor (Hours):,240,,,,,,,,,"));
}

#[test]
fn wbs_csv_lists_number_level_type_name_parent() {
    let artifacts = render_artifacts(&sample(), &ExportConfig::default()).unwrap();
    let csv = artifacts[2].text().unwrap();
    let lines: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(lines[0], "WBS Number,Level,Type,Name,Parent");
    assert_eq!(lines[1], ",0,Project,SelfiePod Camera,");
    assert_eq!(lines[5], "1.2.1,3,Subtask,Electrical,Architecture");
}

#[test]
fn workbooks_are_binary_xlsx_artifacts() {
    let artifacts = render_artifacts(&sample(), &ExportConfig::default()).unwrap();
    for (artifact, kind) in artifacts[4..]
        .iter()
        .zip([ArtifactKind::WbsWorkbook, ArtifactKind::RamWorkbook])
    {
        assert_eq!(artifact.kind, kind);
        assert!(artifact.contents.starts_with(b"PK"));
        assert!(artifact.text().is_none());
    }
}

#[test]
fn text_rendering_is_byte_identical_across_runs() {
    let root = sample();
    let config = ExportConfig::default();
    let text = |artifacts: Vec<Artifact>| -> Vec<Artifact> {
        artifacts
            .into_iter()
            .filter(|artifact| artifact.kind.is_text())
            .collect()
    };
    let first = text(render_artifacts(&root, &config).unwrap());
    assert_eq!(first.len(), 4);
    assert_eq!(first, text(render_artifacts(&root, &config).unwrap()));
}

#[test]
fn invalid_render_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig {
        render_format: Some("-o/tmp/x".to_string()),
        ..config_for(dir.path())
    };
    let err = export(&sample(), &config).unwrap_err();
    assert!(matches!(err, ExportError::InvalidFormat(_)));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn validation_failure_leaves_output_directory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let result = build("Root:\n  Phase: {}\n").map(|root| export(&root, &config_for(dir.path())));
    assert!(result.is_err());
    assert!(!out_dir.exists());
}

#[test]
fn failed_write_leaves_no_partial_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    // A directory squatting on the second artifact's name blocks its write.
    std::fs::create_dir_all(out_dir.join("SelfiePod_Camera_ram.dot")).unwrap();

    let err = export(&sample(), &config_for(dir.path())).unwrap_err();
    match err {
        ExportError::Io { path, .. } => {
            assert_eq!(path, out_dir.join("SelfiePod_Camera_ram.dot"));
        }
        other => panic!("expected an io error, got {other}"),
    }
    assert!(!out_dir.join("SelfiePod_Camera_wbs.dot").exists());
    let left: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(left, ["SelfiePod_Camera_ram.dot"]);
}
