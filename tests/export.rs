use std::path::{Path, PathBuf};

use soccer_dash::dataset::Dataset;
use soccer_dash::export::{export_player_report, report_path};

fn load_fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("out");
    Dataset::load(&path).expect("fixture dataset should load")
}

#[test]
fn report_path_uses_safe_player_slug() {
    let path = report_path(Path::new("reports"), "Luis Andrade");
    let file = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file.starts_with("luis_andrade_"));
    assert!(file.ends_with(".xlsx"));
    assert_eq!(path.parent(), Some(Path::new("reports")));

    let odd = report_path(Path::new("."), "***");
    assert!(
        odd.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("player_")
    );
}

#[test]
fn exports_profile_and_category_sheets() {
    let data = load_fixture();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("andrade.xlsx");

    let report = export_player_report(&data, "Luis Andrade", &path).expect("export");
    assert!(path.exists());
    assert_eq!(report.path, path);
    // profile + eight per-season tables
    assert_eq!(report.sheets, 9);
    // four seasons in each of the six field tables, none in the keeper ones
    assert_eq!(report.season_rows, 24);
    assert!(report.skipped.is_empty());
}

#[test]
fn unknown_player_export_fails() {
    let data = load_fixture();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nobody.xlsx");
    let err = export_player_report(&data, "Nobody", &path).unwrap_err();
    assert!(err.to_string().contains("not a valid player"));
    assert!(!path.exists());
}
