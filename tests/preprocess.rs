use std::fs;
use std::path::PathBuf;

use soccer_dash::dataset::{Category, Dataset, Table, load_tables};
use soccer_dash::error::StatsError;
use soccer_dash::preprocess::{kept_columns, project, select_columns, select_columns_from_files};

fn raw_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("archives");
    path
}

#[test]
fn slims_raw_archives_to_kept_columns() {
    let out = tempfile::tempdir().expect("temp dir");
    let summary = select_columns_from_files(&raw_dir(), out.path()).expect("preprocess");
    assert_eq!(summary.tables.len(), Category::ALL.len());

    let shooting = Table::from_path(&out.path().join("shooting.csv")).expect("written csv");
    let expected: Vec<String> = kept_columns(Category::Shooting)
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(shooting.headers(), expected.as_slice());
    assert!(!shooting.has_column("xg"));
}

#[test]
fn info_gains_general_position_after_position() {
    let out = tempfile::tempdir().expect("temp dir");
    select_columns_from_files(&raw_dir(), out.path()).expect("preprocess");

    let info = Table::from_path(&out.path().join("info.csv")).expect("written csv");
    let headers = info.headers();
    let pos = headers.iter().position(|h| h == "position").unwrap();
    assert_eq!(headers[pos + 1], "general_position");
    assert_eq!(
        info.column("general_position").unwrap(),
        vec!["GK", "DF", "FW-MF", "MF", "DF"]
    );
}

#[test]
fn empty_cells_are_written_as_null() {
    let out = tempfile::tempdir().expect("temp dir");
    select_columns_from_files(&raw_dir(), out.path()).expect("preprocess");

    let raw = fs::read_to_string(out.path().join("info.csv")).unwrap();
    let dahl = raw.lines().find(|l| l.contains("Nils Dahl")).unwrap();
    assert!(dahl.contains("NULL,NULL"));
    assert!(dahl.ends_with("NULL,19"));
}

#[test]
fn preprocessed_output_loads_as_dataset() {
    let out = tempfile::tempdir().expect("temp dir");
    select_columns_from_files(&raw_dir(), out.path()).expect("preprocess");
    let data = Dataset::load(out.path()).expect("slim output should load");
    assert_eq!(data.players().len(), 5);
    assert_eq!(data.players()[2].general_position, "FW-MF");
}

#[test]
fn missing_kept_column_fails() {
    let table = Table::from_reader("misc", "id,season\n1,2019-2020\n".as_bytes()).unwrap();
    let err = project(&table, &kept_columns(Category::Misc)).unwrap_err();
    assert!(matches!(err, StatsError::MissingColumn { .. }));
}

#[test]
fn missing_category_table_fails() {
    let mut raw = load_tables(&raw_dir()).expect("raw fixtures");
    raw.remove("gca");
    let out = tempfile::tempdir().expect("temp dir");
    let err = select_columns(&raw, out.path()).unwrap_err();
    assert!(matches!(err, StatsError::MissingTable(ref t) if t == "gca"));
}
