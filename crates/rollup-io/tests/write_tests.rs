use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rollup_io::{
    read_table, render, write_table, write_versioned, write_versioned_at, OutputFormat,
    VersionedOutput,
};
use rollup_sql::{Table, Value};
use std::fs;

fn summary() -> Table {
    Table::with_rows(
        vec!["Market", "Category", "Seg_1-3", "Grand_Total"],
        vec![
            vec![
                Value::from("M1"),
                Value::from("1-2"),
                Value::Int(1),
                Value::Int(2),
            ],
            vec![
                Value::from("Grand Total"),
                Value::from("Total"),
                Value::from(1.5),
                Value::Null,
            ],
        ],
    )
    .unwrap()
}

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap()
}

#[test]
fn csv_rendering_writes_nulls_as_empty_fields() {
    let bytes = render(&summary(), OutputFormat::Csv).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "Market,Category,Seg_1-3,Grand_Total\nM1,1-2,1,2\nGrand Total,Total,1.5,\n"
    );
}

#[test]
fn xlsx_output_reads_back_with_numbers_as_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.xlsx");
    write_table(&summary(), &path, OutputFormat::Xlsx).unwrap();

    let table = read_table(&path).unwrap();
    assert_eq!(table, summary());
}

#[test]
fn versioned_write_creates_version_and_latest() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("output");

    let out = write_versioned_at(&summary(), &root, OutputFormat::Csv, timestamp()).unwrap();
    assert_eq!(
        out,
        VersionedOutput {
            version_path: root.join("versions").join("v_20240102_030405.csv"),
            latest_path: root.join("latest.csv"),
        }
    );
    assert_eq!(
        fs::read(&out.version_path).unwrap(),
        fs::read(&out.latest_path).unwrap()
    );
}

#[test]
fn same_second_versions_get_a_suffix_and_latest_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let first = write_versioned_at(&summary(), root, OutputFormat::Csv, timestamp()).unwrap();
    let smaller = Table::with_rows(vec!["Market"], vec![vec![Value::from("M9")]]).unwrap();
    let second = write_versioned_at(&smaller, root, OutputFormat::Csv, timestamp()).unwrap();
    let third = write_versioned_at(&smaller, root, OutputFormat::Csv, timestamp()).unwrap();

    assert_eq!(
        second.version_path,
        root.join("versions").join("v_20240102_030405_1.csv")
    );
    assert_eq!(
        third.version_path,
        root.join("versions").join("v_20240102_030405_2.csv")
    );
    // The first version is untouched; latest mirrors the most recent write.
    assert_eq!(
        fs::read(&first.version_path).unwrap(),
        render(&summary(), OutputFormat::Csv).unwrap()
    );
    assert_eq!(fs::read_to_string(&third.latest_path).unwrap(), "Market\nM9\n");
}

#[test]
fn write_versioned_defaults_to_xlsx_extension() {
    let dir = tempfile::tempdir().unwrap();
    let out = write_versioned(&summary(), dir.path(), OutputFormat::default()).unwrap();

    assert_eq!(out.latest_path, dir.path().join("latest.xlsx"));
    let name = out.version_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("v_") && name.ends_with(".xlsx"), "{name}");
    assert_eq!(read_table(&out.latest_path).unwrap(), summary());
}

#[test]
fn existing_version_files_are_never_clobbered() {
    let dir = tempfile::tempdir().unwrap();
    let versions = dir.path().join("versions");
    fs::create_dir_all(&versions).unwrap();
    fs::write(versions.join("v_20240102_030405.csv"), "hand edited\n").unwrap();

    let out = write_versioned_at(&summary(), dir.path(), OutputFormat::Csv, timestamp()).unwrap();
    assert_eq!(out.version_path, versions.join("v_20240102_030405_1.csv"));
    assert_eq!(
        fs::read_to_string(versions.join("v_20240102_030405.csv")).unwrap(),
        "hand edited\n"
    );

    // Only finished versions are left in the directory; the staging file is gone.
    let mut names: Vec<String> = fs::read_dir(&versions)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["v_20240102_030405.csv", "v_20240102_030405_1.csv"]);
}
