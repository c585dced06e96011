// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{read_file, write_file};
use crate::{PersistenceError, Table, append_row, rewrite_atomically, truncate_torn_tail};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_reads_as_empty_table() {
    let dir: TempDir = TempDir::new().unwrap();
    let table: Table = Table::read(&dir.path().join("absent.csv"), &["ScreenID"]).unwrap();

    assert!(table.is_empty());
    assert!(!table.has_column("ScreenID"));
}

#[test]
fn test_empty_file_reads_as_empty_table() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("empty.csv");
    write_file(&path, "");

    let table: Table = Table::read(&path, &["ScreenID"]).unwrap();
    assert_eq!(table.len(), 0);
}

#[test]
fn test_headers_are_matched_after_normalising() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("screens.csv");
    write_file(&path, " Screen ID ,ROWS\nSC1, 5 \n");

    let table: Table = Table::read(&path, &["screen id", "Rows"]).unwrap();
    let row = table.rows().next().unwrap();

    assert_eq!(row.text("Screen ID").unwrap(), "SC1");
    assert_eq!(row.parse::<u16>("rows").unwrap(), 5);
    assert_eq!(row.line(), 2);
}

#[test]
fn test_missing_required_column_is_malformed() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("movies.csv");
    write_file(&path, "MovieID,Title\n1,Dune\n");

    let result: Result<Table, PersistenceError> = Table::read(&path, &["MovieID", "Price"]);
    assert!(matches!(
        result,
        Err(PersistenceError::Malformed { line: 1, ref reason, .. }) if reason.contains("Price")
    ));
}

#[test]
fn test_blank_rows_are_ignored() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("movies.csv");
    write_file(&path, "MovieID,Title\n1,Dune\n,\n2,Heat\n");

    let table: Table = Table::read(&path, &["MovieID"]).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_unparseable_field_reports_line() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("screens.csv");
    write_file(&path, "ScreenID,Rows\nSC1,5\nSC2,many\n");

    let table: Table = Table::read(&path, &["Rows"]).unwrap();
    let errors: Vec<PersistenceError> = table
        .rows()
        .filter_map(|row| row.parse::<u16>("Rows").err())
        .collect();

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], PersistenceError::Malformed { line: 3, .. }));
}

#[test]
fn test_append_writes_header_once() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("log.csv");
    let header: [&str; 2] = ["Key", "Value"];

    append_row(&path, &header, &[String::from("a"), String::from("1")]).unwrap();
    append_row(&path, &header, &[String::from("b"), String::from("two, quoted")]).unwrap();

    assert_eq!(read_file(&path), "Key,Value\na,1\nb,\"two, quoted\"\n");
}

#[test]
fn test_rewrite_replaces_contents_and_leaves_no_temp_files() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("screens.csv");
    write_file(&path, "Old\nstale\n");

    rewrite_atomically(&path, &["Key"], &[vec![String::from("fresh")]]).unwrap();

    assert_eq!(read_file(&path), "Key\nfresh\n");
    let entries: usize = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_torn_tail_is_cut_and_next_append_starts_a_new_line() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("log.csv");
    write_file(&path, "ID,Name\n1,alice\n2,bo");

    assert_eq!(truncate_torn_tail(&path).unwrap(), Some(3));
    assert_eq!(read_file(&path), "ID,Name\n1,alice\n");

    append_row(&path, &["ID", "Name"], &[String::from("2"), String::from("bob")]).unwrap();
    assert_eq!(read_file(&path), "ID,Name\n1,alice\n2,bob\n");
}

#[test]
fn test_clean_or_missing_log_is_left_alone() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("log.csv");
    assert_eq!(truncate_torn_tail(&path).unwrap(), None);

    write_file(&path, "ID,Name\n1,alice\n");
    assert_eq!(truncate_torn_tail(&path).unwrap(), None);
    assert_eq!(read_file(&path), "ID,Name\n1,alice\n");
}
