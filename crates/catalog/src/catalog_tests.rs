// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;

#[test]
fn missing_directory_is_an_error() {
    let err = Catalog::load("/nonexistent/path/for/sure").unwrap_err();
    assert!(matches!(err, CatalogError::Missing(_)));
}

#[test]
fn loads_and_resolves_a_descriptor() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("python3.yaml"),
        r#"
name: python3
extension: py
compile_cmds: []
run_cmds:
  - ["python3", "<entry>"]
"#,
    )
    .expect("write descriptor");

    let catalog = Catalog::load(dir.path()).expect("valid catalog");
    assert_eq!(catalog.len(), 1);
    let descriptor = catalog.resolve("python3").expect("present");
    assert!(descriptor.is_interpreted());
    assert_eq!(descriptor.run_cmds[0], vec!["python3", "<entry>"]);
}

#[test]
fn unknown_runtime_resolves_to_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = Catalog::load(dir.path()).expect("empty catalog is still valid");
    assert!(catalog.resolve("brainfuck").is_none());
}

#[test]
fn malformed_descriptor_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("broken.yaml"), "not: [valid, yaml: struct").expect("write");
    let err = Catalog::load(dir.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { .. }));
}

#[test]
fn non_yaml_files_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("README.md"), "not a descriptor").expect("write");
    let catalog = Catalog::load(dir.path()).expect("valid catalog");
    assert!(catalog.is_empty());
}
