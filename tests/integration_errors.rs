//! Integration tests for the `calcdeps` binary's failure modes: every
//! resolution error aborts the run with a named, actionable message and no
//! partial output.

use assert_cmd::Command;
use calcdeps::test_utils::SourceTreeFixture;
use predicates::prelude::*;

fn calcdeps() -> Command {
    calcdeps::test_utils::init_test_logging(None);
    Command::cargo_bin("calcdeps").unwrap()
}

#[test]
fn test_missing_require_names_file_and_symbol() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_file("app.js", &[], &["app.Nowhere"]).unwrap();

    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .arg("--input")
        .arg(tree.root().join("app.js"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing provider"))
        .stderr(predicate::str::contains("app.Nowhere"))
        .stderr(predicate::str::contains("app.js"));
}

#[test]
fn test_circular_dependency_names_cycle_chain() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_file("a.js", &["s.X"], &["s.Y"]).unwrap();
    tree.add_file("b.js", &["s.Y"], &["s.X"]).unwrap();

    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .arg("--input")
        .arg(tree.root().join("a.js"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("circular dependency"))
        .stderr(predicate::str::contains("a.js"))
        .stderr(predicate::str::contains("b.js"));
}

#[test]
fn test_duplicate_provide_names_symbol_and_both_files() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_file("first.js", &["app.W"], &[]).unwrap();
    tree.add_file("second.js", &["app.W"], &[]).unwrap();

    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("duplicate provide"))
        .stderr(predicate::str::contains("app.W"))
        .stderr(predicate::str::contains("first.js"))
        .stderr(predicate::str::contains("second.js"));
}

#[test]
fn test_malformed_annotation_reports_file_and_line() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_raw_file("broken.js", "// header\ngoog.provide('app.Broken);\n")
        .unwrap();

    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("malformed dependency annotation"))
        .stderr(predicate::str::contains("broken.js:2"));
}

#[test]
fn test_multiple_malformed_files_report_first_path() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_raw_file("a_bad.js", "goog.provide('app.A);\n").unwrap();
    tree.add_raw_file("z_bad.js", "goog.provide('app.Z);\n").unwrap();

    // The lexicographically-first failing file is named, never the one whose
    // parse happened to finish first.
    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("a_bad.js:1"))
        .stderr(predicate::str::contains("z_bad.js").not());
}

#[test]
fn test_unreadable_root_directory_fails() {
    calcdeps()
        .args(["--path", "/no/such/source/root"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/source/root"));
}

#[test]
fn test_missing_input_file_fails() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_file("a.js", &["app.A"], &[]).unwrap();

    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .arg("--input")
        .arg(tree.root().join("ghost.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost.js"));
}

#[test]
fn test_error_includes_suggestion() {
    let tree = SourceTreeFixture::new().unwrap();
    tree.add_file("app.js", &[], &["app.Nowhere"]).unwrap();

    calcdeps()
        .arg("--path")
        .arg(tree.root())
        .arg("--input")
        .arg(tree.root().join("app.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("suggestion"));
}
