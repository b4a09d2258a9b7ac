use std::{fs, path::Path};

use assert_cmd::Command;
use junit_mock::{JunitMock, Options};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use test_utils::inputs::write_sample_report_to_dir;

const SAMPLE_CLASS: &str = "uk.ac.aston.autofeedback.junitxml.SampleTest";

fn autofeedback() -> Command {
    let mut command = Command::cargo_bin("autofeedback").unwrap();
    command.env("NO_COLOR", "1").env_remove("AUTOFEEDBACK_REPORTS");
    command
}

fn xml_glob(dir: &Path) -> String {
    dir.join("*.xml").to_string_lossy().into_owned()
}

fn write_template(dir: &Path, source: &str) -> String {
    let path = dir.join("feedback.md");
    fs::write(&path, source).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn parse_lists_every_test_case() {
    let temp_dir = tempdir().unwrap();
    write_sample_report_to_dir(&temp_dir);

    let assert = autofeedback()
        .args(["parse", "--junit-paths", &xml_glob(temp_dir.path())])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(SAMPLE_CLASS))
        .stdout(predicate::str::contains(format!(
            "Failed assertion {SAMPLE_CLASS}#failingTest"
        )))
        .stdout(predicate::str::contains(format!(
            "Unexpected error {SAMPLE_CLASS}#errorTest"
        )))
        .stdout(predicate::str::contains("This should fail"))
        .stdout(predicate::str::contains("3 of 6 tests passed"))
        .stdout(predicate::str::contains(
            "(1 failed, 1 errors, 1 skipped, 0 missing)",
        ));

    println!("{assert}");
}

#[test]
fn parse_reads_paths_from_environment() {
    let temp_dir = tempdir().unwrap();
    write_sample_report_to_dir(&temp_dir);

    let assert = autofeedback()
        .env("AUTOFEEDBACK_REPORTS", xml_glob(temp_dir.path()))
        .arg("parse")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("3 of 6 tests passed"));

    println!("{assert}");
}

#[test]
fn parse_succeeds_when_all_tests_pass() {
    let temp_dir = tempdir().unwrap();
    let mut options = Options::default();
    options.global.seed = Some(42);
    options.test_suite.test_suite_name = Some(String::from("uk.ac.aston.PassingTest"));
    options.test_case.test_case_random_count = 5;
    options.test_case.test_case_success_to_skip_to_fail_to_error_percentage =
        vec![vec![100, 0, 0, 0]];
    let mut jm = JunitMock::new(options);
    let reports = vec![jm.generate_report()];
    jm.write_reports_to_file(temp_dir.path(), &reports).unwrap();

    let assert = autofeedback()
        .args(["parse", "--junit-paths", &xml_glob(temp_dir.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("uk.ac.aston.PassingTest"))
        .stdout(predicate::str::contains("5 of 5 tests passed"));

    println!("{assert}");
}

#[test]
fn parse_json_includes_statuses_and_summary() {
    let temp_dir = tempdir().unwrap();
    write_sample_report_to_dir(&temp_dir);

    let output = autofeedback()
        .args(["parse", "--json", "--junit-paths", &xml_glob(temp_dir.path())])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let statuses: Vec<&str> = json["test_suites"][0]["test_cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|test_case| test_case["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec!["failed", "errored", "skipped", "passed", "passed", "passed"]
    );
    assert_eq!(json["test_suites"][0]["count_tests"], 6);
    assert_eq!(json["summary"]["total"], 6);
    assert_eq!(json["summary"]["passed"], 3);
    assert_eq!(
        json["test_suites"][0]["test_cases"][0]["failure"]["message"],
        "This should fail"
    );
}

#[test]
fn parse_reports_expected_tests_that_did_not_run() {
    let temp_dir = tempdir().unwrap();
    write_sample_report_to_dir(&temp_dir);
    let expected_path = temp_dir.path().join("expected.txt");
    fs::write(
        &expected_path,
        format!("# tests every submission must run\n{SAMPLE_CLASS}#passingTest\nuk.ac.aston.OtherTest#runs\n"),
    )
    .unwrap();

    let assert = autofeedback()
        .args(["parse", "--junit-paths", &xml_glob(temp_dir.path())])
        .arg("--expected")
        .arg(&expected_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Missing          uk.ac.aston.OtherTest#runs"))
        .stdout(predicate::str::contains("3 of 7 tests passed"))
        .stdout(predicate::str::contains("1 missing)"));

    println!("{assert}");
}

#[test]
fn parse_without_reports_fails() {
    let temp_dir = tempdir().unwrap();

    let assert = autofeedback()
        .args(["parse", "--junit-paths", &xml_glob(temp_dir.path())])
        .assert()
        .code(exitcode::SOFTWARE)
        .stderr(predicate::str::contains("No JUnit reports found matching"));

    println!("{assert}");
}

#[test]
fn render_previews_without_a_test() {
    let temp_dir = tempdir().unwrap();
    let template = write_template(
        temp_dir.path(),
        "# Feedback\n\n```af_when_failed\nCheck the loop bounds.\n```\n",
    );

    let assert = autofeedback()
        .args(["render", "--template", &template])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Feedback</h1>"))
        .stdout(predicate::str::contains(
            "<h5 class=\"card-title\">When test fails</h5><p>Check the loop bounds.</p>",
        ));

    println!("{assert}");
}

#[test]
fn render_resolves_blocks_for_selected_test() {
    let temp_dir = tempdir().unwrap();
    write_sample_report_to_dir(&temp_dir);
    let template = write_template(
        temp_dir.path(),
        "```af_when_passed\nWell done.\n```\n\n```af_when_regex /should fail/\nRead the assertion message.\n```\n",
    );

    let assert = autofeedback()
        .args(["render", "--template", &template])
        .args(["--junit-paths", &xml_glob(temp_dir.path())])
        .args(["--class", SAMPLE_CLASS, "--test", "failingTest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Read the assertion message.</p>"))
        .stdout(predicate::str::contains("Well done.").not())
        .stdout(predicate::str::contains("card").not());

    println!("{assert}");

    autofeedback()
        .args(["render", "--template", &template])
        .args(["--junit-paths", &xml_glob(temp_dir.path())])
        .args(["--class", SAMPLE_CLASS, "--test", "passingTest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Well done.</p>"))
        .stdout(predicate::str::contains("assertion message").not());
}

#[test]
fn render_treats_unknown_test_as_missing() {
    let temp_dir = tempdir().unwrap();
    write_sample_report_to_dir(&temp_dir);
    let template = write_template(
        temp_dir.path(),
        "```af_when_failed\nYour test did not run.\n```\n",
    );

    let assert = autofeedback()
        .args(["render", "--template", &template])
        .args(["--junit-paths", &xml_glob(temp_dir.path())])
        .args(["--class", SAMPLE_CLASS, "--test", "renamedTest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Your test did not run.</p>"))
        .stderr(predicate::str::contains("treating it as missing"));

    println!("{assert}");
}

#[test]
fn render_requires_class_and_test_together() {
    let temp_dir = tempdir().unwrap();
    let template = write_template(temp_dir.path(), "example");

    let assert = autofeedback()
        .args(["render", "--template", &template])
        .args(["--junit-paths", &xml_glob(temp_dir.path())])
        .args(["--class", SAMPLE_CLASS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--test <TEST>"));

    println!("{assert}");
}

#[test]
fn render_fails_on_invalid_regex() {
    let temp_dir = tempdir().unwrap();
    let template = write_template(
        temp_dir.path(),
        "```af_when_regex /(unclosed/\nNever shown.\n```\n",
    );

    let assert = autofeedback()
        .args(["render", "--template", &template])
        .assert()
        .code(exitcode::SOFTWARE)
        .stderr(predicate::str::contains("/(unclosed/"));

    println!("{assert}");
}
