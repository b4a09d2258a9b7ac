use std::{fs, path::Path};

use anyhow::Context;
use report::junit::{
    junit_path::load_reports,
    summary::{missing_test_suites, ExpectedTest},
    TestCase, TestSuite,
};

/// Loads the reports matched by `junit_paths`, followed by one synthetic suite
/// per class holding the expected tests that none of the reports ran.
pub fn load_test_suites(
    junit_paths: &[String],
    expected_path: Option<&Path>,
) -> anyhow::Result<Vec<TestSuite>> {
    let mut test_suites: Vec<TestSuite> = load_reports(junit_paths)?
        .into_iter()
        .map(|(_, test_suite)| test_suite)
        .collect();

    match expected_path {
        Some(expected_path) => {
            let expected = read_expected_tests(expected_path)?;
            if test_suites.is_empty() {
                log::warn!(
                    "No JUnit reports found matching {}",
                    junit_paths.join(", ")
                );
            }
            let missing = missing_test_suites(&expected, &test_suites);
            log::debug!(
                "{} of {} expected tests are missing",
                missing.iter().map(|s| s.test_cases.len()).sum::<usize>(),
                expected.len()
            );
            test_suites.extend(missing);
        }
        None if test_suites.is_empty() => {
            return Err(anyhow::anyhow!(
                "No JUnit reports found matching {}",
                junit_paths.join(", ")
            ));
        }
        None => (),
    }

    Ok(test_suites)
}

pub fn read_expected_tests(path: &Path) -> anyhow::Result<Vec<ExpectedTest>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read expected tests from {}", path.display()))?;
    Ok(ExpectedTest::parse_list(&contents))
}

/// Finds a test by class and name. A test that no report ran is returned as
/// missing, so feedback can still be rendered for it.
pub fn find_test_case(
    junit_paths: &[String],
    class_name: &str,
    name: &str,
) -> anyhow::Result<TestCase> {
    let found = load_reports(junit_paths)?
        .into_iter()
        .flat_map(|(_, test_suite)| test_suite.test_cases)
        .find(|test_case| test_case.class_name == class_name && test_case.name == name);

    Ok(found.unwrap_or_else(|| {
        log::warn!("Test {class_name}#{name} was not found in the reports, treating it as missing");
        TestCase::missing(name, class_name)
    }))
}
