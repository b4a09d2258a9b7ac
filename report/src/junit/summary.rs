use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::model::{TestCase, TestSuite};

/// A test that is expected to appear in the reports of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpectedTest {
    pub class_name: String,
    pub name: String,
}

impl ExpectedTest {
    pub fn new<C: Into<String>, N: Into<String>>(class_name: C, name: N) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
        }
    }

    /// Reads one `ClassName#testName` per line. Blank lines and lines starting
    /// with `#` are skipped, as are lines without a `#` separator.
    pub fn parse_list(contents: &str) -> Vec<Self> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| match line.rsplit_once('#') {
                Some((class_name, name)) if !class_name.is_empty() && !name.is_empty() => {
                    Some(Self::new(class_name.trim(), name.trim()))
                }
                _ => {
                    log::warn!("Ignoring malformed expected test `{line}`");
                    None
                }
            })
            .collect()
    }
}

/// Builds synthetic suites, one per class in ascending order, holding the
/// expected tests that did not appear in any of `test_suites`.
pub fn missing_test_suites(expected: &[ExpectedTest], test_suites: &[TestSuite]) -> Vec<TestSuite> {
    let found: HashSet<(&str, &str)> = test_suites
        .iter()
        .flat_map(|test_suite| &test_suite.test_cases)
        .map(|test_case| (test_case.class_name.as_str(), test_case.name.as_str()))
        .collect();

    let mut missing_by_class: BTreeMap<&str, TestSuite> = BTreeMap::new();
    for expected_test in expected {
        if found.contains(&(expected_test.class_name.as_str(), expected_test.name.as_str())) {
            continue;
        }
        missing_by_class
            .entry(expected_test.class_name.as_str())
            .or_insert_with(|| TestSuite::new(expected_test.class_name.as_str()))
            .add_test_case(TestCase::missing(
                expected_test.name.as_str(),
                expected_test.class_name.as_str(),
            ));
    }

    missing_by_class.into_values().collect()
}

/// Outcome counts over a set of suites.
///
/// `failed`, `errors` and `skipped` count the corresponding flags
/// independently, so a test case with both a failure and an error adds to
/// both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestTally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub missing: usize,
}

impl TestTally {
    pub fn from_suites<'a, I: IntoIterator<Item = &'a TestSuite>>(test_suites: I) -> Self {
        test_suites
            .into_iter()
            .flat_map(|test_suite| &test_suite.test_cases)
            .fold(Self::default(), |mut tally, test_case| {
                tally.add(test_case);
                tally
            })
    }

    pub fn add(&mut self, test_case: &TestCase) {
        self.total += 1;
        self.passed += usize::from(test_case.is_passed());
        self.failed += usize::from(test_case.failure.is_some());
        self.errors += usize::from(test_case.error.is_some());
        self.skipped += usize::from(test_case.skipped);
        self.missing += usize::from(test_case.missing);
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
