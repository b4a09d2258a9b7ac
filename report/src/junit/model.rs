use std::fmt;

use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Details of a `<failure>` or `<error>` attached to a test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestProblem {
    message: String,
    kind: String,
    text: String,
}

impl TestProblem {
    pub fn new<M: Into<String>, K: Into<String>, T: Into<String>>(
        message: M,
        kind: K,
        text: T,
    ) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Short description, usually the assertion or exception message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Free-form classification, usually the exception class name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Full diagnostic text, usually a stack trace.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Errored,
    Skipped,
    Missing,
}

impl TestStatus {
    /// Stable code used in machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Errored => "errored",
            TestStatus::Skipped => "skipped",
            TestStatus::Missing => "missing",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Passed => "Passed",
            TestStatus::Failed => "Failed assertion",
            TestStatus::Errored => "Unexpected error",
            TestStatus::Skipped => "Skipped",
            TestStatus::Missing => "Missing",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of running a single test method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub class_name: String,
    pub duration_seconds: f64,
    pub failure: Option<TestProblem>,
    pub error: Option<TestProblem>,
    pub skipped: bool,
    pub missing: bool,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl TestCase {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, class_name: C) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    /// A test that was expected to run but never showed up in a report,
    /// e.g. because the submission did not compile.
    pub fn missing<N: Into<String>, C: Into<String>>(name: N, class_name: C) -> Self {
        Self {
            missing: true,
            ..Self::new(name, class_name)
        }
    }

    /// First match wins: error, skipped, failure, missing, then passed.
    pub fn status(&self) -> TestStatus {
        if self.error.is_some() {
            TestStatus::Errored
        } else if self.skipped {
            TestStatus::Skipped
        } else if self.failure.is_some() {
            TestStatus::Failed
        } else if self.missing {
            TestStatus::Missing
        } else {
            TestStatus::Passed
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status() == TestStatus::Passed
    }

    /// True iff the test failed or errored. Skipped and missing tests are
    /// not considered unsuccessful.
    pub fn is_unsuccessful(&self) -> bool {
        self.error.is_some() || self.failure.is_some()
    }
}

impl Serialize for TestCase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TestCase", 10)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("class_name", &self.class_name)?;
        state.serialize_field("duration_seconds", &self.duration_seconds)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("failure", &self.failure)?;
        state.serialize_field("error", &self.error)?;
        state.serialize_field("skipped", &self.skipped)?;
        state.serialize_field("missing", &self.missing)?;
        state.serialize_field("stdout", &self.stdout)?;
        state.serialize_field("stderr", &self.stderr)?;
        state.end()
    }
}

/// Aggregate result of one JUnit report.
///
/// The `count_*` fields are copied from the report attributes as declared and
/// are never reconciled with `test_cases`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestSuite {
    pub name: String,
    pub duration_seconds: f64,
    pub count_tests: u64,
    pub count_errors: u64,
    pub count_skipped: u64,
    pub count_failures: u64,
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_test_case(&mut self, test_case: TestCase) {
        self.test_cases.push(test_case);
    }

    /// True iff every test case passed. An empty suite counts as passed.
    pub fn is_passed(&self) -> bool {
        self.test_cases.iter().all(TestCase::is_passed)
    }
}
