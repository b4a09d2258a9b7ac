use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use thiserror::Error;

use super::model::{TestCase, TestProblem, TestSuite};

const TAG_TEST_SUITE: &[u8] = b"testsuite";
const TAG_TEST_CASE: &[u8] = b"testcase";
const TAG_TEST_CASE_STATUS_FAILURE: &[u8] = b"failure";
const TAG_TEST_CASE_STATUS_ERROR: &[u8] = b"error";
const TAG_TEST_CASE_STATUS_SKIPPED: &[u8] = b"skipped";
const TAG_SYSTEM_OUT: &[u8] = b"system-out";
const TAG_SYSTEM_ERR: &[u8] = b"system-err";

#[derive(Error, Debug)]
pub enum JunitParseError {
    #[error("could not open report {}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed report XML")]
    Xml(#[from] quick_xml::Error),
    #[error("report ended inside an unclosed <{element}> element")]
    UnexpectedEof { element: &'static str },
}

pub type Result<T> = std::result::Result<T, JunitParseError>;

/// Direct child of a `<testcase>` that is currently being read.
#[derive(Debug)]
enum Child {
    Failure(OpenProblem),
    Error(OpenProblem),
    Skipped,
    SystemOut(String),
    SystemErr(String),
    Ignored,
}

impl Child {
    fn open(e: &BytesStart) -> Self {
        match e.name().as_ref() {
            TAG_TEST_CASE_STATUS_FAILURE => Child::Failure(OpenProblem::open(e)),
            TAG_TEST_CASE_STATUS_ERROR => Child::Error(OpenProblem::open(e)),
            TAG_TEST_CASE_STATUS_SKIPPED => Child::Skipped,
            TAG_SYSTEM_OUT => Child::SystemOut(String::new()),
            TAG_SYSTEM_ERR => Child::SystemErr(String::new()),
            _ => Child::Ignored,
        }
    }

    fn push_text(&mut self, value: &str) {
        match self {
            Child::Failure(problem) | Child::Error(problem) => problem.text.push_str(value),
            Child::SystemOut(text) | Child::SystemErr(text) => text.push_str(value),
            Child::Skipped | Child::Ignored => (),
        }
    }

    /// Only the first `<failure>` or `<error>` of a test case is kept.
    fn close(self, test_case: &mut TestCase) {
        match self {
            Child::Failure(problem) => {
                test_case.failure.get_or_insert_with(|| problem.build());
            }
            Child::Error(problem) => {
                test_case.error.get_or_insert_with(|| problem.build());
            }
            Child::Skipped => test_case.skipped = true,
            Child::SystemOut(text) => append_output(&mut test_case.stdout, text),
            Child::SystemErr(text) => append_output(&mut test_case.stderr, text),
            Child::Ignored => (),
        }
    }
}

fn append_output(output: &mut Option<String>, text: String) {
    match output {
        Some(existing) => existing.push_str(&text),
        None => *output = Some(text),
    }
}

#[derive(Debug)]
struct OpenProblem {
    message: String,
    kind: String,
    text: String,
}

impl OpenProblem {
    fn open(e: &BytesStart) -> Self {
        Self {
            message: parse_attr::string(e, "message"),
            kind: parse_attr::string(e, "type"),
            text: String::new(),
        }
    }

    fn build(self) -> TestProblem {
        TestProblem::new(self.message, self.kind, self.text)
    }
}

/// Streaming parser for a single JUnit XML report.
///
/// The document is walked as a stream of events; each `<testcase>` element
/// is consumed in one go so its children can be read without materializing
/// the rest of the document.
#[derive(Debug, Clone, Default)]
pub struct JunitParser {
    test_suite: TestSuite,
}

impl JunitParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn test_suite(&self) -> &TestSuite {
        &self.test_suite
    }

    pub fn into_test_suite(self) -> TestSuite {
        self.test_suite
    }

    pub fn parse<R: BufRead>(&mut self, xml: R) -> Result<()> {
        let mut reader = Reader::from_reader(xml);

        // Elements still open outside of test cases, which are consumed whole.
        let mut depth = 0_usize;
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Eof if depth > 0 => {
                    return Err(JunitParseError::UnexpectedEof {
                        element: "testsuite",
                    })
                }
                Event::Eof => break,
                Event::Start(e) => match e.name().as_ref() {
                    TAG_TEST_SUITE => {
                        depth += 1;
                        self.open_test_suite(&e);
                    }
                    TAG_TEST_CASE => {
                        let test_case = read_test_case(&mut reader, &e)?;
                        self.add_test_case(test_case);
                    }
                    _ => depth += 1,
                },
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Empty(e) => match e.name().as_ref() {
                    TAG_TEST_SUITE => self.open_test_suite(&e),
                    TAG_TEST_CASE => self.add_test_case(open_test_case(&e)),
                    _ => (),
                },
                _ => (),
            }
            buf.clear();
        }

        Ok(())
    }

    fn open_test_suite(&mut self, e: &BytesStart) {
        let test_suite = &mut self.test_suite;
        test_suite.name = parse_attr::string(e, "name");
        test_suite.duration_seconds = parse_attr::seconds(e, "time");
        test_suite.count_tests = parse_attr::count(e, "tests");
        test_suite.count_errors = parse_attr::count(e, "errors");
        test_suite.count_skipped = parse_attr::count(e, "skipped");
        test_suite.count_failures = parse_attr::count(e, "failures");
    }

    fn add_test_case(&mut self, test_case: TestCase) {
        log::debug!(
            "Parsed test {}.{}: {}",
            test_case.class_name,
            test_case.name,
            test_case.status().as_str()
        );
        self.test_suite.add_test_case(test_case);
    }
}

/// Parses the JUnit XML report at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<TestSuite> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| JunitParseError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut parser = JunitParser::new();
    parser.parse(BufReader::new(file))?;
    Ok(parser.into_test_suite())
}

fn open_test_case(e: &BytesStart) -> TestCase {
    let mut test_case = TestCase::new(
        parse_attr::string(e, "name"),
        parse_attr::string(e, "classname"),
    );
    test_case.duration_seconds = parse_attr::seconds(e, "time");
    test_case
}

/// Consumes the rest of a `<testcase>` element whose start tag was just read.
fn read_test_case<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<TestCase> {
    let mut test_case = open_test_case(start);
    let mut child: Option<Child> = None;
    let mut depth = 0_usize;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => {
                return Err(JunitParseError::UnexpectedEof {
                    element: "testcase",
                })
            }
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    child = Some(Child::open(&e));
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    Child::open(&e).close(&mut test_case);
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(test_case);
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(child) = child.take() {
                        child.close(&mut test_case);
                    }
                }
            }
            Event::Text(e) => {
                if let (1, Some(child)) = (depth, child.as_mut()) {
                    child.push_text(&e.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(e) => {
                if let (1, Some(child)) = (depth, child.as_mut()) {
                    child.push_text(&String::from_utf8_lossy(&e));
                }
            }
            _ => (),
        }
        buf.clear();
    }
}

mod parse_attr {
    use std::{borrow::Cow, str::FromStr};

    use quick_xml::events::BytesStart;

    pub fn string(e: &BytesStart, attr_name: &'static str) -> String {
        parse_string_attr(e, attr_name)
            .map(Cow::into_owned)
            .unwrap_or_default()
    }

    /// Unparseable or negative durations become zero.
    pub fn seconds(e: &BytesStart, attr_name: &'static str) -> f64 {
        parse_string_attr_into_other_type::<f64>(e, attr_name)
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .unwrap_or_default()
    }

    pub fn count(e: &BytesStart, attr_name: &'static str) -> u64 {
        parse_string_attr_into_other_type(e, attr_name).unwrap_or_default()
    }

    fn parse_string_attr<'a>(e: &'a BytesStart<'a>, attr_name: &'static str) -> Option<Cow<'a, str>> {
        e.try_get_attribute(attr_name)
            .ok()
            .flatten()
            .and_then(|attr| attr.unescape_value().ok())
    }

    fn parse_string_attr_into_other_type<T: FromStr>(
        e: &BytesStart,
        attr_name: &'static str,
    ) -> Option<T> {
        parse_string_attr(e, attr_name).and_then(|value| value.trim().parse::<T>().ok())
    }
}
