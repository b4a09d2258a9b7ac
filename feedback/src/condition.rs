use report::junit::TestCase;

use crate::{error::Result, pattern::DelimitedPattern};

const INFO_HIDE: &str = "af_hide";
const INFO_WHEN_PASSED: &str = "af_when_passed";
const INFO_WHEN_FAILED: &str = "af_when_failed";
const INFO_WHEN_SUBSTRING: &str = "af_when_substring";
const INFO_WHEN_REGEX: &str = "af_when_regex";

/// Visibility rule selected by the info string of a fenced code block.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Hide,
    WhenPassed,
    WhenFailed,
    WhenSubstring(String),
    WhenRegex(DelimitedPattern),
}

type ConditionParser = fn(&str) -> Result<Condition>;

/// Checked in order against the trimmed info string; the first keyword that
/// prefixes it wins, and the rest of the line is the argument.
const CONDITION_PARSERS: &[(&str, ConditionParser)] = &[
    (INFO_HIDE, parse_hide),
    (INFO_WHEN_PASSED, parse_when_passed),
    (INFO_WHEN_FAILED, parse_when_failed),
    (INFO_WHEN_SUBSTRING, parse_when_substring),
    (INFO_WHEN_REGEX, parse_when_regex),
];

fn parse_hide(_: &str) -> Result<Condition> {
    Ok(Condition::Hide)
}

fn parse_when_passed(_: &str) -> Result<Condition> {
    Ok(Condition::WhenPassed)
}

fn parse_when_failed(_: &str) -> Result<Condition> {
    Ok(Condition::WhenFailed)
}

fn parse_when_substring(argument: &str) -> Result<Condition> {
    Ok(Condition::WhenSubstring(argument.to_string()))
}

fn parse_when_regex(argument: &str) -> Result<Condition> {
    DelimitedPattern::parse(argument).map(Condition::WhenRegex)
}

impl Condition {
    /// Returns `None` when the info string does not name a condition, in which
    /// case the block is an ordinary code block.
    pub fn parse(info: &str) -> Result<Option<Self>> {
        let info = info.trim();
        CONDITION_PARSERS
            .iter()
            .find_map(|(keyword, parser)| {
                info.strip_prefix(keyword)
                    .map(|argument| parser(argument.trim()))
            })
            .transpose()
    }

    /// Title of the explanation card shown when no test outcome is available.
    pub fn title(&self) -> String {
        match self {
            Condition::Hide => String::from("To be hidden"),
            Condition::WhenPassed => String::from("When test passes"),
            Condition::WhenFailed => String::from("When test fails"),
            Condition::WhenSubstring(needle) => format!("When output contains \"{needle}\""),
            Condition::WhenRegex(pattern) => format!("When output matches {pattern}"),
        }
    }

    pub fn is_satisfied_by(&self, test_case: &TestCase) -> Result<bool> {
        match self {
            Condition::Hide => Ok(false),
            Condition::WhenPassed => Ok(test_case.is_passed()),
            Condition::WhenFailed => Ok(!test_case.is_passed()),
            Condition::WhenSubstring(needle) => Ok(test_outputs(test_case)
                .iter()
                .any(|output| output.contains(needle.as_str()))),
            Condition::WhenRegex(pattern) => {
                for output in test_outputs(test_case) {
                    if pattern.is_match(output)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Texts searched by the substring and regex conditions, in search order.
/// Absent fields are searched as empty strings.
fn test_outputs(test_case: &TestCase) -> [&str; 6] {
    let failure = test_case.failure.as_ref();
    let error = test_case.error.as_ref();
    [
        test_case.stderr.as_deref().unwrap_or_default(),
        test_case.stdout.as_deref().unwrap_or_default(),
        failure.map(|p| p.text()).unwrap_or_default(),
        failure.map(|p| p.message()).unwrap_or_default(),
        error.map(|p| p.text()).unwrap_or_default(),
        error.map(|p| p.message()).unwrap_or_default(),
    ]
}
