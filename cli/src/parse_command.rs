use std::path::PathBuf;

use clap::Args;
use report::junit::{summary::TestTally, TestSuite};
use serde::Serialize;

use crate::{
    print::{print_summary, print_test_suite},
    reports::load_test_suites,
    EXIT_FAILURE, EXIT_SUCCESS,
};

#[derive(Args, Clone, Debug)]
pub struct ParseArgs {
    #[arg(
        long,
        required = true,
        env = "AUTOFEEDBACK_REPORTS",
        value_delimiter = ',',
        value_parser = clap::builder::NonEmptyStringValueParser::new(),
        help = "Comma-separated list of glob paths to junit files."
    )]
    pub junit_paths: Vec<String>,
    #[arg(long, help = "Print the parsed reports as JSON.")]
    pub json: bool,
    #[arg(
        long,
        help = "File listing the expected tests, one `ClassName#testName` per line."
    )]
    pub expected: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    test_suites: &'a [TestSuite],
    summary: TestTally,
}

pub fn run_parse(parse_args: ParseArgs) -> anyhow::Result<i32> {
    let ParseArgs {
        junit_paths,
        json,
        expected,
    } = parse_args;

    let test_suites = load_test_suites(&junit_paths, expected.as_deref())?;
    let summary = TestTally::from_suites(&test_suites);

    if json {
        let output = ParseOutput {
            test_suites: &test_suites,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for test_suite in &test_suites {
            print_test_suite(test_suite);
        }
        print_summary(&summary);
    }

    Ok(if summary.all_passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}
