use colored::{ColoredString, Colorize};
use report::junit::{summary::TestTally, TestCase, TestStatus, TestSuite};

pub fn print_test_suite(test_suite: &TestSuite) {
    println!(
        "{} ({} tests, {:.3}s)",
        test_suite.name.bold(),
        test_suite.test_cases.len(),
        test_suite.duration_seconds
    );
    for test_case in &test_suite.test_cases {
        print_test_case(test_case);
    }
}

fn print_test_case(test_case: &TestCase) {
    println!(
        "  {} {}#{}",
        status_label(test_case.status()),
        test_case.class_name,
        test_case.name
    );
    if let Some(problem) = test_case.error.as_ref().or(test_case.failure.as_ref()) {
        if !problem.message().is_empty() {
            println!("      {}", problem.message().dimmed());
        }
    }
}

fn status_label(status: TestStatus) -> ColoredString {
    let label = format!("{:<16}", status.label());
    match status {
        TestStatus::Passed => label.green(),
        TestStatus::Failed | TestStatus::Errored => label.red(),
        TestStatus::Skipped => label.yellow(),
        TestStatus::Missing => label.magenta(),
    }
}

pub fn print_summary(tally: &TestTally) {
    let headline = format!("{} of {} tests passed", tally.passed, tally.total);
    println!(
        "\n{} ({} failed, {} errors, {} skipped, {} missing)",
        if tally.all_passed() {
            headline.green()
        } else {
            headline.red()
        },
        tally.failed,
        tally.errors,
        tally.skipped,
        tally.missing
    );
}
