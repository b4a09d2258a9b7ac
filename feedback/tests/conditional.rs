use std::io::BufReader;

use feedback::{render_feedback, FeedbackError, FeedbackRenderer, RenderOptions};
use pretty_assertions::assert_eq;
use report::junit::{JunitParser, TestCase, TestProblem};
use test_utils::inputs::SAMPLE_REPORT;

fn html(test_case: Option<&TestCase>, source: &str) -> String {
    render_feedback(source, test_case).unwrap().trim().to_string()
}

fn assert_markdown_is(test_case: Option<&TestCase>, expected: &str, source: &str) {
    assert_eq!(html(test_case, source), expected);
}

fn passed() -> TestCase {
    TestCase::new("passingTest", "SampleTest")
}

fn errored() -> TestCase {
    TestCase {
        error: Some(TestProblem::default()),
        ..passed()
    }
}

#[test]
fn single_paragraph() {
    assert_markdown_is(None, "<p>example</p>", "example");
}

#[test]
fn hide_with_test() {
    assert_markdown_is(Some(&passed()), "", "```af_hide\nfoo\n```");
    assert_markdown_is(Some(&errored()), "", "```af_hide\nfoo\n```");
}

#[test]
fn passed_with_passed_test_no_nesting() {
    assert_markdown_is(
        Some(&passed()),
        "<p>This should show.</p>",
        "```af_when_passed\nThis should show.\n```",
    );
}

#[test]
fn passed_with_passed_test_code_block() {
    // The outer fence is four backticks long, so the three-backtick fence
    // inside it belongs to the nested block.
    let html = html(
        Some(&passed()),
        "````af_when_passed\nTest.\n```java\nx;\n```\n````",
    );

    assert!(html.contains("<p>Test.</p>"), "{html}");
    assert!(html.contains("<code class=\"hljs language-java\">"), "{html}");
    assert!(html.contains('x'), "{html}");
}

#[test]
fn passed_with_failed_test() {
    assert_markdown_is(
        Some(&errored()),
        "",
        "```af_when_passed\nThis should not show.\n```",
    );
}

#[test]
fn failed_with_passed_test() {
    assert_markdown_is(
        Some(&passed()),
        "",
        "```af_when_failed\nThis should not show.\n```",
    );
}

#[test]
fn failed_with_failed_test() {
    assert_markdown_is(
        Some(&errored()),
        "<p>This should show.</p>",
        "```af_when_failed\nThis should show.\n```",
    );
}

#[test]
fn failed_includes_skipped_and_missing_tests() {
    let skipped = TestCase {
        skipped: true,
        ..passed()
    };
    let missing = TestCase::missing("passingTest", "SampleTest");
    for test_case in [skipped, missing] {
        assert_markdown_is(
            Some(&test_case),
            "<p>Not passed.</p>",
            "```af_when_failed\nNot passed.\n```",
        );
    }
}

#[test]
fn nested_failed_block_around_code_with_errored_test() {
    let html = html(
        Some(&errored()),
        "````af_when_failed\nCheck your loop.\n\n```java\nfor (int i = 0; i < n; i++) {}\n```\n````",
    );

    assert!(html.contains("<p>Check your loop.</p>"), "{html}");
    assert!(html.contains("<code class=\"hljs language-java\">"), "{html}");
    assert!(html.contains("<span class=\"hljs-"), "{html}");
}

#[test]
fn substring_without_output() {
    assert_markdown_is(
        Some(&passed()),
        "",
        "```af_when_substring Foo\nThis should not show.\n```",
    );
}

#[test]
fn substring_with_match_stderr() {
    let test_case = TestCase {
        stderr: Some(String::from("Foo")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "<p>This should show.</p>",
        "```af_when_substring Foo\nThis should show.\n```",
    );
}

#[test]
fn substring_with_match_stdout() {
    let test_case = TestCase {
        stdout: Some(String::from("Bar")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "<p>This should show too.</p>",
        "```af_when_substring Bar\nThis should show too.\n```",
    );
}

#[test]
fn substring_with_match_test_error() {
    let test_case = TestCase {
        error: Some(TestProblem::new("", "", "Xyz")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "<p>This should show too.</p>",
        "```af_when_substring Xyz\nThis should show too.\n```",
    );
}

#[test]
fn regex_without_match() {
    assert_markdown_is(
        Some(&passed()),
        "",
        "```af_when_regex P.*o\nThis should not show.\n```",
    );
}

#[test]
fn regex_with_match_stderr() {
    let test_case = TestCase {
        stderr: Some(String::from("Potato!")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "<p>Expected potato!</p>",
        "```af_when_regex /P.*o/\nExpected potato!\n```",
    );
}

#[test]
fn regex_with_match_stdout() {
    let test_case = TestCase {
        stdout: Some(String::from("Potato?\nPotatoes")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "<p>Expected potatoes!</p>",
        "```af_when_regex /P.*s$/\nExpected potatoes!\n```",
    );
}

#[test]
fn regex_with_match_test_failure() {
    let test_case = TestCase {
        failure: Some(TestProblem::new("", "", "MorePotatoes")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "<p>Expected potatoes!</p>",
        "```af_when_regex /M.*P.*s$/\nExpected potatoes!\n```",
    );
}

#[test]
fn regex_case_insensitive() {
    let test_case = TestCase {
        stdout: Some(String::from("LaTeX")),
        ..passed()
    };
    assert_markdown_is(
        Some(&test_case),
        "",
        "```af_when_regex /latex/\nThis should not show.\n```",
    );
    assert_markdown_is(
        Some(&test_case),
        "<p>This should show.</p>",
        "```af_when_regex /latex/i\nThis should show.\n```",
    );
}

#[test]
fn invalid_regex_fails_the_render() {
    let result = render_feedback("```af_when_regex /(unclosed/\nText\n```", Some(&passed()));
    assert!(matches!(result, Err(FeedbackError::Pattern { .. })));
}

#[test]
fn invalid_regex_fails_the_preview() {
    let result = FeedbackRenderer::default().preview("```af_when_regex /(unclosed/\nText\n```");
    assert!(matches!(result, Err(FeedbackError::Pattern { .. })));
}

#[test]
fn unlabeled_code_is_highlighted_as_java() {
    let html = html(Some(&passed()), "```\nint x = 1;\n```\n\n    int y = 2;\n");
    assert_eq!(html.matches("<pre><code class=\"hljs\">").count(), 2, "{html}");
    assert_eq!(html.matches("hljs-java").count(), 2, "{html}");
}

#[test]
fn blocks_are_decided_independently() {
    let source = "Intro\n\n```af_when_passed\nWell done.\n```\n\n```af_when_failed\nTry again.\n```\n\n```af_hide\nNote to self.\n```\n\nOutro";
    assert_markdown_is(
        Some(&passed()),
        "<p>Intro</p>\n<p>Well done.</p>\n<p>Outro</p>",
        source,
    );
    assert_markdown_is(
        Some(&errored()),
        "<p>Intro</p>\n<p>Try again.</p>\n<p>Outro</p>",
        source,
    );
}

#[test]
fn preview_renders_explanation_cards() {
    let renderer = FeedbackRenderer::default();

    assert_eq!(
        renderer
            .preview("```af_when_failed\nTry *again*.\n```")
            .unwrap()
            .trim(),
        "<div class=\"card\"><div class=\"card-body\"><h5 class=\"card-title\">When test fails</h5><p>Try <em>again</em>.</p>\n</div></div>"
    );
    assert!(renderer
        .preview("```af_hide\nSecret\n```")
        .unwrap()
        .contains("To be hidden</h5><p>Secret</p>"));
    assert!(renderer
        .preview("```af_when_substring <X>\nText\n```")
        .unwrap()
        .contains("When output contains &quot;&lt;X&gt;&quot;</h5>"));
    assert!(renderer
        .preview("```af_when_regex P.*o\nText\n```")
        .unwrap()
        .contains("When output matches /P.*o/</h5>"));
}

#[test]
fn preview_cards_nest() {
    let html = FeedbackRenderer::default()
        .preview("````af_when_failed\n```af_when_substring NPE\nCheck for null.\n```\n````")
        .unwrap();
    assert!(html.contains("When test fails</h5><div class=\"card\">"), "{html}");
    assert!(html.contains("When output contains &quot;NPE&quot;</h5><p>Check for null.</p>"));
}

#[test]
fn unrecognized_info_string_renders_code() {
    let renderer = FeedbackRenderer::new(RenderOptions {
        highlight_code: false,
        ..Default::default()
    });
    assert_eq!(
        renderer
            .render("```af_unknown\nkeep me\n```", Some(&passed()))
            .unwrap()
            .trim(),
        "<pre><code class=\"language-af_unknown\">keep me\n</code></pre>"
    );
}

#[test]
fn renders_against_parsed_report() {
    let mut parser = JunitParser::new();
    parser
        .parse(BufReader::new(SAMPLE_REPORT.as_bytes()))
        .unwrap();
    let test_suite = parser.into_test_suite();
    let template = "```af_when_passed\nPassed.\n```\n\n```af_when_substring for stdout\nPrinted to stdout.\n```\n\n```af_when_regex /should FAIL/i\nAssertion failed.\n```";

    let rendered: Vec<String> = test_suite
        .test_cases
        .iter()
        .map(|test_case| html(Some(test_case), template))
        .collect();

    assert_eq!(
        rendered,
        vec![
            "<p>Assertion failed.</p>",
            "",
            "",
            "<p>Passed.</p>",
            "<p>Passed.</p>\n<p>Printed to stdout.</p>",
            "<p>Passed.</p>",
        ]
    );
}
