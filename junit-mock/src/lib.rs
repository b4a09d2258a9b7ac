use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fake::Fake;
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use rand::prelude::*;
use rand::rngs::StdRng;

macro_rules! percentages_parser {
    ($func_name:ident, $num_percentages:literal) => {
        fn $func_name(argument: &str) -> std::result::Result<Vec<u8>, clap::Error> {
            argument
                .split(',')
                .enumerate()
                .try_fold((0_u8, Vec::new()), |mut acc, (i, percentage_str)| {
                    if i >= $num_percentages {
                        return Err(clap::Error::raw(
                            clap::error::ErrorKind::InvalidValue,
                            concat!("More than ", $num_percentages, " percentages provided"),
                        ));
                    }
                    let percentage = percentage_str
                        .parse::<u8>()
                        .map_err(|e| clap::Error::raw(clap::error::ErrorKind::InvalidValue, e))?;

                    if percentage > 100 {
                        return Err(clap::Error::raw(
                            clap::error::ErrorKind::InvalidValue,
                            format!("Percentage at index {} is greater than 100", i),
                        ));
                    }

                    acc.0 = acc.0.saturating_add(percentage);

                    if acc.0 > 100 {
                        return Err(clap::Error::raw(
                            clap::error::ErrorKind::InvalidValue,
                            "Sum of percentages are greater than 100",
                        ));
                    }

                    acc.1.push(percentage);

                    Ok(acc)
                })
                .map(|v| v.1)
        }
    };
}

#[derive(Debug, Parser, Clone)]
pub struct Options {
    #[command(flatten, next_help_heading = "Global Options")]
    pub global: GlobalOptions,

    #[command(flatten, next_help_heading = "Test Suite Options")]
    pub test_suite: TestSuiteOptions,

    #[command(flatten, next_help_heading = "Test Case Options")]
    pub test_case: TestCaseOptions,
}

impl Default for Options {
    fn default() -> Self {
        Options::try_parse_from([""]).unwrap()
    }
}

#[test]
fn options_can_be_defaulted_without_panicing() {
    Options::default();
}

#[derive(Debug, Parser, Clone)]
#[group()]
pub struct GlobalOptions {
    /// Seed for all generated data, defaults to randomly generated seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Parser, Clone)]
#[group()]
pub struct TestSuiteOptions {
    /// Fully qualified class name used as the suite name, defaults to a random one
    #[arg(long)]
    pub test_suite_name: Option<String>,

    /// Value written to the `tests` attribute instead of the real count
    #[arg(long)]
    pub test_suite_declared_tests: Option<usize>,
}

percentages_parser!(four_percentages_parser, 4);

#[derive(Debug, Parser, Clone)]
#[group()]
pub struct TestCaseOptions {
    /// A list of test method names to generate (conflicts with --test-case-random-count)
    #[arg(
        long,
        value_delimiter = ',',
        conflicts_with = "test_case_random_count"
    )]
    pub test_case_names: Option<Vec<String>>,

    /// The number of test cases with random names to generate (conflicts with --test-case-names)
    #[arg(long, conflicts_with = "test_case_names", default_value = "10")]
    pub test_case_random_count: usize,

    /// The chance of a system out message being added to the test case
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100), default_value = "50")]
    pub test_case_sys_out_percentage: u8,

    /// The chance of a system error message being added to the test case
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100), default_value = "50")]
    pub test_case_sys_err_percentage: u8,

    /// Inclusive range of test case durations
    #[arg(long, num_args = 1..=2, value_names = ["DURATION_RANGE_START", "DURATION_RANGE_END"], default_values = ["1ms", "500ms"])]
    pub test_case_duration_range: Vec<humantime::Duration>,

    /// The chance of a test case succeeding, skipping, failing, and erroring (must add up to 100)
    #[arg(long, value_parser = four_percentages_parser, default_value = "25,25,25,25")]
    pub test_case_success_to_skip_to_fail_to_error_percentage: Vec<Vec<u8>>,
}

/// Generates surefire-style JUnit reports: a single `<testsuite>` per file,
/// without the `<testsuites>` wrapper.
#[derive(Debug, Clone)]
pub struct JunitMock {
    seed: u64,
    options: Options,

    rng: StdRng,
}

impl JunitMock {
    pub fn new(options: Options) -> Self {
        let (seed, rng) = JunitMock::rng_from_seed(&options);
        Self { seed, options, rng }
    }

    fn rng_from_seed(options: &Options) -> (u64, StdRng) {
        let seed = options.global.seed.unwrap_or_else(rand::random);
        (seed, StdRng::seed_from_u64(seed))
    }

    pub fn set_options(&mut self, options: Options) {
        let (seed, rng) = JunitMock::rng_from_seed(&options);
        self.seed = seed;
        self.rng = rng;
        self.options = options;
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn generate_report(&mut self) -> Report {
        let test_suite_name = self
            .options
            .test_suite
            .test_suite_name
            .clone()
            .unwrap_or_else(|| self.fake_class_name());

        let mut test_suite = TestSuite::new(test_suite_name.as_str());
        let test_cases = self.generate_test_cases(&test_suite_name);
        let total_duration = test_cases
            .iter()
            .filter_map(|test_case| test_case.time)
            .sum::<Duration>();
        test_suite.add_test_cases(test_cases);
        test_suite.set_time(total_duration);
        if let Some(declared_tests) = self.options.test_suite.test_suite_declared_tests {
            test_suite.tests = declared_tests;
        }

        let mut report = Report::new(test_suite_name.as_str());
        report.add_test_suite(test_suite);
        report.set_time(total_duration);
        report
    }

    pub fn write_reports_to_file<T: AsRef<Path>, U: AsRef<[Report]>>(
        &self,
        directory: T,
        reports: U,
    ) -> Result<Vec<PathBuf>> {
        reports.as_ref().iter().enumerate().try_fold(
            Vec::new(),
            |mut acc, (i, report)| -> Result<Vec<PathBuf>> {
                let path = directory.as_ref().join(format!("TEST-junit-{}.xml", i));
                let mut file = File::create(&path)?;
                Self::serialize_without_testsuites(&mut file, report)?;
                acc.push(path);
                Ok(acc)
            },
        )
    }

    /// Surefire writes one `<testsuite>` per file with no `<testsuites>` root.
    pub fn serialize_without_testsuites<W: Write>(writer: W, report: &Report) -> Result<()> {
        let serialized_report = report.to_string()?;
        let mut reader = Reader::from_str(&serialized_report);
        let mut writer = Writer::new(writer);
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if e.name().as_ref() == b"testsuites" {
                        continue;
                    }
                    writer.write_event(Event::Start(e))?;
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"testsuites" {
                        continue;
                    }
                    writer.write_event(Event::End(e))?;
                }
                Event::Eof => break,
                e => writer.write_event(e)?,
            }
        }
        Ok(())
    }

    fn generate_test_cases(&mut self, class_name: &str) -> Vec<TestCase> {
        self.options
            .test_case
            .test_case_names
            .as_ref()
            .cloned()
            .unwrap_or_else(|| {
                (0..self.options.test_case.test_case_random_count)
                    .map(|i| {
                        let word: String =
                            fake::faker::lorem::en::Word().fake_with_rng(&mut self.rng);
                        format!("test{}{}", word, i)
                    })
                    .collect()
            })
            .iter()
            .map(|test_case_name| -> TestCase {
                let test_case_status = self.generate_test_case_status();
                let is_skipped = matches!(&test_case_status, TestCaseStatus::Skipped { .. });

                let mut test_case = TestCase::new(test_case_name.as_str(), test_case_status);
                test_case.set_classname(class_name);
                let duration = if is_skipped {
                    Default::default()
                } else {
                    self.fake_duration(self.options.test_case.test_case_duration_range.clone())
                };
                test_case.set_time(duration);

                if self.rand_bool(self.options.test_case.test_case_sys_out_percentage) {
                    test_case.set_system_out(self.fake_paragraphs());
                }
                if self.rand_bool(self.options.test_case.test_case_sys_err_percentage) {
                    test_case.set_system_err(self.fake_paragraphs());
                }
                test_case
            })
            .collect()
    }

    fn generate_test_case_status(&mut self) -> TestCaseStatus {
        let rand_percentage = self.rand_percentage();
        let mut total = 0_u8;
        let mut outcome = 0;
        for (i, percentage) in self
            .options
            .test_case
            .test_case_success_to_skip_to_fail_to_error_percentage
            .iter()
            .flatten()
            .enumerate()
        {
            outcome = i;
            total = total.saturating_add(*percentage);
            if rand_percentage < total {
                break;
            }
        }

        match outcome {
            0 => TestCaseStatus::success(),
            1 => TestCaseStatus::skipped(),
            2 => self.fake_non_success(NonSuccessKind::Failure, "java.lang.AssertionError"),
            _ => self.fake_non_success(NonSuccessKind::Error, "java.lang.RuntimeException"),
        }
    }

    fn fake_non_success(&mut self, kind: NonSuccessKind, ty: &str) -> TestCaseStatus {
        let mut status = TestCaseStatus::non_success(kind);
        status.set_message(self.fake_sentence());
        status.set_type(ty);
        status.set_description(format!("{}: {}\n\tat Generated.java", ty, self.fake_sentence()));
        status
    }

    fn fake_class_name(&mut self) -> String {
        let words: Vec<String> = fake::faker::lorem::en::Words(2..4).fake_with_rng(&mut self.rng);
        let class: String = fake::faker::lorem::en::Word().fake_with_rng(&mut self.rng);
        let mut class_chars = class.chars();
        let class = match class_chars.next() {
            Some(first) => first.to_uppercase().chain(class_chars).collect::<String>(),
            None => String::from("Generated"),
        };
        format!("{}.{}Test", words.join("."), class)
    }

    fn fake_sentence(&mut self) -> String {
        let paragraphs: Vec<String> =
            fake::faker::lorem::en::Sentences(1..2).fake_with_rng(&mut self.rng);
        paragraphs.join(" ")
    }

    fn fake_paragraphs(&mut self) -> String {
        let paragraphs: Vec<String> =
            fake::faker::lorem::en::Paragraphs(1..3).fake_with_rng(&mut self.rng);
        paragraphs.join("\n")
    }

    fn fake_duration<T: AsRef<[humantime::Duration]>>(&mut self, range: T) -> Duration {
        let range_start = range
            .as_ref()
            .first()
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let range_end = range
            .as_ref()
            .get(1)
            .map(|d| d.as_nanos())
            .unwrap_or(range_start)
            .max(range_start);
        let rand_duration_ns = self.rng.gen_range(range_start..=range_end);
        Duration::from_nanos(rand_duration_ns as u64)
    }

    fn rand_bool<T: Into<f64>>(&mut self, percentage_chance: T) -> bool {
        self.rng.gen_bool(percentage_chance.into() / 100.0)
    }

    fn rand_percentage(&mut self) -> u8 {
        self.rng.gen_range(0..100)
    }
}
