use std::fs;
use std::path::{Path, PathBuf};

/// Surefire report with one failing, one erroring, one skipped, one stderr,
/// one stdout and one plain passing test, in that order.
pub const SAMPLE_REPORT: &str =
    include_str!("../fixtures/TEST-uk.ac.aston.autofeedback.junitxml.SampleTest.xml");

pub const SAMPLE_REPORT_FILE_NAME: &str = "TEST-uk.ac.aston.autofeedback.junitxml.SampleTest.xml";

pub fn get_test_file_path(file: &str) -> String {
    PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap())
        .join(file)
        .to_str()
        .unwrap()
        .to_string()
}

pub fn write_report_to_dir<T: AsRef<Path>>(directory: T, file_name: &str, xml: &str) -> PathBuf {
    let path = directory.as_ref().join(file_name);
    if let Err(e) = fs::write(&path, xml) {
        panic!("failed to write {}: {}", path.display(), e);
    }
    path
}

pub fn write_sample_report_to_dir<T: AsRef<Path>>(directory: T) -> PathBuf {
    write_report_to_dir(directory, SAMPLE_REPORT_FILE_NAME, SAMPLE_REPORT)
}
