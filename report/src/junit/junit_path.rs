use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Context;

use super::{model::TestSuite, parser::parse_file};

/// Expands glob patterns into the set of matching report files, sorted by path.
pub fn expand_junit_paths<T: AsRef<str>>(patterns: &[T]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = BTreeSet::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries =
            glob::glob(pattern).with_context(|| format!("invalid junit path `{pattern}`"))?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    paths.insert(path);
                }
                Ok(_) => (),
                Err(e) => log::warn!("Could not read {}: {}", e.path().display(), e.error()),
            }
        }
    }
    Ok(paths.into_iter().collect())
}

/// Parses every report matched by `patterns`, in path order.
///
/// Reports that cannot be parsed are logged and left out, so one corrupt file
/// does not hide the results of the others.
pub fn load_reports<T: AsRef<str>>(patterns: &[T]) -> anyhow::Result<Vec<(PathBuf, TestSuite)>> {
    let reports = expand_junit_paths(patterns)?
        .into_iter()
        .filter_map(|path| match parse_file(&path) {
            Ok(test_suite) => {
                log::debug!(
                    "Parsed {} with {} test cases",
                    path.display(),
                    test_suite.test_cases.len()
                );
                Some((path, test_suite))
            }
            Err(e) => {
                log::error!("Failed to parse {}: {:?}", path.display(), anyhow::Error::from(e));
                None
            }
        })
        .collect();
    Ok(reports)
}
