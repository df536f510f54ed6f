//! Fixture discovery
//!
//! Pairs every program file in the fixture directory with the expected-output
//! file sharing its base name.

use std::path::{Path, PathBuf};

use crate::common::config::FixtureLayout;
use crate::common::{Error, Result};

/// A program paired with the output it must produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Program path as discovered; used as the label and for filtering
    pub name: String,
    /// Program path handed to the toolchain
    pub input: PathBuf,
    /// Exact text expected on the toolchain's stdout
    pub expected_output: String,
}

/// Discover all test cases in `dir`, sorted by name
///
/// Only the top level of `dir` is scanned. A program without its output
/// fixture fails the whole discovery.
pub fn discover(dir: &Path, layout: &FixtureLayout) -> Result<Vec<TestCase>> {
    if !dir.is_dir() {
        return Err(Error::FixtureDirNotFound(dir.display().to_string()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| Error::file_read(dir, e))?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::file_read(dir, e))?;
        let path = entry.path();

        if !path.is_file() || !has_extension(&path, &layout.program_ext) {
            continue;
        }

        let expected_path = path.with_extension(&layout.output_ext);
        if !expected_path.is_file() {
            return Err(Error::missing_fixture(&path, &expected_path));
        }

        let expected_output = std::fs::read_to_string(&expected_path)
            .map_err(|e| Error::file_read(&expected_path, e))?;

        cases.push(TestCase {
            name: path.display().to_string(),
            input: path,
            expected_output,
        });
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!("Discovered {} test cases in {}", cases.len(), dir.display());

    Ok(cases)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}
