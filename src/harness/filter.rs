//! Case selection by name pattern

use regex::Regex;

use super::fixture::TestCase;
use crate::common::{Error, Result};

/// Selects cases whose name matches a pattern at its start
#[derive(Debug, Clone)]
pub enum CaseFilter {
    All,
    Prefix(Regex),
}

impl CaseFilter {
    /// Build a filter; a missing or empty pattern selects everything
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        match pattern {
            None | Some("") => Ok(CaseFilter::All),
            Some(raw) => {
                let syntax_error = |err: regex::Error| Error::FilterSyntax {
                    pattern: raw.to_string(),
                    reason: err.to_string(),
                };
                // Validate on its own first: wrapping can balance stray parentheses
                Regex::new(raw).map_err(syntax_error)?;
                let regex = Regex::new(&format!("^(?:{raw})")).map_err(syntax_error)?;
                Ok(CaseFilter::Prefix(regex))
            }
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            CaseFilter::All => true,
            CaseFilter::Prefix(re) => re.is_match(name),
        }
    }

    /// Keep the matching cases, preserving order
    pub fn apply(&self, cases: Vec<TestCase>) -> Vec<TestCase> {
        match self {
            CaseFilter::All => cases,
            CaseFilter::Prefix(_) => cases.into_iter().filter(|c| self.matches(&c.name)).collect(),
        }
    }
}
