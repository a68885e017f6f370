//! Structured validation failures.
//!
//! A [`ValidationError`] always carries at least one [`Issue`]; each issue
//! records where the offending element sits (argument position or return
//! value, then nested array/tuple indices) and what was expected.

use crate::value::Value;
use serde::Serialize;
use std::fmt;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Which side of the call failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Arguments,
    Return,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Arguments => f.write_str("arguments"),
            Phase::Return => f.write_str("return value"),
        }
    }
}

/// Location of an element inside the argument list or the return value.
///
/// For arguments, the first index is the parameter position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IssuePath {
    phase: Phase,
    indices: Vec<usize>,
}

impl IssuePath {
    pub fn arguments() -> Self {
        Self {
            phase: Phase::Arguments,
            indices: Vec::new(),
        }
    }

    pub fn returned() -> Self {
        Self {
            phase: Phase::Return,
            indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn push(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self {
            phase: self.phase,
            indices,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Parameter position for argument issues.
    pub fn position(&self) -> Option<usize> {
        match self.phase {
            Phase::Arguments => self.indices.first().copied(),
            Phase::Return => None,
        }
    }
}

impl fmt::Display for IssuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut indices = self.indices.iter();
        match self.phase {
            Phase::Arguments => match indices.next() {
                Some(position) => write!(f, "argument {position}")?,
                None => f.write_str("arguments")?,
            },
            Phase::Return => f.write_str("return value")?,
        }
        for index in indices {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: IssuePath,
    pub expected: String,
    pub received: String,
}

impl Issue {
    pub fn new(path: &IssuePath, expected: impl Into<String>, received: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    pub fn mismatch(path: &IssuePath, expected: impl Into<String>, value: &Value) -> Self {
        Self::new(path, expected, value.describe())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, received {}",
            self.path, self.expected, self.received
        )
    }
}

/// A value rejected by a compiled schema.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid {phase}: {}", summary(.issues))]
pub struct ValidationError {
    phase: Phase,
    issues: Vec<Issue>,
}

fn summary(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(phase: Phase, issues: NonEmptyVec<Issue>) -> Self {
        Self {
            phase,
            issues: issues.into_iter().collect(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Parameter positions that failed, in report order.
    pub fn positions(&self) -> Vec<usize> {
        self.issues.iter().filter_map(|i| i.path.position()).collect()
    }
}
