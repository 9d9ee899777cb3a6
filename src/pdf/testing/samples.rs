//! Verified sample corpus
//!
//! Sample files live in `samples/` at the crate root, one surface expression per line.
//! Files are numbered by topic; the `9xx` files hold records that must be rejected.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::pdf::ast::AbstractSyntaxTree;
use crate::pdf::grammar::Grammar;
use crate::pdf::transition::{PdfTransitionSystem, TransitionError, TransitionSystem};

#[derive(Debug, Clone)]
pub enum SampleError {
    FileNotFound(String),
    IoError(String),
    RecordOutOfRange { name: String, index: usize },
    Transition(TransitionError),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::FileNotFound(name) => write!(f, "Sample not found: {name}"),
            SampleError::IoError(msg) => write!(f, "IO error: {msg}"),
            SampleError::RecordOutOfRange { name, index } => {
                write!(f, "Sample {name} has no record {index}")
            }
            SampleError::Transition(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SampleError {}

impl From<std::io::Error> for SampleError {
    fn from(err: std::io::Error) -> Self {
        SampleError::IoError(err.to_string())
    }
}

impl From<TransitionError> for SampleError {
    fn from(err: TransitionError) -> Self {
        SampleError::Transition(err)
    }
}

/// Access to the files under `samples/`
pub struct Samples;

impl Samples {
    pub fn dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    /// Names of all sample files (sorted)
    pub fn list() -> Result<Vec<String>, SampleError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(Self::dir())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "sexp") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn get_string(name: &str) -> Result<String, SampleError> {
        let path = Self::dir().join(name);
        if !path.exists() {
            return Err(SampleError::FileNotFound(name.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Non-blank lines of a sample file
    pub fn records(name: &str) -> Result<Vec<String>, SampleError> {
        Ok(Self::get_string(name)?
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Convert one record of a sample file with the bundled grammar
    pub fn get_ast(name: &str, index: usize) -> Result<AbstractSyntaxTree, SampleError> {
        let records = Self::records(name)?;
        let record = records.get(index).ok_or_else(|| SampleError::RecordOutOfRange {
            name: name.to_string(),
            index,
        })?;
        let system = PdfTransitionSystem::new(Grammar::pdf());
        Ok(system.surface_code_to_ast(record)?)
    }

    pub fn must_get_string(name: &str) -> String {
        Self::get_string(name).unwrap_or_else(|e| panic!("Failed to load sample {name}: {e}"))
    }

    pub fn must_get_records(name: &str) -> Vec<String> {
        Self::records(name).unwrap_or_else(|e| panic!("Failed to load sample {name}: {e}"))
    }

    pub fn must_get_ast(name: &str, index: usize) -> AbstractSyntaxTree {
        Self::get_ast(name, index)
            .unwrap_or_else(|e| panic!("Failed to convert {name} record {index}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_samples() {
        let names = Samples::list().unwrap();
        assert!(names.contains(&"000-objectives.sexp".to_string()));
        assert!(names.contains(&"900-malformed.sexp".to_string()));
    }

    #[test]
    fn test_missing_sample() {
        assert!(matches!(
            Samples::get_string("nope.sexp"),
            Err(SampleError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_record_out_of_range() {
        assert!(matches!(
            Samples::get_ast("000-objectives.sexp", 10_000),
            Err(SampleError::RecordOutOfRange { .. })
        ));
    }
}
