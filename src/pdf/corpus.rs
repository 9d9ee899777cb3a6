//! Corpus processing
//!
//! A corpus is a text with one surface expression per line. Every non-blank line is a
//! record and is processed on its own: a failing record is logged and recorded, and
//! processing moves on to the next line.
//!
//! With round-trip verification on, each converted record is also checked against the
//! grammar, rendered back to surface text, compared with its input, then reparsed and
//! compared with the first tree.

use tracing::{debug, info, warn};

use crate::pdf::ast::AbstractSyntaxTree;
use crate::pdf::config::CorpusConfig;
use crate::pdf::transition::{TransitionError, TransitionSystem};

/// Options for [process_corpus]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusOptions {
    pub verify_round_trip: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            verify_round_trip: true,
        }
    }
}

impl From<&CorpusConfig> for CorpusOptions {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            verify_round_trip: config.verify_round_trip,
        }
    }
}

/// What happened to one record
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    /// Converted, and verified when verification is on
    Converted(AbstractSyntaxTree),
    /// Parsing, conversion or the grammar check failed
    Failed(TransitionError),
    /// Converted, but the round trip did not reproduce the record
    Mismatched {
        ast: AbstractSyntaxTree,
        /// Surface text produced from the tree
        rendered: String,
    },
}

/// One line of the corpus
#[derive(Debug, Clone)]
pub struct Record {
    /// 1-based line number in the corpus text
    pub line: usize,
    pub text: String,
    pub outcome: RecordOutcome,
}

impl Record {
    pub fn ast(&self) -> Option<&AbstractSyntaxTree> {
        match &self.outcome {
            RecordOutcome::Converted(ast) | RecordOutcome::Mismatched { ast, .. } => Some(ast),
            RecordOutcome::Failed(_) => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, RecordOutcome::Converted(_))
    }
}

/// Result of processing a whole corpus
#[derive(Debug, Clone, Default)]
pub struct CorpusReport {
    pub records: Vec<Record>,
}

impl CorpusReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn ok_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Failed(_)))
            .count()
    }

    pub fn mismatched_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Mismatched { .. }))
            .count()
    }

    /// True when every record converted (and verified)
    pub fn is_success(&self) -> bool {
        self.records.iter().all(Record::is_ok)
    }
}

/// Process every non-blank line of `text` as a record
pub fn process_corpus(
    system: &dyn TransitionSystem,
    text: &str,
    options: CorpusOptions,
) -> CorpusReport {
    let mut report = CorpusReport::default();

    for (index, line) in text.lines().enumerate() {
        let record = line.trim_end();
        if record.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;

        let outcome = match process_record(system, record, options) {
            Ok(outcome) => outcome,
            Err(err) => RecordOutcome::Failed(err),
        };

        match &outcome {
            RecordOutcome::Converted(ast) => {
                debug!(line = line_number, nodes = ast.size(), "record converted");
            }
            RecordOutcome::Failed(err) => {
                warn!(line = line_number, error = %err, "record failed");
            }
            RecordOutcome::Mismatched { rendered, .. } => {
                warn!(
                    line = line_number,
                    expected = record,
                    found = rendered.as_str(),
                    "record did not round-trip"
                );
            }
        }

        report.records.push(Record {
            line: line_number,
            text: record.to_string(),
            outcome,
        });
    }

    info!(
        system = system.name(),
        total = report.total(),
        ok = report.ok_count(),
        failed = report.failed_count(),
        mismatched = report.mismatched_count(),
        "corpus processed"
    );
    report
}

fn process_record(
    system: &dyn TransitionSystem,
    record: &str,
    options: CorpusOptions,
) -> Result<RecordOutcome, TransitionError> {
    let ast = system.surface_code_to_ast(record)?;
    if !options.verify_round_trip {
        return Ok(RecordOutcome::Converted(ast));
    }

    ast.sanity_check(system.grammar())?;
    let rendered = system.ast_to_surface_code(&ast)?;
    if rendered != record {
        return Ok(RecordOutcome::Mismatched { ast, rendered });
    }

    let reparsed = system.surface_code_to_ast(&rendered)?;
    if !system.compare_ast(&reparsed, &ast) {
        return Ok(RecordOutcome::Mismatched { ast, rendered });
    }
    Ok(RecordOutcome::Converted(ast))
}
