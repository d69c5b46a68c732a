//! JSON rendering for reports and errors.

use std::io::{self, Write};

use gitlab_mr_fetch::{ErrorReport, FetchError, MergeRequestReport};
use serde::Serialize;

/// What the report writer emits on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `{mr, discussions, approvals, summary}`.
    Full,
    /// The aggregate summary object alone.
    SummaryOnly,
}

impl OutputMode {
    /// Chooses the mode from the `--summary` flag.
    pub const fn from_summary_flag(summary: bool) -> Self {
        if summary { Self::SummaryOnly } else { Self::Full }
    }
}

/// Writes the report to stdout.
pub fn write_report(report: &MergeRequestReport, mode: OutputMode) -> Result<(), FetchError> {
    let mut stdout = io::stdout().lock();
    write_report_to(&mut stdout, report, mode)
}

/// Writes the report to the given writer as indented JSON.
pub fn write_report_to<W: Write>(
    writer: &mut W,
    report: &MergeRequestReport,
    mode: OutputMode,
) -> Result<(), FetchError> {
    match mode {
        OutputMode::Full => write_json_to(writer, report),
        OutputMode::SummaryOnly => write_json_to(writer, &report.summary),
    }
}

/// Writes the structured error object to the given writer.
pub fn write_error_to<W: Write>(writer: &mut W, error: &FetchError) -> Result<(), FetchError> {
    write_json_to(writer, &ErrorReport::from(error))
}

fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<(), FetchError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(|error| encoding_error(&error))?;
    writeln!(writer).map_err(|error| encoding_error(&error))?;
    writer.flush().map_err(|error| encoding_error(&error))
}

fn encoding_error(error: &dyn std::error::Error) -> FetchError {
    FetchError::Encoding {
        message: error.to_string(),
    }
}
