//! Shared CLI utilities.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;

use crate::pipeline::RunReport;
use crate::progress::{LogProgress, ProgressSink, SpinnerProgress};

/// `None` for an empty list, so an absent flag keeps the config value.
pub fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

/// Spinner on an interactive terminal, log events otherwise.
pub fn progress_sink() -> Box<dyn ProgressSink> {
    if io::stderr().is_terminal() {
        Box::new(SpinnerProgress::new())
    } else {
        Box::new(LogProgress)
    }
}

/// One line per item, to `path` or stdout.
pub fn write_lines<S: AsRef<str>>(path: Option<&Path>, lines: &[S]) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed creating {}", path.display()))?;
            write_all_lines(BufWriter::new(file), lines)
                .with_context(|| format!("Failed writing {}", path.display()))
        }
        None => write_all_lines(BufWriter::new(io::stdout().lock()), lines).context("Failed writing to stdout"),
    }
}

fn write_all_lines<W: Write, S: AsRef<str>>(mut out: W, lines: &[S]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    out.flush()
}

pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed serializing run report")?;
    std::fs::write(path, json + "\n").with_context(|| format!("Failed writing report {}", path.display()))
}

/// Closing summary on stderr, so it never mixes with terms written to stdout.
pub fn print_summary(report: &RunReport, output: Option<&Path>) {
    let target = output.map_or_else(|| "stdout".to_string(), |path| path.display().to_string());
    eprintln!("info: wrote {} term(s) to {}", report.output, target);
    eprintln!(
        "info: {} candidate(s) from {} closure round(s)",
        report.candidates, report.closure.rounds
    );
    if let Some(senses) = &report.senses {
        eprintln!(
            "info: {} rejected by sense filtering ({} form-of templates, {} budget exhaustions)",
            senses.rejected, senses.form_of.templates, senses.resolver.budget_exhausted
        );
        if senses.chained_redirects > 0 {
            eprintln!("warning: {} chained redirect(s) were not expanded", senses.chained_redirects);
        }
    }
    let unresolved = report.seeds.unresolved_include.len() + report.seeds.unresolved_exclude.len();
    if unresolved > 0 {
        eprintln!("warning: {unresolved} seed categor(y/ies) could not be resolved");
    }
    let skipped = report.skipped_records();
    if skipped > 0 {
        eprintln!("warning: {skipped} malformed record(s) were skipped");
    }
}
