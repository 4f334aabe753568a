use console::{style, Term};
use eyre::WrapErr;
use std::time::Duration;

use crate::{
    runner::{ExampleResult, Summary},
    tree::{Failure, Status},
};

/// Reporter trait. The runner calls every installed reporter, in installation
/// order, for every event. Reporters only see shared references, so they
/// cannot change an outcome. An error returned from a reporter is logged and
/// the run carries on.
pub trait Reporter {
    /// Called when a selected example is about to run.
    fn on_start(&mut self, _description: &str) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when an example reached its final status.
    fn on_result(&mut self, _result: &ExampleResult) -> eyre::Result<()> {
        Ok(())
    }

    /// Called once after the last example.
    fn on_finish(&mut self, _summary: &Summary) -> eyre::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReporterType {
    List,
    Null,
}

impl ReporterType {
    pub fn build(self) -> Box<dyn Reporter> {
        match self {
            ReporterType::List => Box::new(ListReporter::new()),
            ReporterType::Null => Box::new(NullReporter),
        }
    }
}

pub struct NullReporter;

impl Reporter for NullReporter {}

/// Prints one line per example, failure details indented below it, and a
/// summary line at the end.
pub struct ListReporter {
    terminal: Term,
}

impl Default for ListReporter {
    fn default() -> ListReporter {
        ListReporter::new()
    }
}

impl ListReporter {
    pub fn new() -> ListReporter {
        ListReporter {
            terminal: Term::stdout(),
        }
    }
}

impl Reporter for ListReporter {
    fn on_result(&mut self, result: &ExampleResult) -> eyre::Result<()> {
        let description = &result.description;
        let line = match result.status {
            Status::Success => format!(
                "{} {description} {}",
                style("✓").green(),
                style(elapsed(result.duration)).dim()
            ),
            Status::Fail | Status::Error => format!(
                "{} {description} {}",
                style("✘").red(),
                style(elapsed(result.duration)).dim()
            ),
            Status::Pending => format!("{} {description}", style("*").yellow()),
            Status::Unrun => format!("{} {description}", style("?").dim()),
        };
        write(&self.terminal, line)?;

        if let Some(failure) = &result.failure {
            for line in failure_lines(failure) {
                write(&self.terminal, format!("    {line}"))?;
            }
        }
        Ok(())
    }

    fn on_finish(&mut self, summary: &Summary) -> eyre::Result<()> {
        let line = summary_line(summary);
        let line = if summary.has_failures() {
            style(line).red().to_string()
        } else {
            style(line).green().to_string()
        };
        write(&self.terminal, "")?;
        write(&self.terminal, line)
    }
}

fn elapsed(duration: Option<Duration>) -> String {
    match duration {
        Some(duration) => format!("({}ms)", duration.as_millis()),
        None => String::new(),
    }
}

fn failure_lines(failure: &Failure) -> Vec<String> {
    let mut lines: Vec<String> = failure.message.lines().map(str::to_string).collect();
    if let Some(cause) = &failure.cause {
        if cause != &failure.message {
            lines.extend(cause.lines().map(|line| format!("  {line}")));
        }
    }
    lines.push(format!("# {} at {}", failure.kind, failure.location));
    lines
}

fn summary_line(summary: &Summary) -> String {
    format!(
        "{} examples, {} failed, {} errored, {} pending in {}ms{}",
        summary.total(),
        summary.failed,
        summary.errored,
        summary.pending,
        summary.elapsed.as_millis(),
        if summary.aborted { " (aborted by fail-fast)" } else { "" }
    )
}

fn write(term: &Term, s: impl AsRef<str>) -> eyre::Result<()> {
    term.write_line(s.as_ref())
        .wrap_err("failed to write character on terminal")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{tree::FailureKind, Location};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn failure_lines_include_cause_and_location() {
        let failure = Failure {
            kind: FailureKind::Unexpected,
            message: "connection refused".into(),
            location: Location::new("db_spec.rs", 4, 9),
            cause: Some("connection refused\n\nCaused by:\n    os error 111".into()),
        };
        assert_eq!(
            failure_lines(&failure),
            vec![
                "connection refused",
                "  connection refused",
                "  ",
                "  Caused by:",
                "      os error 111",
                "# unexpected at db_spec.rs:4",
            ]
        );
    }

    #[test]
    fn failure_lines_skip_redundant_cause() {
        let failure = Failure {
            kind: FailureKind::Assertion,
            message: "nope".into(),
            location: Location::at("calc_spec.rs", 7),
            cause: Some("nope".into()),
        };
        assert_eq!(failure_lines(&failure), vec!["nope", "# assertion at calc_spec.rs:7"]);
    }

    #[test]
    fn summary() {
        let summary = Summary {
            succeeded: 2,
            failed: 1,
            errored: 0,
            pending: 1,
            elapsed: Duration::from_millis(12),
            aborted: true,
        };
        assert_eq!(
            summary_line(&summary),
            "4 examples, 1 failed, 0 errored, 1 pending in 12ms (aborted by fail-fast)"
        );
    }

    #[test]
    fn reporter_type_from_str() -> eyre::Result<()> {
        assert_eq!(ReporterType::from_str("list")?, ReporterType::List);
        assert_eq!(ReporterType::Null.to_string(), "null");
        assert!(ReporterType::from_str("table").is_err());
        Ok(())
    }
}
