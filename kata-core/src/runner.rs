/// kata's example runner
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};
use tracing::*;

use crate::{
    assertion::AssertionFailure,
    config::get_kata_config,
    error::ConfigurationError,
    filter::{Filter, Selection},
    hook::{self, HookSet},
    reporter::Reporter,
    scope::{ExecutionGuard, Scope},
    tree::{full_description, Example, Failure, FailureKind, Group, Node, Status},
    Config, Location, Result, Suite,
};

/// Final state of one example as told to reporters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleResult {
    /// Group descriptions and the example's own, joined by spaces.
    pub description: String,
    pub location: Location,
    pub status: Status,
    /// `None` for pending examples.
    pub duration: Option<Duration>,
    pub failure: Option<Failure>,
}

/// Counts of reported outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub errored: usize,
    pub pending: usize,
    pub elapsed: Duration,
    /// Whether fail-fast stopped the run early.
    pub aborted: bool,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.errored + self.pending
    }

    pub fn has_failures(&self) -> bool {
        self.failed + self.errored > 0
    }

    fn record(&mut self, status: Status) {
        match status {
            Status::Success => self.succeeded += 1,
            Status::Fail => self.failed += 1,
            Status::Error => self.errored += 1,
            Status::Pending => self.pending += 1,
            Status::Unrun => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub fail_fast: bool,
    pub capture_rust: bool,
    pub selection: Selection,
}

/// State of one invocation of [`Runner::run`].
struct RunState {
    abort_requested: bool,
    fail_fast: bool,
    summary: Summary,
}

/// A group on the path from the root to the example being run.
struct Frame<'t> {
    description: &'t str,
    hooks: &'t HookSet,
}

/// How a lifecycle step, or the whole lifecycle, ended.
enum Outcome {
    Passed,
    Raised(Failure),
    /// Examples were registered while running; the run has to stop.
    Misconfigured(ConfigurationError),
}

impl Outcome {
    fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Combines the outcome so far with a teardown step. The later error wins,
    /// except that nothing replaces a configuration error.
    fn then_teardown(self, step: Outcome) -> Outcome {
        match (self, step) {
            (misconfigured @ Outcome::Misconfigured(_), _) => misconfigured,
            (outcome, Outcome::Passed) => outcome,
            (_, raised) => raised,
        }
    }
}

#[derive(Default)]
pub struct Runner {
    options: Options,
    reporters: Vec<Box<dyn Reporter>>,
}

impl Runner {
    /// A runner configured from `kata.toml` and the environment.
    pub fn new() -> Runner {
        Runner::with_config(get_kata_config())
    }

    pub fn with_config(cfg: &Config) -> Runner {
        Runner {
            options: Options {
                fail_fast: cfg.fail_fast,
                ..Options::default()
            },
            reporters: Vec::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn fail_fast(&mut self, enabled: bool) {
        self.options.fail_fast = enabled;
    }

    pub fn capture_rust(&mut self) {
        self.options.capture_rust = true;
    }

    /// Only run examples matching `selection`.
    pub fn select(&mut self, selection: Selection) {
        self.options.selection = selection;
    }

    pub fn add_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    pub fn add_boxed_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// Run every selected example of `suite` in declaration order.
    ///
    /// Failed examples are part of the returned [`Summary`]. The only error is
    /// a [`ConfigurationError`](crate::error::ConfigurationError), raised when
    /// an example registers further examples; the run stops at that point.
    pub fn run(&mut self, suite: &mut Suite) -> Result<Summary> {
        if self.options.capture_rust {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init();
        }

        let started = Instant::now();
        let mut state = RunState {
            abort_requested: false,
            fail_fast: self.options.fail_fast,
            summary: Summary::default(),
        };
        debug!(
            "runner started: fail_fast={} selection={:?}",
            state.fail_fast, self.options.selection
        );

        self.run_group(suite.root_mut(), &mut Vec::new(), &mut state)?;

        let summary = Summary {
            elapsed: started.elapsed(),
            aborted: state.abort_requested,
            ..state.summary
        };
        if summary.total() == 0 {
            debug!("no examples selected");
        }
        self.notify(|reporter| reporter.on_finish(&summary));

        debug!("runner stopped");
        Ok(summary)
    }

    fn run_group<'t>(
        &mut self,
        group: &'t mut Group,
        frames: &mut Vec<Frame<'t>>,
        state: &mut RunState,
    ) -> Result<()> {
        if state.abort_requested {
            trace!("skipping group \"{}\": run aborted", group.description);
            return Ok(());
        }

        let Group {
            description,
            hooks,
            children,
            ..
        } = group;
        frames.push(Frame {
            description,
            hooks,
        });

        for child in children.iter_mut() {
            match child {
                Node::Group(group) => self.run_group(group, frames, state)?,
                Node::Example(example) => self.run_example(example, frames, state)?,
            }
        }

        frames.pop();
        Ok(())
    }

    fn run_example(
        &mut self,
        example: &mut Example,
        frames: &[Frame<'_>],
        state: &mut RunState,
    ) -> Result<()> {
        let description = full_description(
            frames.iter().map(|frame| frame.description),
            &example.description,
        );

        if state.abort_requested {
            trace!("skipping \"{description}\": run aborted");
            return Ok(());
        }
        if !self
            .options
            .selection
            .filter(&description, &example.location)
        {
            trace!("skipping \"{description}\": not selected");
            return Ok(());
        }

        self.notify(|reporter| reporter.on_start(&description));

        let Some(body) = &example.body else {
            debug!("{description} pending");
            example.status = Status::Pending;
            self.report(example, description, state);
            return Ok(());
        };

        let hooks: Vec<&HookSet> = frames.iter().map(|frame| frame.hooks).collect();
        let started = Instant::now();
        let mut scope = Scope::new(description.clone(), example.location.clone());
        let guard = ExecutionGuard::enter(&description);

        let mut outcome = Outcome::Passed;
        for hook in hook::before_each(&hooks) {
            outcome = call(&**hook, &mut scope);
            if !outcome.is_passed() {
                break;
            }
        }
        if outcome.is_passed() {
            outcome = call(&**body, &mut scope);
        }
        for hook in hook::after_each(&hooks) {
            outcome = outcome.then_teardown(call(&**hook, &mut scope));
        }
        if let Some(err) = guard.take_violation() {
            outcome = Outcome::Misconfigured(err);
        }

        drop(guard);
        drop(scope);
        let duration = started.elapsed();

        let (status, failure) = match outcome {
            Outcome::Passed => (Status::Success, None),
            Outcome::Raised(failure) => match failure.kind {
                FailureKind::Assertion => (Status::Fail, Some(failure)),
                FailureKind::Unexpected => (Status::Error, Some(failure)),
            },
            Outcome::Misconfigured(err) => {
                warn!("aborting run: {err}");
                return Err(err.into());
            }
        };
        debug!("{description} {status}");

        example.status = status;
        example.duration = Some(duration);
        example.failure = failure;
        self.report(example, description, state);

        if status.is_failure() && state.fail_fast {
            debug!("fail-fast: skipping the remaining examples");
            state.abort_requested = true;
        }
        Ok(())
    }

    fn report(&mut self, example: &Example, description: String, state: &mut RunState) {
        state.summary.record(example.status);
        let result = ExampleResult {
            description,
            location: example.location.clone(),
            status: example.status,
            duration: example.duration,
            failure: example.failure.clone(),
        };
        self.notify(|reporter| reporter.on_result(&result));
    }

    fn notify(&mut self, mut event: impl FnMut(&mut dyn Reporter) -> eyre::Result<()>) {
        for reporter in &mut self.reporters {
            match panic::catch_unwind(AssertUnwindSafe(|| event(reporter.as_mut()))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("reporter failed: {e:#}"),
                Err(payload) => warn!("reporter panicked: {}", panic_message(&*payload)),
            }
        }
    }
}

/// Run one hook or body, turning errors and panics into an [`Outcome`].
fn call(step: &dyn Fn(&mut Scope) -> eyre::Result<()>, scope: &mut Scope) -> Outcome {
    let location = scope.location().clone();
    match panic::catch_unwind(AssertUnwindSafe(|| step(scope))) {
        Ok(Ok(())) => Outcome::Passed,
        Ok(Err(report)) => Outcome::Raised(classify_error(&report, location)),
        Err(payload) => classify_panic(payload, location),
    }
}

fn classify_error(report: &eyre::Report, location: Location) -> Failure {
    let message = report.to_string();
    match report.downcast_ref::<AssertionFailure>() {
        Some(failure) => Failure {
            kind: FailureKind::Assertion,
            cause: (message != failure.message).then(|| format!("{report:#}")),
            message: failure.message.clone(),
            location: failure.location.clone(),
        },
        None => Failure {
            kind: FailureKind::Unexpected,
            message,
            location,
            cause: Some(format!("{report:?}")),
        },
    }
}

fn classify_panic(payload: Box<dyn Any + Send>, location: Location) -> Outcome {
    let payload = match payload.downcast::<ConfigurationError>() {
        Ok(err) => return Outcome::Misconfigured(*err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<AssertionFailure>() {
        Ok(failure) => {
            return Outcome::Raised(Failure {
                kind: FailureKind::Assertion,
                message: failure.message,
                location: failure.location,
                cause: None,
            })
        }
        Err(payload) => payload,
    };

    Outcome::Raised(Failure {
        kind: FailureKind::Unexpected,
        message: panic_message(&*payload),
        location,
        cause: None,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic with unknown payload".to_string()
    }
}
