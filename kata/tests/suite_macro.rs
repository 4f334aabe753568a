use kata::{
    check, check_eq, eyre, Config, Error, ExampleResult, FailureKind, Location, Reporter, Runner,
    Selection, Status, Suite,
};
use pretty_assertions::assert_eq;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn log(entry: &str) {
    LOG.with(|log| log.borrow_mut().push(entry.to_string()));
}

fn take_log() -> Vec<String> {
    LOG.with(|log| log.take())
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<ExampleResult>>>);

impl Recorder {
    fn reported(&self) -> Vec<(String, Status)> {
        self.0
            .borrow()
            .iter()
            .map(|result| (result.description.clone(), result.status))
            .collect()
    }
}

impl Reporter for Recorder {
    fn on_result(&mut self, result: &ExampleResult) -> eyre::Result<()> {
        self.0.borrow_mut().push(result.clone());
        Ok(())
    }
}

fn run(suite: &mut Suite, selection: Selection) -> kata::Result<(kata::Summary, Recorder)> {
    let recorder = Recorder::default();
    let mut runner = Runner::with_config(&Config::default());
    runner.add_reporter(recorder.clone());
    runner.select(selection);
    let summary = runner.run(suite)?;
    Ok((summary, recorder))
}

fn calc_suite() -> (Suite, u32) {
    let start = line!();
    let suite = kata::suite! {
        describe "calc" {
            it "adds" {
                log("adds");
            }

            it "subtracts" {
                log("subtracts");
            }
        }
    };
    (suite, start)
}

#[test]
fn locations_span_keyword_to_closing_brace() {
    let (suite, start) = calc_suite();

    let locations: Vec<_> = suite
        .examples()
        .into_iter()
        .map(|info| (info.description, info.location))
        .collect();
    assert_eq!(
        locations,
        vec![
            (
                "calc adds".to_string(),
                Location::new(file!(), start + 3, start + 5)
            ),
            (
                "calc subtracts".to_string(),
                Location::new(file!(), start + 7, start + 9)
            ),
        ]
    );
    assert_eq!(
        *suite.root().children()[0].location(),
        Location::new(file!(), start + 2, start + 10)
    );
}

#[test]
fn line_inside_a_body_selects_that_example() -> eyre::Result<()> {
    let (mut suite, start) = calc_suite();
    take_log();

    let (_, recorder) = run(&mut suite, Selection::location(file!(), start + 8))?;
    assert_eq!(
        recorder.reported(),
        vec![("calc subtracts".to_string(), Status::Success)]
    );
    assert_eq!(take_log(), vec!["subtracts"]);

    for line in [start + 2, start + 6, start + 10] {
        let (summary, _) = run(&mut suite, Selection::location(file!(), line))?;
        assert_eq!(summary.total(), 0, "line {line}");
    }
    assert!(take_log().is_empty());
    Ok(())
}

#[test]
fn hooks_nest_around_bodies() -> eyre::Result<()> {
    let mut suite = kata::suite! {
        before_each { log("root.before"); }

        describe "outer" {
            before_each { log("outer.before"); }
            after_each { log("outer.after.1"); }
            after_each { log("outer.after.2"); }

            context "inner" {
                before_each |scope| {
                    log("inner.before");
                    scope.insert(41_u32);
                }
                after_each { log("inner.after"); }

                it "sees state from setup" |scope| {
                    let answer = scope.get_mut::<u32>().unwrap();
                    *answer += 1;
                    log("body");
                    check_eq!(*answer, 42);
                }
            }
        }
    };
    take_log();

    let (summary, recorder) = run(&mut suite, Selection::All)?;
    assert_eq!(
        recorder.reported(),
        vec![("outer inner sees state from setup".to_string(), Status::Success)]
    );
    assert_eq!(
        take_log(),
        vec![
            "root.before",
            "outer.before",
            "inner.before",
            "body",
            "inner.after",
            "outer.after.2",
            "outer.after.1",
        ]
    );
    assert_eq!(summary.succeeded, 1);
    Ok(())
}

#[test]
fn outcomes_of_checks_errors_and_pending() -> eyre::Result<()> {
    let mut suite = kata::suite! {
        describe "parser" {
            it "fails a check" {
                check!(1 > 2, "one is not greater than two");
            }

            it "propagates an error" {
                let port: u16 = "eighty".parse()?;
                log(&port.to_string());
            }

            pending "handles unicode" {
                log("never");
            }

            pending "handles emoji";
        }
    };
    take_log();

    let (summary, recorder) = run(&mut suite, Selection::All)?;
    assert_eq!(
        recorder.reported(),
        vec![
            ("parser fails a check".to_string(), Status::Fail),
            ("parser propagates an error".to_string(), Status::Error),
            ("parser handles unicode".to_string(), Status::Pending),
            ("parser handles emoji".to_string(), Status::Pending),
        ]
    );

    let results = recorder.0.borrow();
    let failure = results[0].failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::Assertion);
    assert_eq!(
        failure.message,
        "check failed: 1 > 2: one is not greater than two"
    );
    assert_eq!(failure.location.file, file!());
    assert_eq!(
        results[1].failure.as_ref().unwrap().message,
        "invalid digit found in string"
    );
    assert!(take_log().is_empty());
    assert_eq!((summary.failed, summary.errored, summary.pending), (1, 1, 2));
    Ok(())
}

#[test]
fn fail_fast_stops_after_the_first_failure() -> eyre::Result<()> {
    let mut suite = kata::suite! {
        describe "first" {
            it "fails" { kata::fail!("stop here"); }
        }
        describe "second" {
            it "never runs" { log("second"); }
        }
    };
    take_log();

    let recorder = Recorder::default();
    let mut runner = Runner::with_config(&Config {
        fail_fast: true,
        ..Config::default()
    });
    runner.add_reporter(recorder.clone());
    let summary = runner.run(&mut suite)?;

    assert!(summary.aborted);
    assert_eq!(recorder.reported(), vec![("first fails".to_string(), Status::Fail)]);
    assert!(take_log().is_empty());
    Ok(())
}

#[test]
fn registering_at_run_time_aborts_the_run() {
    let mut suite = kata::suite! {
        describe "outer" {
            it "builds another suite" {
                let mut inner = Suite::new();
                inner.it("inner", Location::caller(), |_| Ok(()));
            }
        }
    };

    let err = match run(&mut suite, Selection::All) {
        Ok(_) => panic!("the run should abort"),
        Err(err) => err,
    };
    match err {
        Error::Configuration(err) => {
            assert_eq!(err.registered, "inner");
            assert_eq!(err.running, "outer builds another suite");
        }
        other => panic!("unexpected error: {other}"),
    }
}
