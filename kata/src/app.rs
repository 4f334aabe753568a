use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use console::Term;
use itertools::Itertools;
use std::{collections::HashMap, ffi::OsString, str::FromStr};
use tracing::*;

use crate::{
    get_kata_config, Color, ExampleInfo, LocationFilter, Reporter, ReporterType, Runner,
    Selection, Suite,
};

/// Build the CLI with clap's builder pattern
fn build_cli<'a>(third_party_reporters: impl Iterator<Item = &'a String>) -> ClapCommand {
    let reporter_choices = [ReporterType::List.to_string(), ReporterType::Null.to_string()]
        .into_iter()
        .chain(third_party_reporters.cloned());
    ClapCommand::new("kata")
        .about("kata CLI offers commands for listing and running examples")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .subcommand(
            ClapCommand::new("test")
                .about("Run examples")
                .arg(Arg::new("example")
                    .short('e')
                    .long("example")
                    .help("Run only examples whose full description contains this text")
                    .conflicts_with("location"))
                .arg(Arg::new("location")
                    .short('l')
                    .long("location")
                    .help("Run only the example whose source range contains FILE:LINE. e.g. --location tests/calc.rs:12"))
                .arg(Arg::new("fail-fast")
                    .long("fail-fast")
                    .help("Stop at the first failed or errored example [env: KATA_FAIL_FAST]")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("capture-rust")
                    .long("capture-rust")
                    .help("Print \"tracing\" based logs of kata and of the examples, filtered by RUST_LOG")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("reporters")
                    .long("reporters")
                    .help(format!("Specify the reporters to use in comma-separated string. Default is \"list\". [possible values: {}]", reporter_choices.into_iter().join(", ")))
                    .value_delimiter(',')
                    .action(ArgAction::Append))
                .arg(Arg::new("color")
                    .long("color")
                    .help("Produce color output. Default is \"auto\" [env: CARGO_TERM_COLOR]")
                    .value_parser(["auto", "always", "never"]))
        )
        .subcommand(
            ClapCommand::new("ls")
                .about("List examples")
        )
}

/// kata CLI.
#[derive(Default)]
pub struct App {
    third_party_reporters: HashMap<String, Box<dyn Reporter>>,
}

impl App {
    pub fn new() -> App {
        App {
            third_party_reporters: HashMap::new(),
        }
    }

    /// Install a third-party reporter, selectable with `--reporters <name>`.
    pub fn install_reporter(&mut self, name: impl Into<String>, reporter: impl Reporter + 'static) {
        self.third_party_reporters
            .insert(name.into(), Box::new(reporter));
    }

    /// Parse command-line args and run kata CLI sub command.
    ///
    /// Returns an error when an example failed or errored, or when the run
    /// was aborted by a configuration error.
    pub fn run(self, runner: Runner, suite: Suite) -> eyre::Result<()> {
        let matches = build_cli(self.third_party_reporters.keys()).get_matches();
        color_eyre::install()?;
        self.dispatch(&matches, runner, suite)
    }

    /// Like [`run`](App::run) with explicit args, the first being the binary name.
    pub fn run_from<I, T>(self, args: I, runner: Runner, suite: Suite) -> eyre::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = build_cli(self.third_party_reporters.keys()).try_get_matches_from(args)?;
        self.dispatch(&matches, runner, suite)
    }

    fn dispatch(mut self, matches: &ArgMatches, mut runner: Runner, mut suite: Suite) -> eyre::Result<()> {
        let cfg = get_kata_config();
        let term = Term::stdout();

        match matches.subcommand() {
            Some(("test", test_matches)) => {
                let example = test_matches.get_one::<String>("example");
                let location = test_matches.get_one::<String>("location");
                let fail_fast = test_matches.get_flag("fail-fast");
                let capture_rust = test_matches.get_flag("capture-rust");
                let reporters_arg = test_matches
                    .get_many::<String>("reporters")
                    .map(|vals| vals.cloned().collect::<Vec<_>>())
                    .unwrap_or_else(|| vec![ReporterType::List.to_string()]);
                let color_command = test_matches
                    .get_one::<String>("color")
                    .and_then(|s| Color::from_str(s).ok());

                if let Some(pattern) = example {
                    runner.select(Selection::description(pattern.as_str()));
                }
                if let Some(location) = location {
                    runner.select(Selection::Location(LocationFilter::from_str(location)?));
                }
                if fail_fast {
                    runner.fail_fast(true);
                }
                if capture_rust {
                    runner.capture_rust();
                }

                for reporter in reporters_arg {
                    let boxed = match self.third_party_reporters.remove(&reporter) {
                        Some(boxed) => boxed,
                        None => ReporterType::from_str(&reporter)
                            .map(ReporterType::build)
                            .map_err(|_| eyre::eyre!("Unknown reporter: {reporter}"))?,
                    };
                    runner.add_boxed_reporter(boxed);
                }

                let color_env = std::env::var("CARGO_TERM_COLOR").ok();
                match resolve_color(color_command, color_env.as_deref(), cfg.color) {
                    Color::Always => {
                        console::set_colors_enabled(true);
                        console::set_colors_enabled_stderr(true);
                    }
                    Color::Never => {
                        console::set_colors_enabled(false);
                        console::set_colors_enabled_stderr(false);
                    }
                    Color::Auto => {}
                }

                let summary = runner.run(&mut suite)?;
                debug!("{summary:?}");
                if summary.has_failures() {
                    eyre::bail!(
                        "{} of {} examples did not succeed",
                        summary.failed + summary.errored,
                        summary.total()
                    );
                }
                Ok(())
            }
            Some(("ls", _)) => {
                for line in list_lines(&suite.examples()) {
                    term.write_line(&line)?;
                }
                Ok(())
            }
            _ => unreachable!("Subcommand required is set to true"),
        }
    }
}

/// `--color` wins over `CARGO_TERM_COLOR`, which wins over `kata.toml`.
fn resolve_color(command: Option<Color>, env: Option<&str>, cfg: Color) -> Color {
    match (command, env.and_then(|s| Color::from_str(s).ok())) {
        (Some(color), _) => color,
        (None, Some(color)) => color,
        (None, None) => cfg,
    }
}

/// Examples grouped by consecutive source file, in declaration order.
fn list_lines(examples: &[ExampleInfo]) -> Vec<String> {
    let mut lines = Vec::new();
    let by_file = examples.iter().chunk_by(|info| info.location.file.as_str());
    for (file, infos) in &by_file {
        lines.push(format!("* {file}"));
        for info in infos {
            lines.push(format!(
                "  - {} (line {}){}",
                info.description,
                info.location.line,
                if info.pending { " [pending]" } else { "" }
            ));
        }
    }
    lines
}
