use anyhow::{Context, Result};
use clap::Parser;
use launchtime::classifier::Classifier;
use launchtime::cli::{Cli, Commands, EnvArgs, ParseArgs, RecordArgs, RulesArgs, RunArgs};
use launchtime::driver::{DriverOptions, ProcessDriver};
use launchtime::output::{OutputTarget, TimingWriter};
use launchtime::recognizer::RecognizerRegistry;
use launchtime::{environment, journal};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Built-in recognizers unless a table file was given
fn load_registry(record: &RecordArgs) -> Result<RecognizerRegistry> {
    match &record.recognizers {
        Some(path) => RecognizerRegistry::from_toml(path),
        None => RecognizerRegistry::builtin(),
    }
}

fn open_target(target: &OutputTarget) -> Result<Box<dyn Write>> {
    target
        .open()
        .with_context(|| format!("Failed to open output {:?}", target))
}

/// Launch the program and measure it; returns the program's exit code
fn run_command(args: RunArgs) -> Result<i32> {
    let classifier = Classifier::new(load_registry(&args.record)?);
    let target = OutputTarget::from_option(args.record.output.clone(), OutputTarget::Stderr);
    let timing = TimingWriter::new(open_target(&target)?, args.record.format);

    let options = DriverOptions {
        start_time: !args.without_start_time,
        end_time: args.with_end_time,
        environment: environment::logging_environment(true, true),
    };

    let mut driver = ProcessDriver::new(classifier, timing, target.passthrough(), options);
    let summary = driver.run(&args.command)?;
    tracing::debug!(
        "{} records, {} lines passed through",
        summary.records,
        summary.passed_through
    );

    // Killed by a signal: report like a shell would
    Ok(summary.status.code().unwrap_or(1))
}

fn parse_input(args: ParseArgs) -> Result<()> {
    let mut classifier = Classifier::new(load_registry(&args.record)?);
    let target = OutputTarget::from_option(args.record.output.clone(), OutputTarget::Stdout);
    let mut timing = TimingWriter::new(open_target(&target)?, args.record.format);
    let use_journal = !args.without_journal_timestamps;

    match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            journal::parse_stream(BufReader::new(file), &mut classifier, &mut timing, use_journal)?;
        }
        None => {
            journal::parse_stream(io::stdin().lock(), &mut classifier, &mut timing, use_journal)?;
        }
    }
    Ok(())
}

fn print_env(args: EnvArgs) {
    let vars =
        environment::logging_environment(args.with_logging_rules, args.with_logging_to_console);
    print!("{}", environment::format_environment(&vars));
}

fn print_rules(args: RulesArgs) {
    print!("{}", environment::format_rules(args.with_title));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(cli.debug);

    match cli.command {
        Commands::Run(args) => {
            let code = run_command(args)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Env(args) => print_env(args),
        Commands::Rules(args) => print_rules(args),
        Commands::Parse(args) => parse_input(args)?,
    }

    Ok(())
}
