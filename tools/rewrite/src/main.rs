use std::fs;
use std::fs::File;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use log::error;
use log::warn;

use canon_engine::CanonicalSystem;
use canon_engine::InputBindings;
use canon_engine::RewriteOptions;
use canon_engine::run_batch;
use canon_syntax::SystemSyntax;
use canon_syntax::load_system_from_file;
use canon_syntax::parse_binding;
use canon_syntax::parse_marker;
use canon_tools::VerbosityFlag;
use canon_tools::Version;
use canon_tools::VersionFlag;
use canon_utilities::CanonError;
use canon_utilities::Timing;

use canon_rewrite::TraceFormatter;
use canon_rewrite::parse_batch_inputs;
use canon_rewrite::termination_exit_code;

#[derive(clap::Parser, Debug)]
#[command(about = "A command line tool for canonical systems", arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    version: VersionFlag,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    /// Print the time spent in every phase to stderr
    #[arg(long, global = true)]
    timings: bool,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Run(RunArgs),
    Check(CheckArgs),
    Batch(BatchArgs),
}

/// Options that override the sections of the description.
#[derive(clap::Args, Debug)]
struct OverrideArgs {
    /// Stop after this many steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// The output marker as OPEN,SYMBOL,CLOSE
    #[arg(long)]
    marker: Option<String>,
}

#[derive(clap::Args, Debug)]
#[command(about = "Rewrite the axiom of a canonical system until it halts")]
struct RunArgs {
    #[arg(value_name = "SPEC")]
    specification: String,

    /// Binds an axiom variable, overrides the INPUT section
    #[arg(long = "input", value_name = "VAR=VALUE")]
    inputs: Vec<String>,

    #[command(flatten)]
    overrides: OverrideArgs,

    /// Write the trace of the run to this file
    #[arg(long, value_name = "FILE")]
    trace_file: Option<String>,
}

#[derive(clap::Args, Debug)]
#[command(about = "Check the description of a canonical system without running it")]
struct CheckArgs {
    #[arg(value_name = "SPEC")]
    specification: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Rewrite several inputs in parallel, one line of bindings per run")]
struct BatchArgs {
    #[arg(value_name = "SPEC")]
    specification: String,

    #[arg(value_name = "INPUTS")]
    inputs: String,

    #[command(flatten)]
    overrides: OverrideArgs,
}

fn main() -> Result<ExitCode, CanonError> {
    let cli = Cli::parse();

    let mut timing = Timing::new();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    if cli.version.into() {
        eprintln!("{}", Version);
        return Ok(ExitCode::SUCCESS);
    }

    let mut exit_code = ExitCode::SUCCESS;
    if let Some(command) = &cli.commands {
        exit_code = match command {
            Commands::Run(args) => handle_run(args, &mut timing)?,
            Commands::Check(args) => handle_check(args)?,
            Commands::Batch(args) => handle_batch(args, &mut timing)?,
        };
    }

    if cli.timings {
        timing.print();
    }

    Ok(exit_code)
}

/// Combines the options of the description with the command line overrides.
fn rewrite_options(syntax: &SystemSyntax, overrides: &OverrideArgs) -> Result<RewriteOptions, CanonError> {
    let mut options = syntax.to_rewrite_options()?;

    if let Some(max_steps) = overrides.max_steps {
        options = options.with_max_steps(max_steps);
    }

    if let Some(marker) = &overrides.marker {
        let items: Vec<&str> = marker.split(',').collect();
        options = options.with_marker(parse_marker(&items)?);
    }

    Ok(options)
}

/// Handle the `run` subcommand.
///
/// Prints the final string, followed by the output value when a marker is
/// configured. The exit code reports how the run terminated.
fn handle_run(args: &RunArgs, timing: &mut Timing) -> Result<ExitCode, CanonError> {
    let (system, inputs, options) = timing.measure("parse", || load_run(args))?;
    let result = timing.measure("rewrite", || system.rewrite(&inputs, &options))?;

    if let Some(path) = &args.trace_file {
        let mut file = File::create(path)?;
        write!(file, "{}", TraceFormatter::new(&result, options.marker.is_some()))?;
    }

    if !result.termination.is_converged() {
        warn!("Run did not converge: {}", result.termination);
    }

    println!("{}", result.final_string);
    if options.marker.is_some() {
        println!("{}", result.output);
    }

    Ok(termination_exit_code(&result.termination))
}

/// Loads the system of a `run`, with the command line bindings added to the
/// `INPUT` section.
fn load_run(args: &RunArgs) -> Result<(CanonicalSystem, InputBindings, RewriteOptions), CanonError> {
    let syntax = load_system_from_file(&args.specification)?;
    let system = syntax.to_canonical_system()?;

    let mut inputs = syntax.to_input_bindings()?;
    for binding in &args.inputs {
        let (variable, value) = parse_binding(binding)?;
        inputs.insert(variable, value);
    }

    let options = rewrite_options(&syntax, &args.overrides)?;
    Ok((system, inputs, options))
}

/// Handle the `check` subcommand.
fn handle_check(args: &CheckArgs) -> Result<ExitCode, CanonError> {
    let syntax = load_system_from_file(&args.specification)?;
    let system = syntax.to_canonical_system()?;
    let inputs = syntax.to_input_bindings()?;
    let options = syntax.to_rewrite_options()?;

    print!("{syntax}");
    println!(
        "{} symbols, {} variables, {} rules, at most {} steps",
        system.alphabet().len(),
        system.variables().len(),
        system.rules().len(),
        options.max_steps
    );

    // Without INPUT section the axiom can only be instantiated on the command line.
    if !inputs.is_empty() {
        println!("Initial: {}", system.initial_string(&inputs)?);
    }

    Ok(ExitCode::SUCCESS)
}

/// Handle the `batch` subcommand.
///
/// Prints one line `final<TAB>output<TAB>termination` per input line, in the
/// order of the input lines. Inputs that are rejected are reported on their
/// line, and make the tool fail after all runs are finished.
fn handle_batch(args: &BatchArgs, timing: &mut Timing) -> Result<ExitCode, CanonError> {
    let (system, options, inputs) = timing.measure("parse", || load_batch(args))?;
    let results = timing.measure("rewrite", || run_batch(&system, &inputs, &options));

    let mut exit_code = ExitCode::SUCCESS;
    for (line, result) in results.iter().enumerate() {
        match result {
            Ok(result) => println!("{}\t{}\t{}", result.final_string, result.output, result.termination),
            Err(err) => {
                error!("Input {}: {err}", line + 1);
                println!("\t\t{err}");
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    Ok(exit_code)
}

/// Loads the system of a `batch` and one set of bindings per input line.
fn load_batch(args: &BatchArgs) -> Result<(CanonicalSystem, RewriteOptions, Vec<InputBindings>), CanonError> {
    let syntax = load_system_from_file(&args.specification)?;
    let system = syntax.to_canonical_system()?;
    let options = rewrite_options(&syntax, &args.overrides)?;
    let inputs = parse_batch_inputs(&fs::read_to_string(&args.inputs)?, &syntax.to_input_bindings()?)?;
    Ok((system, options, inputs))
}
