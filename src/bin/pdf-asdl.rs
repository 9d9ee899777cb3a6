//! Command-line interface for pdf-asdl
//! Converts and checks corpora of PDF object expressions, one expression per line.
//!
//! Usage:
//!   pdf-asdl convert `<path>` [--format `<format>`] [--config `<config>`]  - Print each record in a format
//!   pdf-asdl check `<path>` [--config `<config>`]                        - Verify every record round-trips
//!   pdf-asdl grammar [--config `<config>`]                               - Print the active grammar
//!   pdf-asdl list-formats                                              - List available output formats

use clap::{Arg, ArgMatches, Command};
use pdf_asdl::pdf::config::{Loader, PdfAsdlConfig};
use pdf_asdl::pdf::corpus::{process_corpus, CorpusOptions, RecordOutcome};
use pdf_asdl::pdf::formats::FormatRegistry;
use pdf_asdl::pdf::transition::TransitionSystem;
use std::process;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML file layered over the built-in defaults")
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the corpus file, one expression per line")
        .required(true)
        .index(1)
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let matches = Command::new("pdf-asdl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert PDF object expressions to typed syntax trees and back")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Print the typed tree of every record")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see list-formats); defaults to output.format"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Verify that every record converts and round-trips")
                .arg(path_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("grammar")
                .about("Print the active grammar as ASDL")
                .arg(config_arg()),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("convert", convert_matches)) => handle_convert_command(convert_matches),
        Some(("check", check_matches)) => handle_check_command(check_matches),
        Some(("grammar", grammar_matches)) => handle_grammar_command(grammar_matches),
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!(),
    }
}

/// Load the configuration, applying the config file and flag overrides
fn load_config(matches: &ArgMatches, format: Option<&String>) -> PdfAsdlConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = format {
        loader = loader
            .set_override("output.format", format.as_str())
            .unwrap_or_else(|e| {
                eprintln!("Invalid format override: {}", e);
                process::exit(1);
            });
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        process::exit(1);
    })
}

fn load_system(config: &PdfAsdlConfig) -> Arc<dyn TransitionSystem> {
    config.transition_system().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
}

fn read_corpus(matches: &ArgMatches) -> String {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches) {
    let config = load_config(matches, matches.get_one::<String>("format"));
    let registry = FormatRegistry::with_defaults();
    let format = config.output.format.as_str();
    if !registry.has(format) {
        eprintln!("Unknown format '{}'. Available formats:", format);
        for name in registry.list_formats() {
            eprintln!("  {}", name);
        }
        process::exit(1);
    }

    let system = load_system(&config);
    let source = read_corpus(matches);
    let options = CorpusOptions {
        verify_round_trip: false,
    };
    let report = process_corpus(system.as_ref(), &source, options);

    for record in &report.records {
        match (&record.outcome, record.ast()) {
            (RecordOutcome::Failed(err), _) => {
                eprintln!("line {}: {}", record.line, err);
            }
            (_, Some(ast)) => match registry.serialize(ast, format) {
                Ok(output) => println!("{}", output.trim_end()),
                Err(e) => eprintln!("line {}: {}", record.line, e),
            },
            (_, None) => {}
        }
    }

    if report.failed_count() > 0 {
        process::exit(1);
    }
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) {
    let config = load_config(matches, None);
    let system = load_system(&config);
    let source = read_corpus(matches);
    let report = process_corpus(
        system.as_ref(),
        &source,
        CorpusOptions::from(&config.corpus),
    );

    for record in &report.records {
        match &record.outcome {
            RecordOutcome::Converted(_) => {}
            RecordOutcome::Failed(err) => println!("FAIL  line {}: {}", record.line, err),
            RecordOutcome::Mismatched { rendered, .. } => println!(
                "DIFF  line {}: expected '{}', found '{}'",
                record.line, record.text, rendered
            ),
        }
    }
    println!(
        "{} records: {} ok, {} failed, {} mismatched",
        report.total(),
        report.ok_count(),
        report.failed_count(),
        report.mismatched_count()
    );

    if !report.is_success() {
        process::exit(1);
    }
}

/// Handle the grammar command
fn handle_grammar_command(matches: &ArgMatches) {
    let config = load_config(matches, None);
    let grammar = config.load_grammar().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    print!("{}", grammar);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        println!("  {}", name);
        if let Some(formatter) = registry.get(&name) {
            println!("    {}", formatter.description());
        }
    }
}
