//! Command-line interface for scof
//! This binary is used to inspect, check and convert scof movement files and archives.
//!
//! Usage:
//!   scof process `<path>` `<format>`   - Process a file and output to stdout (explicit)
//!   scof `<path>` `<format>`           - Same as process (default command)
//!   scof check `<path>`                - Parse and validate, reporting every problem
//!   scof pack `<dir>` `<archive>`      - Zip an unpacked archive directory
//!   scof unpack `<archive>` `<dir>`    - Extract an archive into a directory
//!   scof formats                     - List all available formats
//!
//! Global options: `--config <file>` layers a TOML file over the built-in
//! defaults, `--set <key>=<value>` overrides single keys.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::Path;

use scof::scof::archive::{pack_directory, unpack_archive};
use scof::scof::config::{Loader, ScofConfig};
use scof::scof::parse_movement_with_indent;
use scof::scof::processor::{
    available_formats, is_archive, load_archive, process_file, ProcessingError, ProcessingSpec,
};
use scof::scof::validation::{validate_document, validate_movement};

fn main() {
    env_logger::init();

    let path_arg = || Arg::new("path").help("Path to a movement file, .scof archive or unpacked archive directory");
    let matches = Command::new("scof")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting, checking and packing scof scores")
        .subcommand_required(false)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Override a single configuration key, e.g. archive.strict_entries=true"),
        )
        // Default command args
        .arg(path_arg().index(1))
        .arg(
            Arg::new("format")
                .help("Output format (e.g., tree-treeviz, model-json)")
                .index(2),
        )
        .subcommand(
            Command::new("process")
                .about("Process a file and output to stdout (default command)")
                .arg(path_arg().required(true).index(1))
                .arg(
                    Arg::new("format")
                        .help("Output format (e.g., tree-treeviz, model-json)")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse and validate a file, reporting every problem found")
                .arg(path_arg().required(true).index(1)),
        )
        .subcommand(
            Command::new("pack")
                .about("Zip an unpacked archive directory into a .scof file")
                .arg(Arg::new("dir").required(true).index(1))
                .arg(Arg::new("archive").required(true).index(2)),
        )
        .subcommand(
            Command::new("unpack")
                .about("Extract a .scof archive into a directory")
                .arg(Arg::new("archive").required(true).index(1))
                .arg(Arg::new("dir").required(true).index(2)),
        )
        .subcommand(Command::new("formats").about("List all available output formats"))
        .try_get_matches()
        .unwrap_or_else(|e| e.exit());

    let config = load_config(&matches);

    let code = match matches.subcommand() {
        Some(("process", sub)) => handle_process_command(required(sub, "path"), required(sub, "format"), &config),
        Some(("check", sub)) => handle_check_command(required(sub, "path"), &config),
        Some(("pack", sub)) => report(
            pack_directory(required(sub, "dir"), required(sub, "archive"), &config)
                .map(|count| format!("packed {} entries into {}", count, required(sub, "archive"))),
        ),
        Some(("unpack", sub)) => report(
            unpack_archive(required(sub, "archive"), required(sub, "dir"))
                .map(|count| format!("extracted {} files into {}", count, required(sub, "dir"))),
        ),
        Some(("formats", _)) => {
            handle_formats_command();
            0
        }
        _ => match (
            matches.get_one::<String>("path"),
            matches.get_one::<String>("format"),
        ) {
            (Some(path), Some(format)) => handle_process_command(path, format, &config),
            _ => {
                eprintln!("Error: expected <path> <format> or a subcommand (see --help)");
                1
            }
        },
    };
    std::process::exit(code);
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    // clap enforces presence of required arguments before we get here
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Build the configuration from defaults, `--config` and `--set`
fn load_config(matches: &ArgMatches) -> ScofConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        let Some((key, value)) = assignment.split_once('=') else {
            eprintln!("Error: --set expects KEY=VALUE, got '{}'", assignment);
            std::process::exit(2);
        };
        loader = match loader.set_override(key, value) {
            Ok(loader) => loader,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        };
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Error: invalid configuration: {}", e);
        std::process::exit(2);
    })
}

/// Handle the process command
fn handle_process_command(path: &str, format_str: &str, config: &ScofConfig) -> i32 {
    let result = ProcessingSpec::from_string(format_str).and_then(|spec| process_file(path, &spec, config));
    match result {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(
                e,
                ProcessingError::InvalidFormat(_)
                    | ProcessingError::InvalidStage(_)
                    | ProcessingError::InvalidFormatType(_)
            ) {
                eprintln!("\nAvailable formats:");
                for format in available_formats() {
                    eprintln!("  {}", format);
                }
            }
            1
        }
    }
}

/// Handle the check command: print every problem, exit non-zero if there are any
fn handle_check_command(path: &str, config: &ScofConfig) -> i32 {
    let file_path = Path::new(path);
    let mut problems = Vec::new();

    if is_archive(file_path) {
        match load_archive(file_path, config) {
            Ok(loaded) => {
                for failure in &loaded.failures {
                    problems.push(format!("{}: {}", failure.entry, failure.error));
                }
                problems.extend(validate_document(&loaded.document).iter().map(ToString::to_string));
            }
            Err(e) => problems.push(e.to_string()),
        }
    } else {
        match fs::read_to_string(file_path) {
            Ok(source) => match parse_movement_with_indent(&source, config.format.indent_width) {
                Ok(movement) => {
                    problems.extend(validate_movement(&movement).iter().map(ToString::to_string))
                }
                Err(e) => problems.push(e.to_string()),
            },
            Err(e) => problems.push(format!("{}: {}", path, e)),
        }
    }

    if problems.is_empty() {
        println!("ok: {}", path);
        0
    } else {
        for problem in &problems {
            eprintln!("{}", problem);
        }
        eprintln!("{} problem(s) in {}", problems.len(), path);
        1
    }
}

/// Handle the formats command
fn handle_formats_command() {
    println!("Available formats:");
    for format in available_formats() {
        println!("  {}", format);
    }
}

fn report<E: std::fmt::Display>(result: Result<String, E>) -> i32 {
    match result {
        Ok(message) => {
            println!("{}", message);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
