//! CLI argument parsing for Sextant
//!
//! Defines the Command enum and parse_args() function for all CLI commands.

use anyhow::Result;
use sextant::ReportFormat;
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("Sextant - Deterministic source-pattern cross-referencer");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  sextant <command> [arguments]");
    eprintln!("  sextant --help");
    eprintln!();
    eprintln!("  sextant scan --root <DIR> [--rules <FILE>] [--format markdown|csv|json] [--output <PATH>]");
    eprintln!("  sextant rules [--rules <FILE>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  scan      Scan a directory tree and emit the cross-reference report");
    eprintln!("  rules     List the active rule set");
    eprintln!();
    eprintln!("Scan arguments:");
    eprintln!("  --root <DIR>        Directory to scan recursively");
    eprintln!("  --rules <FILE>      JSON rule set file (default: built-in rules)");
    eprintln!("  --format <FORMAT>   Report format: markdown (default), csv, or json");
    eprintln!("  --output <PATH>     Write the report to a file instead of stdout");
    eprintln!();
    eprintln!("Rules arguments:");
    eprintln!("  --rules <FILE>      JSON rule set file (default: built-in rules)");
    eprintln!();
    eprintln!("Global flags:");
    eprintln!("  --version, -V       Print version information");
    eprintln!("  --help, -h          Print this help");
}

/// Parsed CLI command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan {
        root: PathBuf,
        rules_file: Option<PathBuf>,
        format: ReportFormat,
        output: Option<PathBuf>,
    },
    Rules {
        rules_file: Option<PathBuf>,
    },
}

fn flag_value(args: &[String], i: usize, flag: &str) -> Result<String> {
    if i + 1 >= args.len() {
        return Err(anyhow::anyhow!("{} requires an argument", flag));
    }
    Ok(args[i + 1].clone())
}

pub fn parse_args_impl<F>(args: &[String], print_version: F) -> Result<Command>
where
    F: FnOnce(),
{
    if args.len() < 2 {
        return Err(anyhow::anyhow!("Missing command"));
    }

    let command = &args[1];

    // Handle --version and -V flags
    if command == "--version" || command == "-V" {
        print_version();
        std::process::exit(0);
    }

    // Handle --help and -h flags
    if command == "--help" || command == "-h" {
        print_usage();
        std::process::exit(0);
    }

    match command.as_str() {
        "scan" => {
            let mut root: Option<PathBuf> = None;
            let mut rules_file: Option<PathBuf> = None;
            let mut format = ReportFormat::Markdown;
            let mut output: Option<PathBuf> = None;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--root" => {
                        root = Some(PathBuf::from(flag_value(args, i, "--root")?));
                        i += 2;
                    }
                    "--rules" => {
                        rules_file = Some(PathBuf::from(flag_value(args, i, "--rules")?));
                        i += 2;
                    }
                    "--format" => {
                        let value = flag_value(args, i, "--format")?;
                        format = ReportFormat::from_str(&value).ok_or_else(|| {
                            anyhow::anyhow!(
                                "Invalid format: {} (expected markdown, csv, or json)",
                                value
                            )
                        })?;
                        i += 2;
                    }
                    "--output" => {
                        output = Some(PathBuf::from(flag_value(args, i, "--output")?));
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!("Unknown scan argument: {}", other));
                    }
                }
            }

            let root = root.ok_or_else(|| anyhow::anyhow!("scan requires --root"))?;
            Ok(Command::Scan {
                root,
                rules_file,
                format,
                output,
            })
        }
        "rules" => {
            let mut rules_file: Option<PathBuf> = None;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--rules" => {
                        rules_file = Some(PathBuf::from(flag_value(args, i, "--rules")?));
                        i += 2;
                    }
                    other => {
                        return Err(anyhow::anyhow!("Unknown rules argument: {}", other));
                    }
                }
            }

            Ok(Command::Rules { rules_file })
        }
        other => Err(anyhow::anyhow!("Unknown command: {}", other)),
    }
}

pub fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_impl(&args, || {
        println!("{}", sextant::version::version());
    })
}
