//! Sextant CLI - Deterministic source-pattern cross-referencer
//!
//! Usage: sextant <command> [arguments]

mod cli;

use anyhow::Result;
use sextant::graph::export;
use sextant::{run_scan, RuleSet, ScanConfig};
use std::path::PathBuf;
use std::process::ExitCode;

use cli::{parse_args, print_usage, Command};

fn load_rules(rules_file: Option<&PathBuf>) -> Result<RuleSet> {
    match rules_file {
        Some(path) => Ok(RuleSet::from_json_file(path)?),
        None => Ok(RuleSet::builtin()),
    }
}

fn run_scan_command(
    root: PathBuf,
    rules_file: Option<PathBuf>,
    format: export::ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let rules = load_rules(rules_file.as_ref())?;
    let config = ScanConfig::with_rules(root, rules);
    let outcome = run_scan(&config)?;

    // Rendering is pure; writing the text is the only side effect here.
    let report = export::render(&outcome, format)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &report)?;
            eprintln!("Wrote {} report to {}", format.as_str(), path.display());
        }
        None => print!("{}", report),
    }

    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    eprintln!(
        "{} matches, {} symbols, {} uncorrelated, {} warnings",
        outcome.matches.len(),
        outcome.graph.symbols().len(),
        outcome.graph.unmatched.len(),
        outcome.warnings.len()
    );

    Ok(())
}

fn run_rules_command(rules_file: Option<PathBuf>) -> Result<()> {
    let rules = load_rules(rules_file.as_ref())?;
    println!("extensions: {}", rules.extensions.join(", "));
    println!();
    for rule in &rules.rules {
        let scope = match rule.scope {
            sextant::RuleScope::Line => "line",
            sextant::RuleScope::File => "file",
        };
        let key = rule.key_field.as_deref().unwrap_or("-");
        println!(
            "{:<20} {:<14} {:<5} key={:<8} {}",
            rule.name,
            rule.facet.as_str(),
            scope,
            key,
            rule.pattern
        );
    }
    Ok(())
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Scan {
            root,
            rules_file,
            format,
            output,
        } => run_scan_command(root, rules_file, format, output),
        Command::Rules { rules_file } => run_rules_command(rules_file),
    }
}

fn main() -> ExitCode {
    let command = match parse_args() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::from(2);
        }
    };

    match dispatch(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
