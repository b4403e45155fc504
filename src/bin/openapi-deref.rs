//! OpenAPI dereference CLI
//!
//! Command-line interface for resolving and checking `$ref` pointers in
//! OpenAPI documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use openapi_deref::{
    check, load_document_auto, resolve, FileStatus, ResolveOptions, Severity, Strategy,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "openapi-deref")]
#[command(about = "Inline or rewrite $ref pointers in OpenAPI documents")]
#[command(version)]
struct Cli {
    /// Log level for diagnostics written to stderr (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Debug mode: log this crate's resolution steps.
    /// `DEBUG` is falsey only for empty, 0, f, false, n, no or off (any case).
    #[arg(
        long,
        env = "DEBUG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new(),
        global = true
    )]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve $ref pointers under `paths`
    Resolve {
        /// Document source: file path or URL (http:// or https://)
        #[arg(env = "OPENAPI_SPEC_PATH")]
        spec: String,

        /// Resolution strategy: inline (default) or defs
        #[arg(long, default_value = "inline", value_parser = parse_strategy)]
        strategy: Strategy,

        /// Fail on references to missing definitions instead of keeping them
        #[arg(long)]
        strict: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Report references that inline resolution cannot remove
    Check {
        /// File or directory to check
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.debug);

    let result = match cli.command {
        Commands::Resolve {
            spec,
            strategy,
            strict,
            output,
            pretty,
        } => run_resolve(&spec, strategy, strict, output, pretty),

        Commands::Check {
            path,
            format,
            strict,
            quiet,
        } => run_check(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    Strategy::parse(s).ok_or_else(|| format!("unknown strategy \"{}\": expected inline or defs", s))
}

/// Install the stderr subscriber so stdout stays clean JSON.
fn init_tracing(level: &str, debug: bool) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            let directives = if debug {
                format!("{},openapi_deref=debug", level)
            } else {
                level.to_string()
            };
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"))
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_resolve(
    spec_source: &str,
    strategy: Strategy,
    strict: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    info!(source = spec_source, "loading OpenAPI document");
    let document = load_document_auto(spec_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    info!(strategy = strategy.as_str(), strict, "resolving references");
    let options = ResolveOptions::new(strategy).strict(strict);
    let resolved = resolve(&document, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&resolved)
    } else {
        serde_json::to_string(&resolved)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            info!(path = %path.display(), "resolved document written");
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_check(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = check(path, strict);
    let passed = result.passes(strict);

    if format == "json" {
        let json_output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json_output);
    } else {
        if !quiet {
            println!("Checking {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if passed {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if passed {
        Ok(())
    } else {
        Err(1)
    }
}
