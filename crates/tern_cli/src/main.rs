//! Tern CLI: drives the shared parse cache over files on disk.
//!
//! `tern parse` resolves a batch of files and reports their top-level
//! declarations and diagnostics; `tern locate` maps a line and column to a
//! position and back and names the enclosing declaration.

#![warn(missing_docs)]

mod locate;
mod logging;
mod parse;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Tern: parse and inspect Tern sources through the shared parse cache.
#[derive(Parser, Debug)]
#[command(name = "tern", version, about = "Tern source tools")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `tern.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse files in one batch and report declarations and diagnostics.
    Parse(ParseArgs),
    /// Map a line and column of a file to a position and back.
    Locate(LocateArgs),
}

/// Arguments for the `tern parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Source files to parse.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Skip function bodies.
    #[arg(long)]
    pub header: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `tern locate` subcommand.
#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Source file.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number in bytes (1-indexed).
    pub col: u32,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let config = match pipeline::load_settings(&global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    logging::init(&global, &config.log);

    let result = match cli.command {
        Command::Parse(ref args) => parse::run(args, &global, &config),
        Command::Locate(ref args) => locate::run(args, &global, &config),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_command_defaults() {
        let cli = Cli::parse_from(["tern", "parse", "a.tn", "b.tn"]);
        match cli.command {
            Command::Parse(ref args) => {
                assert_eq!(args.files, [PathBuf::from("a.tn"), PathBuf::from("b.tn")]);
                assert!(!args.header);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn parse_command_with_flags() {
        let cli = Cli::parse_from(["tern", "parse", "--header", "--format", "json", "a.tn"]);
        match cli.command {
            Command::Parse(ref args) => {
                assert!(args.header);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn parse_command_requires_files() {
        assert!(Cli::try_parse_from(["tern", "parse"]).is_err());
    }

    #[test]
    fn locate_command() {
        let cli = Cli::parse_from(["tern", "locate", "main.tn", "3", "7"]);
        match cli.command {
            Command::Locate(ref args) => {
                assert_eq!(args.file, PathBuf::from("main.tn"));
                assert_eq!((args.line, args.col), (3, 7));
            }
            _ => panic!("expected Locate command"),
        }
    }

    #[test]
    fn locate_rejects_non_numeric_line() {
        assert!(Cli::try_parse_from(["tern", "locate", "main.tn", "x", "1"]).is_err());
    }

    #[test]
    fn global_flags() {
        let cli = Cli::parse_from([
            "tern",
            "--quiet",
            "--color",
            "never",
            "--config",
            "/etc/tern.toml",
            "parse",
            "a.tn",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tern.toml")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tern", "parse", "a.tn", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Auto);
    }
}
