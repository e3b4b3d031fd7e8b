//! Implementation of the `stockledger` command.

use crate::inputs::{self, DEFAULT_LIST};
use crate::report::{self, FileReport};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

const USAGE: &str = "\
Usage:
  stockledger <file1> <file2> ...
or place paths one per line in input_files.txt";

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain output lines, one blank line between files (default)
    #[default]
    Text,
    /// A single JSON document for tooling integration
    Json,
}

/// Replay inventory logs and report stock levels and profit/loss.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Inventory log files to process, in order
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// File listing input paths, read when no FILE is given
    #[arg(short, long, value_name = "LIST", default_value = DEFAULT_LIST)]
    pub list: PathBuf,

    /// Show verbose output, including why a file was invalidated
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

fn run(args: &Args) -> Result<ExitCode> {
    let Some(files) = inputs::resolve(&args.files, &args.list)? else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    };

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => {
            // Stream each block so earlier files are reported even if a
            // later one cannot be read
            for (i, path) in files.iter().enumerate() {
                let file_report = report::process_file(path)?;
                report::write_text_block(&mut stdout, &file_report, i == 0)?;
            }
        }
        OutputFormat::Json => {
            let reports = files
                .iter()
                .map(|path| report::process_file(path))
                .collect::<Result<Vec<FileReport>>>()?;
            report::write_json(&mut stdout, reports)?;
        }
    }
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

/// Main entry point.
pub fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["stockledger"]).unwrap();
        assert!(args.files.is_empty());
        assert_eq!(args.list, PathBuf::from(DEFAULT_LIST));
        assert!(matches!(args.format, OutputFormat::Text));
    }

    #[test]
    fn test_args_files_and_format() {
        let args =
            Args::try_parse_from(["stockledger", "-f", "json", "a.txt", "b.txt"]).unwrap();
        assert_eq!(args.files, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(matches!(args.format, OutputFormat::Json));
    }
}
