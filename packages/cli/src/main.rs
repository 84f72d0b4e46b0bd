mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, decode, init, CheckArgs, DecodeArgs, InitArgs};
use tracing_subscriber::EnvFilter;

/// Tagscrape CLI - decode HTML pages into JSON with a schema
#[derive(Parser, Debug)]
#[command(name = "tagscrape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and an example schema
    Init(InitArgs),

    /// Decode an HTML file into JSON
    Decode(DecodeArgs),

    /// Validate a schema file
    Check(CheckArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Decode(args) => decode(args, &cwd),
        Command::Check(args) => check(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        if let Some(unmarshal) = err.downcast_ref::<tagscrape::UnmarshalError>() {
            let path = unmarshal.path_string();
            if !path.is_empty() {
                eprintln!("  {} {}", "at".dimmed(), path);
            }
        }
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}
