use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tagscrape::{Document, DynamicValue, Schema};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// HTML file to decode, `-` reads stdin
    pub input: String,

    /// Schema file (overrides config)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Pretty print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn decode(args: DecodeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let schema_path = match &args.schema {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_schema_path(cwd),
    };
    let schema = load_schema(&schema_path)?;

    let source = read_input(&args.input, cwd)?;
    let output = decode_source(&source, &schema)?;

    let rendered = if args.pretty || config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

/// Decode an HTML source with a schema into JSON
pub fn decode_source(source: &str, schema: &Schema) -> Result<Value> {
    let document = Document::parse(source);
    debug!(parse_errors = document.html().errors.len(), "Parsed document");

    let mut value = DynamicValue::new(schema);
    document.unmarshal(&mut value)?;

    info!("Decoded document");
    Ok(value.to_json())
}

pub fn load_schema(path: &Path) -> Result<Schema> {
    if !path.exists() {
        return Err(anyhow!("Schema file does not exist: {}", path.display()));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    Schema::from_json(&content).with_context(|| format!("Invalid schema {}", path.display()))
}

/// Read the input as text, replacing invalid UTF-8 sequences
fn read_input(input: &str, cwd: &str) -> Result<String> {
    let bytes = if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        bytes
    } else {
        let path = PathBuf::from(cwd).join(input);
        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
