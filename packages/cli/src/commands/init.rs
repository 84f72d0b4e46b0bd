use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const EXAMPLE_SCHEMA: &str = r#"{
  "type": "record",
  "fields": [
    { "name": "title", "tag": "title", "schema": { "type": "string" } },
    {
      "name": "links",
      "tag": "a[href]",
      "schema": {
        "type": "list",
        "item": {
          "type": "record",
          "fields": [
            { "name": "text", "tag": ",text", "schema": { "type": "string" } },
            { "name": "href", "tag": ",[href]", "schema": { "type": "string" } }
          ]
        }
      }
    }
  ]
}
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Schema file to create
    #[arg(short, long, default_value = "schema.json")]
    pub schema: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "Initializing tagscrape project...".bright_blue().bold());

    let schema_path = PathBuf::from(cwd).join(&args.schema);
    if !schema_path.exists() {
        if let Some(parent) = schema_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&schema_path, EXAMPLE_SCHEMA)?;
        println!("  {} Created {}", "✓".green(), args.schema);
    }

    let config = Config {
        schema: args.schema.clone(),
        pretty: true,
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", args.schema);
    println!("  2. Run: tagscrape decode page.html");

    Ok(())
}
