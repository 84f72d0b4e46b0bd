use super::decode::load_schema;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tagscrape::{Schema, Tag};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema file to validate
    pub schema: String,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.schema);
    let schema = load_schema(&path)?;

    let warnings = lint_schema(&schema);
    for warning in &warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }

    println!(
        "{} {} is a valid schema",
        "✓".green(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

/// Report annotations that will not do what they look like
pub fn lint_schema(schema: &Schema) -> Vec<String> {
    let mut warnings = Vec::new();
    lint_at(schema, "", &mut warnings);
    warnings
}

fn lint_at(schema: &Schema, path: &str, warnings: &mut Vec<String>) {
    match schema {
        Schema::Record { fields } => {
            for field in fields {
                let field_path = format!("{}.{}", path, field.name);
                let tag = Tag::parse(&field.tag);
                if tag.is_empty() {
                    warnings.push(format!("{}: no tag, field is never decoded", field_path));
                }
                if let Schema::Map { .. } = field.schema {
                    if tag.selector(1).is_empty() {
                        warnings.push(format!("{}: map without a key selector in slot 1", field_path));
                    }
                }
                lint_at(&field.schema, &field_path, warnings);
            }
        }
        Schema::List { item } | Schema::Array { item, .. } => {
            lint_at(item, &format!("{}[]", path), warnings)
        }
        Schema::Map { value } => lint_at(value, &format!("{}{{}}", path), warnings),
        _ => {}
    }
}
