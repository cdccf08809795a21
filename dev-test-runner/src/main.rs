//! Run declarative fixtures through the converter.
//!
//! Each fixture holds a `schema`, optional `overrides`, and either the
//! `expect`ed table JSON or the `error` kind.
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use json_schema_table::{FieldTable, SchemaNode, path_de, transform};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(about = "Run fixture files through the schema converter")]
struct Args {
    /// Glob pattern of fixture files.
    #[arg(default_value = "fixtures/*.json")]
    pattern: String,
    /// Only run fixtures whose name matches this regex.
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    schema: Value,
    overrides: Option<Value>,
    expect: Option<Value>,
    error: Option<String>,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let Args { pattern, filter } = args;
    let filter = filter
        .map(|raw| Regex::new(&raw).with_context(|| format!("bad --filter regex: {raw}")))
        .transpose()?;

    let mut total = 0usize;
    let mut failed = 0usize;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let fixture: Fixture = path_de::from_str_with_path(&source)
            .with_context(|| format!("malformed fixture {}", path.display()))?;
        if filter.as_ref().is_some_and(|rx| !rx.is_match(&fixture.name)) {
            continue;
        }

        total += 1;
        let name = fixture.name.clone();
        match check(fixture) {
            Ok(()) => println!("✅ {name}"),
            Err(error) => {
                failed += 1;
                println!("❌ {name} ({})\n   {error:#}", path.display());
            }
        }
    }

    if total == 0 {
        bail!("no fixtures matched {pattern}");
    }
    let summary = format!("{}/{total} fixtures passed", total - failed);
    if failed == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
    Ok(failed == 0)
}

fn check(fixture: Fixture) -> Result<()> {
    let overrides = fixture.overrides.map(FieldTable::from_value).transpose()?;
    let outcome = SchemaNode::from_value(fixture.schema)
        .and_then(|schema| transform(&schema, overrides.as_ref()));

    match (outcome, fixture.expect, fixture.error) {
        (Ok(table), Some(expect), None) => {
            let actual = serde_json::to_value(&table)?;
            if actual != expect {
                bail!("table mismatch\n   expected: {expect}\n   actual:   {actual}");
            }
            Ok(())
        }
        (Err(error), None, Some(kind)) if error.kind() == kind => Ok(()),
        (Err(error), None, Some(kind)) => bail!("expected {kind}, got {}: {error}", error.kind()),
        (Ok(table), None, Some(kind)) => bail!("expected {kind}, got a table with {} fields", table.len()),
        (Err(error), Some(_), None) => bail!("unexpected error: {error}"),
        _ => bail!("fixture must set exactly one of `expect` or `error`"),
    }
}
