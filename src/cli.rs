//! Minimal CLI: schema → (table | check)
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::field::OverrideTable;
use crate::schema::SchemaNode;
use crate::transform::{DEFAULT_MAX_DEPTH, TransformOptions, Transformer};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert JSON-Schema object contracts into key-value table field definitions
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// log filter (e.g. `debug`, `json_schema_table=trace`); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert one schema and print its field table as JSON
    Table(TableOut),
    /// convert every selected schema in parallel and report failures
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (one schema per line)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /definitions/User)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document (e.g. '.components.schemas[]')
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct TransformSettings {
    /// maximum nesting depth of object schemas below the root
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(clap::Parser, Debug)]
struct TableOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    transform_settings: TransformSettings,

    /// JSON file with partial field descriptors merged over the result
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    transform_settings: TransformSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One schema document after pointer / jq selection.
#[derive(Debug)]
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (index, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let label = format!("{source_path_str}:{}", index + 1);
                    let value = serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse JSON line ({label})"))?;
                    self.select(label, value, &mut out)?;
                }
            } else {
                let value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                self.select(source_path_str, value, &mut out)?;
            }
        }
        debug!(documents = out.len(), "loaded schema documents");
        Ok(out)
    }

    fn select(&self, label: String, value: Value, out: &mut Vec<Document>) -> Result<()> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {label}"))?,
        };
        match self.jq_expr.as_ref() {
            None => out.push(Document { label, value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::select_with_jq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to {label}"))?;
                let many = results.len() > 1;
                for (index, value) in results.into_iter().enumerate() {
                    let label = if many { format!("{label}#{index}") } else { label.clone() };
                    out.push(Document { label, value });
                }
            }
        }
        Ok(())
    }
}

impl TransformSettings {
    fn transformer(&self) -> Transformer {
        Transformer::new(TransformOptions { max_depth: self.max_depth })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Table(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }

                let documents = target.input_settings.load_documents()?;
                let [document] = <[Document; 1]>::try_from(documents).map_err(|documents| {
                    anyhow!("`table` needs exactly one schema document, the inputs selected {}", documents.len())
                })?;
                let overrides = target.overrides.as_deref().map(load_overrides).transpose()?;

                let schema = SchemaNode::from_value(document.value)
                    .with_context(|| format!("invalid schema document ({})", document.label))?;
                let table = target
                    .transform_settings
                    .transformer()
                    .transform(&schema, overrides.as_ref())
                    .with_context(|| format!("failed to convert {}", document.label))?;
                info!(fields = table.len(), source = %document.label, "converted schema");

                let table_src = if target.compact {
                    serde_json::to_string(&table)?
                } else {
                    serde_json::to_string_pretty(&table)?
                };
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &table_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{table_src}");
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }

                let documents = target.input_settings.load_documents()?;
                let transformer = target.transform_settings.transformer();
                let outcomes = documents
                    .into_par_iter()
                    .map(|document| {
                        let outcome = SchemaNode::from_value(document.value)
                            .and_then(|schema| transformer.transform(&schema, None));
                        (document.label, outcome)
                    })
                    .collect::<Vec<_>>();

                let mut failed = 0usize;
                for (label, outcome) in &outcomes {
                    match outcome {
                        Ok(table) => println!("{} {label} ({} fields)", "ok".green(), table.len()),
                        Err(error) => {
                            failed += 1;
                            println!("{} {label}: [{}] {error}", "FAIL".red().bold(), error.kind());
                        }
                    }
                }
                let summary = format!("{}/{} schemas converted", outcomes.len() - failed, outcomes.len());
                if failed == 0 {
                    println!("{}", summary.green());
                    Ok(ExitCode::SUCCESS)
                } else {
                    println!("{}", summary.red());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_overrides(path: &Path) -> Result<OverrideTable> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read overrides ({})", path.display()))?;
    OverrideTable::from_str(&source)
        .with_context(|| format!("invalid override table ({})", path.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
