mod output;
mod telemetry;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use ppltrace_core::config::SchemaMappings;
use ppltrace_normalize::{
    build_span_tree, generate_color_map, normalize_log_response, normalize_trace_response,
    waterfall_rows,
};
use serde_json::Value;

use crate::output::{print_logs_human, print_services_human, print_spans_human, print_tree_human};
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "ppltrace")]
#[command(about = "Normalize PPL trace/log query responses for inspection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, help = "Schema-mapping override file (TOML)")]
    mappings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Print normalized spans from a trace response")]
    Spans { file: PathBuf },
    #[command(about = "Print normalized log records from a log response")]
    Logs { file: PathBuf },
    #[command(about = "Print the span waterfall for a trace response")]
    Tree { file: PathBuf },
    #[command(about = "Print the service color map for a trace response")]
    Services { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    let mappings = load_mappings(cli.mappings.as_deref())?;

    match cli.command {
        Commands::Spans { file } => {
            let response = read_response(&file)?;
            let hits = normalize_trace_response(&response, &mappings);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                print_spans_human(&hits);
            }
        }
        Commands::Logs { file } => {
            let response = read_response(&file)?;
            let hits = normalize_log_response(&response);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                print_logs_human(&hits);
            }
        }
        Commands::Tree { file } => {
            let response = read_response(&file)?;
            let hits = normalize_trace_response(&response, &mappings);
            let rows = waterfall_rows(&build_span_tree(&hits));
            if cli.json {
                let rows: Vec<Value> = rows
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "spanId": r.span_id,
                            "serviceName": r.service_name,
                            "name": r.name,
                            "depth": r.depth,
                            "offsetNanos": r.offset_nanos,
                            "durationNanos": r.duration_nanos,
                            "isError": r.is_error,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_tree_human(&rows);
            }
        }
        Commands::Services { file } => {
            let response = read_response(&file)?;
            let hits = normalize_trace_response(&response, &mappings);
            let map = generate_color_map(&hits);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                print_services_human(&map);
            }
        }
    }
    Ok(())
}

fn load_mappings(path: Option<&Path>) -> anyhow::Result<SchemaMappings> {
    match path {
        Some(path) => SchemaMappings::load_from(path)
            .with_context(|| format!("failed to load mappings from {}", path.display())),
        None => SchemaMappings::load().context("failed to load schema mappings"),
    }
}

fn read_response(path: &Path) -> anyhow::Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn read_response_parses_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"fields\": [], \"size\": 0}}").unwrap();
        let value = read_response(file.path()).unwrap();
        assert_eq!(value["size"], 0);
    }

    #[test]
    fn read_response_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(read_response(file.path()).is_err());
    }

    #[test]
    fn explicit_mappings_file_must_exist() {
        assert!(load_mappings(Some(Path::new("/nonexistent/mappings.toml"))).is_err());
    }
}
