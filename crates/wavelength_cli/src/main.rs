//! Command-line front end for Wavelength Lore mention linking.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::json;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wavelength_core::cache::load_entities_cached;
use wavelength_core::catalog::partition_by_kind;
use wavelength_core::constants::DEFAULT_LOG_FILTER;
use wavelength_core::{
    link_passes, Catalog, CatalogCache, Config, Entity, LinkKind, LinkOutcome, LinkPass,
    LinkerError,
};


#[derive(Parser)]
#[command(name = "wlore", about = "Wavelength Lore mention linker", version)]
struct Cli {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for catalog loading and linking
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Wrap entity mentions in text with anchor tags
    Link {
        /// Catalog JSON file; repeat to merge catalogs in order
        #[arg(short, long = "catalog", required = true)]
        catalogs: Vec<PathBuf>,
        /// Link kind for a single pass (defaults to WAVELENGTH_DEFAULT_KIND)
        #[arg(short, long, value_parser = parse_kind, conflicts_with = "by_kind")]
        kind: Option<LinkKind>,
        /// Run one pass per entity kind, in catalog order
        ///
        /// Longest-first matching only holds within a pass: an earlier kind's
        /// shorter term claims text first, so "Tidewell" (lore) splits a later
        /// episode titled "Tidewell Rising". Omit this flag to rank all terms
        /// together.
        #[arg(long)]
        by_kind: bool,
        /// Read text from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the term index in linking order
    Terms {
        /// Catalog JSON file; repeat to merge catalogs in order
        #[arg(short, long = "catalog", required = true)]
        catalogs: Vec<PathBuf>,
        /// Only list terms claimed by more than one entity
        #[arg(long)]
        ambiguous: bool,
    },
}

fn parse_kind(raw: &str) -> Result<LinkKind, String> {
    if raw.trim().is_empty() {
        return Err("kind must not be blank".to_string());
    }
    Ok(LinkKind::from(raw))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn exit_with(action: &str, message: impl std::fmt::Display) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

/// Load and concatenate catalogs, keeping file order then entry order.
fn load_catalogs(cache: &CatalogCache, paths: &[PathBuf]) -> Result<Vec<Entity>, LinkerError> {
    let mut merged = Vec::new();
    for path in paths {
        let entities = load_entities_cached(cache, path)?;
        merged.extend(entities.iter().cloned());
    }
    Ok(merged)
}

/// Decide which catalog/kind passes a `link` run performs.
fn plan_passes(
    entities: Vec<Entity>,
    kind: Option<LinkKind>,
    by_kind: bool,
    default_kind: &LinkKind,
) -> Vec<(LinkKind, Catalog)> {
    if by_kind {
        return partition_by_kind(entities)
            .into_iter()
            .map(|(kind, group)| (kind, Catalog::new(group)))
            .collect();
    }
    let kind = kind.unwrap_or_else(|| default_kind.clone());
    vec![(kind, Catalog::new(entities))]
}

fn run_plan(text: &str, plan: &[(LinkKind, Catalog)]) -> LinkOutcome {
    let passes: Vec<LinkPass<'_>> = plan
        .iter()
        .map(|(kind, catalog)| LinkPass { catalog, kind })
        .collect();
    link_passes(text, &passes)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn format_link_output(outcome: &LinkOutcome, json: bool) -> Result<String, String> {
    if json {
        return encode_json(outcome);
    }
    Ok(outcome.text.clone())
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("output encoding error: {}", err))
}

fn format_terms_output(catalog: &Catalog, ambiguous: bool, json: bool) -> Result<String, String> {
    if ambiguous {
        let terms = catalog.ambiguous_terms();
        if json {
            let rows: Vec<serde_json::Value> = terms
                .iter()
                .map(|term| {
                    let owners: Vec<serde_json::Value> = term
                        .entities
                        .iter()
                        .map(|entity| json!({ "name": entity.name, "url": entity.url }))
                        .collect();
                    json!({ "term": term.key, "entities": owners })
                })
                .collect();
            return encode_json(&rows);
        }
        let lines: Vec<String> = terms
            .iter()
            .map(|term| {
                let owners: Vec<&str> = term.entities.iter().map(|e| e.name.as_str()).collect();
                format!("{:<30} {}", term.key, owners.join(" > "))
            })
            .collect();
        return Ok(lines.join("\n"));
    }

    if json {
        let rows: Vec<serde_json::Value> = catalog
            .terms()
            .map(|term| {
                json!({
                    "term": term.original,
                    "name": term.entity.name,
                    "url": term.entity.url,
                    "kind": term.entity.kind,
                })
            })
            .collect();
        return encode_json(&rows);
    }
    let lines: Vec<String> = catalog
        .terms()
        .map(|term| {
            format!(
                "{:<30} {:<30} {}",
                term.original, term.entity.name, term.entity.url
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

fn main() -> anyhow::Result<()> {
    let Cli {
        json,
        timing,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    init_tracing();
    let config = Config::from_env();
    let cache = CatalogCache::new(config.effective_catalog_ttl());

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before setup"),
        Commands::Link {
            catalogs,
            kind,
            by_kind,
            file,
        } => {
            let load_start = Instant::now();
            let entities = match load_catalogs(&cache, &catalogs) {
                Ok(entities) => entities,
                Err(err) => exit_with("Link", err),
            };
            log_timing(timing, "load catalogs", load_start.elapsed());

            let text = read_input(file.as_deref())?;
            let plan = plan_passes(entities, kind, by_kind, &config.default_kind);

            let link_start = Instant::now();
            let outcome = run_plan(&text, &plan);
            log_timing(timing, "link", link_start.elapsed());
            tracing::info!(
                "Linked {} mention(s) across {} pass(es)",
                outcome.mentions.len(),
                plan.len()
            );

            match format_link_output(&outcome, json) {
                Ok(output) => print_output(&output),
                Err(message) => exit_with("Link", message),
            }
        }
        Commands::Terms {
            catalogs,
            ambiguous,
        } => {
            let entities = match load_catalogs(&cache, &catalogs) {
                Ok(entities) => entities,
                Err(err) => exit_with("Terms", err),
            };
            let catalog = Catalog::new(entities);
            match format_terms_output(&catalog, ambiguous, json) {
                Ok(output) => print_output(&output),
                Err(message) => exit_with("Terms", message),
            }
        }
    }

    Ok(())
}
