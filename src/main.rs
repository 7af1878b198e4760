use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cloud_node_registry::{
    CloudNode, CsvExporter, DataLoader, DataValidator, Provider, QueryEngine, Registry, Settings,
};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("stats");

    if command == "help" || command == "--help" || command == "-h" {
        print_usage();
        return Ok(());
    }

    let settings = Settings::new().context("Failed to load Registry.toml settings")?;
    info!(data_dir = %settings.data_dir.display(), "Loaded configuration");

    let loader = DataLoader::new(settings.provider_sources()?);
    let registry = loader.load_all().context("Failed to load provider datasets")?;

    match command {
        "stats" => run_stats(&registry),
        "coverage" => run_coverage(&registry),
        "validate" => run_validate(&registry),
        "search" => {
            let keyword = args.get(1).map(String::as_str).unwrap_or("");
            print_nodes(&QueryEngine::new(&registry).search(keyword));
            Ok(())
        }
        "country" => {
            let Some(country) = args.get(1) else {
                bail!("usage: cloud-registry country <name>");
            };
            print_nodes(&QueryEngine::new(&registry).by_country(country));
            Ok(())
        }
        "export" => {
            let Some(output) = args.get(1) else {
                bail!("usage: cloud-registry export <out.csv> [provider]");
            };
            let exporter = CsvExporter::with_options(settings.export_options());
            run_export(&registry, &exporter, Path::new(output), args.get(2))
        }
        other => {
            print_usage();
            bail!("unknown command '{}'", other)
        }
    }
}

fn print_usage() {
    println!("Usage: cloud-registry <command>");
    println!();
    println!("  stats                       per-provider statistics (default)");
    println!("  coverage                    node count per country");
    println!("  validate                    report implausible values");
    println!("  search <keyword>            case-insensitive search");
    println!("  country <name>              nodes in one country");
    println!("  export <out.csv> [provider] flatten nodes to CSV");
}

fn print_nodes(nodes: &[&CloudNode]) {
    for node in nodes {
        println!(
            "{:<14} {:<24} {} / {} / {}  [{}]",
            node.provider,
            node.node_id,
            node.location.country,
            node.location.region,
            node.location.city,
            node.status
        );
    }
    println!("\n✓ {} nodes", nodes.len());
}

fn run_stats(registry: &Registry) -> Result<()> {
    let engine = QueryEngine::new(registry);

    for (provider, stats) in engine.provider_statistics() {
        println!("\n{} ({})", provider.display_name(), provider);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("  Nodes:        {}", stats.total_nodes);
        println!("  Countries:    {}", stats.countries.len());
        println!("  Version:      {}", stats.version);
        println!("  Last updated: {}", stats.last_updated.to_rfc3339());
        for (service_type, count) in &stats.service_types {
            println!("  {:<12}  {}", service_type.as_str(), count);
        }
    }

    println!("\n✓ {} providers, {} nodes", registry.len(), engine.total_nodes());
    Ok(())
}

fn run_coverage(registry: &Registry) -> Result<()> {
    let engine = QueryEngine::new(registry);

    for (country, count) in engine.global_coverage() {
        println!("{:>5}  {}", count, country);
    }
    println!("\n✓ {} countries", engine.countries().len());
    Ok(())
}

fn run_validate(registry: &Registry) -> Result<()> {
    let validator = DataValidator::new();
    let report = validator.validate(registry);

    for (provider, messages) in &report {
        println!("\n{}", provider);
        for message in messages {
            println!("  ✗ {}", message);
        }
    }

    let summary = validator.summary(registry);
    println!("\n{}", summary.summary());

    if !summary.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_export(
    registry: &Registry,
    exporter: &CsvExporter,
    output: &Path,
    provider: Option<&String>,
) -> Result<()> {
    let written = match provider {
        Some(name) => {
            let provider: Provider = name.parse()?;
            let Some(dataset) = registry.get(&provider) else {
                bail!("no data loaded for {}", provider);
            };
            let file = File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            exporter.export_provider(dataset, file)?
        }
        None => exporter.export_to_path(registry, output)?,
    };

    println!("✓ Exported {} nodes to {}", written, output.display());
    Ok(())
}
