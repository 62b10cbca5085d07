use anyhow::{Context, Result};
use clap::Parser;
use open_bin_pipeline::config::StockConfig;
use open_bin_pipeline::fetcher::source_from_config;
use open_bin_pipeline::models::PlantSummary;
use open_bin_pipeline::processor::Facets;
use open_bin_pipeline::{PageView, StockSession};
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "open-bin", about = "Ingests a warehouse stock export and prints plant summaries")]
struct Args {
    /// Path to the TOML configuration
    #[arg(long, default_value = "src/configs/open_bin.toml")]
    config: String,

    /// Override the configured source (URL or file path)
    #[arg(long)]
    source: Option<String>,

    /// Free-text search over material number, description and long text
    #[arg(long, short, default_value = "")]
    query: String,

    /// Site code facet, or "all"
    #[arg(long)]
    site: Option<String>,

    /// Category facet (exact), or "all"
    #[arg(long)]
    category: Option<String>,

    /// Status facet ("Available", "Low Stock", "No Stock"), or "all"
    #[arg(long)]
    status: Option<String>,

    /// Page of the filtered view to print (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Print the page as JSON instead of a table
    #[arg(long, default_value = "false")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    let mut config = if Path::new(&args.config).exists() {
        StockConfig::from_file(&args.config)
            .with_context(|| format!("Failed to load config from {}", args.config))?
    } else {
        warn!("Config file not found: {}, using defaults", args.config);
        let mut config = StockConfig::default();
        config.load_overrides()?;
        config
    };
    if let Some(source) = &args.source {
        config.source.location = source.clone();
    }
    config.validate()?;

    info!("🚀 Starting stock ingestion for {} ({})", config.source.name, config.source.location);

    let source = source_from_config(&config)?;
    let mut session = StockSession::from_config(&config)?;
    let report = session.refresh(source.as_ref()).await?;

    info!(
        "✅ Ingested {} rows into {} records ({} without site, {} unclassified)",
        report.data_rows,
        report.expanded_records,
        report.unresolved_sites,
        report.unclassified_statuses
    );
    if !report.unmapped_fields.is_empty() {
        warn!("⚠️ Unmapped fields: {}", report.unmapped_fields.join(", "));
    }

    let facets = Facets::from_inputs(
        args.site.as_deref(),
        args.category.as_deref(),
        args.status.as_deref(),
    )?;
    session.set_filter(&args.query, facets);
    let page_number = session.go_to_page(args.page)?;
    if page_number != args.page {
        warn!("Page {} out of range, showing page {}", args.page, page_number);
    }

    let page = session.current_page()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let dataset = session.snapshot()?;
    println!("Last update: {}", dataset.ingested_at().format("%Y-%m-%d %H:%M:%S"));
    println!();
    print_summary(&session.filtered_summary()?);
    println!();
    print_page(&page);

    Ok(())
}

fn print_summary(summaries: &[PlantSummary]) {
    println!("=== Summary by plant ===");
    if summaries.is_empty() {
        println!("(no classified records with a known site)");
    }
    for s in summaries {
        let filled = (s.available_pct / 10.0).round() as usize;
        println!(
            "{:<4} [{:<10}] {:>5.1}%  A:{} | L:{} | N:{}  Total: {}",
            s.site.code(),
            "#".repeat(filled.min(10)),
            s.available_pct,
            s.available,
            s.low,
            s.none,
            s.total
        );
    }
}

fn print_page(page: &PageView<'_>) {
    println!(
        "{:<4} {:<10} {:<12} {:<10} {:<30} {}",
        "Site", "Material", "Category", "Status", "Description", "Long text"
    );
    for r in &page.rows {
        println!(
            "{:<4} {:<10} {:<12} {:<10} {:<30} {}",
            r.site_label(),
            r.material_no,
            r.category,
            r.status_class.label(),
            r.description,
            r.long_text
        );
    }
    println!();
    println!("Page {} / {}  ({} items)", page.number, page.total_pages, page.total_items);
}
