//! Launch Site Assessment CLI
//!
//! Runs a single feasibility analysis and prints a summary.
//!
//! Usage:
//!   assess-site --lat 28.5729 --lon -80.6490 --category model \
//!               --project-type team --safety-level intermediate \
//!               --output analysis.json

use anyhow::Result;
use clap::Parser;
use launch_feasibility::scoring::CategoryAnalysis;
use launch_feasibility::{
    AnalysisRequest, Coordinate, FeasibilityEngine, PlaceInfo, ProjectType, RocketCategory,
    RocketConfiguration, SafetyLevel,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "assess-site",
    about = "Assess rocket launch feasibility at a coordinate"
)]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Rocket category
    #[arg(long, value_enum, default_value_t = RocketCategory::Model)]
    category: RocketCategory,

    /// Model rocket project type
    #[arg(long, value_enum)]
    project_type: Option<ProjectType>,

    /// Model rocket team safety level
    #[arg(long, value_enum)]
    safety_level: Option<SafetyLevel>,

    /// Place name used in narrative text
    #[arg(long)]
    place_name: Option<String>,

    /// Country used in narrative text
    #[arg(long)]
    country: Option<String>,

    /// Use the built-in hazard table instead of the live POI service
    #[arg(long)]
    offline: bool,

    /// Write the full analysis JSON here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("Launch Site Feasibility Assessment");
    info!("{}", "=".repeat(60));

    let place = PlaceInfo {
        city: args.place_name.clone(),
        country: args.country.clone(),
        ..Default::default()
    };
    let coordinate = Coordinate::new(args.lat, args.lon)?.with_place(place);
    let rocket = RocketConfiguration::from_parts(args.category, args.project_type, args.safety_level)?;

    let engine = FeasibilityEngine::from_env(args.offline)?;
    let result = engine.analyze(AnalysisRequest::new(coordinate, rocket)).await?;

    // Zone
    let zone = &result.zone_validation;
    info!(
        "Zone: {:?} ({})",
        zone.severity(),
        if zone.is_valid() { "valid" } else { "not valid" }
    );
    for w in zone.warnings() {
        warn!("  [{:?}] {}", w.warning_type, w.message);
    }

    // Categories
    info!("\nCategory scores:");
    let names = ["Resources", "Legal", "Geographical", "Geopolitical", "Timing", "Practicality"];
    for (name, category) in names.iter().zip(result.categories.all()) {
        let overall = category.overall();
        info!("  {:14} {:>3} | {:?}", name, overall.score(), overall.status());
    }
    info!("  Optimal window: {}", result.categories.timing.optimal_window);

    info!("\n{}", "=".repeat(60));
    info!("OVERALL: {}", result.overall_score);
    info!("{}", "=".repeat(60));
    info!("{}", result.recommendation);

    if let Some(path) = &args.output {
        info!("\nWriting output to {:?}", path);
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &result)?;
    }

    Ok(())
}
