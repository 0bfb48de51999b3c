//! abtest-sim: simulate UI/UX A/B test outcomes from the command line or over HTTP.

use abtest_api::ApiServer;
use abtest_core::config::AppConfig;
use abtest_core::types::{ArmResult, SimulationOutput, Winner};
use abtest_core::{Catalog, SimulationRequest};
use abtest_engine::SimulationEngine;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "abtest-sim")]
#[command(about = "UI/UX A/B test outcome simulator")]
#[command(version)]
struct Cli {
    /// Optional TOML config file (environment variables still apply on top)
    #[arg(long, global = true, env = "ABTEST_SIM_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one simulated test and print the outcome
    Simulate {
        /// Test definition id (see `catalog`)
        #[arg(short, long)]
        test: Option<String>,

        /// Segment id (see `catalog`)
        #[arg(short, long)]
        segment: Option<String>,

        /// Total visitors across both variants
        #[arg(short, long, allow_hyphen_values = true)]
        visitors: Option<i64>,

        /// Percent of traffic sent to variant A
        #[arg(long)]
        split: Option<f64>,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u32>,

        /// Print the raw JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the available tests and segments
    Catalog {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Serve the REST API
    Serve {
        /// HTTP port (overrides config)
        #[arg(long, env = "ABTEST_SIM__API__HTTP_PORT")]
        http_port: Option<u16>,

        /// Metrics port (overrides config)
        #[arg(long, env = "ABTEST_SIM__METRICS__PORT")]
        metrics_port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abtest_sim=info,abtest_api=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let catalog = Catalog::builtin();

    match cli.command {
        Commands::Simulate {
            test,
            segment,
            visitors,
            split,
            seed,
            json,
        } => {
            let request = SimulationRequest {
                test_id: test,
                segment_id: segment,
                traffic_split_percent: split,
                total_visitors: visitors,
                seeded: seed.is_some(),
                seed,
            };
            cmd_simulate(&config, &catalog, &request, json)
        }
        Commands::Catalog { json } => cmd_catalog(&catalog, json),
        Commands::Serve {
            http_port,
            metrics_port,
        } => {
            let mut config = config;
            if let Some(port) = http_port {
                config.api.http_port = port;
            }
            if let Some(port) = metrics_port {
                config.metrics.port = port;
            }
            cmd_serve(config, catalog).await
        }
    }
}

fn cmd_simulate(
    config: &AppConfig,
    catalog: &Catalog,
    request: &SimulationRequest,
    json: bool,
) -> anyhow::Result<()> {
    let input = request.resolve(catalog, &config.simulation).map_err(|e| {
        error!(error = %e, code = e.code(), "Invalid simulation request");
        e
    })?;

    let engine = SimulationEngine::new(&config.model);
    let output = engine.simulate(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&output);
    }
    Ok(())
}

fn cmd_catalog(catalog: &Catalog, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    println!("Tests:");
    for test in &catalog.tests {
        println!("  {:<18} {}", test.id, test.name);
        println!(
            "  {:<18}   A: {} ({}) \"{}\"",
            "", test.variant_a.name, test.variant_a.appeal_type, test.variant_a.headline
        );
        println!(
            "  {:<18}   B: {} ({}) \"{}\"",
            "", test.variant_b.name, test.variant_b.appeal_type, test.variant_b.headline
        );
    }
    println!();
    println!("Segments:");
    for segment in &catalog.segments {
        let w = &segment.weights;
        println!(
            "  {:<18} {:<20} price={:.1} convenience={:.1} urgency={:.1} speed={:.1} aov={:.2}",
            segment.id,
            segment.name,
            w.price,
            w.convenience,
            w.urgency,
            w.speed,
            segment.average_order_value
        );
    }
    Ok(())
}

async fn cmd_serve(config: AppConfig, catalog: Catalog) -> anyhow::Result<()> {
    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        "Configuration loaded"
    );

    let engine = Arc::new(SimulationEngine::new(&config.model));
    let server = ApiServer::new(config, engine, Arc::new(catalog));

    if let Err(e) = server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("abtest-sim is ready to serve traffic");
    server.start_http().await
}

fn print_report(output: &SimulationOutput) {
    print_arm("A", &output.variant_a);
    print_arm("B", &output.variant_b);
    println!();
    let winner = match output.winner {
        Winner::A => output.variant_a.variant_name.as_str(),
        Winner::B => output.variant_b.variant_name.as_str(),
        Winner::Tie => "none (tie)",
    };
    println!("Winner:        {winner}");
    println!("Improvement:   {:+.2}% (B vs A)", output.improvement_percent);
    println!("Confidence:    {:.1}%", output.confidence_percent);
    println!("Revenue lift:  {:+.2}% per visitor", output.revenue_lift_percent);
    if let Some(seed) = output.seed {
        println!("Seed:          {seed}");
    }
    println!();
    println!("{}", output.recommendation_text);
}

/// A named config file must load; environment-only config falls back to defaults.
fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    if let Some(path) = path {
        return Ok(AppConfig::load_from(Some(path))?);
    }
    Ok(AppConfig::load_from(None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    }))
}

fn print_arm(label: &str, arm: &ArmResult) {
    println!(
        "{label}: {:<16} visitors={:<8} conversions={:<7} rate={:.3}% revenue={:.2}",
        arm.variant_name,
        arm.visitors,
        arm.conversions,
        arm.conversion_rate * 100.0,
        arm.revenue
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_config_file_must_load() {
        let err = load_config(Some("/nonexistent/abtest-sim-cli.toml")).unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_env_only_config_loads() {
        let config = load_config(None).unwrap();
        assert!(config.simulation.max_visitors > 0);
    }
}
