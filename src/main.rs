//! duoview - replay layout scenarios on the in-memory host
//!
//! Usage:
//!   duoview samples/split_results.yaml
//!   duoview samples/split_results.yaml --json
//!   duoview samples/map_swap.yaml --width 1600 --scale 1.5

use anyhow::{Context, Result};
use clap::Parser;

use duoview::cli::{CliArgs, OutputFormat};
use duoview::config::LayoutConfig;
use duoview::host::Placement;
use duoview::layout::BatchEntry;
use duoview::scenario::{self, Scenario, ScenarioReport};

fn print_entries(title: &str, entries: &[BatchEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{}", title);
    println!(
        "  {:>6}  {:<28} {:<24} {:<6}",
        "panel", "role", "placement", "z"
    );
    for entry in entries {
        let placement = match entry.placement {
            Placement::Show(r) => format!("{}x{} @ ({}, {})", r.width, r.height, r.x, r.y),
            Placement::Hide => "hidden".to_string(),
        };
        println!(
            "  {:>6}  {:<28} {:<24} {:<6}",
            entry.panel.0,
            format!("{:?}", entry.role),
            placement,
            format!("{:?}", entry.z)
        );
    }
}

fn print_table(report: &ScenarioReport) {
    println!("scenario: {}", report.name);
    match report.client {
        Some(client) => println!("client:   {}x{}", client.width, client.height),
        None => println!("client:   minimized (pass skipped)"),
    }
    println!("passes:   {}", report.passes);
    print_entries("batch:", &report.batch);
    print_entries("cleanup:", &report.cleanup);
    if let Some(focused) = report.focused {
        println!("focus:    panel {}", focused.0);
    }
    for request in &report.scroll_requests {
        println!("scroll:   {:?}", request);
    }
    for error in &report.errors {
        println!("error:    {}", error);
    }
}

fn main() -> Result<()> {
    duoview::tracing::init();

    let run_config = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let config = match &run_config.config_path {
        Some(path) => LayoutConfig::load_from(path),
        None => LayoutConfig::load(),
    };

    let mut scenario = Scenario::load(&run_config.scenario)?;
    if let Some(width) = run_config.size.0 {
        scenario.width = width;
    }
    if let Some(height) = run_config.size.1 {
        scenario.height = height;
    }
    if let Some(scale) = run_config.scale {
        scenario.scale = scale;
    }

    let run = scenario::run(&scenario, config)
        .with_context(|| format!("replaying {}", run_config.scenario.display()))?;
    let report = ScenarioReport::new(&scenario, &run);

    match run_config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}
