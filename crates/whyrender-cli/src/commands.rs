use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use whyrender_diff::{detect, ComparisonResult};
use whyrender_report::{report_diagnostics, ReportConfig, ReportFormat};
use whyrender_value::{JsonLoader, Value};

use crate::cli::*;

/// Run the parsed command, writing the report to stdout.
///
/// Returns `true` when at least one prop changed.
pub fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_writer(cli, &mut out)
}

pub fn run_with_writer<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<bool> {
    let config = build_config(&cli)?;
    let result = match cli.command {
        Command::Compare(args) => cmd_compare(&args, &config)?,
        Command::Scenario(args) => cmd_scenario(&args, &config)?,
    };

    report_diagnostics(&result, &config, out)?;
    if config.format == ReportFormat::Text {
        write_summary(&result, &config);
    }
    Ok(!result.is_empty())
}

fn build_config(cli: &Cli) -> anyhow::Result<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(tag) = &cli.tag {
        config.tag = tag.clone();
    }
    if let Some(name) = &cli.name {
        config.display_name = name.clone();
    }
    if let Some(format) = cli.format {
        config.format = match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        };
    }
    if cli.no_color {
        config.color = false;
    }
    Ok(config)
}

fn cmd_compare(args: &CompareArgs, config: &ReportConfig) -> anyhow::Result<ComparisonResult> {
    let loader = JsonLoader::new();
    let previous = loader.load(&read_json(&args.previous)?)?;
    let next = loader.load(&read_json(&args.next)?)?;
    tracing::debug!(previous = %args.previous.display(), next = %args.next.display(), "comparing files");
    compare(config, &previous, &next)
}

fn cmd_scenario(args: &ScenarioArgs, config: &ReportConfig) -> anyhow::Result<ComparisonResult> {
    let doc = read_json(&args.file)?;
    let doc = doc
        .as_object()
        .ok_or_else(|| anyhow!("{}: scenario must be a JSON object", args.file.display()))?;

    let mut loader = JsonLoader::new();
    if let Some(shared) = doc.get("shared") {
        let shared = shared
            .as_object()
            .ok_or_else(|| anyhow!("\"shared\" must be an object"))?;
        for (name, json) in shared {
            loader
                .define(name.clone(), json)
                .with_context(|| format!("loading shared value {name:?}"))?;
        }
        tracing::debug!(count = shared.len(), "loaded shared values");
    }

    let Some(previous) = doc.get("previous") else {
        bail!("{}: missing \"previous\"", args.file.display());
    };
    let Some(next) = doc.get("next") else {
        bail!("{}: missing \"next\"", args.file.display());
    };
    let previous = loader.load(previous).context("loading previous props")?;
    let next = loader.load(next).context("loading next props")?;
    compare(config, &previous, &next)
}

fn compare(config: &ReportConfig, previous: &Value, next: &Value) -> anyhow::Result<ComparisonResult> {
    let result = detect(&config.tag, &config.display_name, previous, next, None)?;
    tracing::debug!(changed = result.len(), props_equal = result.props_equal, "detection finished");
    Ok(result)
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_summary(result: &ComparisonResult, config: &ReportConfig) {
    let line = if result.is_empty() {
        "✓ No props changed.".to_string()
    } else {
        format!("✗ {} prop(s) changed.", result.len())
    };
    if !config.color {
        eprintln!("{line}");
    } else if result.is_empty() {
        eprintln!("{}", line.green().bold());
    } else {
        eprintln!("{}", line.yellow().bold());
    }
}
