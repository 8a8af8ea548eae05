//! Report generation for rendered dashboards.
//!
//! Generates both a JSON export (chart descriptions plus captions) and a
//! human-readable caption report.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::chart::Slot;
use crate::config::CaptionConfig;
use crate::format::{percent_of_baseline, signed_percent, CaptionFormatter};
use crate::render::{RenderSummary, RenderedView};
use crate::waterfall::WaterfallBridge;

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub generated_at: String,
    pub product: String,
    /// Session version of the result that was rendered
    pub version: u64,
    pub charts_drawn: bool,
    pub skipped: Vec<Slot>,
}

/// Everything one render pass produced, ready to serialize
#[derive(Debug, Clone, Serialize)]
pub struct DashboardExport {
    pub metadata: ExportMetadata,
    pub views: Vec<RenderedView>,
}

impl DashboardExport {
    pub fn new(summary: &RenderSummary, product: Option<&str>, version: u64) -> Self {
        Self {
            metadata: ExportMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                product: product.unwrap_or(crate::model::ALL_PRODUCTS).to_string(),
                version,
                charts_drawn: summary.charts_drawn,
                skipped: summary.skipped.clone(),
            },
            views: summary.views.clone(),
        }
    }

    pub fn bridge(&self) -> Option<&WaterfallBridge> {
        self.views.iter().find_map(|v| v.bridge.as_ref())
    }
}

/// Generate JSON report
pub fn generate_json_report(export: &DashboardExport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export).context("Failed to serialize dashboard to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

fn banner(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(80));
    lines.push(format!("{:^80}", title));
    lines.push("=".repeat(80));
    lines.push(String::new());
}

/// Generate human-readable caption report
pub fn generate_text_report(
    export: &DashboardExport,
    formatter: &CaptionFormatter,
    captions: &CaptionConfig,
    output_path: &Path,
) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    banner(&mut lines, "ADAPT ANALYTICS DASHBOARD");
    lines.push(format!("Generated: {}", export.metadata.generated_at));
    lines.push(format!("Product: {}", export.metadata.product));
    lines.push(format!("Result version: {}", export.metadata.version));
    if !export.metadata.charts_drawn {
        lines.push("Charts: not drawn (charting library unavailable)".to_string());
    }
    lines.push(String::new());

    for view in &export.views {
        banner(&mut lines, &view.description.title.to_uppercase());
        lines.extend(view.caption.lines().map(str::to_string));
        lines.push(String::new());
    }

    if let Some(bridge) = export.bridge() {
        banner(&mut lines, "PROFIT BRIDGE");
        for step in &bridge.steps {
            let amount = if step.kind.is_absolute() {
                formatter.currency(step.end_value)
            } else {
                formatter.currency(step.delta())
            };
            lines.push(format!("  {:<24} {:>18}", step.label, amount));
        }
        let change = percent_of_baseline(
            bridge.total_gain(),
            bridge.historical_profit,
            captions.baseline_epsilon,
        );
        if let Some(pct) = change {
            lines.push(format!("  {:<24} {:>18}", "Change", signed_percent(pct)));
        }
        lines.push(String::new());
    }

    if !export.metadata.skipped.is_empty() {
        let skipped: Vec<String> = export.metadata.skipped.iter().map(|s| s.to_string()).collect();
        lines.push(format!("Skipped slots: {}", skipped.join(", ")));
        lines.push(String::new());
    }

    fs::write(output_path, lines.join("\n"))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a short summary to stdout
pub fn print_summary(export: &DashboardExport, formatter: &CaptionFormatter) {
    println!("\n=== ADAPT DASHBOARD SUMMARY ===\n");
    println!("Product: {}", export.metadata.product);
    println!("Views rendered: {}", export.views.len());
    println!("Charts drawn: {}", if export.metadata.charts_drawn { "yes" } else { "no" });

    if let Some(bridge) = export.bridge() {
        println!("\nProfit Bridge:");
        println!("  Historical: {}", formatter.compact(bridge.historical_profit));
        println!("  Optimized: {}", formatter.compact(bridge.optimized_profit));
        println!("  Total gain: {}", formatter.signed_millions(bridge.total_gain()));
        println!("  Opportunity capture: {}", formatter.compact(bridge.opportunity_capture));
    }

    if !export.metadata.skipped.is_empty() {
        println!("\nSkipped slots: {}", export.metadata.skipped.len());
    }
    println!();
}
