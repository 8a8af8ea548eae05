use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use adapt_insights::chart::{MemoryBackend, MemorySurface};
use adapt_insights::config::Config;
use adapt_insights::config_loader;
use adapt_insights::format::CaptionFormatter;
use adapt_insights::render::Dashboard;
use adapt_insights::report::{generate_json_report, generate_text_report, print_summary, DashboardExport};
use adapt_insights::service::{AnalysisRequest, AnalysisService, HttpAnalysisService};
use adapt_insights::session::{RunOutcome, Session};

/// Profit bridges and dashboard rendering for ADAPT analyses
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a saved analysis response
    Render {
        /// Path to the analysis response JSON
        #[arg(short, long)]
        result: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Upload a dataset, run an analysis and render the response
    Analyze {
        /// Path to the CSV dataset
        #[arg(short, long)]
        file: PathBuf,

        /// Product to analyze
        #[arg(long, default_value = adapt_insights::model::ALL_PRODUCTS)]
        product: String,

        /// Demand growth rate in percent
        #[arg(long, default_value_t = 15.0, allow_hyphen_values = true)]
        growth_rate: f64,

        /// Holding cost in percent of unit value
        #[arg(long, default_value_t = 20.0)]
        holding_pct: f64,

        /// Fixed cost per order
        #[arg(long, default_value_t = 1500.0)]
        ordering_cost: f64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output directory for dashboard.json and captions.txt
    #[arg(short, long, default_value = "dashboard_output")]
    output: PathBuf,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    // Configuration first, since it carries the default log level
    let config = config_loader::load_or_default(cli.config.as_deref())?;
    let level = cli.log_level.clone().unwrap_or_else(|| config.general.log_level.clone());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Starting ADAPT Insights");
    if let Some(path) = &cli.config {
        info!("Configuration file: {:?}", path);
    }

    let mut session = Session::new();
    let output_dir = match cli.command {
        Command::Render { result, output } => {
            info!("Analysis response: {:?}", result);
            let raw = fs::read_to_string(&result)
                .wrap_err_with(|| format!("Failed to read analysis response '{}'", result.display()))?;
            let value: Value = serde_json::from_str(&raw)
                .wrap_err_with(|| format!("Failed to parse analysis response '{}'", result.display()))?;

            let ticket = session.begin_run();
            session.complete_run(ticket, &value)?;
            output.output
        }
        Command::Analyze {
            file,
            product,
            growth_rate,
            holding_pct,
            ordering_cost,
            output,
        } => {
            let request = AnalysisRequest {
                product_id: product,
                growth_rate,
                holding_pct,
                ordering_cost,
            };
            run_remote_analysis(&config, &mut session, &file, &request)?;
            output.output
        }
    };

    render_and_export(&config, &session, &output_dir)?;

    info!("Dashboard rendering completed successfully");
    Ok(())
}

fn run_remote_analysis(
    config: &Config,
    session: &mut Session,
    dataset: &Path,
    request: &AnalysisRequest,
) -> Result<()> {
    let service = HttpAnalysisService::from_config(&config.service)?;
    info!("Analysis service: {}", service.base_url());

    let upload = service.upload(dataset)?;
    if !upload.products.iter().any(|p| p == &request.product_id) {
        return Err(eyre!(
            "Product '{}' is not in the uploaded dataset (available: {})",
            request.product_id,
            upload.products.join(", ")
        ));
    }
    if let Some(range) = &upload.date_range {
        info!("Dataset covers {}", range);
    }

    let ticket = session.begin_run();
    let raw = match service.analyze(request) {
        Ok(raw) => raw,
        Err(e) => {
            session.fail_run(ticket);
            return Err(e.into());
        }
    };

    match session.complete_run(ticket, &raw)? {
        RunOutcome::Installed { version } => info!("Analysis result v{} installed", version),
        RunOutcome::Stale => return Err(eyre!("Analysis response was superseded")),
    }
    Ok(())
}

fn render_and_export(config: &Config, session: &Session, output_dir: &Path) -> Result<()> {
    let result = session
        .current()
        .ok_or_else(|| eyre!("No analysis result to render"))?;

    let mut dashboard = Dashboard::new(config);
    let mut surface = MemorySurface::full();
    let mut backend = MemoryBackend::new();
    let summary = dashboard.render(result, &mut surface, &mut backend)?;

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let export = DashboardExport::new(&summary, result.product.as_deref(), session.version());
    let formatter = CaptionFormatter::from_config(&config.captions);
    generate_json_report(&export, &output_dir.join("dashboard.json"))?;
    generate_text_report(&export, &formatter, &config.captions, &output_dir.join("captions.txt"))?;

    if let Some(html) = &result.html_report {
        let path = output_dir.join("report.html");
        fs::write(&path, html).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
        info!("Service HTML report written to {}", path.display());
    }

    print_summary(&export, &formatter);
    Ok(())
}
