//! # ADAPT Insights - Profit bridges and dashboard rendering for ADAPT analyses
//!
//! This library turns the response of the ADAPT demand/channel analysis
//! service into a set of coordinated visualizations with explanatory captions.
//!
//! ## Overview
//!
//! An analysis run produces a forecast model tournament, an optimized channel
//! allocation, historical and optimized per-channel financials and a quarterly
//! inventory plan. ADAPT Insights validates that response, decomposes the
//! profit lift into an additive bridge, and renders four views onto a surface
//! while keeping exactly one live chart per slot across repeated runs.
//!
//! ## Key Features
//!
//! - **Strict Adapter**: Malformed responses fail with the offending field path
//! - **Profit Bridge**: Logistics, marketing, fee and inventory gains chained from
//!   historical to optimized profit, with the unexplained remainder exposed
//! - **Chart Lifecycle**: Slot-indexed registry, destroy before recreate, no leaks
//! - **Captions**: One formatter for all currency, percentages and units
//! - **Stale Responses**: Superseded analysis responses are detected and dropped
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `error`: Error type shared by all operations
//! - `config`: Type-safe configuration structures
//! - `config_loader`: Configuration file loading and validation
//! - `model`: Analysis result types and the result adapter
//! - `waterfall`: Profit bridge decomposition engine
//! - `format`: Caption number formatting
//! - `chart`: Chart descriptions, backend traits and the lifecycle manager
//! - `render`: The four view renderers and the render pass
//! - `session`: Current-result slot with request versioning
//! - `service`: Upload and analysis client
//! - `report`: JSON and text export of a rendered dashboard
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use adapt_insights::chart::{MemoryBackend, MemorySurface};
//! use adapt_insights::render::Dashboard;
//! use adapt_insights::{config_loader, model};
//!
//! let config = config_loader::load_or_default(None)?;
//! let raw = std::fs::read_to_string("analysis.json")?;
//! let result = model::parse_result(&raw)?;
//!
//! let mut dashboard = Dashboard::new(&config);
//! let mut surface = MemorySurface::full();
//! let mut backend = MemoryBackend::new();
//! let summary = dashboard.render(&result, &mut surface, &mut backend)?;
//!
//! if let Some(bridge) = summary.bridge() {
//!     println!("Total gain: {}", bridge.total_gain());
//! }
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every section is optional:
//!
//! ```yaml
//! general:
//!   log_level: info
//!
//! decomposition:
//!   recovery_margin: 0.30
//!
//! captions:
//!   currency_symbol: "₹"
//!   direct_channel: "Own_Website"
//!   ltv_per_unit: 400
//!   peak_quarter: positional   # or max_capital
//!
//! service:
//!   base_url: "http://localhost:5000"
//!   timeout: "120s"
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`error::Result`] with an [`error::InsightError`].
//! Adapter and decomposition errors abort a render pass before any chart is
//! created. File loading and export use `color_eyre` for context-rich reports.

pub mod error;
pub mod config;
pub mod config_loader;
pub mod model;
pub mod waterfall;
pub mod format;
pub mod chart;
pub mod render;
pub mod session;
pub mod service;
pub mod report;
