//! Normalized entities of one analysis run.

use std::collections::BTreeMap;

/// Sentinel product identifier for the all-products aggregate
pub const ALL_PRODUCTS: &str = "ALL_PRODUCTS";

/// Per-channel financial aggregates for one scenario
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelMetrics {
    pub logistics: f64,
    pub marketing: f64,
    pub fees: f64,
    pub revenue: f64,
}

/// Forecast tournament outcome
#[derive(Debug, Clone)]
pub struct ForecastSummary {
    /// SMAPE percentage per model
    pub errors: BTreeMap<String, f64>,
    /// Model with the lowest error; always a key of `errors`
    pub winner: String,
    pub annual_demand: Option<f64>,
}

impl ForecastSummary {
    pub fn winner_error(&self) -> f64 {
        self.errors.get(&self.winner).copied().unwrap_or_default()
    }
}

/// The optimized channel scenario
#[derive(Debug, Clone)]
pub struct OptimizedScenario {
    pub allocation: BTreeMap<String, u64>,
    pub profit: f64,
    pub financials: BTreeMap<String, ChannelMetrics>,
}

/// Historical baseline
#[derive(Debug, Clone)]
pub struct HistoricalBaseline {
    pub profit: f64,
    /// Value of demand lost to stockouts
    pub lost_sales: f64,
    /// Global logistics cost, sent as an optional third `totals` entry
    pub logistics_baseline: Option<f64>,
    pub channel_metrics: BTreeMap<String, ChannelMetrics>,
}

/// One fiscal quarter of the procurement plan
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterPlan {
    pub quarter: String,
    pub capital: f64,
    pub demand: f64,
    pub batches: u64,
    pub seasonality: Option<String>,
}

impl QuarterPlan {
    pub fn is_peak_season(&self) -> bool {
        self.seasonality.as_deref() == Some("Peak")
    }
}

/// Annual cost breakdown at the EOQ batch size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryMetrics {
    pub holding: f64,
    pub ordering: f64,
    /// Holding plus ordering
    pub total: f64,
    /// Capital tied up in average inventory
    pub capital: f64,
}

/// EOQ-based procurement plan
#[derive(Debug, Clone)]
pub struct InventoryPlan {
    pub eoq: u64,
    pub metrics: Option<InventoryMetrics>,
    /// Chronological, one entry per quarter
    pub quarterly_plan: Vec<QuarterPlan>,
}

impl InventoryPlan {
    pub fn total_capital(&self) -> f64 {
        self.quarterly_plan.iter().map(|q| q.capital).sum()
    }
}

/// Root of one completed analysis run
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub product: Option<String>,
    pub forecast: ForecastSummary,
    pub optimized: OptimizedScenario,
    pub historical: HistoricalBaseline,
    pub inventory: InventoryPlan,
    /// Pre-rendered narrative markup, passed through untouched
    pub html_report: Option<String>,
}
