//! Bridge types produced by the decomposition engine.

use serde::{Deserialize, Serialize};

/// Classification of a bridge step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Baseline and absolute bars
    Neutral,
    Gain,
    Loss,
}

impl Polarity {
    /// Cost-reduction deltas: strictly positive is a gain, anything else a loss
    pub fn of_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Polarity::Gain
        } else {
            Polarity::Loss
        }
    }
}

/// The six steps of the canonical bridge, in causal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    HistoricalProfit,
    LogisticsSavings,
    MarketingEfficiency,
    FeeNegotiation,
    InventoryOptimization,
    OptimizedProfit,
}

impl StepKind {
    pub const ALL: [StepKind; 6] = [
        StepKind::HistoricalProfit,
        StepKind::LogisticsSavings,
        StepKind::MarketingEfficiency,
        StepKind::FeeNegotiation,
        StepKind::InventoryOptimization,
        StepKind::OptimizedProfit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StepKind::HistoricalProfit => "Historical Profit",
            StepKind::LogisticsSavings => "Logistics Savings",
            StepKind::MarketingEfficiency => "Marketing Efficiency",
            StepKind::FeeNegotiation => "Fee Negotiation",
            StepKind::InventoryOptimization => "Inventory Optimization",
            StepKind::OptimizedProfit => "Optimized Profit",
        }
    }

    /// Absolute bars start at zero instead of the running total
    pub fn is_absolute(&self) -> bool {
        matches!(self, StepKind::HistoricalProfit | StepKind::OptimizedProfit)
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One segment of the waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStep {
    pub kind: StepKind,
    pub label: String,
    pub start_value: f64,
    pub end_value: f64,
    pub polarity: Polarity,
}

impl BridgeStep {
    pub(crate) fn new(kind: StepKind, start_value: f64, end_value: f64, polarity: Polarity) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            start_value,
            end_value,
            polarity,
        }
    }

    pub fn delta(&self) -> f64 {
        self.end_value - self.start_value
    }
}

/// Channel-summed Logistics/Marketing/Fees/Revenue for one scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTotals {
    pub logistics: f64,
    pub marketing: f64,
    pub fees: f64,
    pub revenue: f64,
}

/// Full decomposition output for one render pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallBridge {
    pub steps: Vec<BridgeStep>,
    pub historical_totals: ScenarioTotals,
    pub optimized_totals: ScenarioTotals,
    pub historical_profit: f64,
    pub optimized_profit: f64,
    pub logistics_gain: f64,
    pub marketing_gain: f64,
    pub fee_gain: f64,
    /// Informational only; not a bridge step
    pub revenue_gain: f64,
    pub opportunity_capture: f64,
    /// `optimized_profit` minus the running total after the inventory step
    pub unexplained_delta: f64,
}

impl WaterfallBridge {
    pub fn step(&self, kind: StepKind) -> Option<&BridgeStep> {
        self.steps.iter().find(|s| s.kind == kind)
    }

    /// Running total after the last chained step
    pub fn chained_total(&self) -> f64 {
        self.step(StepKind::InventoryOptimization)
            .map(|s| s.end_value)
            .unwrap_or(self.historical_profit)
    }

    /// Optimized minus historical profit
    pub fn total_gain(&self) -> f64 {
        self.optimized_profit - self.historical_profit
    }

    /// The four chained delta steps
    pub fn intermediate_steps(&self) -> impl Iterator<Item = &BridgeStep> {
        self.steps.iter().filter(|s| !s.kind.is_absolute())
    }
}
