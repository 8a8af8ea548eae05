//! Profit-bridge decomposition.
//!
//! Splits the move from historical to optimized profit into attributable
//! steps: logistics, marketing and fee cost reductions, plus the opportunity
//! recaptured from previously stocked-out demand. The first and last bars are
//! absolute; the four in between chain off the running total. The final bar
//! restates the scenario's own optimized profit and is not reconciled against
//! the chain, so whatever the chain does not explain is reported as
//! `unexplained_delta`.

pub mod types;

pub use types::*;

use crate::config::DecompositionConfig;
use crate::error::{InsightError, Result};
use crate::model::{AnalysisResult, ChannelMetrics};

/// Margin assumed on recaptured lost sales
pub const DEFAULT_RECOVERY_MARGIN: f64 = 0.30;

/// Sum each cost/revenue component across channels. Empty input sums to zero.
pub fn aggregate<'a, I>(channels: I) -> ScenarioTotals
where
    I: IntoIterator<Item = &'a ChannelMetrics>,
{
    channels
        .into_iter()
        .fold(ScenarioTotals::default(), |mut acc, m| {
            acc.logistics += m.logistics;
            acc.marketing += m.marketing;
            acc.fees += m.fees;
            acc.revenue += m.revenue;
            acc
        })
}

#[derive(Debug, Clone, Copy)]
pub struct DecompositionEngine {
    recovery_margin: f64,
}

impl Default for DecompositionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RECOVERY_MARGIN)
    }
}

impl DecompositionEngine {
    pub fn new(recovery_margin: f64) -> Self {
        Self { recovery_margin }
    }

    pub fn from_config(config: &DecompositionConfig) -> Self {
        Self::new(config.recovery_margin)
    }

    pub fn recovery_margin(&self) -> f64 {
        self.recovery_margin
    }

    /// Build the six-step bridge for `result`
    pub fn decompose(&self, result: &AnalysisResult) -> Result<WaterfallBridge> {
        let lost_sales = result.historical.lost_sales;
        if lost_sales < 0.0 {
            return Err(InsightError::InvalidInput(format!(
                "lost-sales value must not be negative, got {}",
                lost_sales
            )));
        }

        let hist = aggregate(result.historical.channel_metrics.values());
        let opt = aggregate(result.optimized.financials.values());

        if let Some(reported) = result.historical.logistics_baseline {
            if (reported - hist.logistics).abs() >= 1.0 {
                log::debug!(
                    "Reported historical logistics {:.0} differs from channel sum {:.0}",
                    reported,
                    hist.logistics
                );
            }
        }

        // Cost reductions count as gains
        let logistics_gain = hist.logistics - opt.logistics;
        let marketing_gain = hist.marketing - opt.marketing;
        let fee_gain = hist.fees - opt.fees;
        let revenue_gain = opt.revenue - hist.revenue;
        let opportunity_capture = lost_sales * self.recovery_margin;

        let historical_profit = result.historical.profit;
        let optimized_profit = result.optimized.profit;

        let mut steps = Vec::with_capacity(StepKind::ALL.len());
        steps.push(BridgeStep::new(
            StepKind::HistoricalProfit,
            0.0,
            historical_profit,
            Polarity::Neutral,
        ));

        let chained = [
            (StepKind::LogisticsSavings, logistics_gain, Polarity::of_delta(logistics_gain)),
            (StepKind::MarketingEfficiency, marketing_gain, Polarity::of_delta(marketing_gain)),
            (StepKind::FeeNegotiation, fee_gain, Polarity::of_delta(fee_gain)),
            (StepKind::InventoryOptimization, opportunity_capture, Polarity::Gain),
        ];

        let mut running = historical_profit;
        for (kind, delta, polarity) in chained {
            let end = running + delta;
            steps.push(BridgeStep::new(kind, running, end, polarity));
            running = end;
        }

        steps.push(BridgeStep::new(
            StepKind::OptimizedProfit,
            0.0,
            optimized_profit,
            Polarity::Neutral,
        ));

        let unexplained_delta = optimized_profit - running;

        log::debug!(
            "Bridge: logistics {:.0}, marketing {:.0}, fees {:.0}, capture {:.0}, revenue {:.0}, unexplained {:.0}",
            logistics_gain,
            marketing_gain,
            fee_gain,
            opportunity_capture,
            revenue_gain,
            unexplained_delta
        );

        Ok(WaterfallBridge {
            steps,
            historical_totals: hist,
            optimized_totals: opt,
            historical_profit,
            optimized_profit,
            logistics_gain,
            marketing_gain,
            fee_gain,
            revenue_gain,
            opportunity_capture,
            unexplained_delta,
        })
    }
}
