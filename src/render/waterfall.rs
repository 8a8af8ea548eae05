//! Profit waterfall: the decomposition bridge drawn as floating bars.

use super::{RenderContext, RenderedView, ViewRenderer};
use crate::chart::{ChartDescription, ChartKind, Series, SeriesValue, Slot, Tone};
use crate::error::Result;
use crate::format::{percent, percent_of_baseline};
use crate::waterfall::{BridgeStep, StepKind, WaterfallBridge};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitWaterfallView;

fn step_tone(step: &BridgeStep) -> Tone {
    match step.kind {
        StepKind::OptimizedProfit => Tone::Highlight,
        _ => Tone::for_polarity(step.polarity),
    }
}

impl ProfitWaterfallView {
    fn caption(&self, bridge: &WaterfallBridge, ctx: &RenderContext<'_>) -> String {
        let fmt = ctx.formatter;
        let total = bridge.total_gain();
        let headline = if total >= 0.0 { "Value Creation" } else { "Gap Analysis" };

        let pct = percent_of_baseline(total, bridge.historical_profit, ctx.captions.baseline_epsilon)
            .map(|p| format!(" ({})", percent(p)))
            .unwrap_or_default();

        let drivers: Vec<String> = bridge
            .intermediate_steps()
            .map(|s| format!("{} {}", s.label, fmt.signed_millions(s.delta())))
            .collect();

        [
            format!(
                "{}: {}{}, from {} to {}.",
                headline,
                fmt.signed_millions(total),
                pct,
                fmt.millions(bridge.historical_profit),
                fmt.millions(bridge.optimized_profit)
            ),
            format!("{}.", drivers.join("; ")),
            format!("Revenue change: {}.", fmt.signed_millions(bridge.revenue_gain)),
        ]
        .join("\n")
    }
}

impl ViewRenderer for ProfitWaterfallView {
    fn slot(&self) -> Slot {
        Slot::Waterfall
    }

    fn build(&self, ctx: &RenderContext<'_>) -> Result<RenderedView> {
        let bridge = ctx.engine.decompose(ctx.result)?;

        if bridge.unexplained_delta.abs() >= ctx.captions.baseline_epsilon {
            log::debug!(
                "Optimized profit differs from the chained bridge by {:.0}",
                bridge.unexplained_delta
            );
        }

        let categories = bridge.steps.iter().map(|s| s.label.clone()).collect();
        let values = bridge
            .steps
            .iter()
            .map(|s| SeriesValue::Range([s.start_value, s.end_value]))
            .collect();
        let tones = bridge.steps.iter().map(step_tone).collect();

        let description = ChartDescription::new(
            Slot::Waterfall,
            ChartKind::Bar,
            "Profit Bridge",
            categories,
        )
        .with_series(Series::new("Profit", ChartKind::Bar, values, tones, ctx.palette));

        let caption = self.caption(&bridge, ctx);
        Ok(RenderedView::new(description, caption).with_bridge(bridge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;
    use crate::render::tests::{context_parts, sample_result};

    #[test]
    fn test_reference_caption() {
        let result = sample_result();
        let parts = context_parts();
        let view = ProfitWaterfallView.build(&parts.context(&result)).unwrap();

        let lines: Vec<&str> = view.caption.lines().collect();
        assert_eq!(lines[0], "Value Creation: +₹3.5M (35.0%), from ₹10.0M to ₹13.5M.");
        assert!(lines[0].contains("+₹3.5M (35.0%)"));
        assert_eq!(
            lines[1],
            "Logistics Savings +₹0.4M; Marketing Efficiency +₹0.3M; \
             Fee Negotiation +₹0.1M; Inventory Optimization +₹0.3M."
        );
        assert_eq!(lines[2], "Revenue change: +₹1.0M.");
    }

    #[test]
    fn test_bars_and_tones() {
        let result = sample_result();
        let parts = context_parts();
        let view = ProfitWaterfallView.build(&parts.context(&result)).unwrap();

        let d = &view.description;
        assert_eq!(d.categories.len(), 6);
        assert_eq!(d.categories[0], "Historical Profit");
        assert_eq!(d.categories[5], "Optimized Profit");
        assert_eq!(d.series[0].values[0], SeriesValue::Range([0.0, 10_000_000.0]));
        assert_eq!(d.series[0].values[5], SeriesValue::Range([0.0, 13_500_000.0]));
        assert_eq!(
            d.series[0].tones,
            vec![
                Tone::Neutral,
                Tone::Accent,
                Tone::Accent,
                Tone::Accent,
                Tone::Accent,
                Tone::Highlight
            ]
        );

        let bridge = view.bridge.as_ref().unwrap();
        assert_eq!(bridge.steps[5].end_value, result.optimized.profit);
    }

    #[test]
    fn test_cost_increase_uses_warning() {
        let mut result = sample_result();
        result
            .optimized
            .financials
            .get_mut("Amazon")
            .unwrap()
            .marketing = 2_000_000.0;
        let parts = context_parts();
        let view = ProfitWaterfallView.build(&parts.context(&result)).unwrap();
        assert_eq!(view.description.series[0].tones[2], Tone::Warning);
        assert!(view.caption.contains("Marketing Efficiency -₹1.3M"));
    }

    #[test]
    fn test_zero_baseline_omits_percentage() {
        let mut result = sample_result();
        result.historical.profit = 0.0;
        let parts = context_parts();
        let view = ProfitWaterfallView.build(&parts.context(&result)).unwrap();
        let first = view.caption.lines().next().unwrap();
        assert_eq!(first, "Value Creation: +₹13.5M, from ₹0.0M to ₹13.5M.");
        assert!(!view.caption.contains("NaN"));
        assert!(!view.caption.contains("inf"));
    }

    #[test]
    fn test_profit_decline_headline() {
        let mut result = sample_result();
        result.optimized.profit = 9_500_000.0;
        let parts = context_parts();
        let view = ProfitWaterfallView.build(&parts.context(&result)).unwrap();
        assert!(view
            .caption
            .starts_with("Gap Analysis: -₹0.5M (-5.0%), from ₹10.0M to ₹9.5M."));
    }

    #[test]
    fn test_negative_lost_sales_fails() {
        let mut result = sample_result();
        result.historical.lost_sales = -10.0;
        let parts = context_parts();
        assert!(matches!(
            ProfitWaterfallView.build(&parts.context(&result)),
            Err(InsightError::InvalidInput(_))
        ));
    }
}
