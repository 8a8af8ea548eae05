//! Inventory investment plan: capital bars with a demand line on a second axis.

use super::{RenderContext, RenderedView, ViewRenderer};
use crate::chart::{Axis, ChartDescription, ChartKind, Series, SeriesValue, Slot, Tone};
use crate::config::PeakQuarterRule;
use crate::error::Result;
use crate::model::QuarterPlan;

/// Position of the fourth quarter in a chronological plan
const POSITIONAL_PEAK_INDEX: usize = 3;

/// Index of the quarter the caption presents as the peak
pub fn peak_quarter(plan: &[QuarterPlan], rule: PeakQuarterRule) -> Option<usize> {
    match rule {
        PeakQuarterRule::Positional => {
            (plan.len() > POSITIONAL_PEAK_INDEX).then_some(POSITIONAL_PEAK_INDEX)
        }
        PeakQuarterRule::MaxCapital => plan
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, q)| match best {
                Some((_, capital)) if capital >= q.capital => best,
                _ => Some((i, q.capital)),
            })
            .map(|(i, _)| i),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryPlanView;

impl ViewRenderer for InventoryPlanView {
    fn slot(&self) -> Slot {
        Slot::Inventory
    }

    fn build(&self, ctx: &RenderContext<'_>) -> Result<RenderedView> {
        let inventory = &ctx.result.inventory;
        let plan = &inventory.quarterly_plan;
        let fmt = ctx.formatter;
        let peak = peak_quarter(plan, ctx.captions.peak_quarter);
        if let Some(i) = peak.filter(|i| !plan[*i].is_peak_season()) {
            if let Some(seasonal) = plan.iter().find(|q| q.is_peak_season()) {
                log::debug!(
                    "Caption peak {} is not the seasonal peak {}",
                    plan[i].quarter,
                    seasonal.quarter
                );
            }
        }

        let categories = plan.iter().map(|q| q.quarter.clone()).collect();
        let capital = plan.iter().map(|q| SeriesValue::Scalar(q.capital)).collect();
        let capital_tones = (0..plan.len())
            .map(|i| Tone::classify(peak == Some(i), false))
            .collect();
        let demand = plan.iter().map(|q| SeriesValue::Scalar(q.demand)).collect();
        let demand_tones = vec![Tone::Highlight; plan.len()];

        let description = ChartDescription::new(
            Slot::Inventory,
            ChartKind::Bar,
            "Inventory Investment Plan",
            categories,
        )
        .with_series(Series::new(
            "Capital required",
            ChartKind::Bar,
            capital,
            capital_tones,
            ctx.palette,
        ))
        .with_series(
            Series::new("Forecast demand (units)", ChartKind::Line, demand, demand_tones, ctx.palette)
                .on_axis(Axis::Secondary),
        );

        let mut caption = format!(
            "Order {} units per batch (EOQ).",
            fmt.units(inventory.eoq as f64)
        );

        match peak.map(|i| &plan[i]) {
            Some(q) => caption.push_str(&format!(
                " Peak quarter {}: {} batches requiring {}.",
                q.quarter,
                q.batches,
                fmt.currency(q.capital)
            )),
            None if plan.is_empty() => caption.push_str(" No quarterly plan was produced."),
            None => log::debug!(
                "Quarterly plan has {} entries, no positional peak quarter",
                plan.len()
            ),
        }

        if !plan.is_empty() {
            caption.push_str(&format!(
                " Annual capital requirement: {}.",
                fmt.currency(inventory.total_capital())
            ));
        }

        if let Some(m) = &inventory.metrics {
            caption.push_str(&format!(
                " Annual inventory cost: {} (holding {}, ordering {}), average inventory capital {}.",
                fmt.currency(m.total),
                fmt.currency(m.holding),
                fmt.currency(m.ordering),
                fmt.currency(m.capital)
            ));
        }

        if let Some(annual) = ctx.result.forecast.annual_demand {
            caption.push_str(&format!(" Forecast annual demand: {} units.", fmt.units(annual)));
        }

        Ok(RenderedView::new(description, caption))
    }
}
