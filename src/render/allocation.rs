//! Channel allocation mix: one doughnut segment per channel.

use std::collections::BTreeMap;

use super::{RenderContext, RenderedView, ViewRenderer};
use crate::chart::{ChartDescription, ChartKind, Series, SeriesValue, Slot, Tone};
use crate::error::Result;
use crate::format::{percent, share_of};

/// Total allocated units. Summed as `f64` so arbitrarily large counts cannot overflow.
pub fn total_units(allocation: &BTreeMap<String, u64>) -> f64 {
    allocation.values().map(|units| *units as f64).sum()
}

/// Percentage share of each channel, in channel order. All zero when nothing
/// is allocated.
pub fn channel_shares(allocation: &BTreeMap<String, u64>) -> Vec<(String, f64)> {
    let total = total_units(allocation);
    allocation
        .iter()
        .map(|(channel, units)| (channel.clone(), share_of(*units as f64, total)))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelAllocationView;

impl ViewRenderer for ChannelAllocationView {
    fn slot(&self) -> Slot {
        Slot::Allocation
    }

    fn build(&self, ctx: &RenderContext<'_>) -> Result<RenderedView> {
        let allocation = &ctx.result.optimized.allocation;
        let total = total_units(allocation);
        let largest = allocation.values().copied().max().unwrap_or(0);

        let categories: Vec<String> = allocation.keys().cloned().collect();
        let values = allocation
            .values()
            .map(|units| SeriesValue::Scalar(*units as f64))
            .collect();
        let tones = allocation
            .values()
            .map(|units| Tone::classify(largest > 0 && *units == largest, false))
            .collect();

        let description = ChartDescription::new(
            Slot::Allocation,
            ChartKind::Doughnut,
            "Optimized Channel Allocation",
            categories,
        )
        .with_series(Series::new("Allocated units", ChartKind::Doughnut, values, tones, ctx.palette));

        let mut caption = if allocation.is_empty() {
            "No channel allocation was produced.".to_string()
        } else {
            let shares: Vec<String> = channel_shares(allocation)
                .into_iter()
                .map(|(channel, share)| format!("{} {}", channel, percent(share)))
                .collect();
            format!(
                "Optimal channel mix: {} of {} units.",
                shares.join(", "),
                ctx.formatter.units(total)
            )
        };

        let direct = &ctx.captions.direct_channel;
        match allocation.get(direct).copied().filter(|units| *units > 0) {
            Some(units) => {
                let value = units as f64 * ctx.captions.ltv_per_unit;
                caption.push_str(&format!(
                    " {} (direct) receives {} units, worth {} in long-term customer value.",
                    direct,
                    ctx.formatter.units(units as f64),
                    ctx.formatter.currency(value)
                ));
            }
            None => {
                caption.push_str(&format!(" {} (direct) receives no allocation.", direct));
            }
        }

        Ok(RenderedView::new(description, caption))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{context_parts, sample_result};

    #[test]
    fn test_shares_sum_to_hundred() {
        let allocation = BTreeMap::from([
            ("Amazon".to_string(), 1u64),
            ("Flipkart".to_string(), 1),
            ("Own_Website".to_string(), 1),
        ]);
        let shares = channel_shares(&allocation);
        let sum: f64 = shares.iter().map(|(_, s)| s).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let rounded: f64 = shares
            .iter()
            .map(|(_, s)| (s * 10.0).round() / 10.0)
            .sum();
        assert!((rounded - 100.0).abs() <= 0.15);
    }

    #[test]
    fn test_zero_total_reports_zero_shares() {
        let allocation = BTreeMap::from([
            ("Amazon".to_string(), 0u64),
            ("Own_Website".to_string(), 0),
        ]);
        let shares = channel_shares(&allocation);
        assert!(shares.iter().all(|(_, s)| *s == 0.0));

        let mut result = sample_result();
        result.optimized.allocation = allocation;
        let parts = context_parts();
        let view = ChannelAllocationView.build(&parts.context(&result)).unwrap();
        assert_eq!(
            view.caption,
            "Optimal channel mix: Amazon 0.0%, Own_Website 0.0% of 0 units. \
             Own_Website (direct) receives no allocation."
        );
        assert!(view.description.series[0].tones.iter().all(|t| *t == Tone::Neutral));
    }

    #[test]
    fn test_caption_and_styling() {
        let result = sample_result();
        let parts = context_parts();
        let view = ChannelAllocationView.build(&parts.context(&result)).unwrap();

        assert_eq!(
            view.caption,
            "Optimal channel mix: Amazon 45.0%, Flipkart 35.0%, Own_Website 20.0% of 40,000 units. \
             Own_Website (direct) receives 8,000 units, worth ₹3,200,000 in long-term customer value."
        );
        assert_eq!(view.description.kind, ChartKind::Doughnut);
        assert_eq!(
            view.description.series[0].tones,
            vec![Tone::Accent, Tone::Neutral, Tone::Neutral]
        );
    }

    #[test]
    fn test_huge_unit_counts_do_not_overflow() {
        let allocation = BTreeMap::from([
            ("Amazon".to_string(), u64::MAX),
            ("Flipkart".to_string(), 1),
        ]);
        assert_eq!(total_units(&allocation), 18_446_744_073_709_551_616.0);
        let shares = channel_shares(&allocation);
        assert!((shares[0].1 - 100.0).abs() < 1e-9);
        assert!(shares[1].1 < 1e-9);

        let mut result = sample_result();
        result.optimized.allocation = allocation;
        let parts = context_parts();
        let view = ChannelAllocationView.build(&parts.context(&result)).unwrap();
        assert!(view
            .caption
            .starts_with("Optimal channel mix: Amazon 100.0%, Flipkart 0.0% of 18,446,744,073,709,551,616 units."));
        assert_eq!(view.description.series[0].tones, vec![Tone::Accent, Tone::Neutral]);
    }

    #[test]
    fn test_empty_allocation() {
        let mut result = sample_result();
        result.optimized.allocation.clear();
        let parts = context_parts();
        let view = ChannelAllocationView.build(&parts.context(&result)).unwrap();
        assert_eq!(
            view.caption,
            "No channel allocation was produced. Own_Website (direct) receives no allocation."
        );
        assert!(view.description.categories.is_empty());
    }
}
