//! Forecast tournament: one bar per model, winner highlighted.

use super::{RenderContext, RenderedView, ViewRenderer};
use crate::chart::{ChartDescription, ChartKind, Series, SeriesValue, Slot, Tone};
use crate::error::Result;
use crate::format::percent;

#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastTournamentView;

impl ViewRenderer for ForecastTournamentView {
    fn slot(&self) -> Slot {
        Slot::Forecast
    }

    fn build(&self, ctx: &RenderContext<'_>) -> Result<RenderedView> {
        let forecast = &ctx.result.forecast;

        let categories: Vec<String> = forecast.errors.keys().cloned().collect();
        let values = forecast
            .errors
            .values()
            .map(|e| SeriesValue::Scalar(*e))
            .collect();
        let tones = forecast
            .errors
            .keys()
            .map(|model| Tone::classify(*model == forecast.winner, false))
            .collect();

        let description = ChartDescription::new(
            Slot::Forecast,
            ChartKind::Bar,
            "Forecast Model Tournament",
            categories,
        )
        .with_series(Series::new("SMAPE error (%)", ChartKind::Bar, values, tones, ctx.palette));

        let models = forecast.errors.len();
        let caption = if models > 1 {
            format!(
                "{} wins the forecast tournament with {} SMAPE, the lowest error of {} models.",
                forecast.winner,
                percent(forecast.winner_error()),
                models
            )
        } else {
            format!(
                "{} is the only forecast model evaluated, with {} SMAPE.",
                forecast.winner,
                percent(forecast.winner_error())
            )
        };

        Ok(RenderedView::new(description, caption))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{context_parts, sample_result};

    #[test]
    fn test_winner_highlighted() {
        let result = sample_result();
        let parts = context_parts();
        let view = ForecastTournamentView.build(&parts.context(&result)).unwrap();

        let d = &view.description;
        assert_eq!(d.categories, vec!["ARIMA", "Prophet", "XGBoost"]);
        assert_eq!(d.series[0].scalars(), vec![15.1, 12.4, 9.8]);
        assert_eq!(d.series[0].tones, vec![Tone::Neutral, Tone::Neutral, Tone::Accent]);
        assert_eq!(
            view.caption,
            "XGBoost wins the forecast tournament with 9.8% SMAPE, the lowest error of 3 models."
        );
    }

    #[test]
    fn test_single_model_caption() {
        let mut result = sample_result();
        result.forecast.errors.retain(|model, _| model == "XGBoost");
        let parts = context_parts();
        let view = ForecastTournamentView.build(&parts.context(&result)).unwrap();
        assert_eq!(
            view.caption,
            "XGBoost is the only forecast model evaluated, with 9.8% SMAPE."
        );
    }
}
