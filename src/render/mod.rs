//! View renderers and the render pass that drives them.
//!
//! A render pass tears down every live chart, builds all views, and only then
//! installs charts and captions. A failing view aborts the pass before any
//! chart is created, so a partial chart set is never shown.

pub mod allocation;
pub mod forecast;
pub mod inventory;
pub mod waterfall;

pub use allocation::{channel_shares, total_units, ChannelAllocationView};
pub use forecast::ForecastTournamentView;
pub use inventory::{peak_quarter, InventoryPlanView};
pub use waterfall::ProfitWaterfallView;

use serde::Serialize;

use crate::chart::{ChartBackend, ChartDescription, ChartLifecycleManager, Palette, RenderSurface, Slot};
use crate::config::{CaptionConfig, Config};
use crate::error::Result;
use crate::format::CaptionFormatter;
use crate::model::AnalysisResult;
use crate::waterfall::{DecompositionEngine, WaterfallBridge};

/// Everything a renderer reads during one pass
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub result: &'a AnalysisResult,
    pub formatter: &'a CaptionFormatter,
    pub palette: &'a Palette,
    pub captions: &'a CaptionConfig,
    pub engine: &'a DecompositionEngine,
}

/// A built view: chart description plus caption
#[derive(Debug, Clone, Serialize)]
pub struct RenderedView {
    pub description: ChartDescription,
    pub caption: String,
    /// Set by the waterfall view only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<WaterfallBridge>,
}

impl RenderedView {
    pub fn new(description: ChartDescription, caption: String) -> Self {
        Self {
            description,
            caption,
            bridge: None,
        }
    }

    pub fn with_bridge(mut self, bridge: WaterfallBridge) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn slot(&self) -> Slot {
        self.description.slot
    }
}

pub trait ViewRenderer {
    fn slot(&self) -> Slot;

    /// Shape the chart description and caption
    fn build(&self, ctx: &RenderContext<'_>) -> Result<RenderedView>;

    /// Build the view if the surface hosts this renderer's slot; `None` otherwise
    fn prepare(&self, ctx: &RenderContext<'_>, surface: &dyn RenderSurface) -> Result<Option<RenderedView>> {
        if !surface.has_slot(self.slot()) {
            log::debug!("Slot {} not present on surface, skipping", self.slot());
            return Ok(None);
        }
        self.build(ctx).map(Some)
    }

    /// Replace the slot's caption with the view's
    fn attach(&self, view: &RenderedView, surface: &mut dyn RenderSurface) {
        surface.set_caption(self.slot(), &view.caption);
    }
}

/// Outcome of one render pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderSummary {
    pub views: Vec<RenderedView>,
    pub skipped: Vec<Slot>,
    /// False when the charting library was unavailable and only captions were attached
    pub charts_drawn: bool,
}

impl RenderSummary {
    pub fn view(&self, slot: Slot) -> Option<&RenderedView> {
        self.views.iter().find(|v| v.slot() == slot)
    }

    pub fn bridge(&self) -> Option<&WaterfallBridge> {
        self.views.iter().find_map(|v| v.bridge.as_ref())
    }
}

/// Blank every caption after an aborted pass
fn clear_captions(surface: &mut dyn RenderSurface) {
    for slot in Slot::ALL {
        if surface.has_slot(slot) {
            surface.clear_caption(slot);
        }
    }
}

/// Owns the lifecycle manager and the four renderers
pub struct Dashboard {
    manager: ChartLifecycleManager,
    renderers: Vec<Box<dyn ViewRenderer>>,
    formatter: CaptionFormatter,
    palette: Palette,
    captions: CaptionConfig,
    engine: DecompositionEngine,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        Self {
            manager: ChartLifecycleManager::new(),
            renderers: vec![
                Box::new(ForecastTournamentView),
                Box::new(ChannelAllocationView),
                Box::new(ProfitWaterfallView),
                Box::new(InventoryPlanView),
            ],
            formatter: CaptionFormatter::from_config(&config.captions),
            palette: Palette::from_config(&config.palette),
            captions: config.captions.clone(),
            engine: DecompositionEngine::from_config(&config.decomposition),
        }
    }

    pub fn manager(&self) -> &ChartLifecycleManager {
        &self.manager
    }

    /// Run one render pass for `result`
    pub fn render<S, B>(&mut self, result: &AnalysisResult, surface: &mut S, backend: &mut B) -> Result<RenderSummary>
    where
        S: RenderSurface,
        B: ChartBackend,
    {
        self.manager.destroy_all(backend);

        let ctx = RenderContext {
            result,
            formatter: &self.formatter,
            palette: &self.palette,
            captions: &self.captions,
            engine: &self.engine,
        };

        let mut summary = RenderSummary::default();
        let mut built = Vec::with_capacity(self.renderers.len());
        for (i, renderer) in self.renderers.iter().enumerate() {
            match renderer.prepare(&ctx, &*surface) {
                Ok(Some(view)) => built.push((i, view)),
                Ok(None) => summary.skipped.push(renderer.slot()),
                Err(e) => {
                    log::warn!("Render pass aborted in {}: {}", renderer.slot(), e);
                    clear_captions(&mut *surface);
                    return Err(e);
                }
            }
        }

        summary.charts_drawn = backend.is_available();
        if summary.charts_drawn {
            for (_, view) in &built {
                if let Err(e) = self.manager.install(&view.description, backend) {
                    log::warn!("Rolling back render pass: {}", e);
                    self.manager.destroy_all(backend);
                    clear_captions(&mut *surface);
                    return Err(e);
                }
            }
        } else {
            log::warn!("Charting library unavailable, attaching captions only");
        }

        for (i, view) in &built {
            self.renderers[*i].attach(view, &mut *surface);
        }

        log::info!(
            "Rendered {} view(s), skipped {}",
            built.len(),
            summary.skipped.len()
        );
        summary.views = built.into_iter().map(|(_, view)| view).collect();
        Ok(summary)
    }

    /// Tear down every chart, e.g. when the session resets
    pub fn clear<B: ChartBackend>(&mut self, backend: &mut B) -> usize {
        self.manager.destroy_all(backend)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::adapt_result;
    use serde_json::json;

    pub(crate) fn sample_json() -> serde_json::Value {
        json!({
            "product": "ALL_PRODUCTS",
            "forecast": {
                "errors": {"Prophet": 12.4, "XGBoost": 9.8, "ARIMA": 15.1},
                "winner": "XGBoost",
                "annual_demand": 40000
            },
            "scenarios": {
                "optimized": {
                    "allocation": {"Amazon": 18000, "Flipkart": 14000, "Own_Website": 8000},
                    "profit": 13500000,
                    "financials": {
                        "Amazon": {"Logistics": 1000000, "Marketing": 450000, "Fees": 850000, "Revenue": 9500000},
                        "Own_Website": {"Logistics": 600000, "Marketing": 300000, "Fees": 95000, "Revenue": 3500000}
                    }
                }
            },
            "historical": {
                "totals": [10000000, 1000000, 2000000],
                "channel_metrics": {
                    "Amazon": {"Logistics": 1200000, "Marketing": 600000, "Fees": 900000, "Revenue": 9000000},
                    "Own_Website": {"Logistics": 800000, "Marketing": 400000, "Fees": 100000, "Revenue": 3000000}
                }
            },
            "inventory": {
                "EOQ": 1200,
                "quarterly_plan": [
                    {"Quarter": "Q1 (Jan-Mar)", "Seasonality": "Standard", "Demand": 6000, "Batches": 5, "Capital": 3000000},
                    {"Quarter": "Q2 (Apr-Jun)", "Seasonality": "Standard", "Demand": 10000, "Batches": 9, "Capital": 5400000},
                    {"Quarter": "Q3 (Jul-Sep)", "Seasonality": "Standard", "Demand": 8000, "Batches": 7, "Capital": 4200000},
                    {"Quarter": "Q4 (Oct-Dec)", "Seasonality": "Peak", "Demand": 16000, "Batches": 14, "Capital": 8400000}
                ]
            },
            "html_report": "<div>report</div>"
        })
    }

    pub(crate) fn sample_result() -> AnalysisResult {
        adapt_result(&sample_json()).unwrap()
    }

    pub(crate) struct ContextParts {
        pub formatter: CaptionFormatter,
        pub palette: Palette,
        pub captions: CaptionConfig,
        pub engine: DecompositionEngine,
    }

    impl ContextParts {
        pub fn context<'a>(&'a self, result: &'a AnalysisResult) -> RenderContext<'a> {
            RenderContext {
                result,
                formatter: &self.formatter,
                palette: &self.palette,
                captions: &self.captions,
                engine: &self.engine,
            }
        }
    }

    pub(crate) fn context_parts() -> ContextParts {
        ContextParts {
            formatter: CaptionFormatter::default(),
            palette: Palette::default(),
            captions: CaptionConfig::default(),
            engine: DecompositionEngine::default(),
        }
    }

    use crate::chart::{MemoryBackend, MemorySurface};

    #[test]
    fn test_full_pass_renders_every_slot() {
        let mut dashboard = Dashboard::default();
        let mut surface = MemorySurface::full();
        let mut backend = MemoryBackend::new();

        let summary = dashboard
            .render(&sample_result(), &mut surface, &mut backend)
            .unwrap();

        assert_eq!(summary.views.len(), 4);
        assert!(summary.skipped.is_empty());
        assert!(summary.charts_drawn);
        assert!(summary.bridge().is_some());
        for slot in Slot::ALL {
            assert_eq!(backend.live_in(slot), 1);
            assert!(surface.caption(slot).is_some());
        }
    }

    #[test]
    fn test_missing_slots_are_skipped() {
        let mut dashboard = Dashboard::default();
        let mut surface = MemorySurface::with_slots(&[Slot::Waterfall]);
        let mut backend = MemoryBackend::new();

        let summary = dashboard
            .render(&sample_result(), &mut surface, &mut backend)
            .unwrap();

        assert_eq!(summary.views.len(), 1);
        assert_eq!(
            summary.skipped,
            vec![Slot::Forecast, Slot::Allocation, Slot::Inventory]
        );
        assert_eq!(backend.live_total(), 1);
    }

    #[test]
    fn test_decomposition_error_renders_nothing() {
        let mut dashboard = Dashboard::default();
        let mut surface = MemorySurface::full();
        let mut backend = MemoryBackend::new();

        dashboard
            .render(&sample_result(), &mut surface, &mut backend)
            .unwrap();

        assert!(surface.caption(Slot::Forecast).is_some());

        let mut bad = sample_result();
        bad.historical.lost_sales = -1.0;
        assert!(dashboard.render(&bad, &mut surface, &mut backend).is_err());
        assert_eq!(backend.live_total(), 0);
        assert_eq!(dashboard.manager().live_count(), 0);
        assert_eq!(surface.captions().count(), 0);
    }

    #[test]
    fn test_unavailable_backend_attaches_captions_only() {
        let mut dashboard = Dashboard::default();
        let mut surface = MemorySurface::full();
        let mut backend = MemoryBackend::new();
        backend.set_available(false);

        let summary = dashboard
            .render(&sample_result(), &mut surface, &mut backend)
            .unwrap();
        assert!(!summary.charts_drawn);
        assert_eq!(backend.created(), 0);
        assert_eq!(surface.captions().count(), 4);
    }
}
