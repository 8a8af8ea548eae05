//! Declarative chart descriptions handed to the charting capability.

use serde::{Deserialize, Serialize};

use crate::config::PaletteConfig;
use crate::waterfall::Polarity;

/// Named target location on the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Forecast,
    Allocation,
    Waterfall,
    Inventory,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Forecast, Slot::Allocation, Slot::Waterfall, Slot::Inventory];

    /// Stable element identifier of the slot on the host page
    pub fn id(&self) -> &'static str {
        match self {
            Slot::Forecast => "forecastChart",
            Slot::Allocation => "allocationChart",
            Slot::Waterfall => "waterfallChart",
            Slot::Inventory => "inventoryChart",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Slot::Forecast => 0,
            Slot::Allocation => 1,
            Slot::Waterfall => 2,
            Slot::Inventory => 3,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Doughnut,
    Line,
}

/// Styling class of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Winner or net improvement
    Accent,
    Neutral,
    /// Net-negative step
    Warning,
    /// Closing absolute bar
    Highlight,
}

impl Tone {
    /// Winner/positive/negative rule: negative wins over highlighted
    pub fn classify(highlighted: bool, negative: bool) -> Tone {
        if negative {
            Tone::Warning
        } else if highlighted {
            Tone::Accent
        } else {
            Tone::Neutral
        }
    }

    pub fn for_polarity(polarity: Polarity) -> Tone {
        match polarity {
            Polarity::Gain => Tone::Accent,
            Polarity::Loss => Tone::Warning,
            Polarity::Neutral => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Primary,
    Secondary,
}

/// A plain value or a floating `[from, to]` bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValue {
    Scalar(f64),
    Range([f64; 2]),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub accent: String,
    pub neutral: String,
    pub warning: String,
    pub highlight: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&PaletteConfig::default())
    }
}

impl Palette {
    pub fn from_config(config: &PaletteConfig) -> Self {
        Self {
            accent: config.accent.clone(),
            neutral: config.neutral.clone(),
            warning: config.warning.clone(),
            highlight: config.highlight.clone(),
        }
    }

    pub fn color(&self, tone: Tone) -> &str {
        match tone {
            Tone::Accent => &self.accent,
            Tone::Neutral => &self.neutral,
            Tone::Warning => &self.warning,
            Tone::Highlight => &self.highlight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub kind: ChartKind,
    pub axis: Axis,
    pub values: Vec<SeriesValue>,
    /// One tone per category
    pub tones: Vec<Tone>,
    /// `tones` resolved through the palette
    pub colors: Vec<String>,
}

impl Series {
    pub fn new(
        label: impl Into<String>,
        kind: ChartKind,
        values: Vec<SeriesValue>,
        tones: Vec<Tone>,
        palette: &Palette,
    ) -> Self {
        let colors = tones.iter().map(|t| palette.color(*t).to_string()).collect();
        Self {
            label: label.into(),
            kind,
            axis: Axis::Primary,
            values,
            tones,
            colors,
        }
    }

    pub fn on_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn scalars(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| match v {
                SeriesValue::Scalar(x) => *x,
                SeriesValue::Range([from, to]) => to - from,
            })
            .collect()
    }
}

/// Everything the charting capability needs to draw one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDescription {
    pub slot: Slot,
    pub kind: ChartKind,
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartDescription {
    pub fn new(slot: Slot, kind: ChartKind, title: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            slot,
            kind,
            title: title.into(),
            categories,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn has_secondary_axis(&self) -> bool {
        self.series.iter().any(|s| s.axis == Axis::Secondary)
    }
}
