//! Request and response shapes for the analysis service.

use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};
use crate::model::ALL_PRODUCTS;

pub const DEFAULT_GROWTH_RATE: f64 = 15.0;
pub const DEFAULT_HOLDING_PCT: f64 = 20.0;
pub const DEFAULT_ORDERING_COST: f64 = 1500.0;

const GROWTH_RATE_RANGE: (f64, f64) = (-50.0, 200.0);
const HOLDING_PCT_RANGE: (f64, f64) = (0.0, 100.0);

/// Successful upload acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Selectable products, including `ALL_PRODUCTS`
    pub products: Vec<String>,
    pub records: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
}

/// Parameters of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub product_id: String,
    /// Demand growth, percent
    pub growth_rate: f64,
    /// Annual holding cost as a percent of unit value
    pub holding_pct: f64,
    /// Fixed cost per order
    pub ordering_cost: f64,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            product_id: ALL_PRODUCTS.to_string(),
            growth_rate: DEFAULT_GROWTH_RATE,
            holding_pct: DEFAULT_HOLDING_PCT,
            ordering_cost: DEFAULT_ORDERING_COST,
        }
    }
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    value.is_finite() && value >= lo && value <= hi
}

impl AnalysisRequest {
    /// Reject parameters the service would refuse
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(InsightError::InvalidInput("product id must not be empty".into()));
        }
        if !within(self.growth_rate, GROWTH_RATE_RANGE) {
            return Err(InsightError::InvalidInput(format!(
                "growth rate must be between -50% and 200%, got {}",
                self.growth_rate
            )));
        }
        if !within(self.holding_pct, HOLDING_PCT_RANGE) {
            return Err(InsightError::InvalidInput(format!(
                "holding cost must be between 0% and 100%, got {}",
                self.holding_pct
            )));
        }
        if !self.ordering_cost.is_finite() || self.ordering_cost < 0.0 {
            return Err(InsightError::InvalidInput(format!(
                "ordering cost must not be negative, got {}",
                self.ordering_cost
            )));
        }
        Ok(())
    }

    /// Form fields in the order the service reads them
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("product_id", self.product_id.clone()),
            ("growth_rate", self.growth_rate.to_string()),
            ("holding_pct", self.holding_pct.to_string()),
            ("ordering_cost", self.ordering_cost.to_string()),
        ]
    }
}
