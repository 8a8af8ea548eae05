//! Normalizes the raw analysis response into an [`AnalysisResult`].
//!
//! The response is walked as generic JSON so every failure can name the
//! offending field path.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::types::*;
use crate::error::{InsightError, Result};

/// Parse and normalize a response body
pub fn parse_result(body: &str) -> Result<AnalysisResult> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| InsightError::malformed("$", format!("invalid JSON: {}", e)))?;
    adapt_result(&raw)
}

/// Normalize an already-decoded response
pub fn adapt_result(raw: &Value) -> Result<AnalysisResult> {
    let root = as_object(raw, "$")?;

    let forecast = adapt_forecast(field(root, "$", "forecast")?)?;

    let scenarios = as_object(field(root, "$", "scenarios")?, "scenarios")?;
    let optimized = adapt_optimized(field(scenarios, "scenarios", "optimized")?)?;

    let historical = adapt_historical(field(root, "$", "historical")?)?;
    let inventory = adapt_inventory(field(root, "$", "inventory")?)?;

    let html_report = match root.get("html_report") {
        None | Some(Value::Null) => None,
        Some(Value::String(html)) => Some(html.clone()),
        Some(_) => return Err(InsightError::malformed("html_report", "expected a string")),
    };

    let product = root
        .get("product")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    log::debug!(
        "Adapted analysis result: {} models, {} optimized channels, {} historical channels, {} quarters",
        forecast.errors.len(),
        optimized.financials.len(),
        historical.channel_metrics.len(),
        inventory.quarterly_plan.len()
    );

    Ok(AnalysisResult {
        product,
        forecast,
        optimized,
        historical,
        inventory,
        html_report,
    })
}

fn adapt_forecast(value: &Value) -> Result<ForecastSummary> {
    let obj = as_object(value, "forecast")?;

    let errors_obj = as_object(field(obj, "forecast", "errors")?, "forecast.errors")?;
    let mut errors = BTreeMap::new();
    for (model, err) in errors_obj {
        let path = format!("forecast.errors.{}", model);
        errors.insert(model.clone(), number(err, &path)?);
    }

    let winner = field(obj, "forecast", "winner")?
        .as_str()
        .ok_or_else(|| InsightError::malformed("forecast.winner", "expected a string"))?
        .to_string();

    if !errors.contains_key(&winner) {
        return Err(InsightError::malformed(
            "forecast.winner",
            format!("winner '{}' has no entry in forecast.errors", winner),
        ));
    }

    let annual_demand = match obj.get("annual_demand") {
        None | Some(Value::Null) => None,
        Some(v) => Some(number(v, "forecast.annual_demand")?),
    };

    Ok(ForecastSummary {
        errors,
        winner,
        annual_demand,
    })
}

fn adapt_optimized(value: &Value) -> Result<OptimizedScenario> {
    let path = "scenarios.optimized";
    let obj = as_object(value, path)?;

    let allocation_path = format!("{}.allocation", path);
    let allocation_obj = as_object(field(obj, path, "allocation")?, &allocation_path)?;
    let mut allocation = BTreeMap::new();
    for (channel, units) in allocation_obj {
        let unit_path = format!("{}.{}", allocation_path, channel);
        allocation.insert(channel.clone(), unsigned(units, &unit_path)?);
    }

    let profit = number(field(obj, path, "profit")?, &format!("{}.profit", path))?;
    let financials = channel_map(
        field(obj, path, "financials")?,
        &format!("{}.financials", path),
    )?;

    Ok(OptimizedScenario {
        allocation,
        profit,
        financials,
    })
}

fn adapt_historical(value: &Value) -> Result<HistoricalBaseline> {
    let obj = as_object(value, "historical")?;

    let totals = field(obj, "historical", "totals")?
        .as_array()
        .ok_or_else(|| InsightError::malformed("historical.totals", "expected an array"))?;
    if totals.len() < 2 {
        return Err(InsightError::malformed(
            "historical.totals",
            format!("expected [profit, lostSales], got {} entries", totals.len()),
        ));
    }

    let profit = number(&totals[0], "historical.totals[0]")?;
    let lost_sales = number(&totals[1], "historical.totals[1]")?;
    let logistics_baseline = match totals.get(2) {
        Some(v) => Some(number(v, "historical.totals[2]")?),
        None => None,
    };

    let channel_metrics = channel_map(
        field(obj, "historical", "channel_metrics")?,
        "historical.channel_metrics",
    )?;

    Ok(HistoricalBaseline {
        profit,
        lost_sales,
        logistics_baseline,
        channel_metrics,
    })
}

fn adapt_inventory(value: &Value) -> Result<InventoryPlan> {
    let obj = as_object(value, "inventory")?;

    let eoq = unsigned(field(obj, "inventory", "EOQ")?, "inventory.EOQ")?;

    let plan = field(obj, "inventory", "quarterly_plan")?
        .as_array()
        .ok_or_else(|| InsightError::malformed("inventory.quarterly_plan", "expected an array"))?;

    let mut quarterly_plan = Vec::with_capacity(plan.len());
    for (i, entry) in plan.iter().enumerate() {
        let path = format!("inventory.quarterly_plan[{}]", i);
        let q = as_object(entry, &path)?;

        let quarter = field(q, &path, "Quarter")?
            .as_str()
            .ok_or_else(|| InsightError::malformed(format!("{}.Quarter", path), "expected a string"))?
            .to_string();
        let capital = non_negative(field(q, &path, "Capital")?, &format!("{}.Capital", path))?;
        let demand = non_negative(field(q, &path, "Demand")?, &format!("{}.Demand", path))?;
        let batches = unsigned(field(q, &path, "Batches")?, &format!("{}.Batches", path))?;
        let seasonality = q
            .get("Seasonality")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        quarterly_plan.push(QuarterPlan {
            quarter,
            capital,
            demand,
            batches,
            seasonality,
        });
    }

    let metrics = match obj.get("metrics") {
        None | Some(Value::Null) => None,
        Some(value) => Some(adapt_inventory_metrics(value)?),
    };

    Ok(InventoryPlan {
        eoq,
        metrics,
        quarterly_plan,
    })
}

fn adapt_inventory_metrics(value: &Value) -> Result<InventoryMetrics> {
    const PATH: &str = "inventory.metrics";
    let obj = as_object(value, PATH)?;
    let amount = |key: &str| non_negative(field(obj, PATH, key)?, &format!("{}.{}", PATH, key));

    Ok(InventoryMetrics {
        holding: amount("Holding")?,
        ordering: amount("Ordering")?,
        total: amount("Total")?,
        capital: amount("Capital")?,
    })
}

/// Parse a channel-name → ChannelMetrics mapping. Extra per-channel keys
/// (Volume, COGS, Net_Profit, ...) are ignored.
fn channel_map(value: &Value, path: &str) -> Result<BTreeMap<String, ChannelMetrics>> {
    let obj = as_object(value, path)?;
    let mut channels = BTreeMap::new();

    for (channel, metrics) in obj {
        let channel_path = format!("{}.{}", path, channel);
        let m = as_object(metrics, &channel_path)?;
        let read = |key: &str| -> Result<f64> {
            non_negative(field(m, &channel_path, key)?, &format!("{}.{}", channel_path, key))
        };

        channels.insert(
            channel.clone(),
            ChannelMetrics {
                logistics: read("Logistics")?,
                marketing: read("Marketing")?,
                fees: read("Fees")?,
                revenue: read("Revenue")?,
            },
        );
    }

    Ok(channels)
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| InsightError::malformed(path, "expected an object"))
}

fn field<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value> {
    match obj.get(key) {
        Some(Value::Null) | None => {
            let path = if parent == "$" {
                key.to_string()
            } else {
                format!("{}.{}", parent, key)
            };
            Err(InsightError::malformed(path, "missing field"))
        }
        Some(v) => Ok(v),
    }
}

fn number(value: &Value, path: &str) -> Result<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| InsightError::malformed(path, "expected a finite number"))
}

fn non_negative(value: &Value, path: &str) -> Result<f64> {
    let n = number(value, path)?;
    if n < 0.0 {
        return Err(InsightError::malformed(
            path,
            format!("expected a non-negative amount, got {}", n),
        ));
    }
    Ok(n)
}

/// Integers may arrive as `1500` or `1500.0`; both are accepted.
fn unsigned(value: &Value, path: &str) -> Result<u64> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => Ok(n as u64),
        _ => Err(InsightError::malformed(
            path,
            "expected a non-negative integer",
        )),
    }
}
