//! Caption formatting shared by every renderer.
//!
//! Currency is rendered with the configured symbol ahead of the sign-stripped
//! amount and the sign ahead of the symbol (`-₹1,200`). Whole-currency values
//! truncate toward zero; scaled values (`M`, `K`) and percentages use one
//! fixed decimal.

use crate::config::CaptionConfig;

/// Insert `,` every three digits: `12345678` → `"12,345,678"`
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `35.0%`
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// `+35.0%` / `-2.5%`
pub fn signed_percent(value: f64) -> String {
    let rounded = round_one(value.abs());
    if value < 0.0 && rounded > 0.0 {
        format!("-{:.1}%", rounded)
    } else {
        format!("+{:.1}%", rounded)
    }
}

/// Share of `part` in `total` as a percentage; zero when the total is not positive
pub fn share_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// `delta` as a percentage of `|baseline|`, or `None` when the baseline is
/// within `epsilon` of zero
pub fn percent_of_baseline(delta: f64, baseline: f64, epsilon: f64) -> Option<f64> {
    if !baseline.is_finite() || baseline.abs() < epsilon.max(f64::EPSILON) {
        return None;
    }
    let pct = delta / baseline.abs() * 100.0;
    pct.is_finite().then_some(pct)
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct CaptionFormatter {
    symbol: String,
}

impl Default for CaptionFormatter {
    fn default() -> Self {
        Self::new("₹")
    }
}

impl CaptionFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn from_config(config: &CaptionConfig) -> Self {
        Self::new(config.currency_symbol.clone())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Whole currency: `₹10,000,000`
    pub fn currency(&self, value: f64) -> String {
        let whole = value.trunc() as i128;
        if whole < 0 {
            format!("-{}{}", self.symbol, group_thousands(whole).trim_start_matches('-'))
        } else {
            format!("{}{}", self.symbol, group_thousands(whole))
        }
    }

    /// Millions with one decimal: `₹3.5M`
    pub fn millions(&self, value: f64) -> String {
        let scaled = round_one(value.abs() / 1_000_000.0);
        if value < 0.0 && scaled > 0.0 {
            format!("-{}{:.1}M", self.symbol, scaled)
        } else {
            format!("{}{:.1}M", self.symbol, scaled)
        }
    }

    /// Millions with an explicit sign: `+₹3.5M`
    pub fn signed_millions(&self, value: f64) -> String {
        let scaled = round_one(value.abs() / 1_000_000.0);
        let sign = if value < 0.0 && scaled > 0.0 { '-' } else { '+' };
        format!("{}{}{:.1}M", sign, self.symbol, scaled)
    }

    /// Shortest readable scale: `₹3.5M`, `₹400.0K`, `₹950`
    pub fn compact(&self, value: f64) -> String {
        let magnitude = value.abs();
        if magnitude >= 1_000_000.0 {
            self.millions(value)
        } else if magnitude >= 1_000.0 {
            let scaled = round_one(magnitude / 1_000.0);
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{}{}{:.1}K", sign, self.symbol, scaled)
        } else {
            self.currency(value)
        }
    }

    /// Unit counts: `12,345`
    pub fn units(&self, value: f64) -> String {
        group_thousands(value.trunc() as i128)
    }
}
