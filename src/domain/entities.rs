//! Domain entities: seed data, edit requests and the numeric helpers the
//! allocation core shares with the read-back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Decimal places kept at every level of a distribute pass.
pub const ALLOCATION_DECIMALS: u32 = 4;

/// Decimal places of a variance percentage.
pub const VARIANCE_DECIMALS: u32 = 2;

/// Absolute tolerance for "parent equals sum of children".
pub const BALANCE_TOLERANCE: f64 = 1e-4;

/// One node of the externally supplied seed forest.
///
/// Seeds are nested: internal nodes carry their children inline. The seed is
/// never used directly by the ledger; `ForestBuilder` deep copies it into an
/// arena-backed [`Forest`](crate::domain::Forest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedNode {
    pub id: String,
    pub label: String,
    pub value: f64,
    /// Baseline for variance; defaults to `value` when omitted
    #[serde(default, alias = "originalValue", skip_serializing_if = "Option::is_none")]
    pub original_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SeedNode>,
}

impl SeedNode {
    pub fn leaf(id: impl Into<String>, label: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            original_value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn branch(
        id: impl Into<String>,
        label: impl Into<String>,
        value: f64,
        children: Vec<SeedNode>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            original_value: Some(value),
            children,
        }
    }

    /// Baseline captured at construction.
    pub fn baseline(&self) -> f64 {
        self.original_value.unwrap_or(self.value)
    }
}

/// On-disk seed layout: `[[nodes]]` tables with nested `[[nodes.children]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub nodes: Vec<SeedNode>,
}

/// Built-in goods forest used when no seed file is configured.
///
/// Electronics is seeded as 1400 although its children add up to 1500; the
/// first recalculation on load corrects it.
pub fn demo_seed() -> Vec<SeedNode> {
    vec![
        SeedNode::branch(
            "electronics",
            "Electronics",
            1400.0,
            vec![
                SeedNode::leaf("phones", "Phones", 800.0),
                SeedNode::leaf("laptops", "Laptops", 700.0),
            ],
        ),
        SeedNode::branch(
            "furniture",
            "Furniture",
            1000.0,
            vec![
                SeedNode::leaf("tables", "Tables", 300.0),
                SeedNode::leaf("chairs", "Chairs", 700.0),
            ],
        ),
    ]
}

/// How the raw input of an edit request is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Scale the node by a percentage of its current value
    Percent,
    /// Set the node to an absolute value
    Value,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Percent => write!(f, "percent"),
            EditMode::Value => write!(f, "value"),
        }
    }
}

impl FromStr for EditMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" | "%" => Ok(EditMode::Percent),
            "value" | "val" => Ok(EditMode::Value),
            other => Err(DomainError::InvalidEditMode(other.to_string())),
        }
    }
}

/// An edit as handed over by the presentation layer.
///
/// `raw_input` stays unparsed: malformed numbers are not an error, they turn
/// the edit into a no-op when it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub node_id: String,
    pub raw_input: String,
    pub mode: EditMode,
}

impl EditRequest {
    pub fn new(node_id: impl Into<String>, raw_input: impl Into<String>, mode: EditMode) -> Self {
        Self {
            node_id: node_id.into(),
            raw_input: raw_input.into(),
            mode,
        }
    }
}

impl fmt::Display for EditRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.mode, self.node_id, self.raw_input)
    }
}

/// Parses `MODE:ID=AMOUNT`, e.g. `value:phones=1000` or `percent:tables=10`.
impl FromStr for EditRequest {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mode, rest) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidEditSpec(s.to_string()))?;
        let (node_id, raw_input) = rest
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidEditSpec(s.to_string()))?;
        let node_id = node_id.trim();
        if node_id.is_empty() {
            return Err(DomainError::InvalidEditSpec(s.to_string()));
        }
        Ok(Self::new(node_id, raw_input, mode.parse()?))
    }
}

/// Parse user text into a finite amount.
///
/// Blank text, `NaN` and infinities are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Magnitude from which values are returned unrounded. Every f64 this large
/// is already an integer, and scaling it could overflow to infinity.
pub const ROUNDING_LIMIT: f64 = 1e21;

/// Round half away from zero to `decimals` places.
///
/// Non-finite values and values at or above [`ROUNDING_LIMIT`] come back
/// unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage deviation of `value` from `original`, two decimals.
///
/// A zero baseline yields 0 instead of dividing by zero.
pub fn variance(value: f64, original: f64) -> f64 {
    if original == 0.0 {
        return 0.0;
    }
    round_to((value - original) / original * 100.0, VARIANCE_DECIMALS)
}

/// Display form of [`variance`]: `"10.00%"`, or `"0%"` on a zero baseline.
pub fn format_variance(value: f64, original: f64) -> String {
    if original == 0.0 {
        return "0%".to_string();
    }
    format!("{:.2}%", variance(value, original))
}
