//! Policy Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for a policy scenario in YAML
#[derive(Debug, Deserialize)]
pub struct PolicyFixture {
    /// Line items quoted under the policy
    pub line_items: Vec<LineItemFixture>,

    /// Built-in overrides keyed by kind (e.g. `contract_pricing`)
    #[serde(default)]
    pub builtins: FxHashMap<String, BuiltInFixture>,

    /// Custom rules in evaluation order
    #[serde(default)]
    pub custom_rules: Vec<CustomRuleFixture>,
}

/// Line Item Fixture
#[derive(Debug, Deserialize)]
pub struct LineItemFixture {
    /// Item name
    pub name: String,

    /// Stock keeping unit
    pub sku: String,

    /// List price (e.g., "59500 USD")
    pub price: String,

    /// Whether the item counts towards the base total
    #[serde(default = "enabled_by_default")]
    pub active: bool,
}

/// Basis override for a built-in rule
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliesOnFixture {
    /// Percentage of the base total
    BaseTotal,

    /// Percentage of the running net
    RunningNet,
}

/// Built-in Rule Fixture
///
/// Any field left out keeps the built-in default.
#[derive(Debug, Default, Deserialize)]
pub struct BuiltInFixture {
    /// Whether the rule starts switched on
    #[serde(default)]
    pub enabled: bool,

    /// Discount override (e.g., "45%" or "2500 USD")
    pub discount: Option<String>,

    /// Threshold override (e.g., "> 100000 USD"), or "none" to remove it
    pub threshold: Option<String>,

    /// Percentage basis override
    pub applies_on: Option<AppliesOnFixture>,
}

/// Custom Rule Fixture
#[derive(Debug, Deserialize)]
pub struct CustomRuleFixture {
    /// Rule name
    pub name: String,

    /// Rule description
    #[serde(default)]
    pub description: String,

    /// Discount (e.g., "2%" or "500 USD")
    pub discount: String,

    /// Minimum running net (e.g., "10000 USD"); defaults to zero
    pub threshold: Option<String>,

    /// Whether the rule starts switched on
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}
