//! Fixtures
//!
//! Policy scenarios loaded from YAML: the line items being quoted, overrides
//! for the built-in rules and any custom rules.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    amounts::checked_sum,
    fixtures::policy::{AppliesOnFixture, BuiltInFixture, CustomRuleFixture, PolicyFixture},
    items::LineItem,
    policy::PricingPolicy,
    rules::{AppliesOn, BuiltInKind, CustomRule},
};

pub mod policy;
pub mod prices;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid discount format
    #[error("Invalid discount format: {0}")]
    InvalidDiscount(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Unknown built-in rule kind
    #[error("Unknown built-in rule: {0}")]
    UnknownRuleKind(String),

    /// Line item prices sum to more than the amount type can hold
    #[error("Line item prices are out of range")]
    AmountOutOfRange,

    /// No line items defined
    #[error("No line items defined; currency unknown")]
    NoItems,
}

/// A loaded policy scenario.
#[derive(Debug, Clone)]
pub struct Fixture {
    items: Vec<LineItem<Decimal>>,
    policy: PricingPolicy<Decimal>,
    currency: &'static Currency,
}

impl Fixture {
    /// Load a named policy set from `./fixtures/policies/{name}.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a named policy set from `{base_path}/policies/{name}.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let file_path = base_path
            .into()
            .join("policies")
            .join(format!("{name}.yml"));

        Self::from_path(file_path)
    }

    /// Load a policy scenario from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a policy scenario from YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price or discount cannot be
    /// parsed, prices use different currencies, or no line items are defined.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let fixture: PolicyFixture = serde_norway::from_str(contents)?;

        let mut builder = FixtureBuilder::default();

        for item in fixture.line_items {
            let (price, currency) = prices::parse_price(&item.price)?;
            builder.check_currency(currency)?;

            builder
                .items
                .push(LineItem::new(item.name, item.sku, price).with_active(item.active));
        }

        let mut overrides: Vec<(BuiltInKind, BuiltInFixture)> = fixture
            .builtins
            .into_iter()
            .map(|(key, builtin)| {
                BuiltInKind::from_key(&key)
                    .map(|kind| (kind, builtin))
                    .ok_or(FixtureError::UnknownRuleKind(key))
            })
            .collect::<Result<_, _>>()?;

        // Map order is arbitrary; apply in evaluation order so errors are stable.
        overrides.sort_by_key(|(kind, _)| *kind);

        for (kind, builtin) in overrides {
            builder.apply_builtin(kind, &builtin)?;
        }

        for custom in fixture.custom_rules {
            builder.add_custom_rule(custom)?;
        }

        builder.finish()
    }

    /// Line items in fixture order
    pub fn items(&self) -> &[LineItem<Decimal>] {
        &self.items
    }

    /// Line items for editing
    pub fn items_mut(&mut self) -> &mut [LineItem<Decimal>] {
        &mut self.items
    }

    /// Excludes every item with the given SKU from the base total.
    ///
    /// Returns `false` if no item has that SKU.
    pub fn deactivate(&mut self, sku: &str) -> bool {
        let mut found = false;

        for item in self.items.iter_mut().filter(|item| item.sku() == sku) {
            item.set_active(false);
            found = true;
        }

        found
    }

    /// Pricing policy
    pub fn policy(&self) -> &PricingPolicy<Decimal> {
        &self.policy
    }

    /// Pricing policy for editing
    pub fn policy_mut(&mut self) -> &mut PricingPolicy<Decimal> {
        &mut self.policy
    }

    /// Currency shared by every price in the fixture
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[derive(Debug, Default)]
struct FixtureBuilder {
    items: Vec<LineItem<Decimal>>,
    policy: PricingPolicy<Decimal>,
    currency: Option<&'static Currency>,
}

impl FixtureBuilder {
    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }

    fn apply_builtin(
        &mut self,
        kind: BuiltInKind,
        fixture: &BuiltInFixture,
    ) -> Result<(), FixtureError> {
        let Some(current) = self.policy.builtin(kind) else {
            return Ok(());
        };

        let mut rule = current.clone().with_enabled(fixture.enabled);

        if let Some(discount) = fixture.discount.as_deref() {
            let (discount_type, value, currency) = prices::parse_discount(discount)?;

            if let Some(currency) = currency {
                self.check_currency(currency)?;
            }

            rule = rule.with_discount(discount_type, value);
        }

        match fixture.threshold.as_deref().map(str::trim) {
            Some("none") => rule = rule.without_threshold(),
            Some(threshold) => {
                let (threshold, currency) = prices::parse_threshold(threshold)?;
                self.check_currency(currency)?;

                rule = rule.with_threshold(threshold);
            }
            None => {}
        }

        if let Some(applies_on) = fixture.applies_on {
            rule = rule.with_applies_on(match applies_on {
                AppliesOnFixture::BaseTotal => AppliesOn::BaseTotal,
                AppliesOnFixture::RunningNet => AppliesOn::RunningNet,
            });
        }

        self.policy.set_builtin(rule);

        Ok(())
    }

    fn add_custom_rule(&mut self, fixture: CustomRuleFixture) -> Result<(), FixtureError> {
        let (discount_type, value, currency) = prices::parse_discount(&fixture.discount)?;

        if let Some(currency) = currency {
            self.check_currency(currency)?;
        }

        let mut rule = CustomRule::new(fixture.name, discount_type, value)
            .with_description(fixture.description)
            .with_enabled(fixture.enabled);

        if let Some(threshold) = fixture.threshold.as_deref() {
            let (threshold, currency) = prices::parse_price(threshold)?;
            self.check_currency(currency)?;

            rule = rule.with_condition_threshold(threshold);
        }

        self.policy.add_custom_rule(rule);

        Ok(())
    }

    fn finish(self) -> Result<Fixture, FixtureError> {
        if self.items.is_empty() {
            return Err(FixtureError::NoItems);
        }

        let currency = self.currency.ok_or(FixtureError::NoItems)?;

        // Bounding the sum of magnitudes bounds the base total of every subset
        // of active items.
        checked_sum(self.items.iter().map(|item| item.list_price().abs()))
            .ok_or(FixtureError::AmountOutOfRange)?;

        Ok(Fixture {
            items: self.items,
            policy: self.policy,
            currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;
    use crate::{
        evaluator::RuleStatus,
        rules::{DiscountType, Rule, Threshold},
    };

    const SCENARIO: &str = r#"
line_items:
  - { name: "Workstation", sku: "WS-100", price: "59500 USD" }
  - { name: "Support Plan", sku: "SP-400", price: "30000 USD", active: false }
builtins:
  contract_pricing:
    enabled: true
  volume_tier:
    threshold: ">= 50000 USD"
    discount: "1500 USD"
custom_rules:
  - name: "Loyalty"
    description: "Returning customer"
    discount: "2%"
    threshold: "10000 USD"
  - name: "Freight credit"
    discount: "250 USD"
    enabled: false
"#;

    #[test]
    fn loads_items_and_rules() -> TestResult {
        let fixture = Fixture::from_yaml(SCENARIO)?;

        assert_eq!(fixture.currency(), USD);
        assert_eq!(fixture.items().len(), 2);
        assert!(!fixture.items().iter().all(LineItem::is_active));

        let contract = fixture
            .policy()
            .builtin(BuiltInKind::ContractPricing)
            .ok_or("missing contract pricing")?;

        assert!(contract.is_enabled());

        let volume = fixture
            .policy()
            .builtin(BuiltInKind::VolumeTier)
            .ok_or("missing volume tier")?;

        assert!(!volume.is_enabled());
        assert_eq!(volume.discount_type(), DiscountType::Flat);
        assert_eq!(volume.value(), dec!(1500));
        assert_eq!(volume.threshold(), Some(Threshold::at_least(dec!(50000))));

        let names: Vec<&str> = fixture.policy().custom_rules().map(CustomRule::name).collect();

        assert_eq!(names, vec!["Loyalty", "Freight credit"]);

        Ok(())
    }

    #[test]
    fn custom_rules_follow_built_ins() -> TestResult {
        let fixture = Fixture::from_yaml(SCENARIO)?;

        let last = fixture.policy().rules().last().ok_or("no rules")?;

        assert!(matches!(last, Rule::Custom(rule) if rule.name() == "Freight credit"));

        Ok(())
    }

    #[test]
    fn rejects_unknown_built_in() {
        let yaml = r#"
line_items:
  - { name: "Workstation", sku: "WS-100", price: "59500 USD" }
builtins:
  loyalty_bonus:
    enabled: true
"#;

        let result = Fixture::from_yaml(yaml);

        assert!(matches!(result, Err(FixtureError::UnknownRuleKind(key)) if key == "loyalty_bonus"));
    }

    #[test]
    fn rejects_mixed_currencies() {
        let yaml = r#"
line_items:
  - { name: "Workstation", sku: "WS-100", price: "59500 USD" }
  - { name: "Server Rack", sku: "SR-200", price: "84000 GBP" }
"#;

        let result = Fixture::from_yaml(yaml);

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(expected, found))
            if expected == "USD" && found == "GBP"));
    }

    #[test]
    fn rejects_empty_scenario() {
        let result = Fixture::from_yaml("line_items: []");

        assert!(matches!(result, Err(FixtureError::NoItems)));
    }

    #[test]
    fn rejects_prices_that_overflow_the_base_total() {
        let yaml = r#"
line_items:
  - { name: "Mainframe", sku: "MF-900", price: "79228162514264337593543950335 USD" }
  - { name: "Cable", sku: "CB-001", price: "1 USD", active: false }
"#;

        let result = Fixture::from_yaml(yaml);

        assert!(matches!(result, Err(FixtureError::AmountOutOfRange)));
    }

    #[test]
    fn out_of_range_percentage_is_reported_not_applied() -> TestResult {
        let yaml = r#"
line_items:
  - { name: "Mainframe", sku: "MF-900", price: "1000000000000000000000 USD" }
custom_rules:
  - name: "Typo"
    discount: "100000000000000000%"
"#;

        let fixture = Fixture::from_yaml(yaml)?;
        let evaluation = fixture.policy().evaluate_items(fixture.items());

        assert_eq!(evaluation.net(), dec!(1000000000000000000000));
        assert_eq!(evaluation.active_rule_count(), 0);
        assert_eq!(
            evaluation.outcomes().last().map(|outcome| outcome.status),
            Some(RuleStatus::Overflowed)
        );

        Ok(())
    }

    #[test]
    fn threshold_none_removes_default() -> TestResult {
        let yaml = r#"
line_items:
  - { name: "Workstation", sku: "WS-100", price: "59500 USD" }
builtins:
  volume_tier:
    enabled: true
    threshold: none
"#;

        let fixture = Fixture::from_yaml(yaml)?;
        let evaluation = fixture.policy().evaluate_items(fixture.items());

        assert_eq!(evaluation.active_rule_count(), 1);
        assert_eq!(evaluation.net(), dec!(57715));

        Ok(())
    }

    #[test]
    fn deactivate_by_sku() -> TestResult {
        let mut fixture = Fixture::from_yaml(SCENARIO)?;

        assert!(fixture.deactivate("WS-100"));
        assert!(!fixture.deactivate("XX-999"));
        assert!(fixture.items().iter().all(|item| !item.is_active()));

        Ok(())
    }
}
