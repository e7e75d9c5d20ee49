//! Pricing Policy
//!
//! The rule set a quote is evaluated under: the four built-in rules in their
//! fixed order, followed by custom rules in the order they were added.

use slotmap::SlotMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    amounts::Amount,
    evaluator::{Evaluation, evaluate},
    items::{LineItem, base_total},
    rules::{BuiltInKind, BuiltInRule, CustomRule, CustomRuleKey, DiscountType, Rule, RuleId},
};

/// A problem found by [`PricingPolicy::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleIssue {
    /// The discount value is below zero, which would raise the price.
    #[error("{0}: discount value is negative")]
    NegativeValue(RuleId),

    /// A percentage above 100 would take the net below zero on its own.
    #[error("{0}: percentage is above 100")]
    PercentageOverHundred(RuleId),

    /// The threshold amount is below zero.
    #[error("{0}: threshold is negative")]
    NegativeThreshold(RuleId),

    /// A value or threshold does not compare as a number (NaN).
    #[error("{0}: value or threshold is not a number")]
    NotANumber(RuleId),
}

/// Validation failure listing every issue found.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("policy has {} invalid rule setting(s)", .issues.len())]
pub struct ValidationError {
    /// Issues in evaluation order
    pub issues: SmallVec<[RuleIssue; 4]>,
}

/// Built-in toggles plus custom rules.
#[derive(Debug, Clone)]
pub struct PricingPolicy<T> {
    rules: Vec<Rule<T>>,
    custom_keys: SlotMap<CustomRuleKey, ()>,
}

impl<T: Amount> Default for PricingPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Amount> PricingPolicy<T> {
    /// Creates a policy with the default built-in rules, all disabled.
    pub fn new() -> Self {
        Self {
            rules: BuiltInKind::ALL
                .into_iter()
                .map(|kind| Rule::BuiltIn(BuiltInRule::for_kind(kind)))
                .collect(),
            custom_keys: SlotMap::with_key(),
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule<T>> {
        self.rules.iter()
    }

    /// Returns the built-in rule of a kind.
    pub fn builtin(&self, kind: BuiltInKind) -> Option<&BuiltInRule<T>> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::BuiltIn(builtin) if builtin.kind() == kind => Some(builtin),
            _ => None,
        })
    }

    /// Returns the built-in rule of a kind for editing.
    pub fn builtin_mut(&mut self, kind: BuiltInKind) -> Option<&mut BuiltInRule<T>> {
        self.rules.iter_mut().find_map(|rule| match rule {
            Rule::BuiltIn(builtin) if builtin.kind() == kind => Some(builtin),
            _ => None,
        })
    }

    /// Replaces the configuration of a built-in rule, keeping its position.
    pub fn set_builtin(&mut self, rule: BuiltInRule<T>) {
        if let Some(existing) = self.builtin_mut(rule.kind()) {
            *existing = rule;
        }
    }

    /// Switches a built-in rule on or off.
    pub fn set_enabled(&mut self, kind: BuiltInKind, enabled: bool) {
        if let Some(rule) = self.builtin_mut(kind) {
            rule.set_enabled(enabled);
        }
    }

    /// Flips a built-in rule and returns its new state.
    pub fn toggle(&mut self, kind: BuiltInKind) -> bool {
        self.builtin_mut(kind).is_some_and(|rule| {
            let enabled = !rule.is_enabled();
            rule.set_enabled(enabled);
            enabled
        })
    }

    /// Appends a custom rule; it is evaluated after every rule added before it.
    pub fn add_custom_rule(&mut self, mut rule: CustomRule<T>) -> CustomRuleKey {
        let key = self.custom_keys.insert(());

        rule.set_key(key);
        self.rules.push(Rule::Custom(rule));

        key
    }

    /// Removes a custom rule, keeping the order of the others.
    pub fn remove_custom_rule(&mut self, key: CustomRuleKey) -> Option<CustomRule<T>> {
        self.custom_keys.remove(key)?;

        let position = self
            .rules
            .iter()
            .position(|rule| rule.id() == RuleId::Custom(key))?;

        match self.rules.remove(position) {
            Rule::Custom(rule) => Some(rule),
            Rule::BuiltIn(_) => None,
        }
    }

    /// Returns a custom rule by key.
    pub fn custom_rule(&self, key: CustomRuleKey) -> Option<&CustomRule<T>> {
        self.custom_rules().find(|rule| rule.key() == key)
    }

    /// Returns a custom rule by key for editing.
    pub fn custom_rule_mut(&mut self, key: CustomRuleKey) -> Option<&mut CustomRule<T>> {
        self.rules.iter_mut().find_map(|rule| match rule {
            Rule::Custom(custom) if custom.key() == key => Some(custom),
            _ => None,
        })
    }

    /// Custom rules in insertion order.
    pub fn custom_rules(&self) -> impl Iterator<Item = &CustomRule<T>> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Custom(custom) => Some(custom),
            Rule::BuiltIn(_) => None,
        })
    }

    /// Evaluates the policy against a base total.
    pub fn evaluate(&self, base_total: T) -> Evaluation<T> {
        evaluate(base_total, &self.rules)
    }

    /// Evaluates the policy against the active items' base total.
    pub fn evaluate_items(&self, items: &[LineItem<T>]) -> Evaluation<T> {
        self.evaluate(base_total(items))
    }

    /// Checks rule values and thresholds for settings that produce nonsensical totals.
    ///
    /// Evaluation does not depend on this; it is for callers that want to
    /// reject bad input before quoting.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every [`RuleIssue`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let issues: SmallVec<[RuleIssue; 4]> = self.rules.iter().flat_map(rule_issues).collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn rule_issues<T: Amount>(rule: &Rule<T>) -> SmallVec<[RuleIssue; 2]> {
    let id = rule.id();
    let value = rule.value();
    let threshold = rule.threshold().map(|threshold| threshold.amount());
    let mut issues = SmallVec::new();

    if value.partial_cmp(&T::zero()).is_none()
        || threshold.is_some_and(|amount| amount.partial_cmp(&T::zero()).is_none())
    {
        issues.push(RuleIssue::NotANumber(id));
        return issues;
    }

    if value < T::zero() {
        issues.push(RuleIssue::NegativeValue(id));
    }

    if rule.discount_type() == DiscountType::Percentage && value > T::hundred() {
        issues.push(RuleIssue::PercentageOverHundred(id));
    }

    if threshold.is_some_and(|amount| amount < T::zero()) {
        issues.push(RuleIssue::NegativeThreshold(id));
    }

    issues
}
