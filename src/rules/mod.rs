//! Discount Rules
//!
//! A rule is either one of the four built-in policy rules or a custom rule
//! authored at runtime. Both share the same discount shape; they differ in
//! how they are identified, labelled and gated.

use std::fmt;

use crate::amounts::Amount;

pub mod builtin;
pub mod custom;

pub use builtin::{BuiltInKind, BuiltInRule};
pub use custom::{CustomRule, CustomRuleKey};

/// How a rule's value turns into a discount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscountType {
    /// The value is in percentage points of the rule's basis (e.g. `45` is 45%).
    Percentage,

    /// The value is subtracted as-is, whatever the basis.
    Flat,
}

/// Which running value a percentage rule is computed against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppliesOn {
    /// The base total, regardless of rules applied before.
    BaseTotal,

    /// The net left after every previously applied rule.
    #[default]
    RunningNet,
}

/// How a threshold compares against the running net.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Comparison {
    /// Met when the net is greater than or equal to the amount.
    #[default]
    AtLeast,

    /// Met when the net is strictly greater than the amount.
    Above,
}

/// A minimum net a rule needs before it fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold<T> {
    comparison: Comparison,
    amount: T,
}

impl<T: Amount> Threshold<T> {
    /// Met when the net is at least `amount`.
    pub fn at_least(amount: T) -> Self {
        Self {
            comparison: Comparison::AtLeast,
            amount,
        }
    }

    /// Met when the net is strictly above `amount`.
    pub fn above(amount: T) -> Self {
        Self {
            comparison: Comparison::Above,
            amount,
        }
    }

    /// Comparison used against the net.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Threshold amount.
    pub fn amount(&self) -> T {
        self.amount
    }

    /// Checks the threshold against the current net.
    ///
    /// NaN on either side never meets a threshold.
    pub fn is_met(&self, net: T) -> bool {
        match self.comparison {
            Comparison::AtLeast => net >= self.amount,
            Comparison::Above => net > self.amount,
        }
    }
}

/// Identifies a rule within a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleId {
    /// One of the built-in rules.
    BuiltIn(BuiltInKind),

    /// A custom rule by key.
    Custom(CustomRuleKey),
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleId::BuiltIn(kind) => write!(f, "{kind}"),
            RuleId::Custom(key) => write!(f, "custom:{key:?}"),
        }
    }
}

/// A discount rule evaluated by the policy evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule<T> {
    /// A built-in policy rule.
    BuiltIn(BuiltInRule<T>),

    /// A runtime-authored rule.
    Custom(CustomRule<T>),
}

impl<T: Amount> Rule<T> {
    /// Rule identifier.
    pub fn id(&self) -> RuleId {
        match self {
            Rule::BuiltIn(rule) => RuleId::BuiltIn(rule.kind()),
            Rule::Custom(rule) => RuleId::Custom(rule.key()),
        }
    }

    /// Label used for the breakdown entry when the rule fires.
    pub fn label(&self) -> String {
        match self {
            Rule::BuiltIn(rule) => rule.label(),
            Rule::Custom(rule) => rule.name().to_string(),
        }
    }

    /// Whether the rule is switched on.
    pub fn is_enabled(&self) -> bool {
        match self {
            Rule::BuiltIn(rule) => rule.is_enabled(),
            Rule::Custom(rule) => rule.is_enabled(),
        }
    }

    /// Discount type.
    pub fn discount_type(&self) -> DiscountType {
        match self {
            Rule::BuiltIn(rule) => rule.discount_type(),
            Rule::Custom(rule) => rule.discount_type(),
        }
    }

    /// Percentage points or flat amount, depending on the discount type.
    pub fn value(&self) -> T {
        match self {
            Rule::BuiltIn(rule) => rule.value(),
            Rule::Custom(rule) => rule.value(),
        }
    }

    /// Basis a percentage discount is computed against.
    ///
    /// Custom rules always apply on the running net.
    pub fn applies_on(&self) -> AppliesOn {
        match self {
            Rule::BuiltIn(rule) => rule.applies_on(),
            Rule::Custom(_) => AppliesOn::RunningNet,
        }
    }

    /// Threshold the running net must meet, if any.
    pub fn threshold(&self) -> Option<Threshold<T>> {
        match self {
            Rule::BuiltIn(rule) => rule.threshold(),
            Rule::Custom(rule) => Some(Threshold::at_least(rule.condition_threshold())),
        }
    }

    /// Computes the discount this rule gives, ignoring enablement and threshold.
    ///
    /// Returns `None` if the discount is out of range for the amount type.
    pub fn discount(&self, base_total: T, net: T) -> Option<T> {
        match self.discount_type() {
            DiscountType::Percentage => {
                let basis = match self.applies_on() {
                    AppliesOn::BaseTotal => base_total,
                    AppliesOn::RunningNet => net,
                };

                basis.checked_percent(self.value())
            }
            DiscountType::Flat => Some(self.value()),
        }
    }
}

impl<T> From<BuiltInRule<T>> for Rule<T> {
    fn from(rule: BuiltInRule<T>) -> Self {
        Rule::BuiltIn(rule)
    }
}

impl<T> From<CustomRule<T>> for Rule<T> {
    fn from(rule: CustomRule<T>) -> Self {
        Rule::Custom(rule)
    }
}
