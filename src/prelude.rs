//! Policy Pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    amounts::Amount,
    evaluator::{BreakdownEntry, Evaluation, RuleOutcome, RuleStatus, evaluate},
    fixtures::{Fixture, FixtureError},
    items::{LineItem, base_total},
    policy::{PricingPolicy, RuleIssue, ValidationError},
    rules::{
        AppliesOn, BuiltInKind, BuiltInRule, Comparison, CustomRule, CustomRuleKey, DiscountType,
        Rule, RuleId, Threshold,
    },
    statement::{Statement, StatementError},
};
