//! Sequential Discount Rule Evaluator
//!
//! Rules are applied one after another to a running net. Each rule sees the
//! net left by every rule before it, both for its threshold check and (unless
//! it applies on the base total) for its percentage basis. Nothing is
//! reordered or optimised: the order rules are given in is the order they
//! apply in.
//!
//! Evaluation never fails. Negative values are applied as given, and with
//! `f64` amounts a NaN anywhere propagates into the net. A rule whose discount
//! or resulting net cannot be represented by the amount type is reported as
//! [`RuleStatus::Overflowed`] and leaves the net untouched.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    amounts::Amount,
    rules::{Rule, RuleId},
};

/// A rule that fired and how much it took off.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownEntry<T> {
    /// Rule that fired
    pub rule: RuleId,

    /// Display label of the rule
    pub label: String,

    /// Discount amount taken off the net
    pub amount: T,
}

/// What happened to a rule during evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleStatus {
    /// The rule fired and has a breakdown entry.
    Applied,

    /// The rule is switched off.
    Disabled,

    /// The rule is on, but the running net did not meet its threshold.
    ConditionNotMet,

    /// The rule would have fired, but its discount or the resulting net is
    /// out of range for the amount type.
    Overflowed,
}

/// Per-rule evaluation outcome, in evaluation order.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleOutcome {
    /// Rule identifier
    pub rule: RuleId,

    /// Display label of the rule
    pub label: String,

    /// Outcome
    pub status: RuleStatus,
}

/// Result of evaluating a rule set against a base total.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation<T> {
    base_total: T,
    net: T,
    total_savings: T,
    breakdown: SmallVec<[BreakdownEntry<T>; 4]>,
    outcomes: SmallVec<[RuleOutcome; 8]>,
}

impl<T: Amount> Evaluation<T> {
    /// Base total the rules were applied to.
    pub fn base_total(&self) -> T {
        self.base_total
    }

    /// Net after every applied rule.
    pub fn net(&self) -> T {
        self.net
    }

    /// Sum of all breakdown amounts.
    pub fn total_savings(&self) -> T {
        self.total_savings
    }

    /// Number of rules that fired.
    pub fn active_rule_count(&self) -> usize {
        self.breakdown.len()
    }

    /// Applied rules and their discounts, in application order.
    pub fn breakdown(&self) -> &[BreakdownEntry<T>] {
        &self.breakdown
    }

    /// Every evaluated rule with its status, in evaluation order.
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Looks up the status of a rule.
    ///
    /// Custom rules that never went through
    /// [`PricingPolicy::add_custom_rule`](crate::policy::PricingPolicy::add_custom_rule)
    /// all carry the null key and so share one [`RuleId`]; for those, this
    /// returns the status of the first one evaluated. Use
    /// [`Evaluation::outcomes`] to tell them apart by position.
    pub fn status_of(&self, rule: RuleId) -> Option<RuleStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.rule == rule)
            .map(|outcome| outcome.status)
    }
}

/// Applies `rules` in order to `base_total`.
///
/// For each rule: disabled rules are skipped; rules whose threshold is not met
/// by the current net are skipped; otherwise the discount is subtracted from
/// the net and recorded in the breakdown.
pub fn evaluate<'r, T, I>(base_total: T, rules: I) -> Evaluation<T>
where
    T: Amount + 'r,
    I: IntoIterator<Item = &'r Rule<T>>,
{
    let mut net = base_total;
    let mut total_savings = T::zero();
    let mut breakdown = SmallVec::new();
    let mut outcomes = SmallVec::new();

    for rule in rules {
        let id = rule.id();
        let label = rule.label();

        let threshold_met = rule
            .threshold()
            .is_none_or(|threshold| threshold.is_met(net));

        let status = match (rule.is_enabled(), threshold_met) {
            (false, _) => RuleStatus::Disabled,
            (true, false) => RuleStatus::ConditionNotMet,
            (true, true) => {
                let applied = rule.discount(base_total, net).and_then(|amount| {
                    Some((
                        amount,
                        net.checked_sub(amount)?,
                        total_savings.checked_add(amount)?,
                    ))
                });

                if let Some((amount, next_net, next_savings)) = applied {
                    net = next_net;
                    total_savings = next_savings;

                    debug!(rule = %id, %amount, %net, "applied discount rule");

                    breakdown.push(BreakdownEntry {
                        rule: id,
                        label: label.clone(),
                        amount,
                    });

                    RuleStatus::Applied
                } else {
                    warn!(rule = %id, %net, "discount out of range, rule not applied");

                    RuleStatus::Overflowed
                }
            }
        };

        if matches!(status, RuleStatus::Disabled | RuleStatus::ConditionNotMet) {
            debug!(rule = %id, ?status, %net, "skipped discount rule");
        }

        outcomes.push(RuleOutcome {
            rule: id,
            label,
            status,
        });
    }

    Evaluation {
        base_total,
        net,
        total_savings,
        breakdown,
        outcomes,
    }
}
