//! Statement
//!
//! Renders a policy evaluation for the terminal: the quoted line items, every
//! rule with its status, then the totals.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    evaluator::{Evaluation, RuleStatus},
    items::LineItem,
    policy::PricingPolicy,
};

/// Errors that can occur when writing a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Writing to the output failed.
    #[error("failed to write statement: {0}")]
    Io(#[from] io::Error),
}

/// A priced quote ready to be written out.
#[derive(Debug)]
pub struct Statement<'a> {
    items: &'a [LineItem<Decimal>],
    evaluation: Evaluation<Decimal>,
    currency: &'static Currency,
}

impl<'a> Statement<'a> {
    /// Evaluates `policy` against `items` and keeps the result for display.
    pub fn new(
        items: &'a [LineItem<Decimal>],
        policy: &PricingPolicy<Decimal>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            items,
            evaluation: policy.evaluate_items(items),
            currency,
        }
    }

    /// Underlying evaluation.
    pub fn evaluation(&self) -> &Evaluation<Decimal> {
        &self.evaluation
    }

    /// Savings relative to the base total; zero when the base total is zero
    /// or the ratio is out of range.
    pub fn savings_percent(&self) -> Percentage {
        self.evaluation
            .total_savings()
            .checked_div(self.evaluation.base_total())
            .map_or_else(|| Percentage::from(Decimal::ZERO), Percentage::from)
    }

    /// Writes the statement tables and totals.
    ///
    /// # Errors
    ///
    /// Returns a [`StatementError`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), StatementError> {
        writeln!(out, "\n{}", self.items_table())?;
        writeln!(out, "\n{}", self.rules_table())?;

        self.write_totals(&mut out)?;

        Ok(())
    }

    fn money(&self, amount: Decimal) -> Money<'static, Currency> {
        Money::from_decimal(amount, self.currency)
    }

    fn items_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["SKU", "Item", "List Price", "Status"]);

        for item in self.items {
            builder.push_record([
                item.sku().to_string(),
                item.name().to_string(),
                self.money(item.list_price()).to_string(),
                if item.is_active() { "Active" } else { "Inactive" }.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..3), Alignment::right());

        table.to_string()
    }

    fn rules_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["#", "Rule", "Status", "Savings"]);

        for (idx, outcome) in self.evaluation.outcomes().iter().enumerate() {
            let savings = self
                .evaluation
                .breakdown()
                .iter()
                .find(|entry| entry.rule == outcome.rule)
                .map(|entry| format!("-{}", self.money(entry.amount)))
                .unwrap_or_default();

            builder.push_record([
                format!("{}", idx + 1),
                outcome.label.clone(),
                status_text(outcome.status).to_string(),
                savings,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..4), Alignment::right());

        table.to_string()
    }

    fn write_totals(&self, out: &mut impl io::Write) -> Result<(), StatementError> {
        let savings_points = percent_points(self.savings_percent());

        let lines = [
            (
                "Subtotal:",
                self.money(self.evaluation.base_total()).to_string(),
            ),
            (
                "Savings:",
                format!(
                    "({savings_points:.2}%) {}",
                    self.money(self.evaluation.total_savings())
                ),
            ),
            ("Net:", self.money(self.evaluation.net()).to_string()),
            (
                "Active rules:",
                self.evaluation.active_rule_count().to_string(),
            ),
        ];

        let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        writeln!(out)?;

        for (label, value) in lines {
            writeln!(out, " {label:<label_width$} {value:>value_width$}")?;
        }

        Ok(())
    }
}

fn status_text(status: RuleStatus) -> &'static str {
    match status {
        RuleStatus::Applied => "Applied",
        RuleStatus::Disabled => "Disabled",
        RuleStatus::ConditionNotMet => "Condition not met",
        RuleStatus::Overflowed => "Out of range",
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    (percentage * Decimal::ONE)
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;
    use crate::rules::{BuiltInKind, CustomRule, DiscountType};

    fn items() -> Vec<LineItem<Decimal>> {
        vec![
            LineItem::new("Workstation", "WS-100", dec!(59500)),
            LineItem::new("Server Rack", "SR-200", dec!(84000)),
            LineItem::new("Storage Array", "SA-300", dec!(125000)),
            LineItem::new("Support Plan", "SP-400", dec!(30000)).with_active(false),
        ]
    }

    #[test]
    fn writes_items_rules_and_totals() -> TestResult {
        let items = items();
        let mut policy = PricingPolicy::new();
        policy.set_enabled(BuiltInKind::ContractPricing, true);
        policy.set_enabled(BuiltInKind::SpecialAuthorization, true);

        let statement = Statement::new(&items, &policy, USD);

        let mut out = Vec::new();
        statement.write_to(&mut out)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("SP-400"), "missing inactive item:\n{text}");
        assert!(text.contains("Inactive"), "missing item status:\n{text}");
        assert!(text.contains("Contract Base (45%)"), "missing rule label:\n{text}");
        assert!(text.contains("-$120,825.00"), "missing contract savings:\n{text}");
        assert!(text.contains("-$7,383.75"), "missing authorization savings:\n{text}");
        assert!(text.contains("Disabled"), "missing disabled status:\n{text}");
        assert!(text.contains("$268,500.00"), "missing subtotal:\n{text}");
        assert!(text.contains("$140,291.25"), "missing net:\n{text}");

        Ok(())
    }

    #[test]
    fn reports_condition_not_met() -> TestResult {
        let items = [LineItem::new("Workstation", "WS-100", dec!(59500))];
        let mut policy = PricingPolicy::new();
        policy.set_enabled(BuiltInKind::VolumeTier, true);

        let mut out = Vec::new();
        Statement::new(&items, &policy, USD).write_to(&mut out)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Condition not met"), "missing status:\n{text}");

        Ok(())
    }

    #[test]
    fn savings_percent_is_relative_to_base_total() {
        let items = [LineItem::new("Workstation", "WS-100", dec!(1000))];
        let mut policy = PricingPolicy::new();
        policy.set_enabled(BuiltInKind::ContractPricing, true);

        let statement = Statement::new(&items, &policy, USD);

        assert_eq!(percent_points(statement.savings_percent()), dec!(45));
    }

    #[test]
    fn reports_out_of_range_rules() -> TestResult {
        let items = [LineItem::new("Workstation", "WS-100", Decimal::MAX)];
        let mut policy = PricingPolicy::new();
        policy.add_custom_rule(CustomRule::new("Markup", DiscountType::Flat, dec!(-1)));

        let statement = Statement::new(&items, &policy, USD);

        let mut out = Vec::new();
        statement.write_to(&mut out)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Out of range"), "missing status:\n{text}");
        assert_eq!(statement.evaluation().net(), Decimal::MAX);

        Ok(())
    }

    #[test]
    fn savings_percent_of_empty_quote_is_zero() {
        let items: [LineItem<Decimal>; 0] = [];
        let policy = PricingPolicy::new();

        let statement = Statement::new(&items, &policy, USD);

        assert_eq!(percent_points(statement.savings_percent()), Decimal::ZERO);
    }
}
