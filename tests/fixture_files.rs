//! Loading policy scenarios from disk.

use std::fs;

use rust_decimal_macros::dec;
use rusty_money::iso::USD;
use testresult::TestResult;

use policy_pricing::prelude::*;

const QUOTE: &str = r#"
line_items:
  - { name: "Workstation", sku: "WS-100", price: "1,000.00 USD" }
  - { name: "Server Rack", sku: "SR-200", price: "3,000.00 USD" }
builtins:
  seasonal_promotion:
    enabled: true
    discount: "100 USD"
"#;

#[test]
fn loads_named_set_from_base_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("policies"))?;
    fs::write(dir.path().join("policies").join("quote.yml"), QUOTE)?;

    let fixture = Fixture::from_set_in(dir.path(), "quote")?;
    let evaluation = fixture.policy().evaluate_items(fixture.items());

    assert_eq!(fixture.currency(), USD);
    assert_eq!(evaluation.base_total(), dec!(4000));
    assert_eq!(evaluation.net(), dec!(3900));

    Ok(())
}

#[test]
fn deactivated_items_leave_the_base_total() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("quote.yml");
    fs::write(&path, QUOTE)?;

    let mut fixture = Fixture::from_path(&path)?;

    assert!(fixture.deactivate("SR-200"));

    let evaluation = fixture.policy().evaluate_items(fixture.items());

    assert_eq!(evaluation.base_total(), dec!(1000));
    assert_eq!(evaluation.net(), dec!(900));

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;

    let result = Fixture::from_set_in(dir.path(), "missing");

    assert!(matches!(result, Err(FixtureError::Io(_))));

    Ok(())
}

#[test]
fn malformed_yaml_is_a_parse_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.yml");
    fs::write(&path, "line_items: [")?;

    let result = Fixture::from_path(&path);

    assert!(matches!(result, Err(FixtureError::Yaml(_))));

    Ok(())
}

#[test]
fn bundled_default_set_starts_with_contract_pricing_only() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let evaluation = fixture.policy().evaluate_items(fixture.items());

    assert_eq!(evaluation.active_rule_count(), 1);
    assert_eq!(
        evaluation.status_of(RuleId::BuiltIn(BuiltInKind::ContractPricing)),
        Some(RuleStatus::Applied)
    );
    assert_eq!(fixture.policy().validate(), Ok(()));

    Ok(())
}
