//! Policy Pricing
//!
//! Policy Pricing quotes a set of catalog line items under a pricing policy: an
//! ordered stack of built-in and custom discount rules, each applied to the net
//! left by the rules before it.

pub mod amounts;
pub mod evaluator;
pub mod fixtures;
pub mod items;
pub mod policy;
pub mod prelude;
pub mod rules;
pub mod statement;
