//! Custom Rules

use slotmap::new_key_type;

use crate::{amounts::Amount, rules::DiscountType};

new_key_type! {
    /// Custom Rule Key
    pub struct CustomRuleKey;
}

/// A rule authored at runtime.
///
/// Custom rules always compute percentages against the running net and only
/// fire when that net is at least their condition threshold. A threshold of
/// zero makes the rule fire whenever it is enabled.
///
/// The key is null until the rule is added to a
/// [`PricingPolicy`](crate::policy::PricingPolicy).
#[derive(Clone, Debug, PartialEq)]
pub struct CustomRule<T> {
    key: CustomRuleKey,
    name: String,
    description: String,
    discount_type: DiscountType,
    value: T,
    condition_threshold: T,
    enabled: bool,
}

impl<T: Amount> CustomRule<T> {
    /// Creates an enabled custom rule with no description and a zero threshold.
    pub fn new(name: impl Into<String>, discount_type: DiscountType, value: T) -> Self {
        Self {
            key: CustomRuleKey::default(),
            name: name.into(),
            description: String::new(),
            discount_type,
            value,
            condition_threshold: T::zero(),
            enabled: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the minimum running net the rule needs.
    #[must_use]
    pub fn with_condition_threshold(mut self, threshold: T) -> Self {
        self.condition_threshold = threshold;
        self
    }

    /// Returns the rule switched on or off.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Rule key.
    pub fn key(&self) -> CustomRuleKey {
        self.key
    }

    /// Rule name, also used as its breakdown label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Discount type.
    pub fn discount_type(&self) -> DiscountType {
        self.discount_type
    }

    /// Percentage points or flat amount.
    pub fn value(&self) -> T {
        self.value
    }

    /// Minimum running net the rule needs.
    pub fn condition_threshold(&self) -> T {
        self.condition_threshold
    }

    /// Whether the rule is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switches the rule on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_key(&mut self, key: CustomRuleKey) {
        self.key = key;
    }
}
