//! Built-in Rules

use std::fmt;

use crate::{
    amounts::Amount,
    rules::{AppliesOn, DiscountType, Threshold},
};

/// The four built-in policy rules, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum BuiltInKind {
    /// Negotiated contract discount off the base total.
    ContractPricing,

    /// Extra discount granted by special authorization.
    SpecialAuthorization,

    /// Volume discount for large orders.
    VolumeTier,

    /// Time-limited seasonal promotion.
    SeasonalPromotion,
}

impl BuiltInKind {
    /// All built-in kinds in evaluation order.
    pub const ALL: [BuiltInKind; 4] = [
        BuiltInKind::ContractPricing,
        BuiltInKind::SpecialAuthorization,
        BuiltInKind::VolumeTier,
        BuiltInKind::SeasonalPromotion,
    ];

    /// Fixture key for this kind (e.g. `contract_pricing`).
    pub fn key(self) -> &'static str {
        match self {
            BuiltInKind::ContractPricing => "contract_pricing",
            BuiltInKind::SpecialAuthorization => "special_authorization",
            BuiltInKind::VolumeTier => "volume_tier",
            BuiltInKind::SeasonalPromotion => "seasonal_promotion",
        }
    }

    /// Looks a kind up by its fixture key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    fn title(self) -> &'static str {
        match self {
            BuiltInKind::ContractPricing => "Contract Base",
            BuiltInKind::SpecialAuthorization => "Special Authorization",
            BuiltInKind::VolumeTier => "Volume Tier",
            BuiltInKind::SeasonalPromotion => "Seasonal Promotion",
        }
    }
}

impl fmt::Display for BuiltInKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A built-in rule and its toggle state.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltInRule<T> {
    kind: BuiltInKind,
    enabled: bool,
    discount_type: DiscountType,
    value: T,
    applies_on: AppliesOn,
    threshold: Option<Threshold<T>>,
}

impl<T: Amount> BuiltInRule<T> {
    /// Creates a disabled built-in rule.
    pub fn new(kind: BuiltInKind, discount_type: DiscountType, value: T) -> Self {
        Self {
            kind,
            enabled: false,
            discount_type,
            value,
            applies_on: AppliesOn::RunningNet,
            threshold: None,
        }
    }

    /// Default configuration for a kind.
    pub fn for_kind(kind: BuiltInKind) -> Self {
        match kind {
            BuiltInKind::ContractPricing => Self::contract_pricing(),
            BuiltInKind::SpecialAuthorization => Self::special_authorization(),
            BuiltInKind::VolumeTier => Self::volume_tier(),
            BuiltInKind::SeasonalPromotion => Self::seasonal_promotion(),
        }
    }

    /// 45% off the base total.
    pub fn contract_pricing() -> Self {
        Self::new(
            BuiltInKind::ContractPricing,
            DiscountType::Percentage,
            T::from(45_u32),
        )
        .with_applies_on(AppliesOn::BaseTotal)
    }

    /// A further 5% off the running net.
    pub fn special_authorization() -> Self {
        Self::new(
            BuiltInKind::SpecialAuthorization,
            DiscountType::Percentage,
            T::from(5_u32),
        )
    }

    /// 3% off the running net once it is above 100,000.
    pub fn volume_tier() -> Self {
        Self::new(BuiltInKind::VolumeTier, DiscountType::Percentage, T::from(3_u32))
            .with_threshold(Threshold::above(T::from(100_000_u32)))
    }

    /// 2% off the running net.
    pub fn seasonal_promotion() -> Self {
        Self::new(
            BuiltInKind::SeasonalPromotion,
            DiscountType::Percentage,
            T::from(2_u32),
        )
    }

    /// Sets the basis for percentage discounts.
    #[must_use]
    pub fn with_applies_on(mut self, applies_on: AppliesOn) -> Self {
        self.applies_on = applies_on;
        self
    }

    /// Gates the rule behind a threshold on the running net.
    #[must_use]
    pub fn with_threshold(mut self, threshold: Threshold<T>) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Removes any threshold.
    #[must_use]
    pub fn without_threshold(mut self) -> Self {
        self.threshold = None;
        self
    }

    /// Replaces the discount.
    #[must_use]
    pub fn with_discount(mut self, discount_type: DiscountType, value: T) -> Self {
        self.discount_type = discount_type;
        self.value = value;
        self
    }

    /// Returns the rule switched on or off.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Rule kind.
    pub fn kind(&self) -> BuiltInKind {
        self.kind
    }

    /// Whether the rule is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switches the rule on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Discount type.
    pub fn discount_type(&self) -> DiscountType {
        self.discount_type
    }

    /// Percentage points or flat amount.
    pub fn value(&self) -> T {
        self.value
    }

    /// Percentage basis.
    pub fn applies_on(&self) -> AppliesOn {
        self.applies_on
    }

    /// Threshold on the running net.
    pub fn threshold(&self) -> Option<Threshold<T>> {
        self.threshold
    }

    /// Breakdown label, e.g. `Contract Base (45%)`.
    pub fn label(&self) -> String {
        let title = self.kind.title();

        match (self.kind, self.discount_type) {
            (BuiltInKind::SpecialAuthorization, DiscountType::Percentage) => {
                format!("{title} (+{}%)", self.value)
            }
            (_, DiscountType::Percentage) => format!("{title} ({}%)", self.value),
            (_, DiscountType::Flat) => format!("{title} ({} off)", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_are_disabled() {
        for kind in BuiltInKind::ALL {
            assert!(
                !BuiltInRule::<Decimal>::for_kind(kind).is_enabled(),
                "{kind} should start disabled"
            );
        }
    }

    #[test]
    fn default_labels() {
        assert_eq!(
            BuiltInRule::<Decimal>::contract_pricing().label(),
            "Contract Base (45%)"
        );
        assert_eq!(
            BuiltInRule::<Decimal>::special_authorization().label(),
            "Special Authorization (+5%)"
        );
        assert_eq!(
            BuiltInRule::<Decimal>::volume_tier().label(),
            "Volume Tier (3%)"
        );
        assert_eq!(
            BuiltInRule::<Decimal>::seasonal_promotion().label(),
            "Seasonal Promotion (2%)"
        );
    }

    #[test]
    fn flat_label_names_the_amount() {
        let rule = BuiltInRule::seasonal_promotion().with_discount(DiscountType::Flat, dec!(2500));

        assert_eq!(rule.label(), "Seasonal Promotion (2500 off)");
    }

    #[test]
    fn volume_tier_is_gated_above_one_hundred_thousand() {
        let rule = BuiltInRule::<Decimal>::volume_tier();

        assert_eq!(rule.threshold(), Some(Threshold::above(dec!(100000))));
    }

    #[test]
    fn kind_keys_round_trip() {
        for kind in BuiltInKind::ALL {
            assert_eq!(BuiltInKind::from_key(kind.key()), Some(kind));
        }

        assert_eq!(BuiltInKind::from_key("loyalty"), None);
    }
}
