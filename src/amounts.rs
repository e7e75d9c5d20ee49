//! Amounts
//!
//! The evaluator is generic over the number type used for prices. `f64` keeps
//! plain floating-point semantics (NaN propagates, rounding error accumulates
//! across chained percentages); [`Decimal`] keeps every intermediate value
//! exact and is what fixtures and statements use.
//!
//! `Decimal` operators panic when a result leaves its range, so the evaluator
//! goes through the checked operations below instead.

use std::fmt::{Debug, Display};

use num_traits::Num;
use rust_decimal::Decimal;

/// A numeric type that prices, discounts and thresholds can be expressed in.
pub trait Amount: Num + PartialOrd + Copy + Debug + Display + From<u32> {
    /// One hundred, the divisor for percentage points.
    fn hundred() -> Self {
        Self::from(100_u32)
    }

    /// Returns `percent` points of `self`, computed as `self * (percent / 100)`.
    ///
    /// Panics for `Decimal` if the result is out of range; see [`Amount::checked_percent`].
    #[must_use]
    fn percent(self, percent: Self) -> Self {
        self * (percent / Self::hundred())
    }

    /// Adds, returning `None` if the result cannot be represented.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Subtracts, returning `None` if the result cannot be represented.
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// Percentage of `self`, returning `None` if the result cannot be represented.
    fn checked_percent(self, percent: Self) -> Option<Self>;

    /// Adds, clamping to the bounds of the type.
    #[must_use]
    fn saturating_add(self, rhs: Self) -> Self;
}

/// IEEE 754 arithmetic never traps: out-of-range results become infinite or NaN.
impl Amount for f64 {
    fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(self + rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        Some(self - rhs)
    }

    fn checked_percent(self, percent: Self) -> Option<Self> {
        Some(self.percent(percent))
    }

    fn saturating_add(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl Amount for Decimal {
    fn checked_add(self, rhs: Self) -> Option<Self> {
        Decimal::checked_add(self, rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        Decimal::checked_sub(self, rhs)
    }

    fn checked_percent(self, percent: Self) -> Option<Self> {
        let fraction = Decimal::checked_div(percent, Decimal::ONE_HUNDRED)?;

        Decimal::checked_mul(self, fraction)
    }

    fn saturating_add(self, rhs: Self) -> Self {
        Decimal::saturating_add(self, rhs)
    }
}

/// Sums a sequence of amounts, starting from zero and clamping at the type's bounds.
pub fn sum<T: Amount>(amounts: impl IntoIterator<Item = T>) -> T {
    amounts
        .into_iter()
        .fold(T::zero(), |acc, amount| acc.saturating_add(amount))
}

/// Sums a sequence of amounts, returning `None` if any partial sum is out of range.
pub fn checked_sum<T: Amount>(amounts: impl IntoIterator<Item = T>) -> Option<T> {
    amounts
        .into_iter()
        .try_fold(T::zero(), |acc, amount| acc.checked_add(amount))
}
