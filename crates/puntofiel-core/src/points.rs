//! # Points Module
//!
//! Provides the `Points` type for loyalty balances and the `AccrualRate`
//! configuration parameter.
//!
//! ## Why Integer Points?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, 0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                │
//! │                                                                         │
//! │  A loyalty ledger must satisfy a conservation law: the sum of all      │
//! │  transaction deltas for a card equals its balance, exactly. Floats     │
//! │  drift; integers don't.                                                │
//! │                                                                         │
//! │  OUR SOLUTION: whole points as i64, everywhere                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use puntofiel_core::points::{AccrualRate, Points};
//!
//! let balance = Points::new(120);
//! let cost = Points::new(100);
//! assert_eq!((balance - cost).value(), 20);
//!
//! // Accrual: 5.00 currency units at 1.00 point per unit = 5 points
//! let earned = Points::earned_from_purchase(500, AccrualRate::default());
//! assert_eq!(earned.value(), 5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Accrual Rate
// =============================================================================

/// Points granted per currency unit spent, in hundredths of a point.
///
/// ## Why Hundredths?
/// 100 = 1.00 point per currency unit (the default program rate)
/// 150 = 1.50 points per currency unit (a promotion rate)
///
/// The rate is deliberately **external configuration**: the application
/// layer never hardcodes it and never infers it from returned balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRate(u32);

impl AccrualRate {
    /// Creates a rate from hundredths of a point per currency unit.
    #[inline]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        AccrualRate(hundredths)
    }

    /// Creates a rate from points per currency unit (for convenience).
    pub fn from_points_per_unit(points: f64) -> Self {
        AccrualRate((points * 100.0).round() as u32)
    }

    /// Returns the rate in hundredths of a point.
    #[inline]
    pub const fn hundredths(&self) -> u32 {
        self.0
    }
}

impl Default for AccrualRate {
    /// One point per currency unit.
    fn default() -> Self {
        AccrualRate(100)
    }
}

// =============================================================================
// Points Type
// =============================================================================

/// A quantity of loyalty points.
///
/// ## Design Decisions
/// - **i64 (signed)**: transaction deltas are negative for redemptions
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Balances themselves are invariant `>= 0`; the sign only appears in
/// ledger deltas. The backend enforces the balance invariant with a
/// conditional debit, never this type alone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Points(i64);

impl Points {
    /// Creates a Points value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Points(value)
    }

    /// Returns the raw point count.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Zero points.
    #[inline]
    pub const fn zero() -> Self {
        Points(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Points(self.0.abs())
    }

    /// Subtraction that reports underflow instead of going negative.
    ///
    /// ## Example
    /// ```rust
    /// use puntofiel_core::points::Points;
    ///
    /// assert_eq!(Points::new(100).checked_sub(Points::new(40)), Some(Points::new(60)));
    /// assert_eq!(Points::new(30).checked_sub(Points::new(40)), None);
    /// ```
    pub fn checked_sub(self, other: Points) -> Option<Points> {
        if self.0 >= other.0 {
            Some(Points(self.0 - other.0))
        } else {
            None
        }
    }

    /// Computes the points earned by a purchase.
    ///
    /// ## Formula
    /// `amount_cents × rate / 10000`, rounded half-up, with an i128
    /// intermediate to prevent overflow on large amounts.
    ///
    /// amount is in cents (smallest currency unit); the rate is in
    /// hundredths of a point per whole currency unit, so the combined
    /// divisor is 100 × 100 = 10000.
    ///
    /// ## Example
    /// ```rust
    /// use puntofiel_core::points::{AccrualRate, Points};
    ///
    /// // $12.50 at 1.00 pt/unit → 12.5 → rounds to 13
    /// let earned = Points::earned_from_purchase(1250, AccrualRate::from_hundredths(100));
    /// assert_eq!(earned.value(), 13);
    /// ```
    pub fn earned_from_purchase(amount_cents: i64, rate: AccrualRate) -> Points {
        let earned = (amount_cents as i128 * rate.hundredths() as i128 + 5000) / 10000;
        Points(earned as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation for logs and debugging.
impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pts", self.0)
    }
}

impl Add for Points {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Points(self.0 + other.0)
    }
}

impl AddAssign for Points {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Points {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Points(self.0 - other.0)
    }
}

impl SubAssign for Points {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by ticket count and similar quantities.
impl Mul<i64> for Points {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Points(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_value() {
        let p = Points::new(150);
        assert_eq!(p.value(), 150);
        assert!(p.is_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Points::new(120)), "120 pts");
        assert_eq!(format!("{}", Points::new(-50)), "-50 pts");
    }

    #[test]
    fn test_arithmetic() {
        let a = Points::new(100);
        let b = Points::new(40);

        assert_eq!((a + b).value(), 140);
        assert_eq!((a - b).value(), 60);
        assert_eq!((b * 3).value(), 120);
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(
            Points::new(100).checked_sub(Points::new(100)),
            Some(Points::zero())
        );
        assert_eq!(Points::new(99).checked_sub(Points::new(100)), None);
    }

    #[test]
    fn test_accrual_default_rate() {
        // 5.00 units at 1 pt/unit = 5 points
        let earned = Points::earned_from_purchase(500, AccrualRate::default());
        assert_eq!(earned.value(), 5);
    }

    #[test]
    fn test_accrual_rounds_half_up() {
        // 12.50 units at 1 pt/unit = 12.5 → 13
        let earned = Points::earned_from_purchase(1250, AccrualRate::from_hundredths(100));
        assert_eq!(earned.value(), 13);

        // 12.49 units → 12.49 → 12
        let earned = Points::earned_from_purchase(1249, AccrualRate::from_hundredths(100));
        assert_eq!(earned.value(), 12);
    }

    #[test]
    fn test_accrual_promotion_rate() {
        // 10.00 units at 1.50 pt/unit = 15 points
        let earned = Points::earned_from_purchase(1000, AccrualRate::from_points_per_unit(1.5));
        assert_eq!(earned.value(), 15);
    }

    #[test]
    fn test_accrual_zero_amount() {
        let earned = Points::earned_from_purchase(0, AccrualRate::default());
        assert!(earned.is_zero());
    }
}
