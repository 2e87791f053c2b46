//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cashier typing a final price of ₹699.90 on three kurtas expects     │
//! │  exactly ₹2099.70 on the bill, not ₹2099.7000000000003.                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    69990 paise × 3 = 209970 paise                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dukaan_core::money::Money;
//!
//! // Create from paise (preferred) or whole rupees
//! let price = Money::from_paise(79_900); // ₹799.00
//! assert_eq!(price, Money::from_rupees(799));
//!
//! // Arithmetic operations
//! let doubled = price * 2;                 // ₹1598.00
//! let total = price + Money::from_rupees(1); // ₹800.00
//!
//! // Parse what the cashier typed
//! let typed: Money = "699.90".parse().unwrap();
//! assert_eq!(typed.paise(), 69_990);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Number of paise in one rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

/// Symbol used by `Display`.
pub const RUPEE_SIGN: &str = "₹";

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values can be represented so that input
///   validation, not the type, decides what is acceptable
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CatalogItem.unit_price ──► LineItem.unit_price ──► LineItem.total      │
/// │                                   │                                     │
/// │                     discount + final_price == unit_price                │
/// │                                                                         │
/// │  Σ total ──► subtotal ──► − bargain ──► grand_total ──► final_total    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::money::Money;
    ///
    /// let price = Money::from_paise(79_950); // Represents ₹799.50
    /// assert_eq!(price.paise(), 79_950);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// Catalog prices in the shop are whole rupees, so this is the common
    /// constructor outside of parsing.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISE_PER_RUPEE)
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(79_950).rupees(), 799);
    /// assert_eq!(Money::from_paise(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % PAISE_PER_RUPEE).abs()
    }

    /// Formats the amount behind a caller-chosen currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(79_950).format_with("Rs. "), "Rs. 799.50");
    /// assert_eq!(Money::from_paise(-550).format_with("₹"), "-₹5.50");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.rupees().abs(),
            self.paise_part()
        )
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
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
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::money::Money;
    ///
    /// let final_price = Money::from_rupees(700);
    /// assert_eq!(final_price.multiply_quantity(2), Money::from_rupees(1400));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Floors the value at zero.
    ///
    /// ```text
    /// afterBargain = max(subtotal − bargain, 0)
    ///                ^^^^^^^^^^^^^^^^^^^^^^^^^^ THIS FUNCTION
    /// ```
    #[inline]
    pub const fn non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Clamps the value into `[Money::zero(), ceiling]`.
    ///
    /// Used for discounts, which can never be negative nor exceed the
    /// unit price they are taken from. A negative ceiling yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::money::Money;
    ///
    /// let mrp = Money::from_rupees(799);
    /// assert_eq!(Money::from_rupees(900).clamp_to(mrp), mrp);
    /// assert_eq!(Money::from_rupees(-5).clamp_to(mrp), Money::zero());
    /// assert_eq!(Money::from_rupees(99).clamp_to(mrp), Money::from_rupees(99));
    /// ```
    #[inline]
    pub fn clamp_to(self, ceiling: Money) -> Self {
        Money(self.0.min(ceiling.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money with the rupee sign.
///
/// ## Note
/// Use [`Money::format_with`] when the symbol comes from store settings.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(RUPEE_SIGN))
    }
}

/// Parses what a cashier types into an amount field.
///
/// ## Accepted Forms
/// - `"799"` → ₹799.00
/// - `"99.5"` → ₹99.50
/// - `"0.05"` → ₹0.05
/// - `"-20"` → -₹20.00 (callers decide whether negatives are allowed)
///
/// More than two fractional digits, empty input, or stray characters are
/// rejected with [`ValidationError::InvalidFormat`].
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a number"))?,
        };

        let paise = whole_value
            .checked_mul(PAISE_PER_RUPEE)
            .and_then(|p| p.checked_add(frac_value))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -paise } else { paise }))
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
