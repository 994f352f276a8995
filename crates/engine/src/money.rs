use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount in **whole đồng**.
///
/// VND has no minor unit, so the raw `i64` is the amount users see. Stored
/// records are never negative; the sign exists for derived values such as a
/// monthly balance.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(1_234_567);
/// assert_eq!(amount.to_string(), "1.234.567 ₫");
/// ```
///
/// Parsing strips the currency glyph, thousands separators and whitespace:
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("100.000đ".parse::<Money>().unwrap(), Money::new(100_000));
/// assert_eq!("1,250,000 ₫".parse::<Money>().unwrap(), Money::new(1_250_000));
/// assert!("abc".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

const CURRENCY_GLYPHS: [&str; 4] = ["VND", "vnd", "₫", "đ"];

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a single record or parsed value may carry.
    pub const MAX: Money = Money(1_000_000_000_000_000);

    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Raw amount in đồng.
    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Amount as a float, for ratios and averages.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Parses user or spreadsheet text, yielding [`Money::ZERO`] when the
    /// text is not a number.
    ///
    /// Callers that need to reject garbage must check the result is positive.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        text.parse().unwrap_or(Money::ZERO)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}{grouped} ₫")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

// Totals saturate instead of wrapping; record amounts are bounded by
// `Money::MAX`, so only pathological sums ever reach the limit.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses an amount of đồng.
    ///
    /// Accepts an optional leading `+`/`-` and an optional currency glyph
    /// (`đ`, `₫`, `VND`). Both `.` and `,` are treated as thousands
    /// separators since the currency has no fractional part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {}", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let mut cleaned = s.trim().to_string();
        for glyph in CURRENCY_GLYPHS {
            cleaned = cleaned.replace(glyph, "");
        }
        let cleaned: String = cleaned
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.' && *c != ',')
            .collect();

        if cleaned.is_empty() {
            return Err(empty());
        }

        let (negative, digits) = if let Some(rest) = cleaned.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = cleaned.strip_prefix('+') {
            (false, rest)
        } else {
            (false, cleaned.as_str())
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: i64 = digits.parse().map_err(|_| overflow())?;
        if value > Money::MAX.0 {
            return Err(overflow());
        }
        Ok(Money(if negative { -value } else { value }))
    }
}
