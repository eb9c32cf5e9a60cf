use crate::ids::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Monetary amount in integer cents.
///
/// All commission arithmetic stays in integer cents so splits can be made
/// exact: a derived cut is rounded half-up at basis-point precision and the
/// final party's cut is always the residual, never independently rounded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Parses a decimal string such as `"1234.56"` (at most two fraction
    /// digits) into cents.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("amount must not be empty".to_string()));
        }
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, s),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError(format!("invalid amount: {input}")));
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError(format!(
                "amount must have at most two fraction digits: {input}"
            )));
        }
        let whole: i64 = whole
            .parse()
            .map_err(|_| ValidationError(format!("amount out of range: {input}")))?;
        let mut frac_cents: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse()
                .map_err(|_| ValidationError(format!("invalid amount: {input}")))?
        };
        if frac.len() == 1 {
            frac_cents *= 10;
        }
        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .and_then(|c| c.checked_mul(sign))
            .map(Self)
            .ok_or_else(|| ValidationError(format!("amount out of range: {input}")))
    }

    /// Applies a basis-point rate (1/100 of a percent), rounding half-up.
    ///
    /// Defined for non-negative amounts only; commission inputs are
    /// validated positive before any split is computed.
    #[must_use]
    pub fn percent_bp_half_up(self, rate_bp: u32) -> Self {
        let scaled = i128::from(self.0) * i128::from(rate_bp) + 5_000;
        Self((scaled / 10_000) as i64)
    }

    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn checked_add(self, other: Self) -> Result<Self, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| ValidationError("amount overflow".to_string()))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
