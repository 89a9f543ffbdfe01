use std::{fmt, str::FromStr};

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values crossing the display boundary
/// (limits, transaction amounts) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "$12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("12.5".parse::<MoneyCents>().unwrap().cents(), 1250);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
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

    /// Formats the amount with the currency symbol, e.g. `-$10.50`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        currency.render(self.0)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(Currency::default()))
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading `+`/`-`
    /// and an optional leading `$`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        let rest = rest.strip_prefix('$').unwrap_or(rest).trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        // ".5" is a valid way to type fifty cents.
        let major: i64 = if major_str.is_empty() && minor_str.is_some() {
            0
        } else {
            if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            major_str.parse().map_err(|_| overflow())?
        };

        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        Ok(MoneyCents(sign * total))
    }
}

/// Converts a display amount (dollars) into minor units.
///
/// Rounds half away from zero. Non-finite and negative inputs yield `0`.
#[must_use]
pub fn to_minor_units(display: f64) -> i64 {
    if !display.is_finite() || display < 0.0 {
        return 0;
    }
    let scaled = (display * 100.0).round();
    if scaled >= i64::MAX as f64 {
        return 0;
    }
    scaled as i64
}

/// Converts minor units into a display amount (dollars).
///
/// `None` stays `None`: "no limit set" is not the same as "limit is zero".
#[must_use]
pub fn to_display_units(minor: Option<i64>) -> Option<f64> {
    minor.map(|cents| (cents as f64 / 100.0 * 100.0).round() / 100.0)
}

/// A monetary limit as entered by the user.
///
/// The three states are resolved once, at the display-to-domain boundary:
/// - `Unset`: the field is blank, the dimension is unrestricted.
/// - `Zero`: the user explicitly typed zero.
/// - `Amount`: a strictly positive cap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LimitSetting {
    #[default]
    Unset,
    Zero,
    Amount(MoneyCents),
}

impl LimitSetting {
    /// Resolves the raw text of an input field.
    ///
    /// Blank text is `Unset`; malformed text is a validation error.
    pub fn from_text(text: &str) -> Result<Self, EngineError> {
        if text.trim().is_empty() {
            return Ok(Self::Unset);
        }
        let amount: MoneyCents = text.parse()?;
        if amount.is_negative() {
            tracing::debug!("negative limit {text:?} treated as unset");
            return Ok(Self::Unset);
        }
        Ok(Self::from_cents(Some(amount.cents())))
    }

    /// Resolves a stored value in cents (used when editing an existing rule).
    #[must_use]
    pub fn from_cents(cents: Option<i64>) -> Self {
        match cents {
            None => Self::Unset,
            Some(0) => Self::Zero,
            Some(c) if c > 0 => Self::Amount(MoneyCents::new(c)),
            Some(_) => Self::Unset,
        }
    }

    /// The cents to send to the backend, only for a positive cap.
    #[must_use]
    pub fn cents(self) -> Option<i64> {
        match self {
            Self::Amount(amount) => Some(amount.cents()),
            Self::Unset | Self::Zero => None,
        }
    }

    #[must_use]
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}
