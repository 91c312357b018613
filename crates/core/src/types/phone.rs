//! Ten-digit phone numbers as submitted through the public forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    /// After removing non-digits the number is not exactly ten digits long.
    #[error("phone number must be exactly 10 digits")]
    WrongLength,
    /// Ten digits, but outside the accepted numeric range.
    #[error("phone number out of range")]
    OutOfRange,
}

/// A ten-digit phone number stored as an integer.
///
/// Separators such as spaces, dashes and parentheses are stripped before
/// validation. The remaining digits must be exactly ten long and the value
/// must lie in `[1111111111, 10000000000)`.
///
/// ```
/// use zenzebra_core::PhoneNumber;
///
/// assert_eq!(PhoneNumber::parse("98765-43210").unwrap().as_u64(), 9_876_543_210);
/// assert!(PhoneNumber::parse("123").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(u64);

impl PhoneNumber {
    /// Number of digits a phone number must have.
    pub const DIGITS: usize = 10;
    /// Smallest accepted value.
    pub const MIN: u64 = 1_111_111_111;
    /// Exclusive upper bound.
    pub const MAX_EXCLUSIVE: u64 = 10_000_000_000;

    /// Parse a phone number from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::WrongLength`] unless exactly ten digits remain
    /// after stripping, and [`PhoneError::OutOfRange`] for values below
    /// [`Self::MIN`].
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength);
        }

        let value: u64 = digits.parse().map_err(|_| PhoneError::WrongLength)?;
        Self::from_u64(value)
    }

    /// Validate an integer that is already a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::OutOfRange`] if the value is outside the
    /// accepted range.
    pub const fn from_u64(value: u64) -> Result<Self, PhoneError> {
        if value < Self::MIN || value >= Self::MAX_EXCLUSIVE {
            return Err(PhoneError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// The number as stored by the backend.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
