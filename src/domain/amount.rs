//! Exact token quantities in base units.
//!
//! All ledger arithmetic happens on [`Amount`]. Conversion to a human decimal
//! (division by 10^18) only happens at the presentation boundary through
//! [`Amount::to_decimal`] and [`Amount::to_ether_string`].

use crate::domain::Decimal;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits in the staked token's smallest denomination.
pub const TOKEN_DECIMALS: u32 = 18;

/// Largest mantissa `rust_decimal` can carry (2^96 - 1).
const MAX_DECIMAL_MANTISSA: u128 = (1u128 << 96) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Invalid amount {0:?}")]
    Parse(String),
    #[error("Amount {0} does not fit a display decimal")]
    DisplayOverflow(String),
}

/// Signed, unbounded token quantity in base units (18-decimal fixed point).
///
/// Signed because withdrawals are applied without validation; a negative
/// balance is how an incomplete or misordered feed shows up.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigInt);

impl Amount {
    pub const ZERO: Amount = Amount(BigInt::ZERO);

    pub fn new(value: BigInt) -> Self {
        Amount(value)
    }

    /// Amount from a count of base units.
    pub fn from_base_units(units: u128) -> Self {
        Amount(BigInt::from(units))
    }

    /// Amount from a count of whole tokens (`tokens * 10^18`).
    pub fn from_whole_tokens(tokens: u64) -> Self {
        Amount(BigInt::from(BigUint::from(tokens) * ten_pow(TOKEN_DECIMALS)))
    }

    /// Parse a decimal (`"-42"`, `"1000"`) or `0x`-prefixed hex string.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let magnitude = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                BigUint::parse_bytes(hex.as_bytes(), 16)
            }
            Some(_) => None,
            None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => {
                BigUint::parse_bytes(body.as_bytes(), 10)
            }
            None => None,
        }
        .ok_or_else(|| AmountError::Parse(s.to_string()))?;

        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok(Amount(BigInt::from_biguint(sign, magnitude)))
    }

    pub fn inner(&self) -> &BigInt {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.sign() == Sign::NoSign
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    /// Convert base units to a display decimal.
    ///
    /// Fractional digits beyond what `rust_decimal` can hold are truncated.
    pub fn to_decimal(&self) -> Result<Decimal, AmountError> {
        let limit = BigUint::from(MAX_DECIMAL_MANTISSA);
        let mut mantissa = self.0.magnitude().clone();
        let mut scale = TOKEN_DECIMALS;
        while mantissa > limit && scale > 0 {
            mantissa /= 10u32;
            scale -= 1;
        }

        let mantissa = mantissa
            .to_i128()
            .filter(|m| *m <= MAX_DECIMAL_MANTISSA as i128)
            .ok_or_else(|| AmountError::DisplayOverflow(self.to_string()))?;
        let signed = if self.is_negative() { -mantissa } else { mantissa };

        RustDecimal::try_from_i128_with_scale(signed, scale)
            .map(|d| Decimal::new(d.normalize()))
            .map_err(|_| AmountError::DisplayOverflow(self.to_string()))
    }

    /// Like [`Amount::to_decimal`], but clamps to the largest representable
    /// decimal of the same sign instead of failing.
    pub fn to_decimal_saturating(&self) -> Decimal {
        self.to_decimal().unwrap_or_else(|_| {
            if self.is_negative() {
                Decimal::new(RustDecimal::MIN)
            } else {
                Decimal::new(RustDecimal::MAX)
            }
        })
    }

    /// Exact decimal string in whole tokens, e.g. `"73672.405488529540367431"`.
    ///
    /// Trailing fractional zeros are trimmed but one fractional digit is kept.
    pub fn to_ether_string(&self) -> String {
        let scale = ten_pow(TOKEN_DECIMALS);
        let abs = self.0.magnitude();
        let whole = abs / &scale;
        let frac = abs % &scale;

        let frac = format!("{:0>width$}", frac.to_string(), width = TOKEN_DECIMALS as usize);
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };
        let sign = if self.is_negative() { "-" } else { "" };

        format!("{}{}.{}", sign, whole, frac)
    }
}

fn ten_pow(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl From<BigInt> for Amount {
    fn from(value: BigInt) -> Self {
        Amount(value)
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

// Base units always travel as decimal strings so storage never sees a float.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Text(s) => Amount::parse(&s).map_err(serde::de::Error::custom),
            AmountRepr::Unsigned(v) => Ok(Amount::from_base_units(u128::from(v))),
            AmountRepr::Signed(v) => Ok(Amount(BigInt::from(v))),
        }
    }
}
