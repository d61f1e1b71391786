use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(ProductId);
id_newtype!(OrderId);
id_newtype!(ReviewId);
id_newtype!(ImageId);

/// Amount of money in integer cents.
///
/// On the wire this is a decimal number (`89.99`). Form inputs post numbers as
/// strings, so both `89.99` and `"89.99"` are accepted when deserialising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest accepted amount, $1,000,000.00.
    pub const MAX: Money = Money(100_000_000);

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(qty)))
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount: {0}")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Money::ZERO);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ParseMoneyError(raw.to_string()))?;
        Money::try_from(value).map_err(|_| ParseMoneyError(raw.to_string()))
    }
}

impl TryFrom<f64> for Money {
    type Error = ParseMoneyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(ParseMoneyError(value.to_string()));
        }
        let cents = (value * 100.0).round();
        if cents > Money::MAX.0 as f64 {
            return Err(ParseMoneyError(value.to_string()));
        }
        Ok(Money(cents as i64))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Int(whole) => whole
                .checked_mul(100)
                .filter(|cents| (0..=Money::MAX.0).contains(cents))
                .map(Money)
                .ok_or_else(|| de::Error::custom(format!("invalid amount: {whole}"))),
            NumberOrText::Float(value) => Money::try_from(value).map_err(de::Error::custom),
            NumberOrText::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Non-negative item count (`countInStock`, `qty`), accepted as a number or a
/// numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Count(pub u32);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Int(value) => u32::try_from(value).ok(),
            NumberOrText::Float(value) if value.fract() == 0.0 && value >= 0.0 => {
                u32::try_from(value as i64).ok()
            }
            NumberOrText::Float(_) => None,
            NumberOrText::Text(text) if text.trim().is_empty() => Some(0),
            NumberOrText::Text(text) => text.trim().parse::<u32>().ok(),
        };
        parsed
            .map(Count)
            .ok_or_else(|| de::Error::custom("count must be a non-negative integer"))
    }
}
