use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative amount with two fraction digits, held as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(i64);

impl Price {
    pub fn from_amount(amount: f64) -> Result<Self, String> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(format!("Price must be a non-negative number, got {amount}"));
        }
        let cents = (amount * 100.0).round();
        // i64::MAX rounds up to 2^63 as f64, which no longer fits.
        if cents >= i64::MAX as f64 {
            return Err(format!("Price out of range: {amount}"));
        }
        Ok(Price(cents as i64))
    }

    pub fn from_cents(cents: i64) -> Result<Self, String> {
        if cents < 0 {
            return Err(format!("Price must be non-negative, got {cents} cents"));
        }
        Ok(Price(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Price {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::from_amount(value)
    }
}

impl From<Price> for f64 {
    fn from(p: Price) -> Self {
        p.amount()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
