//! Exact resource quantities.
//!
//! A [`Quantity`] stores its magnitude as an integer number of milli-units,
//! so sums and differences never drift the way floating-point values do.
//! The serialized form is the canonical Kubernetes-style string
//! (`"4"`, `"170m"`, `"7577Mi"`, `"20Gi"`).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuantityError;

/// Suffix family used when rendering a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Powers of 1000 (`k`, `M`, `G`, ...), plus `m` for milli-units.
    DecimalSi,
    /// Powers of 1024 (`Ki`, `Mi`, `Gi`, ...).
    BinarySi,
}

const MILLIS_PER_UNIT: i128 = 1000;

// Largest first, so rendering picks the biggest suffix that divides exactly.
const BINARY_SUFFIXES: &[(&str, i128)] = &[
    ("Ei", 1 << 60),
    ("Pi", 1 << 50),
    ("Ti", 1 << 40),
    ("Gi", 1 << 30),
    ("Mi", 1 << 20),
    ("Ki", 1 << 10),
];

const DECIMAL_SUFFIXES: &[(&str, i128)] = &[
    ("E", 1_000_000_000_000_000_000),
    ("P", 1_000_000_000_000_000),
    ("T", 1_000_000_000_000),
    ("G", 1_000_000_000),
    ("M", 1_000_000),
    ("k", 1_000),
];

/// An exact resource magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    millis: i128,
    format: Format,
}

impl Quantity {
    /// A whole-unit quantity (`Quantity::new(4, Format::DecimalSi)` is 4 CPUs).
    pub fn new(value: i64, format: Format) -> Self {
        Self {
            millis: i128::from(value) * MILLIS_PER_UNIT,
            format,
        }
    }

    /// A quantity expressed in milli-units (`100` is `100m`).
    pub fn from_milli(millis: i64, format: Format) -> Self {
        Self {
            millis: i128::from(millis),
            format,
        }
    }

    pub fn from_mebibytes(mebibytes: i64) -> Self {
        Self {
            millis: i128::from(mebibytes) * (1 << 20) * MILLIS_PER_UNIT,
            format: Format::BinarySi,
        }
    }

    pub fn from_gibibytes(gibibytes: i64) -> Self {
        Self {
            millis: i128::from(gibibytes) * (1 << 30) * MILLIS_PER_UNIT,
            format: Format::BinarySi,
        }
    }

    pub fn zero() -> Self {
        Self {
            millis: 0,
            format: Format::DecimalSi,
        }
    }

    /// Parse a quantity string, e.g. `"8192Mi"` or `"100m"`.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        s.parse()
    }

    /// The magnitude in milli-units.
    pub fn milli_value(&self) -> i128 {
        self.millis
    }

    /// The magnitude in whole units, rounded up.
    pub fn value(&self) -> i128 {
        let whole = self.millis.div_euclid(MILLIS_PER_UNIT);
        if self.millis.rem_euclid(MILLIS_PER_UNIT) == 0 {
            whole
        } else {
            whole + 1
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Quantity {}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.millis.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity {
            millis: self.millis + rhs.millis,
            format: self.format,
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.millis += rhs.millis;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity {
            millis: self.millis - rhs.millis,
            format: self.format,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis % MILLIS_PER_UNIT != 0 {
            return write!(f, "{}m", self.millis);
        }
        let value = self.millis / MILLIS_PER_UNIT;
        if value == 0 {
            return f.write_str("0");
        }
        let suffixes = match self.format {
            Format::BinarySi => BINARY_SUFFIXES,
            Format::DecimalSi => DECIMAL_SUFFIXES,
        };
        for (suffix, multiplier) in suffixes {
            if value % multiplier == 0 {
                return write!(f, "{}{suffix}", value / multiplier);
            }
        }
        write!(f, "{value}")
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(QuantityError::Empty);
        }

        let split = input
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
            .unwrap_or(input.len());
        let (number, suffix) = input.split_at(split);

        let (millis_per_unit, format) =
            suffix_scale(suffix).ok_or_else(|| QuantityError::UnknownSuffix {
                input: input.to_string(),
                suffix: suffix.to_string(),
            })?;

        let millis = parse_number(number, millis_per_unit)?
            .ok_or_else(|| QuantityError::OutOfRange(input.to_string()))?;

        Ok(Quantity { millis, format })
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for Quantity {
    type Error = QuantityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.to_string()
    }
}

/// Milli-units per whole unit of the suffix, and the format it implies.
fn suffix_scale(suffix: &str) -> Option<(i128, Format)> {
    match suffix {
        "" => Some((MILLIS_PER_UNIT, Format::DecimalSi)),
        "m" => Some((1, Format::DecimalSi)),
        _ => {
            if let Some((_, multiplier)) = BINARY_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
                return Some((multiplier * MILLIS_PER_UNIT, Format::BinarySi));
            }
            DECIMAL_SUFFIXES
                .iter()
                .find(|(s, _)| *s == suffix)
                .map(|(_, multiplier)| (multiplier * MILLIS_PER_UNIT, Format::DecimalSi))
        }
    }
}

/// Parse the numeric part into milli-units. Fractions finer than one
/// milli-unit are rounded up. `Ok(None)` signals overflow.
fn parse_number(number: &str, millis_per_unit: i128) -> Result<Option<i128>, QuantityError> {
    let invalid = || QuantityError::Invalid(number.to_string());

    let (negative, digits) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number.strip_prefix('+').unwrap_or(number)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_value: i128 = if whole.is_empty() {
        0
    } else {
        match whole.parse() {
            Ok(v) => v,
            Err(_) => return Ok(None),
        }
    };
    let Some(mut millis) = whole_value.checked_mul(millis_per_unit) else {
        return Ok(None);
    };

    if !fraction.is_empty() {
        let Some(denominator) = 10i128.checked_pow(fraction.len() as u32) else {
            return Ok(None);
        };
        let numerator: i128 = fraction.parse().map_err(|_| invalid())?;
        let Some(scaled) = numerator.checked_mul(millis_per_unit) else {
            return Ok(None);
        };
        let Some(rounded) = scaled.checked_add(denominator - 1) else {
            return Ok(None);
        };
        let fraction_millis = rounded / denominator;
        let Some(sum) = millis.checked_add(fraction_millis) else {
            return Ok(None);
        };
        millis = sum;
    }

    Ok(Some(if negative { -millis } else { millis }))
}
