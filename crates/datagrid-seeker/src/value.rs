//! Runtime value types for record columns.
//!
//! A [`Scalar`] is one hydrated column value. Query backends produce them,
//! the mapper hands them to renderers, and computed columns receive them as
//! arguments.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Owned column value of a hydrated record.
///
/// Serializes untagged, so a record round-trips through JSON as a plain
/// object of strings, numbers, booleans and nulls.
///
/// # Example
///
/// ```
/// use datagrid_seeker::{Number, Scalar};
///
/// assert_eq!(Scalar::from("Ada").to_string(), "Ada");
/// assert_eq!(Scalar::from(42i64), Scalar::Number(Number::I64(42)));
/// assert_eq!(Scalar::Null.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// SQL `NULL` or a missing column.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value.
    String(String),
}

impl Scalar {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Infers a typed scalar from raw text, as a loosely typed backend would.
    ///
    /// Empty text is `Null`, integers and floats become numbers, `true` and
    /// `false` become booleans, everything else stays a string.
    pub fn infer(raw: &str) -> Scalar {
        if raw.is_empty() {
            return Scalar::Null;
        }
        if let Some(n) = Number::parse(raw) {
            return Scalar::Number(n);
        }
        match raw {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            _ => Scalar::String(raw.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Null)
    }
}

macro_rules! scalar_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )*
    };
}

scalar_from_number!(i32, i64, u32, u64, usize, f64);

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Comparisons between different numeric types are handled by converting
/// to `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Total, exact ordering across all variants.
    ///
    /// Integers compare without going through `f64`, so large values keep
    /// their precision; NaN sorts above every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(a), None) => cmp_int_float(a, other.to_f64()),
            (None, Some(b)) => cmp_int_float(b, self.to_f64()).reverse(),
            (None, None) => {
                let (a, b) = (self.to_f64(), other.to_f64());
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                }
            }
        }
    }

    fn as_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(n.into()),
            Number::U64(n) => Some(n.into()),
            Number::F64(_) => None,
        }
    }

    /// Parses a decimal literal, preferring integer representations.
    ///
    /// Returns `None` for anything that is not a plain finite number.
    pub fn parse(raw: &str) -> Option<Number> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = raw.parse::<u64>() {
            return Some(Number::U64(n));
        }
        // Rust's float parser accepts "inf" and "NaN"; those are text here.
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && raw.bytes().any(|b| b.is_ascii_digit()) => {
                Some(Number::F64(n))
            }
            _ => None,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Compares two scalars the way a loosely typed SQL backend would.
///
/// The result is a total order, so it is safe to sort with. Values rank
/// by kind first: numbers (including numeric text), then booleans, then
/// other text, then nulls. Within a kind, numbers compare numerically and
/// text compares bytewise.
pub fn compare_scalars(a: &Scalar, b: &Scalar) -> Ordering {
    match (SortKey::of(a), SortKey::of(b)) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Bool(x), SortKey::Bool(y)) => x.cmp(&y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (x, y) => x.rank().cmp(&y.rank()),
    }
}

enum SortKey<'a> {
    Number(Number),
    Bool(bool),
    Text(&'a str),
    Null,
}

impl<'a> SortKey<'a> {
    fn of(value: &'a Scalar) -> Self {
        match value {
            Scalar::Null => SortKey::Null,
            Scalar::Bool(b) => SortKey::Bool(*b),
            Scalar::Number(n) => SortKey::Number(*n),
            Scalar::String(s) => match Number::parse(s) {
                Some(n) => SortKey::Number(n),
                None => SortKey::Text(s),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Bool(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Null => 3,
        }
    }
}

/// Exact comparison of an integer with a float. NaN ranks above every
/// number.
fn cmp_int_float(i: i128, f: f64) -> Ordering {
    // Every i64 and u64 lies strictly inside this range.
    const LIMIT: f64 = 1.8446744073709552e19;
    if f.is_nan() || f >= LIMIT {
        return Ordering::Less;
    }
    if f <= -LIMIT {
        return Ordering::Greater;
    }
    let floor = f.floor();
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f > floor => Ordering::Less,
        other => other,
    }
}
