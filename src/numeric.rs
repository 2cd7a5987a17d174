//! Numeric helpers shared by the engine.
//!
//! Integer stats are scaled by floating multipliers in several places
//! (tier multipliers, critical hits, dungeon rewards). The rounding rule
//! for each is fixed here so every component agrees on it.

use std::cmp::Ordering;

/// Round to the nearest integer, with halves rounded up (towards +∞).
///
/// # Examples
///
/// ```rust
/// use zzcombat::numeric::round_half_up;
///
/// assert_eq!(round_half_up(22.5), 23);
/// assert_eq!(round_half_up(22.49), 22);
/// assert_eq!(round_half_up(-2.5), -2);
/// ```
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Scale an integer stat by a multiplier, truncating towards zero.
///
/// # Examples
///
/// ```rust
/// use zzcombat::numeric::scale_truncated;
///
/// assert_eq!(scale_truncated(15, 1.5), 22);
/// assert_eq!(scale_truncated(-15, 1.5), -22);
/// ```
pub fn scale_truncated(value: i64, multiplier: f64) -> i64 {
    (value as f64 * multiplier).trunc() as i64
}

/// Sum floating point values independently of their input order.
///
/// Float addition is not associative, so values are summed in a
/// canonical (total) order. Two permutations of the same values always
/// produce bit-identical sums.
///
/// # Examples
///
/// ```rust
/// use zzcombat::numeric::sum_unordered;
///
/// let a = sum_unordered([0.1, 0.2, 0.3]);
/// let b = sum_unordered([0.3, 0.1, 0.2]);
/// assert_eq!(a.to_bits(), b.to_bits());
/// ```
pub fn sum_unordered(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Clamp a rate into `[0, cap]`.
///
/// NaN inputs clamp to zero.
pub fn clamp_rate(rate: f64, cap: f64) -> f64 {
    match rate.partial_cmp(&0.0) {
        Some(Ordering::Greater) => rate.min(cap),
        _ => 0.0,
    }
}

/// Serde adapter for `u128` currency amounts.
///
/// Amounts that fit in a `u64` are written as plain numbers and larger
/// ones as decimal strings, so every amount survives `serde_json::Value`
/// and internally tagged enums. Both forms are accepted when reading.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Purse {
///     #[serde(with = "zzcombat::numeric::amount")]
///     gold: u128,
/// }
///
/// let big = Purse { gold: u64::MAX as u128 + 1 };
/// let json = serde_json::to_string(&big).unwrap();
/// assert_eq!(json, r#"{"gold":"18446744073709551616"}"#);
///
/// let small: Purse = serde_json::from_str(r#"{"gold":20}"#).unwrap();
/// assert_eq!(small.gold, 20);
/// ```
pub mod amount {
    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        match u64::try_from(*value) {
            Ok(small) => serializer.serialize_u64(small),
            Err(_) => serializer.collect_str(value),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
            Ok(value as u128)
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<u128, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u128, E> {
            u128::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
            value
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}
