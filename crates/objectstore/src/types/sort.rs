//! Sort specifications and sortable values.
//!
//! A [`Sort`] names an attribute (of a store-specific attribute type `S`) and
//! a direction. DAO implementations translate sort specifications into their
//! native ordering mechanism (an `ORDER BY` clause, an in-memory comparator).
//!
//! [`SortValue`] is the store-agnostic scalar an element exposes for one sort
//! attribute. Mark-based pagination compares these values to find the
//! position of a mark inside an ordered result set.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ASC"),
            SortOrder::Descending => write!(f, "DESC"),
        }
    }
}

/// A sort specification: an attribute and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort<S> {
    /// The attribute to sort by.
    pub attribute: S,

    /// The direction.
    pub order: SortOrder,
}

impl<S> Sort<S> {
    /// Creates a sort specification.
    pub fn new(attribute: S, order: SortOrder) -> Self {
        Self { attribute, order }
    }

    /// Creates an ascending sort on `attribute`.
    pub fn asc(attribute: S) -> Self {
        Self::new(attribute, SortOrder::Ascending)
    }

    /// Creates a descending sort on `attribute`.
    pub fn desc(attribute: S) -> Self {
        Self::new(attribute, SortOrder::Descending)
    }
}

/// A scalar value an element exposes for a sort attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortValue {
    /// Absent value. Sorts before everything else.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Decimal value.
    Decimal(f64),
    /// Text value.
    Text(String),
}

impl SortValue {
    /// Total ordering across all values.
    ///
    /// `Null < Boolean < numbers < Text`. Integers and decimals compare
    /// exactly with each other; decimals use IEEE total ordering.
    pub fn compare(&self, other: &Self) -> Ordering {
        use SortValue::*;

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Decimal(a), Decimal(b)) => a.total_cmp(b),
            (Integer(a), Decimal(b)) => compare_integer_decimal(*a, *b),
            (Decimal(a), Integer(b)) => compare_integer_decimal(*b, *a).reverse(),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Returns true if this is [`SortValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, SortValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::Boolean(_) => 1,
            SortValue::Integer(_) | SortValue::Decimal(_) => 2,
            SortValue::Text(_) => 3,
        }
    }
}

/// Compares an integer with a decimal without rounding the integer.
fn compare_integer_decimal(i: i64, d: f64) -> Ordering {
    // 2^63, the first decimal above every i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if d.is_nan() {
        return (i as f64).total_cmp(&d);
    }
    if d >= LIMIT {
        return Ordering::Less;
    }
    if d < -LIMIT {
        return Ordering::Greater;
    }

    let whole = d.trunc();
    i.cmp(&(whole as i64)).then_with(|| whole.total_cmp(&d))
}

impl From<&str> for SortValue {
    fn from(s: &str) -> Self {
        SortValue::Text(s.to_string())
    }
}

impl From<String> for SortValue {
    fn from(s: String) -> Self {
        SortValue::Text(s)
    }
}

impl From<i64> for SortValue {
    fn from(n: i64) -> Self {
        SortValue::Integer(n)
    }
}

impl From<i32> for SortValue {
    fn from(n: i32) -> Self {
        SortValue::Integer(n as i64)
    }
}

impl From<f64> for SortValue {
    fn from(n: f64) -> Self {
        SortValue::Decimal(n)
    }
}

impl From<bool> for SortValue {
    fn from(b: bool) -> Self {
        SortValue::Boolean(b)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SortValue::Null, Into::into)
    }
}

/// Elements that expose a [`SortValue`] per sort attribute.
///
/// Mark-based pagination uses this to locate a mark inside the ordering. The
/// values returned must agree with the order the storage adapter produces for
/// the same attribute.
pub trait Sortable<S> {
    /// Returns the value of `attribute` for this element.
    fn sort_value(&self, attribute: &S) -> SortValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_apply() {
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(
            SortOrder::Descending.apply(Ordering::Less),
            Ordering::Greater
        );
        assert_eq!(SortOrder::Descending.reverse(), SortOrder::Ascending);
    }

    #[test]
    fn test_sort_value_ordering_across_kinds() {
        let mut values = vec![
            SortValue::Text("a".into()),
            SortValue::Integer(3),
            SortValue::Null,
            SortValue::Decimal(2.5),
            SortValue::Boolean(true),
        ];
        values.sort_by(|a, b| a.compare(b));

        assert_eq!(
            values,
            vec![
                SortValue::Null,
                SortValue::Boolean(true),
                SortValue::Decimal(2.5),
                SortValue::Integer(3),
                SortValue::Text("a".into()),
            ]
        );
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(
            SortValue::Integer(2).compare(&SortValue::Decimal(2.0)),
            Ordering::Equal
        );
        assert_eq!(
            SortValue::Decimal(1.5).compare(&SortValue::Integer(2)),
            Ordering::Less
        );
        assert_eq!(
            SortValue::Integer(-2).compare(&SortValue::Decimal(-1.5)),
            Ordering::Less
        );
        assert_eq!(
            SortValue::Integer(-1).compare(&SortValue::Decimal(-1.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_large_integers_compare_exactly_with_decimals() {
        // 2^53 + 1 has no f64 representation and used to round onto 2^53.
        let above = SortValue::Integer((1 << 53) + 1);
        let decimal = SortValue::Decimal((1u64 << 53) as f64);
        assert_eq!(above.compare(&decimal), Ordering::Greater);
        assert_eq!(decimal.compare(&above), Ordering::Less);

        assert_eq!(
            SortValue::Integer(i64::MAX).compare(&SortValue::Decimal(9_223_372_036_854_775_808.0)),
            Ordering::Less
        );
        assert_eq!(
            SortValue::Integer(i64::MIN).compare(&SortValue::Decimal(-9_223_372_036_854_775_808.0)),
            Ordering::Equal
        );
        assert_eq!(
            SortValue::Integer(i64::MIN).compare(&SortValue::Decimal(f64::NEG_INFINITY)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_value_conversions() {
        let s: SortValue = "router".into();
        assert!(matches!(s, SortValue::Text(_)));

        let n: SortValue = 42i64.into();
        assert!(matches!(n, SortValue::Integer(42)));

        let missing: SortValue = Option::<i64>::None.into();
        assert!(missing.is_null());
    }

    #[test]
    fn test_sort_constructors() {
        let sort = Sort::desc("priority");
        assert_eq!(sort.order, SortOrder::Descending);
        assert_eq!(sort.attribute, "priority");
        assert_eq!(Sort::asc("name").order.to_string(), "ASC");
    }
}
