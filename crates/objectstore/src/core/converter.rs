//! Conversion between representations.

/// A pure mapping from `S` to `T`.
///
/// Implementations must be deterministic and free of side effects, and must
/// hold no mutable state so they can be shared across threads.
///
/// Closures implement this trait:
///
/// ```
/// use helios_objectstore::core::Converter;
///
/// let to_upper = |s: &String| s.to_uppercase();
/// assert_eq!(to_upper.convert(&"eth0".to_string()), "ETH0");
/// ```
pub trait Converter<S, T> {
    /// Converts `source` into its target representation.
    fn convert(&self, source: &S) -> T;
}

impl<S, T, F> Converter<S, T> for F
where
    F: Fn(&S) -> T,
{
    fn convert(&self, source: &S) -> T {
        self(source)
    }
}
