//! The identity capability of domain objects.

use std::fmt::Debug;
use std::hash::Hash;

/// A domain object with a stable identity.
///
/// The identifier is assigned once and never changes afterwards; the object
/// store uses it to locate the storage entity backing the object. The id type
/// should be a cheap immutable value (an integer, a string, a small composite
/// key) whose `Eq` and `Hash` agree.
///
/// # Example
///
/// ```
/// use helios_objectstore::types::Identifiable;
///
/// #[derive(Debug, Clone)]
/// struct Switch {
///     id: u32,
///     name: String,
/// }
///
/// impl Identifiable for Switch {
///     type Id = u32;
///
///     fn identifier(&self) -> &u32 {
///         &self.id
///     }
/// }
///
/// let switch = Switch { id: 7, name: "core-1".to_string() };
/// assert_eq!(*switch.identifier(), 7);
/// ```
pub trait Identifiable {
    /// The identifier type.
    type Id: Clone + Eq + Hash + Debug;

    /// Returns the object's identifier.
    fn identifier(&self) -> &Self::Id;
}

