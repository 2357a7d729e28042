//! Consistency gate between domain objects and storage entities.
//!
//! An [`UpdateStrategy`] is consulted at two points:
//!
//! - after an entity is converted into a domain object
//!   ([`validate_read`](UpdateStrategy::validate_read)), to stop the object
//!   from exposing data the strategy forbids;
//! - before a domain object is applied onto an existing entity
//!   ([`validate_write`](UpdateStrategy::validate_write)), to reject updates
//!   that conflict with the persisted state (stale versions, changes to
//!   immutable fields, illegal state transitions).
//!
//! Both operations only receive shared references. A rejected write
//! therefore cannot have touched the entity, and the entity DAO never applies
//! the object afterwards.

use crate::error::ValidationError;

/// Validates domain objects against storage entities.
///
/// Implementations hold no mutable state and are shared across threads.
pub trait UpdateStrategy<E, T>: Send + Sync {
    /// Validates an object freshly converted from `entity`.
    fn validate_read(&self, entity: &E, object: &T) -> Result<(), ValidationError>;

    /// Validates that `object` may be applied onto the current `entity`.
    fn validate_write(&self, entity: &E, object: &T) -> Result<(), ValidationError>;
}

/// Accepts every read and write.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveUpdateStrategy;

impl<E, T> UpdateStrategy<E, T> for PermissiveUpdateStrategy {
    fn validate_read(&self, _entity: &E, _object: &T) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_write(&self, _entity: &E, _object: &T) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Runs several strategies in order, failing on the first rejection.
pub struct CompositeUpdateStrategy<E, T> {
    strategies: Vec<Box<dyn UpdateStrategy<E, T>>>,
}

impl<E, T> CompositeUpdateStrategy<E, T> {
    /// Creates an empty composite (accepts everything).
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy.
    pub fn with<U>(mut self, strategy: U) -> Self
    where
        U: UpdateStrategy<E, T> + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Returns the number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if no strategy has been added.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl<E, T> Default for CompositeUpdateStrategy<E, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, T> std::fmt::Debug for CompositeUpdateStrategy<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeUpdateStrategy")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl<E, T> UpdateStrategy<E, T> for CompositeUpdateStrategy<E, T> {
    fn validate_read(&self, entity: &E, object: &T) -> Result<(), ValidationError> {
        self.strategies
            .iter()
            .try_for_each(|s| s.validate_read(entity, object))
    }

    fn validate_write(&self, entity: &E, object: &T) -> Result<(), ValidationError> {
        self.strategies
            .iter()
            .try_for_each(|s| s.validate_write(entity, object))
    }
}
