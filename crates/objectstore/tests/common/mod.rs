//! Test infrastructure for the object store.
//!
//! Fixtures describe a `Device` domain object stored through both adapters;
//! the harness runs one scenario against each adapter.

#![allow(dead_code, unused_imports, unused_macros)]

pub mod fixtures;
#[macro_use]
pub mod harness;

// Re-export commonly used items
pub use fixtures::*;
pub use harness::*;
