//! In-memory storage adapter.
//!
//! Rows live in a [`MemoryTable`] shared by every context. Each context
//! works on a private copy of the rows taken when it begins and publishes it
//! atomically on commit; rollback discards it. Useful for tests and for
//! small, process-local object stores.
//!
//! # Example
//!
//! ```
//! use helios_objectstore::backends::memory::{
//!     MemoryContextProvider, MemoryRecord, MemoryStore, MemoryTable,
//! };
//! use helios_objectstore::core::{Converter, TransactionalDataStore};
//! use helios_objectstore::entity::{EntityDao, EntityMapping};
//! use helios_objectstore::store::ObjectStore;
//! use helios_objectstore::types::Identifiable;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Note {
//!     id: u32,
//!     text: String,
//! }
//!
//! impl Identifiable for Note {
//!     type Id = u32;
//!     fn identifier(&self) -> &u32 {
//!         &self.id
//!     }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct NoteRow {
//!     id: u32,
//!     body: String,
//! }
//!
//! impl MemoryRecord for NoteRow {
//!     type Key = u32;
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! struct NoteMapping;
//!
//! impl Converter<NoteRow, Note> for NoteMapping {
//!     fn convert(&self, row: &NoteRow) -> Note {
//!         Note { id: row.id, text: row.body.clone() }
//!     }
//! }
//!
//! impl EntityMapping<NoteRow, Note> for NoteMapping {
//!     fn id_of(&self, row: &NoteRow) -> u32 {
//!         row.id
//!     }
//!     fn create(&self, note: &Note) -> NoteRow {
//!         NoteRow { id: note.id, body: note.text.clone() }
//!     }
//!     fn conform(&self, row: &mut NoteRow, note: &Note) {
//!         row.body = note.text.clone();
//!     }
//! }
//!
//! let table = MemoryTable::<NoteRow>::new();
//! let data_store = TransactionalDataStore::new(MemoryContextProvider::new(table.clone()));
//! let dao = EntityDao::<NoteRow, Note, _, _>::new(MemoryStore::<NoteRow>::new(), NoteMapping);
//! let notes = ObjectStore::new(data_store, dao);
//!
//! notes.add(Note { id: 1, text: "hello".into() }).unwrap();
//! assert_eq!(notes.size().unwrap(), 1);
//! assert_eq!(table.len(), 1);
//! ```

mod store;
mod table;

pub use store::{EntitySortKey, MemoryFilter, MemoryStore};
pub use table::{MemoryContext, MemoryContextProvider, MemoryRecord, MemoryTable};
