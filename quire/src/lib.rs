//! # Quire - Embedded Document Store
//!
//! Quire stores schema-free JSON-shaped documents in named collections and
//! keeps hash indexes on nested document paths. An index on `["items", "sku"]`
//! sees through arrays: every element of `items` that is a document
//! contributes its `sku`, and a terminal array contributes each of its
//! elements.
//!
//! ## Quick Start
//!
//! ```rust
//! use quire::doc;
//! use quire::quire::Quire;
//!
//! # fn main() -> quire::errors::QuireResult<()> {
//! let db = Quire::builder().open()?;
//! let users = db.collection("users")?;
//!
//! users.index(&["tags"])?;
//! let id = users.insert(doc! { name: "Ann", tags: ["admin", "ops"] })?.id();
//!
//! assert_eq!(users.lookup(&["tags"], &"ops".into(), 0)?, vec![id]);
//! assert_eq!(users.all_indexes_joint_paths()?, vec!["tags"]);
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Consistency
//!
//! Each database has one reader/writer lock shared by all its collections.
//! Reads, lookups and scans take it in shared mode; inserts, updates,
//! deletes and index changes take it exclusively, so readers never observe
//! a document whose index entries are partially written. Updates and
//! deletes whose previous document cannot be decoded still succeed but
//! report a [WriteWarning](collection::WriteWarning); `reindex` repairs the
//! affected index.
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, identifiers and collections
//! - [`common`] - Shared helpers, the database lock and the document codec
//! - [`errors`] - Error types and result definitions
//! - [`index`] - Index paths, the path resolver, the value hasher and the index table
//! - [`quire`] - The database handle
//! - [`quire_builder`] - Database builder
//! - [`quire_config`] - Database configuration
//! - [`store`] - Partition and index store contracts with in-memory implementations

pub mod collection;
pub mod common;
pub mod errors;
pub mod index;
pub mod quire;
pub mod quire_builder;
pub mod quire_config;
pub mod store;
