//! # mcat Common Library
//!
//! Shared code for the mcat music catalog:
//! - Catalog store (SQLite persistence for artists, albums, tracks, ...)
//! - Tabular projection and the sort/filter query engine
//! - Popularity report generation
//! - Configuration loading
//! - Error taxonomy

pub mod config;
pub mod db;
pub mod error;
pub mod report;
pub mod table;

pub use db::CatalogStore;
pub use error::{Error, Result};
pub use table::{Column, ColumnKind, ColumnSpec, Direction, Operation, Table, Value};
