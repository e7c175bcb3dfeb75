//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core crate's ports.

pub mod db;

pub use db::PgStore;
