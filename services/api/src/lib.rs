//! services/api/src/lib.rs
//!
//! Library surface of the API service: configuration, error mapping, the
//! database adapter and the web layer. The `api` binary wires these
//! together.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
