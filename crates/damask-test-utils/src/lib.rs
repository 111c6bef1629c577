//! Shared test utilities for the DAMASK setup workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for throwaway DAMASK checkouts

pub mod tree;

pub use tree::{Entry, TestTree};
