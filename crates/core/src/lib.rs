//! GatherLove Core - Shared types library.
//!
//! This crate provides common types used across all GatherLove client components:
//! - `client` - Session manager, HTTP transport, and endpoint APIs
//! - `cli` - Command-line consumer of the client library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, amounts, roles,
//!   statuses, and page envelopes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
