//! Shop Probe Core - Shared types library.
//!
//! This crate provides the types used across all Shop Probe components:
//! - `probe` - HTTP client and runner that walks the target API
//! - `cli` - Command-line wrapper that prints the report
//! - `integration-tests` - In-process mock of the target API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wire
//! types describe the target API's JSON bodies so that the probe and the
//! mock server agree on them.
//!
//! # Modules
//!
//! - [`types`] - Emails, IDs, prices, wire bodies, and step/report results

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
