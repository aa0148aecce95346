//! Shop Probe - smoke test for a shop API's auth and cart endpoints.
//!
//! The probe checks that the Swagger UI is served, registers a random user,
//! logs in, and runs an add / list / delete / list cycle on the cart. It
//! returns a [`ProbeReport`](shop_probe_core::ProbeReport) with one result
//! per step; printing it is left to the caller.
//!
//! # Modules
//!
//! - [`config`] - Base URL and timeouts
//! - [`identity`] - Random throwaway credentials
//! - [`client`] - One method per target API endpoint
//! - [`runner`] - The ordered checklist

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod runner;

pub use client::{CartSnapshot, Session, ShopApiClient};
pub use config::{ConfigError, ProbeConfig};
pub use error::ProbeError;
pub use identity::Identity;
pub use runner::ProbeRunner;
