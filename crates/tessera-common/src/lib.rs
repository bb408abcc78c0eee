//! Common utilities for Tessera.
//!
//! This crate provides shared infrastructure used by all Tessera components:
//! - **Warning System** - deduplicated, colored stderr output for recovered
//!   parse problems and unsupported syntax

pub mod warning;
