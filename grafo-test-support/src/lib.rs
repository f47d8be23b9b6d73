//! Shared test utilities used across grafo crates.
//!
//! - [`fixtures`]: canonical graphs described as plain edge lists so every
//!   crate can build them with its own graph type.
//! - [`proptest_profile`]: environment-driven property-test tuning.
//! - [`tracing`]: a recording layer for asserting spans and events.

pub mod fixtures;
pub mod proptest_profile;
pub mod tracing;
