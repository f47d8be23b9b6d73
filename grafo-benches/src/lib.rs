//! Benchmark support crate for grafo.
//!
//! Provides seeded synthetic graphs and parameter types shared by the
//! Criterion benchmarks of the polynomial algorithm families.

pub mod error;
pub mod params;
pub mod source;
