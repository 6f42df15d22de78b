//! Shared support for the Strand crates: tracing setup used by test
//! suites and tooling.

pub mod logging;

pub use logging::init_tracing;
