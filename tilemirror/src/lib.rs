//! Library entry point for the tilemirror toolchain.
//!
//! Exposes the job configuration loader and the fetch-and-persist engine so
//! that integration tests and other tooling can drive mirror jobs without
//! going through the CLI.

pub mod config;
pub mod fetch;
