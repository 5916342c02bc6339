//! Finds the Go tests that cover a source position.
//!
//! The package under test is compiled once with coverage instrumentation,
//! each candidate test runs on its own against that binary, and a test
//! covers the position when its coverage profile says so. Sub-tests of
//! covering tests can be checked the same way.
pub mod app;
pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod finder;
pub mod logging;
pub mod output;
pub mod positions;
pub mod tester;
pub mod toolchain;

pub use config::Config;
pub use error::{Error, Result};
pub use tester::Tester;
