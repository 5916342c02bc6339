//! Coverage profiles produced by `go test -coverprofile`.
//!
//! A profile is an interval index: for every file it holds the spans the
//! instrumentation reported and answers whether a position was executed.

mod block;
mod profile;

pub use block::CoverBlock;
pub use profile::{parse_line, Profile, ProfileLine};
