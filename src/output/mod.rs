//! Rendering of covering tests for the command line.

mod formatter;

pub use formatter::{format_position, group_positions, print_positions, print_tests, CoveringPosition};
