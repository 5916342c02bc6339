use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::positions::TestPosition;

const SUBTEST_SEPARATOR: char = '/';

/// A covering top-level test, where it is declared, and which of its
/// sub-tests also cover the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoveringPosition {
    #[serde(flatten)]
    pub position: TestPosition,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtests: Vec<String>,
}

pub fn print_tests(dst: &mut impl Write, tests: &[String], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *dst, tests)?;
        writeln!(dst)?;
        return Ok(());
    }

    for test in tests {
        writeln!(dst, "{test}")?;
    }
    Ok(())
}

/// Pairs covering tests with their declarations.
///
/// Tests without a known declaration are left out. With `include_subtests`
/// each sub-test is listed under its top-level test.
pub fn group_positions(
    all_positions: &BTreeMap<String, TestPosition>,
    covered_by: &[String],
    include_subtests: bool,
) -> BTreeMap<String, CoveringPosition> {
    let mut grouped: BTreeMap<String, CoveringPosition> = covered_by
        .iter()
        .filter_map(|test| {
            all_positions.get(test).map(|position| {
                let covering = CoveringPosition {
                    position: position.clone(),
                    subtests: Vec::new(),
                };
                (test.clone(), covering)
            })
        })
        .collect();

    if include_subtests {
        for test in covered_by {
            if let Some((root, _)) = test.split_once(SUBTEST_SEPARATOR) {
                if let Some(parent) = grouped.get_mut(root) {
                    parent.subtests.push(test.clone());
                }
            }
        }
    }

    grouped
}

pub fn print_positions(
    dst: &mut impl Write,
    positions: &BTreeMap<String, CoveringPosition>,
    json: bool,
    line_fmt: &str,
) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *dst, positions)?;
        writeln!(dst)?;
        return Ok(());
    }

    for (test, covering) in positions {
        writeln!(dst, "{}", format_position(test, covering, line_fmt))?;
    }
    Ok(())
}

/// Expands a `--line-fmt` template. Unknown `%` sequences are kept as is.
pub fn format_position(test: &str, covering: &CoveringPosition, line_fmt: &str) -> String {
    let pos = &covering.position;
    let mut line = String::with_capacity(line_fmt.len() + test.len());
    let mut chars = line_fmt.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            line.push(c);
            continue;
        }
        match chars.peek() {
            Some('t') => line.push_str(test),
            Some('f') => line.push_str(&pos.file),
            Some('l') => line.push_str(&pos.line.to_string()),
            Some('c') => line.push_str(&pos.col.to_string()),
            Some('o') => line.push_str(&pos.offset.to_string()),
            Some('s') => line.push_str(&covering.subtests.join(",")),
            _ => {
                line.push(c);
                continue;
            }
        }
        chars.next();
    }

    line
}
