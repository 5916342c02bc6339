use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use super::CoverBlock;
use crate::error::{IoError, ParseError, Result};

const MODE_PREFIX: &str = "mode: ";

const LINE_PATTERN: &str =
    r"^(.+)/([^/]+\.go):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$";

static LINE_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_regex() -> &'static Regex {
    LINE_REGEX.get_or_init(|| Regex::new(LINE_PATTERN).expect("coverage line pattern is valid"))
}

/// A single parsed line of a coverage profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLine {
    pub package: String,
    pub file: String,
    pub block: CoverBlock,
}

/// Coverage reported by one instrumented test run, keyed by file name.
///
/// Blocks of every file are sorted by start position once at construction;
/// the profile is never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    files: HashMap<String, Vec<CoverBlock>>,
    packages: Vec<String>,
}

impl Profile {
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        let mut files: HashMap<String, Vec<CoverBlock>> = HashMap::new();
        let mut packages: Vec<String> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with(MODE_PREFIX) {
                continue;
            }

            let parsed = parse_line(index + 1, line)?;
            if !packages.contains(&parsed.package) {
                packages.push(parsed.package);
            }
            files.entry(parsed.file).or_default().push(parsed.block);
        }

        for blocks in files.values_mut() {
            blocks.sort_by_key(CoverBlock::sort_key);
        }
        packages.sort();

        trace!(files = files.len(), "parsed coverage profile");
        Ok(Self { files, packages })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;
        Ok(Self::parse(&text)?)
    }

    /// Whether the statement at `line.col` of `file` executed during the run.
    ///
    /// A file the profile knows nothing about is simply not covered.
    pub fn covers(&self, file: &str, line: usize, col: usize) -> bool {
        self.files
            .get(file)
            .and_then(|blocks| blocks.iter().find(|b| b.contains(line, col)))
            .is_some_and(CoverBlock::is_covered)
    }

    pub fn blocks(&self, file: &str) -> Option<&[CoverBlock]> {
        self.files.get(file).map(Vec::as_slice)
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }
}

impl FromStr for Profile {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub fn parse_line(line_number: usize, line: &str) -> std::result::Result<ProfileLine, ParseError> {
    let caps = line_regex()
        .captures(line)
        .ok_or_else(|| ParseError::profile_line(line_number, line))?;

    let number = |index: usize| -> std::result::Result<usize, ParseError> {
        let value = &caps[index];
        value
            .parse()
            .map_err(|_| ParseError::profile_number(line_number, value))
    };

    Ok(ProfileLine {
        package: caps[1].to_string(),
        file: caps[2].to_string(),
        block: CoverBlock {
            start_line: number(3)?,
            start_col: number(4)?,
            end_line: number(5)?,
            end_col: number(6)?,
            num_stmt: number(7)?,
            count: number(8)?,
        },
    })
}
