//! Locates the declarations of top-level Go tests.
//!
//! Every `*_test.go` file directly inside a package directory is parsed with
//! tree-sitter and each `func Test...` declaration is recorded with the
//! position of its `func` keyword.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator};
use walkdir::WalkDir;

use crate::error::{IoError, Result, SourceError};
use crate::toolchain::config::TEST_PREFIX;

const TEST_FILE_SUFFIX: &str = "_test.go";

const TEST_DECLARATION_QUERY: &str = r#"
(source_file
  (function_declaration
    name: (identifier) @name) @declaration)
"#;

/// Where a test function is declared. Line and column are 1-based; the
/// offset is in bytes from the start of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPosition {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

/// Positions of every top-level test declared in the package at `dir`,
/// keyed by test name.
pub fn package_tests(dir: &Path) -> Result<BTreeMap<String, TestPosition>> {
    let language: Language = tree_sitter_go::LANGUAGE.into();
    let query = Query::new(&language, TEST_DECLARATION_QUERY)
        .map_err(|e| SourceError::invalid_query(e.to_string()))?;
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| SourceError::grammar(e.to_string()))?;

    let mut tests = BTreeMap::new();
    for path in test_files(dir)? {
        let source = fs::read_to_string(&path).map_err(|e| IoError::read_error(&path, e))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| SourceError::unparsable(&path))?;
        if tree.root_node().has_error() {
            return Err(SourceError::unparsable(&path).into());
        }

        let file = display_path(dir, &path);
        for (name, node) in test_declarations(&query, tree.root_node(), &source) {
            let start = node.start_position();
            trace!(test = %name, file = %file, line = start.row + 1, "found test declaration");
            tests.insert(
                name,
                TestPosition {
                    file: file.clone(),
                    line: start.row + 1,
                    col: start.column + 1,
                    offset: node.start_byte(),
                },
            );
        }
    }

    debug!(dir = %dir.display(), tests = tests.len(), "located test declarations");
    Ok(tests)
}

fn test_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| IoError::directory_scan_error(root, e))?;
        let is_test_file = entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(TEST_FILE_SUFFIX);
        if is_test_file {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// `path` as the user would spell it: bare file names for the current
/// directory, otherwise joined onto `dir`.
fn display_path(dir: &Path, path: &Path) -> String {
    let name = path.file_name().map(Path::new).unwrap_or(path);
    if dir.as_os_str().is_empty() {
        name.display().to_string()
    } else {
        dir.join(name).display().to_string()
    }
}

fn test_declarations<'tree>(
    query: &Query,
    root: Node<'tree>,
    source: &str,
) -> Vec<(String, Node<'tree>)> {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source.as_bytes());
    let names = query.capture_names();

    let mut found = Vec::new();
    while let Some(m) = matches.next() {
        let mut name = None;
        let mut declaration = None;
        for capture in m.captures {
            match names[capture.index as usize] {
                "name" => name = capture.node.utf8_text(source.as_bytes()).ok(),
                "declaration" => declaration = Some(capture.node),
                _ => {}
            }
        }
        if let (Some(name), Some(node)) = (name, declaration) {
            if name.starts_with(TEST_PREFIX) {
                found.push((name.to_string(), node));
            }
        }
    }
    found
}
