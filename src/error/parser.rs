use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unmatched coverage profile line {line_number}: {line}")]
    ProfileLine { line_number: usize, line: String },

    #[error("invalid number '{value}' in coverage profile line {line_number}")]
    ProfileNumber { line_number: usize, value: String },

    #[error("malformed test event on line {line_number}: {source}")]
    Event {
        line_number: usize,
        source: serde_json::Error,
    },

    #[error("invalid position '{arg}': expected format 'file.go:line[.column]'")]
    Position { arg: String },
}

impl ParseError {
    pub fn profile_line(line_number: usize, line: impl Into<String>) -> Self {
        Self::ProfileLine {
            line_number,
            line: line.into(),
        }
    }

    pub fn profile_number(line_number: usize, value: impl Into<String>) -> Self {
        Self::ProfileNumber {
            line_number,
            value: value.into(),
        }
    }

    pub fn event(line_number: usize, source: serde_json::Error) -> Self {
        Self::Event {
            line_number,
            source,
        }
    }

    pub fn position(arg: impl Into<String>) -> Self {
        Self::Position { arg: arg.into() }
    }
}
