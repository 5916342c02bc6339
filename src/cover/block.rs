/// One span of a coverage profile together with how often it executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoverBlock {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub num_stmt: usize,
    pub count: usize,
}

impl CoverBlock {
    /// Whether `line.col` falls inside the block. Both ends are inclusive.
    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }

        if line == self.start_line && line == self.end_line {
            return self.start_col <= col && col <= self.end_col;
        }
        if line == self.start_line {
            return col >= self.start_col;
        }
        if line == self.end_line {
            return col <= self.end_col;
        }
        true
    }

    pub fn is_covered(&self) -> bool {
        self.count != 0
    }

    pub(crate) fn sort_key(&self) -> (usize, usize) {
        (self.start_line, self.start_col)
    }
}
