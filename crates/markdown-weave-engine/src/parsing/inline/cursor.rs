/// A saved cursor state for bounded backtracking.
///
/// Captured by value. `produced` and `pending` record how much output existed
/// at save time, so restoring can truncate anything emitted since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub row: usize,
    pub col: usize,
    pub produced: usize,
    pub pending: usize,
}

/// A character cursor over a run of rows.
///
/// Row boundaries read as a single `'\n'`; the end of the last row reads as
/// end of input. Positions are reported as absolute byte offsets using the
/// per-row start positions supplied by the segmenter.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a [String],
    rows: Vec<Vec<char>>,
    positions: &'a [usize],
    start_row: usize,
    end_row: usize,
    row: usize,
    col: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `rows[start_row..end_row]`, positioned at the start.
    pub fn new(rows: &'a [String], positions: &'a [usize], start_row: usize, end_row: usize) -> Self {
        let end_row = end_row.min(rows.len());
        let start_row = start_row.min(end_row);
        Self {
            source: rows,
            rows: rows.iter().map(|r| r.chars().collect()).collect(),
            positions,
            start_row,
            end_row,
            row: start_row,
            col: 0,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn start_row(&self) -> usize {
        self.start_row
    }

    pub fn end_row(&self) -> usize {
        self.end_row
    }

    pub fn source(&self) -> &'a [String] {
        self.source
    }

    pub fn positions(&self) -> &'a [usize] {
        self.positions
    }

    pub fn eof(&self) -> bool {
        self.peek().is_none()
    }

    pub fn at_row_start(&self) -> bool {
        self.col == 0
    }

    /// True when the cursor sits on a row break with another row after it.
    pub fn at_row_break(&self) -> bool {
        self.row < self.end_row && self.col >= self.current().len() && self.row + 1 < self.end_row
    }

    fn current(&self) -> &[char] {
        self.rows.get(self.row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        if self.row >= self.end_row {
            return None;
        }
        match self.current().get(self.col) {
            Some(&c) => Some(c),
            None if self.row + 1 < self.end_row => Some('\n'),
            None => None,
        }
    }

    /// The character `n` positions ahead, crossing row breaks.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        let mut ahead = self.clone_position();
        for _ in 0..n {
            ahead.next_char()?;
        }
        ahead.peek()
    }

    /// Up to `n` upcoming characters, crossing row breaks.
    pub fn peek_chars(&self, n: usize) -> String {
        let mut ahead = self.clone_position();
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            match ahead.next_char() {
                Some(c) => out.push(c),
                None => break,
            }
        }
        out
    }

    /// The character `n` positions ahead on the current row only.
    pub fn peek_same_row(&self, n: usize) -> Option<char> {
        self.current().get(self.col + n).copied()
    }

    /// Whether the current row continues with `pat` at the cursor.
    pub fn starts_with(&self, pat: &str) -> bool {
        let row = self.current();
        let mut i = self.col;
        for c in pat.chars() {
            if row.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Length of the run of `c` starting at the cursor, on the current row.
    pub fn run_length(&self, c: char) -> usize {
        self.current()[self.col.min(self.current().len())..]
            .iter()
            .take_while(|&&x| x == c)
            .count()
    }

    /// The character before the cursor, `'\n'` at the start of a non-first row.
    pub fn prev_char(&self) -> Option<char> {
        if self.col > 0 {
            self.current().get(self.col - 1).copied()
        } else if self.row > self.start_row {
            Some('\n')
        } else {
            None
        }
    }

    /// Consumes one character; a row break is returned as `'\n'`.
    pub fn next_char(&mut self) -> Option<char> {
        if self.row >= self.end_row {
            return None;
        }
        if let Some(&c) = self.current().get(self.col) {
            self.col += 1;
            return Some(c);
        }
        if self.row + 1 < self.end_row {
            self.row += 1;
            self.col = 0;
            return Some('\n');
        }
        None
    }

    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.next_char().is_none() {
                break;
            }
        }
    }

    /// The remainder of the current row, from the cursor.
    pub fn rest_of_row(&self) -> String {
        self.current()[self.col.min(self.current().len())..]
            .iter()
            .collect()
    }

    /// Consumes the remainder of the current row, leaving the row break unread.
    pub fn skip_row(&mut self) {
        self.col = self.current().len();
    }

    /// Moves to the end of input.
    pub fn skip_to_end(&mut self) {
        if self.end_row > self.start_row {
            self.row = self.end_row - 1;
            self.col = self.current().len();
        }
    }

    /// Absolute byte offset of the cursor in the original text.
    pub fn position(&self) -> usize {
        let Some(&base) = self.positions.get(self.row) else {
            return 0;
        };
        let row = self.current();
        let lead = row
            .iter()
            .take_while(|c| c.is_whitespace())
            .count()
            .min(self.col);
        base + row[lead..self.col.min(row.len())]
            .iter()
            .map(|c| c.len_utf8())
            .sum::<usize>()
    }

    pub fn seek(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }

    fn clone_position(&self) -> Lookahead<'_> {
        Lookahead {
            rows: &self.rows,
            end_row: self.end_row,
            row: self.row,
            col: self.col,
        }
    }
}

/// A lightweight look-ahead copy that borrows the decoded rows.
struct Lookahead<'c> {
    rows: &'c [Vec<char>],
    end_row: usize,
    row: usize,
    col: usize,
}

impl Lookahead<'_> {
    fn peek(&self) -> Option<char> {
        if self.row >= self.end_row {
            return None;
        }
        match self.rows[self.row].get(self.col) {
            Some(&c) => Some(c),
            None if self.row + 1 < self.end_row => Some('\n'),
            None => None,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        if self.col < self.rows[self.row].len() {
            self.col += 1;
        } else {
            self.row += 1;
            self.col = 0;
        }
        Some(c)
    }
}
