use std::{fmt, path::Path};

/// Source range of a group or an example.
///
/// `line` is the line of the declaration and `end_line` the line of the
/// closing delimiter of its block. `line <= end_line` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub end_line: u32,
}

impl Location {
    /// A location spanning `line..=end_line`. An `end_line` before `line` is
    /// raised to `line`.
    pub fn new(file: impl Into<String>, line: u32, end_line: u32) -> Location {
        Location {
            file: file.into(),
            line,
            end_line: end_line.max(line),
        }
    }

    /// A single-line location.
    pub fn at(file: impl Into<String>, line: u32) -> Location {
        Location::new(file, line, line)
    }

    /// Location of the caller. Only the call line is known, so the range is a
    /// single line.
    #[track_caller]
    pub fn caller() -> Location {
        let caller = std::panic::Location::caller();
        Location::at(caller.file(), caller.line())
    }

    /// Whether `line` lies within `line..=end_line`.
    pub fn contains(&self, line: u32) -> bool {
        (self.line..=self.end_line).contains(&line)
    }

    /// Whether `file` names the same source file.
    ///
    /// Paths are compared component-wise and either side may be a suffix of
    /// the other, so `tests/calc.rs` refers to `kata/tests/calc.rs`.
    pub fn is_in(&self, file: impl AsRef<Path>) -> bool {
        let ours = Path::new(&self.file);
        let theirs = file.as_ref();
        if ours.as_os_str().is_empty() || theirs.as_os_str().is_empty() {
            return false;
        }
        ours.ends_with(theirs) || theirs.ends_with(ours)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
