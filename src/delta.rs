/// A single line-level edit, positioned against the file's HEAD content.
///
/// `old_lines`/`new_lines` carry the raw bytes of each replaced/inserted
/// line (terminator included) rather than decoded text — diff content is
/// never decoded, so a file with non-UTF-8 bytes attributes the same as any
/// other file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub filename: String,
    /// 1-based line number in HEAD's content where the replaced span begins.
    pub old_start: usize,
    pub old_lines: Vec<Vec<u8>>,
    /// 1-based line number in the reformatted content where the inserted
    /// span begins.
    pub new_start: usize,
    pub new_lines: Vec<Vec<u8>>,
}

impl Delta {
    pub fn old_length(&self) -> usize {
        self.old_lines.len()
    }

    pub fn new_length(&self) -> usize {
        self.new_lines.len()
    }

    /// Net change in line count this delta introduces once applied.
    pub fn offset(&self) -> isize {
        self.new_length() as isize - self.old_length() as isize
    }
}

/// A delta together with the origin commits blamed for the HEAD lines it
/// replaces. `origins` is always sorted and deduplicated — it doubles as the
/// group key used by the commit orchestrator.
#[derive(Debug, Clone)]
pub struct DeltaBlame {
    pub delta: Delta,
    pub origins: Vec<String>,
}
