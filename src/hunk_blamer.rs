use crate::blame_index::BlameIndex;
use crate::delta::DeltaBlame;
use crate::line_mapper::{self, RawHunk};

/// Combines the line mapper and a file's blame index to turn a file's hunks
/// into `(delta, origins)` pairs.
pub struct HunkBlamer<'a> {
    filename: String,
    blame: &'a BlameIndex,
}

impl<'a> HunkBlamer<'a> {
    pub fn new(filename: impl Into<String>, blame: &'a BlameIndex) -> Self {
        HunkBlamer {
            filename: filename.into(),
            blame,
        }
    }

    pub fn blames(&self, hunks: &[RawHunk]) -> Vec<DeltaBlame> {
        hunks
            .iter()
            .flat_map(|hunk| line_mapper::split(&self.filename, hunk))
            .map(|delta| {
                let span_len = delta.old_length().max(1);
                let mut origins: Vec<String> = (delta.old_start..delta.old_start + span_len)
                    .map(|line| self.blame.commit_for_line(line).to_string())
                    .collect();
                origins.sort();
                origins.dedup();
                DeltaBlame { delta, origins }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "hunk_blamer_test.rs"]
mod tests;
