use std::collections::{HashMap, HashSet};

use crate::delta::Delta;
use crate::error::{GitBlackError, Result};

/// In-memory, offset-correcting applier of deltas to one file's HEAD content.
///
/// Deltas from a single origin group are applied in whatever order the
/// orchestrator encounters them; `effective_start` is computed against the
/// set of *already applied* deltas rather than positional input order, so
/// the result does not depend on that order.
pub struct Patcher {
    lines: Vec<Vec<u8>>,
    offsets: HashMap<usize, isize>,
    applied: HashSet<usize>,
}

impl Patcher {
    pub fn new(head_bytes: &[u8]) -> Self {
        Patcher {
            lines: split_lines(head_bytes),
            offsets: HashMap::new(),
            applied: HashSet::new(),
        }
    }

    /// Apply `delta`, no-op if its `old_start` was already applied.
    ///
    /// Returns `DiffInconsistency` rather than indexing blindly if the
    /// delta's offset-corrected span falls outside the content collected so
    /// far — this should only happen if a hunk references lines beyond the
    /// HEAD content actually read.
    pub fn apply(&mut self, delta: &Delta) -> Result<()> {
        if self.applied.contains(&delta.old_start) {
            return Ok(());
        }

        let correction: isize = self
            .offsets
            .iter()
            .filter(|(start, _)| **start < delta.old_start)
            .map(|(_, offset)| *offset)
            .sum();
        let mut effective_start = (delta.old_start as isize + correction) as usize;
        if delta.old_length() == 0 {
            effective_start += 1;
        }

        let inconsistent = |reason: &str| GitBlackError::DiffInconsistency {
            path: delta.filename.clone().into(),
            reason: reason.to_string(),
        };

        if effective_start == 0 {
            return Err(inconsistent("delta's offset-corrected start falls before line 1"));
        }
        let i = effective_start - 1;
        let j = i + delta.old_length();
        if j > self.lines.len() {
            return Err(inconsistent(&format!(
                "delta references lines {}..{} but HEAD content only has {} lines",
                i + 1,
                j,
                self.lines.len()
            )));
        }

        self.lines.splice(i..j, delta.new_lines.iter().cloned());

        self.offsets.insert(delta.old_start, delta.offset());
        self.applied.insert(delta.old_start);
        Ok(())
    }

    pub fn content(&self) -> Vec<u8> {
        self.lines.concat()
    }
}

/// Split raw bytes into lines, each retaining its trailing `\n` (if any).
fn split_lines(bytes: &[u8]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            lines.push(bytes[start..=i].to_vec());
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push(bytes[start..].to_vec());
    }
    lines
}

#[cfg(test)]
#[path = "patcher_test.rs"]
mod tests;
