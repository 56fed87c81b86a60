use crate::delta::Delta;

/// A zero-context unified-diff hunk for one file, with lines already split
/// by origin (removed vs. added) rather than carried as an interleaved
/// diff-line stream.
#[derive(Debug, Clone, Default)]
pub struct RawHunk {
    pub old_start: usize,
    pub new_start: usize,
    pub old_lines: Vec<Vec<u8>>,
    pub new_lines: Vec<Vec<u8>>,
}

impl RawHunk {
    pub fn old_length(&self) -> usize {
        self.old_lines.len()
    }

    pub fn new_length(&self) -> usize {
        self.new_lines.len()
    }
}

/// Split a hunk into the smallest set of micro-deltas whose provenance is
/// homogeneous: one-to-one pairs for the overlapping prefix, then a single
/// "tail" delta absorbing whatever is left over on the longer side.
///
/// This is deliberately naive — it pairs lines positionally, not by content
/// similarity — but it is reproducible, and it still gives strictly better
/// attribution than blaming every touched line on the reformat itself.
pub fn split(filename: &str, hunk: &RawHunk) -> Vec<Delta> {
    let o = hunk.old_length();
    let n = hunk.new_length();

    if o == 0 {
        return vec![Delta {
            filename: filename.to_string(),
            old_start: hunk.old_start,
            old_lines: Vec::new(),
            new_start: hunk.new_start,
            new_lines: hunk.new_lines.clone(),
        }];
    }
    if n == 0 {
        return vec![Delta {
            filename: filename.to_string(),
            old_start: hunk.old_start,
            old_lines: hunk.old_lines.clone(),
            new_start: hunk.new_start,
            new_lines: Vec::new(),
        }];
    }

    let mut deltas = Vec::new();
    let pair_count = o.min(n) - 1;
    for i in 0..pair_count {
        deltas.push(Delta {
            filename: filename.to_string(),
            old_start: hunk.old_start + i,
            old_lines: vec![hunk.old_lines[i].clone()],
            new_start: hunk.new_start + i,
            new_lines: vec![hunk.new_lines[i].clone()],
        });
    }

    if o >= n {
        let tail_start = n - 1;
        deltas.push(Delta {
            filename: filename.to_string(),
            old_start: hunk.old_start + tail_start,
            old_lines: hunk.old_lines[tail_start..o].to_vec(),
            new_start: hunk.new_start + tail_start,
            new_lines: vec![hunk.new_lines[n - 1].clone()],
        });
    } else {
        let tail_start = o - 1;
        deltas.push(Delta {
            filename: filename.to_string(),
            old_start: hunk.old_start + tail_start,
            old_lines: vec![hunk.old_lines[tail_start].clone()],
            new_start: hunk.new_start + tail_start,
            new_lines: hunk.new_lines[tail_start..n].to_vec(),
        });
    }

    deltas
}

#[cfg(test)]
#[path = "line_mapper_test.rs"]
mod tests;
