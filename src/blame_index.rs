use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{GitBlackError, Result};

/// Per-file map from a HEAD line number to the commit that introduced it.
///
/// Built once per file from `git blame --porcelain HEAD`, invoked as a
/// subprocess rather than through the native blame API: an external `git
/// blame` is materially faster than the library equivalent on large
/// repositories, and this tool's whole phase-1 budget is dominated by that
/// cost, so the subprocess path is the only one worth having.
///
/// Stored as the sparse run-compressed form — an ascending `starts[]`
/// alongside the commit each run belongs to — rather than a dense per-line
/// map, and looked up by binary search.
pub struct BlameIndex {
    starts: Vec<usize>,
    commits: Vec<String>,
}

impl BlameIndex {
    pub fn build(workdir: &Path, path: &str) -> Result<Self> {
        let fail = |reason: String| GitBlackError::BlameFailure {
            path: path.into(),
            reason,
        };

        let mut child = Command::new("git")
            .current_dir(workdir)
            .args(["blame", "--porcelain", "HEAD", "--", path])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(e.to_string()))?;

        let stdout = child.stdout.take().expect("stdout was piped");
        let mut starts = Vec::new();
        let mut commits: Vec<String> = Vec::new();

        for line in BufReader::new(stdout).lines() {
            let line = line.map_err(|e| fail(e.to_string()))?;
            let Some((commit, final_lineno)) = parse_header(&line) else {
                continue;
            };
            if commits.last().map(String::as_str) != Some(commit) {
                starts.push(final_lineno);
                commits.push(commit.to_string());
            }
        }

        let status = child.wait().map_err(|e| fail(e.to_string()))?;
        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut s) = child.stderr.take() {
                use std::io::Read;
                let _ = s.read_to_string(&mut stderr);
            }
            return Err(fail(format!("git blame exited with {status}: {stderr}")));
        }
        if starts.is_empty() {
            return Err(fail("git blame produced no output".to_string()));
        }

        Ok(BlameIndex { starts, commits })
    }

    /// The commit attributed to HEAD line `lineno` (1-based).
    pub fn commit_for_line(&self, lineno: usize) -> &str {
        let idx = match self.starts.binary_search(&lineno) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        &self.commits[idx]
    }

    #[cfg(test)]
    pub(crate) fn from_runs(runs: &[(usize, &str)]) -> Self {
        BlameIndex {
            starts: runs.iter().map(|(s, _)| *s).collect(),
            commits: runs.iter().map(|(_, c)| c.to_string()).collect(),
        }
    }
}

/// Parse one porcelain header line: `<40-hex-sha> <orig-lineno> <final-lineno>
/// [<group-count>]`. Metadata lines (`author ...`), content lines (leading
/// tab), and the final summary line don't match and are skipped.
fn parse_header(line: &str) -> Option<(&str, usize)> {
    let mut parts = line.split_whitespace();
    let sha = parts.next()?;
    if sha.len() != 40 || !sha.as_bytes().iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let _orig_lineno: usize = parts.next()?.parse().ok()?;
    let final_lineno: usize = parts.next()?.parse().ok()?;
    Some((sha, final_lineno))
}

#[cfg(test)]
#[path = "blame_index_test.rs"]
mod tests;
