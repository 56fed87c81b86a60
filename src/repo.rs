use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::build::TreeUpdateBuilder;
use git2::{Delta as DeltaStatus, DiffOptions, FileMode, Oid, Repository, Signature, StatusOptions};

use crate::error::{GitBlackError, Result};
use crate::line_mapper::RawHunk;

/// One modified tracked file's HEAD→workdir patch, zero-context hunks only.
pub struct FilePatch {
    pub path: String,
    pub old_mode: FileMode,
    pub hunks: Vec<RawHunk>,
}

/// The pieces of a commit the orchestrator needs to pick a main origin and
/// seed the new commit's author/message.
pub struct CommitInfo {
    pub id: String,
    /// Seconds since epoch, used to rank origin commits by recency.
    pub committer_time: i64,
    pub author_name: String,
    pub author_email: String,
    pub author_when: git2::Time,
    pub message: String,
}

/// Capability set the orchestrator depends on: status, diff, blame-adjacent
/// HEAD content lookup, and object writes. Kept as a single trait so the
/// orchestrator never has to care whether a capability is satisfied by
/// libgit2 directly or by shelling out to `git`.
pub trait RepoAdapter {
    fn workdir(&self) -> &Path;
    fn ensure_index_clean(&self) -> Result<()>;
    fn modified_files(&self) -> Result<Vec<FilePatch>>;
    fn head_blob(&self, path: &str) -> Result<Vec<u8>>;
    fn head_oid(&self) -> Result<Oid>;
    fn head_tree_oid(&self) -> Result<Oid>;
    fn commit_info(&self, id: &str) -> Result<CommitInfo>;
    fn write_blob(&self, content: &[u8]) -> Result<Oid>;
    fn write_tree(&self, base_tree: Oid, updates: &[(PathBuf, Oid, FileMode)]) -> Result<Oid>;
    fn committer_signature(&self) -> Result<Signature<'static>>;
    fn create_commit(
        &self,
        tree: Oid,
        parent: Oid,
        author: &Signature<'_>,
        committer: &Signature<'_>,
        message: &str,
    ) -> Result<Oid>;
}

pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working directory"))?
            .to_path_buf();
        Ok(GitRepo { repo, workdir })
    }
}

impl RepoAdapter for GitRepo {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn ensure_index_clean(&self) -> Result<()> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).renames_head_to_index(true);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        let dirty = statuses.iter().any(|entry| {
            let s = entry.status();
            s.is_index_new()
                || s.is_index_modified()
                || s.is_index_deleted()
                || s.is_index_renamed()
                || s.is_index_typechange()
        });
        if dirty {
            return Err(GitBlackError::IndexNotEmpty);
        }
        Ok(())
    }

    fn modified_files(&self) -> Result<Vec<FilePatch>> {
        let head_tree = self.repo.find_commit(self.head_oid()?)?.tree()?;
        let mut opts = DiffOptions::new();
        opts.context_lines(0).ignore_submodules(true);
        let diff = self
            .repo
            .diff_tree_to_workdir(Some(&head_tree), Some(&mut opts))?;

        let mut builder = DiffCollector::default();
        diff.foreach(
            &mut |delta, _progress| {
                builder.begin_file(&delta);
                true
            },
            None,
            Some(&mut |delta, hunk| {
                builder.begin_hunk(&delta, &hunk);
                true
            }),
            Some(&mut |delta, _hunk, line| {
                builder.push_line(&delta, &line);
                true
            }),
        )
        .map_err(GitBlackError::from)?;

        Ok(builder.finish())
    }

    fn head_blob(&self, path: &str) -> Result<Vec<u8>> {
        head_blob_at(&self.workdir, path)
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(self
            .repo
            .head()?
            .target()
            .ok_or_else(|| git2::Error::from_str("HEAD does not point to a commit"))?)
    }

    fn head_tree_oid(&self) -> Result<Oid> {
        Ok(self.repo.find_commit(self.head_oid()?)?.tree_id())
    }

    fn commit_info(&self, id: &str) -> Result<CommitInfo> {
        let oid = Oid::from_str(id)?;
        let commit = self.repo.find_commit(oid)?;
        let author = commit.author();
        Ok(CommitInfo {
            id: commit.id().to_string(),
            committer_time: commit.committer().when().seconds(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            author_when: author.when(),
            message: commit.message().unwrap_or("").to_string(),
        })
    }

    fn write_blob(&self, content: &[u8]) -> Result<Oid> {
        Ok(self.repo.blob(content)?)
    }

    fn write_tree(&self, base_tree: Oid, updates: &[(PathBuf, Oid, FileMode)]) -> Result<Oid> {
        let base = self.repo.find_tree(base_tree)?;
        let mut update = TreeUpdateBuilder::new();
        for (path, oid, mode) in updates {
            update.upsert(path, *oid, *mode);
        }
        Ok(update.create_updated(&self.repo, &base)?)
    }

    fn committer_signature(&self) -> Result<Signature<'static>> {
        Ok(self.repo.signature()?)
    }

    fn create_commit(
        &self,
        tree: Oid,
        parent: Oid,
        author: &Signature<'_>,
        committer: &Signature<'_>,
        message: &str,
    ) -> Result<Oid> {
        let tree = self.repo.find_tree(tree)?;
        let parent = self.repo.find_commit(parent)?;
        self.repo
            .commit(Some("HEAD"), author, committer, message, &tree, &[&parent])
            .map_err(GitBlackError::CommitCreationFailure)
    }
}

/// Read a tracked file's content at HEAD via `git show`, never through
/// `git2::Repository` — this is called from the bounded phase-1 worker
/// pool, and a `Repository` handle is not something worth sharing across
/// threads when a subprocess does the job just as well.
pub fn head_blob_at(workdir: &Path, path: &str) -> Result<Vec<u8>> {
    let fail = |reason: String| GitBlackError::DiffInconsistency {
        path: path.into(),
        reason,
    };

    let output = Command::new("git")
        .current_dir(workdir)
        .args(["show", &format!("HEAD:{path}")])
        .output()
        .map_err(|e| fail(e.to_string()))?;

    if !output.status.success() {
        return Err(fail(format!(
            "git show exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(output.stdout)
}

/// Accumulates `git2::Diff::foreach` callbacks into per-path `FilePatch`es,
/// skipping anything whose delta status isn't "modified".
#[derive(Default)]
struct DiffCollector {
    by_path: HashMap<String, FilePatch>,
    order: Vec<String>,
    current_path: Option<String>,
    current_hunk: Option<RawHunk>,
}

impl DiffCollector {
    fn begin_file(&mut self, delta: &git2::DiffDelta<'_>) {
        self.flush_hunk();
        self.current_path = None;
        if delta.status() != DeltaStatus::Modified {
            return;
        }
        let Some(path) = delta.new_file().path().and_then(|p| p.to_str()) else {
            return;
        };
        let old_mode = delta.old_file().mode();
        if !self.by_path.contains_key(path) {
            self.order.push(path.to_string());
            self.by_path.insert(
                path.to_string(),
                FilePatch {
                    path: path.to_string(),
                    old_mode,
                    hunks: Vec::new(),
                },
            );
        }
        self.current_path = Some(path.to_string());
    }

    fn begin_hunk(&mut self, delta: &git2::DiffDelta<'_>, hunk: &git2::DiffHunk<'_>) {
        if self.current_path.is_none() {
            self.begin_file(delta);
        }
        self.flush_hunk();
        if self.current_path.is_none() {
            return;
        }
        self.current_hunk = Some(RawHunk {
            old_start: hunk.old_start() as usize,
            new_start: hunk.new_start() as usize,
            old_lines: Vec::new(),
            new_lines: Vec::new(),
        });
    }

    fn push_line(&mut self, _delta: &git2::DiffDelta<'_>, line: &git2::DiffLine<'_>) {
        let Some(hunk) = self.current_hunk.as_mut() else {
            return;
        };
        match line.origin() {
            '-' => hunk.old_lines.push(line.content().to_vec()),
            '+' => hunk.new_lines.push(line.content().to_vec()),
            _ => {}
        }
    }

    fn flush_hunk(&mut self) {
        if let (Some(path), Some(hunk)) = (self.current_path.clone(), self.current_hunk.take())
            && let Some(patch) = self.by_path.get_mut(&path)
        {
            patch.hunks.push(hunk);
        }
    }

    fn finish(mut self) -> Vec<FilePatch> {
        self.flush_hunk();
        self.order
            .into_iter()
            .filter_map(|path| self.by_path.remove(&path))
            .collect()
    }
}

#[cfg(test)]
#[path = "repo_test.rs"]
mod tests;
