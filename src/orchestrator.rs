use std::collections::HashMap;
use std::path::PathBuf;

use git2::{FileMode, Oid, Signature};
use indexmap::IndexMap;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::blame_index::BlameIndex;
use crate::delta::{Delta, DeltaBlame};
use crate::error::{GitBlackError, Result};
use crate::hunk_blamer::HunkBlamer;
use crate::msg;
use crate::patcher::Patcher;
use crate::repo::{head_blob_at, FilePatch, RepoAdapter};

pub struct RunSummary {
    pub commits_created: usize,
}

/// Phase-1 output for one modified file: its HEAD content and the
/// origin-annotated deltas derived from its hunks.
struct FileWork {
    path: String,
    old_mode: FileMode,
    head_bytes: Vec<u8>,
    delta_blames: Vec<DeltaBlame>,
}

pub fn run(repo: &dyn RepoAdapter, jobs: usize) -> Result<RunSummary> {
    repo.ensure_index_clean()?;

    msg::progress("Reading changes... ");

    let patches = repo.modified_files()?;
    if patches.is_empty() {
        msg::progress("done.");
        return Ok(RunSummary { commits_created: 0 });
    }

    let workdir = repo.workdir().to_path_buf();
    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .map_err(|e| GitBlackError::BlameFailure {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;

    let file_work: Vec<FileWork> = pool.install(|| {
        patches
            .into_par_iter()
            .map(|patch| collect_file_work(&workdir, patch))
            .collect::<Result<Vec<_>>>()
    })?;

    msg::progress("done.");

    commit_groups(repo, file_work)
}

fn collect_file_work(workdir: &std::path::Path, patch: FilePatch) -> Result<FileWork> {
    let head_bytes = head_blob_at(workdir, &patch.path)?;
    let blame = BlameIndex::build(workdir, &patch.path)?;
    let blamer = HunkBlamer::new(patch.path.clone(), &blame);
    let delta_blames = blamer.blames(&patch.hunks);
    Ok(FileWork {
        path: patch.path,
        old_mode: patch.old_mode,
        head_bytes,
        delta_blames,
    })
}

fn commit_groups(repo: &dyn RepoAdapter, file_work: Vec<FileWork>) -> Result<RunSummary> {
    let mut patchers: HashMap<String, Patcher> = HashMap::new();
    let mut old_modes: HashMap<String, FileMode> = HashMap::new();
    let mut groups: IndexMap<Vec<String>, Vec<Delta>> = IndexMap::new();

    for work in file_work {
        patchers.insert(work.path.clone(), Patcher::new(&work.head_bytes));
        old_modes.insert(work.path.clone(), work.old_mode);
        for blame in work.delta_blames {
            groups.entry(blame.origins).or_default().push(blame.delta);
        }
    }

    let base_tree = repo.head_tree_oid()?;
    let mut current_head = repo.head_oid()?;
    let mut pending: HashMap<String, (Oid, FileMode)> = HashMap::new();
    let mut commits_created = 0usize;
    let total = groups.len();

    for (origins, deltas) in groups {
        let mut touched: Vec<String> = Vec::new();
        for delta in &deltas {
            let patcher = patchers
                .get_mut(&delta.filename)
                .expect("file_work was seeded for every patched file");
            patcher.apply(delta)?;
            if !touched.contains(&delta.filename) {
                touched.push(delta.filename.clone());
            }
        }

        for filename in &touched {
            let content = patchers[filename].content();
            let blob = repo.write_blob(&content)?;
            let mode = old_modes[filename];
            pending.insert(filename.clone(), (blob, mode));
        }

        let main = resolve_main_origin(repo, &origins)?;
        let message = compose_message(&main.message, &origins);

        let author = Signature::new(&main.author_name, &main.author_email, &main.author_when)?;
        let committer = repo.committer_signature()?;

        let updates: Vec<(PathBuf, Oid, FileMode)> = pending
            .iter()
            .map(|(path, (oid, mode))| (PathBuf::from(path), *oid, *mode))
            .collect();
        let tree = repo.write_tree(base_tree, &updates)?;

        current_head = repo.create_commit(tree, current_head, &author, &committer, &message)?;
        commits_created += 1;
        msg::progress_line(&format!("Making commit {commits_created}/{total} "));
    }

    Ok(RunSummary { commits_created })
}

fn resolve_main_origin(
    repo: &dyn RepoAdapter,
    origins: &[String],
) -> Result<crate::repo::CommitInfo> {
    let mut best: Option<crate::repo::CommitInfo> = None;
    for id in origins {
        let info = repo.commit_info(id)?;
        best = Some(match best {
            None => info,
            Some(current) => {
                if (info.committer_time, info.id.as_str())
                    > (current.committer_time, current.id.as_str())
                {
                    info
                } else {
                    current
                }
            }
        });
    }
    best.ok_or_else(|| GitBlackError::DiffInconsistency {
        path: PathBuf::new(),
        reason: "origin group had no commits".to_string(),
    })
}

fn compose_message(main_message: &str, origins: &[String]) -> String {
    let ids: Vec<String> = origins.iter().map(|id| format!("  {id}")).collect();
    format!(
        "{}\n\nautomatic commit by git-black, original commits:\n{}",
        main_message.trim_end(),
        ids.join("\n")
    )
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
