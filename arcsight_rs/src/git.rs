//! VCS collaborator built on libgit2.
//!
//! The core consumes three operations: checkout a commit SHA (mutates the
//! working tree), read the current HEAD SHA, and extract head-side added
//! lines between two SHAs. Rename detection is deliberately not enabled, so
//! renames surface as delete-plus-add; binary files are skipped.

use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{DiffFormat, DiffOptions, Oid, Repository};

use crate::diffparse::parse_unified_diff;
use crate::types::DiffHunk;

/// Error type for git operations.
#[derive(Debug)]
pub enum GitError {
    /// Not a git repository
    NotARepository(String),
    /// Failed to resolve reference (branch, tag, commit)
    RefNotFound(String),
    /// Git operation failed
    OperationFailed(String),
    /// IO error
    IoError(std::io::Error),
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::NotARepository(path) => {
                write!(f, "not a git repository: {}", path)
            }
            GitError::RefNotFound(reference) => {
                write!(f, "reference not found: {}", reference)
            }
            GitError::OperationFailed(msg) => {
                write!(f, "git operation failed: {}", msg)
            }
            GitError::IoError(e) => {
                write!(f, "IO error: {}", e)
            }
        }
    }
}

impl std::error::Error for GitError {}

impl From<git2::Error> for GitError {
    fn from(e: git2::Error) -> Self {
        GitError::OperationFailed(e.message().to_string())
    }
}

impl From<std::io::Error> for GitError {
    fn from(e: std::io::Error) -> Self {
        GitError::IoError(e)
    }
}

/// Wrapper around a git repository.
pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Discover a git repository from the given path, searching upward.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(path)
            .map_err(|_| GitError::NotARepository(path.display().to_string()))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| GitError::NotARepository("bare repository".to_string()))?
            .to_path_buf();

        Ok(Self { path: workdir, repo })
    }

    /// Get the repository root path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current HEAD commit hash.
    pub fn head_commit(&self) -> Result<String, GitError> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Resolve a reference (branch, tag, commit hash, HEAD~n) to a commit hash.
    pub fn resolve_ref(&self, reference: &str) -> Result<Oid, GitError> {
        // Try to parse as OID first (commit hash).
        if let Ok(oid) = Oid::from_str(reference) {
            if self.repo.find_commit(oid).is_ok() {
                return Ok(oid);
            }
        }

        let obj = self
            .repo
            .revparse_single(reference)
            .map_err(|_| GitError::RefNotFound(reference.to_string()))?;

        let commit = obj.peel_to_commit().map_err(|_| {
            GitError::RefNotFound(format!("{} does not point to a commit", reference))
        })?;

        Ok(commit.id())
    }

    /// Check out a commit: detach HEAD at the SHA and force the working tree
    /// to match its tree.
    pub fn checkout(&self, reference: &str) -> Result<(), GitError> {
        let oid = self.resolve_ref(reference)?;
        let commit = self.repo.find_commit(oid)?;

        let mut builder = CheckoutBuilder::new();
        builder.force();
        self.repo.checkout_tree(commit.as_object(), Some(&mut builder))?;
        self.repo.set_head_detached(oid)?;
        Ok(())
    }

    /// Unified-diff text between two commits. Rename detection stays off,
    /// so renames surface as delete-plus-add; binary payloads appear only
    /// as their `Binary files ... differ` markers.
    pub fn unified_diff(&self, base: &str, head: &str) -> Result<String, GitError> {
        let base_tree = self.repo.find_commit(self.resolve_ref(base)?)?.tree()?;
        let head_tree = self.repo.find_commit(self.resolve_ref(head)?)?.tree()?;

        let mut options = DiffOptions::new();
        let diff =
            self.repo
                .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut options))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => text.push(line.origin()),
                _ => {}
            }
            if let Ok(chunk) = std::str::from_utf8(line.content()) {
                text.push_str(chunk);
            }
            true
        })?;
        Ok(text)
    }

    /// Head-side added lines between two commits: the parsed form of
    /// [`GitRepo::unified_diff`], which is all the core ever consumes.
    pub fn added_lines(&self, base: &str, head: &str) -> Result<Vec<DiffHunk>, GitError> {
        Ok(parse_unified_diff(&self.unified_diff(base, head)?))
    }
}
