//! Directory probes used by builder detection

use std::path::{Path, PathBuf};

/// A directory a builder works in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Whether `name` is a regular file directly below this directory
    #[must_use]
    pub fn has_file(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    /// Whether `name` is a directory directly below this directory
    #[must_use]
    pub fn has_folder(&self, name: &str) -> bool {
        self.root.join(name).is_dir()
    }

    /// A work directory for a path below this one
    #[must_use]
    pub fn join(&self, sub: impl AsRef<Path>) -> WorkDir {
        WorkDir::new(self.root.join(sub))
    }
}

impl Default for WorkDir {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

impl AsRef<Path> for WorkDir {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

/// Whether `path` contains a `.git` directory or `.git` file (worktrees)
#[must_use]
pub fn is_git_root(path: &Path) -> bool {
    let git = path.join(".git");
    git.is_dir() || git.is_file()
}

/// Walk from `path` towards the filesystem root looking for a git checkout.
#[must_use]
pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|candidate| is_git_root(candidate))
        .map(Path::to_path_buf)
}
