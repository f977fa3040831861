//! # Path Guard
//!
//! Resolves requested paths against the sandbox root. Every filesystem access made by
//! the file tools goes through [`PathGuard::resolve`] first.
//!
//! Resolution walks the candidate one component at a time, following symlinks through
//! the filesystem (dangling ones included) and appending non-existent tail components
//! lexically. Containment is decided once, on the fully resolved path.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::{OperationResult, ToolError};
use crate::domain::paths::MAX_SYMLINK_HOPS;

/// Absolute, symlink-resolved path proven to lie within the sandbox root.
/// Only [`PathGuard`] constructs these; they are not meant to be cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Creates a guard for `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        // Resolve to absolute path so the containment check compares like with like
        let root = fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("Sandbox root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Guard rooted at the process working directory.
    pub fn from_current_dir() -> io::Result<Self> {
        Self::new(std::env::current_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `candidate` (relative to the root, or absolute) and checks containment.
    pub fn resolve(&self, candidate: &str) -> OperationResult<ResolvedPath> {
        // An absolute candidate replaces the root entirely on join
        let joined = self.root.join(candidate);

        let mut hops = 0;
        let resolved = resolve_components(&joined, &mut hops)
            .map_err(|e| ToolError::failed(format!("Failed to resolve {candidate}"), e))?;

        if resolved.starts_with(&self.root) {
            tracing::debug!("Resolved '{}' to {}", candidate, resolved.display());
            Ok(ResolvedPath(resolved))
        } else {
            tracing::warn!(
                "Blocked '{}': resolves to {} outside {}",
                candidate,
                resolved.display(),
                self.root.display()
            );
            Err(ToolError::OutOfSandbox {
                candidate: candidate.to_string(),
                root: self.root.clone(),
            })
        }
    }

    /// Resolves a path that is not available as UTF-8 text, such as a directory entry.
    pub fn resolve_path(&self, candidate: &Path) -> OperationResult<ResolvedPath> {
        self.resolve(&candidate.to_string_lossy())
    }
}

fn resolve_components(path: &Path, hops: &mut usize) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                match fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        *hops += 1;
                        if *hops > MAX_SYMLINK_HOPS {
                            return Err(io::Error::other("too many levels of symbolic links"));
                        }
                        let target = fs::read_link(&resolved)?;
                        resolved.pop();
                        // Relative targets are relative to the link's directory
                        let target = resolved.join(target);
                        resolved = resolve_components(&target, hops)?;
                    }
                    Ok(_) => {}
                    // Non-existent tail: keep it lexically
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                        ) => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(resolved)
}
