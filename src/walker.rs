//! Stack-based directory walker
//!
//! Emits files under a root in pop order: all matching files of a directory
//! are yielded before any of its subdirectories is entered, and the most
//! recently pushed subdirectory is visited first. The order is depth-first
//! but not sorted, and depends on the order the OS lists entries in.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use crate::error::Error;

/// Cooperative cancellation flag shared between a caller and a walk
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    /// A token that nothing ever cancels
    pub fn none() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with `Error::Cancelled` once the token has been triggered
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Lazy iterator over the files under a root directory
pub struct Walker<I, X> {
    include_file: I,
    exclude_dir: X,
    cancellation: Cancellation,
    stack: Vec<PathBuf>,
    pending: VecDeque<PathBuf>,
    done: bool,
}

impl<I, X> Walker<I, X>
where
    I: Fn(&Path) -> bool,
    X: Fn(&Path) -> bool,
{
    /// Start a walk at `root`.
    ///
    /// Fails before anything is emitted if `root` is not a directory.
    pub fn new<P: AsRef<Path>>(
        root: P,
        include_file: I,
        exclude_dir: X,
        cancellation: Cancellation,
    ) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::SourceMissing(root.to_path_buf()).into());
        }

        Ok(Walker {
            include_file,
            exclude_dir,
            cancellation,
            stack: vec![root.to_path_buf()],
            pending: VecDeque::new(),
            done: false,
        })
    }

    /// List one directory: queue its matching files, push its kept subdirectories.
    /// An unreadable directory contributes nothing. Symlinked directories are
    /// never entered, so the walk cannot cycle.
    fn expand(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping inaccessible directory {:?}: {}", dir, e);
                return;
            }
        };

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            let path = entry.path();
            let is_file = if file_type.is_symlink() {
                // Links to files are followed; links to directories are not
                match fs::metadata(&path) {
                    Ok(target) => target.is_file(),
                    Err(e) => {
                        tracing::debug!("Skipping dangling link {:?}: {}", path, e);
                        continue;
                    }
                }
            } else {
                file_type.is_file()
            };

            if is_file {
                if (self.include_file)(&path) {
                    self.pending.push_back(path);
                }
            } else if file_type.is_dir() {
                subdirs.push(path);
            }
        }

        for subdir in subdirs {
            if (self.exclude_dir)(&subdir) {
                tracing::debug!("Excluding directory {:?}", subdir);
            } else {
                self.stack.push(subdir);
            }
        }
    }
}

impl<I, X> Iterator for Walker<I, X>
where
    I: Fn(&Path) -> bool,
    X: Fn(&Path) -> bool,
{
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Err(e) = self.cancellation.check() {
                self.done = true;
                return Some(Err(e.into()));
            }

            if let Some(path) = self.pending.pop_front() {
                return Some(Ok(path));
            }

            let dir = match self.stack.pop() {
                Some(dir) => dir,
                None => {
                    self.done = true;
                    return None;
                }
            };
            self.expand(&dir);
        }
    }
}
