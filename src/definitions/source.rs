//! Read access to a definition tree.
//!
//! The loader only ever lists directories and reads files, so those two
//! operations are all a source has to provide. `FsSource` reads the real
//! filesystem; `MemorySource` holds a tree in memory for tests and tooling.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Capability to enumerate and read a definition tree.
pub trait DefinitionSource {
    /// List the direct children of `dir`.
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Read the full contents of `file`.
    fn read(&self, file: &Path) -> io::Result<Vec<u8>>;
}

/// Definition tree stored on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl DefinitionSource for FsSource {
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            // Follows symlinks, so linked directories behave like real ones.
            let kind = if std::fs::metadata(entry.path())?.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(Entry { name, kind });
        }
        Ok(entries)
    }

    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(file)
    }
}

/// Definition tree held in memory.
///
/// Directories are implied by the paths of the files added to them; empty
/// directories can be added explicitly.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl MemorySource {
    /// Create a source containing only an empty root.
    pub fn new() -> Self {
        let mut source = Self::default();
        source.dirs.insert(PathBuf::new());
        source
    }

    /// Add a file at `path`, relative to the root.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path, contents.into());
        self
    }

    /// Add an (possibly empty) directory at `path`, relative to the root.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.add_dir(path.as_ref());
        self
    }

    fn add_dir(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl DefinitionSource for MemorySource {
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        if !self.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }

        let child_name = |path: &Path| -> Option<String> {
            (path.parent() == Some(dir) && path != dir)
                .then(|| path.file_name())
                .flatten()
                .map(|n| n.to_string_lossy().into_owned())
        };

        let dirs = self.dirs.iter().filter_map(|d| child_name(d.as_path())).map(|name| Entry {
            name,
            kind: EntryKind::Dir,
        });
        let files = self.files.keys().filter_map(|f| child_name(f.as_path())).map(|name| Entry {
            name,
            kind: EntryKind::File,
        });

        Ok(dirs.chain(files).collect())
    }

    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        self.files.get(file).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", file.display()))
        })
    }
}
