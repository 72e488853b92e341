//! In-memory archive backend for session tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ArchiveBackend, ArchiveError, ArchiveHandle, ManifestEntry, StagedEntry};

/// A stored file: manifest metadata plus contents.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    pub entry: ManifestEntry,
    pub data: Vec<u8>,
    /// Extraction of this entry fails.
    pub broken: bool,
}

impl MemoryFile {
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

pub fn file(filename: &str, compressed: u64, size: u64, internal: &str) -> MemoryFile {
    MemoryFile {
        entry: ManifestEntry {
            filename: filename.to_string(),
            compressed_size: compressed,
            size,
            internal_path: internal.to_string(),
        },
        data: filename.as_bytes().to_vec(),
        broken: false,
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    archives: HashMap<PathBuf, Vec<MemoryFile>>,
    /// Paths that exist but hold no valid archive.
    corrupt: Vec<PathBuf>,
    /// Every successful `write` call, in order.
    pub written: RefCell<Vec<(Vec<StagedEntry>, PathBuf)>>,
    pub opens: RefCell<usize>,
}

impl MemoryBackend {
    pub fn with_archive(mut self, path: &Path, files: Vec<MemoryFile>) -> Self {
        self.archives.insert(path.to_path_buf(), files);
        self
    }

    pub fn with_corrupt(mut self, path: &Path) -> Self {
        self.corrupt.push(path.to_path_buf());
        self
    }
}

#[derive(Debug)]
pub struct MemoryHandle {
    pub path: PathBuf,
    files: Vec<MemoryFile>,
    entries: Vec<ManifestEntry>,
    /// Indices passed to `extract_entry`, in call order.
    pub attempts: Vec<usize>,
}

impl ArchiveHandle for MemoryHandle {
    fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    fn extract_entry(&mut self, index: usize, destination: &Path) -> Result<(), ArchiveError> {
        self.attempts.push(index);
        let file = self.files.get(index).ok_or_else(|| ArchiveError::Extract {
            name: index.to_string(),
            reason: "no such entry".to_string(),
        })?;
        if file.broken {
            return Err(ArchiveError::Extract {
                name: file.entry.filename.clone(),
                reason: "crc mismatch".to_string(),
            });
        }
        fs::write(destination, &file.data).map_err(|source| ArchiveError::OutputCreate {
            path: destination.to_path_buf(),
            source,
        })
    }
}

impl ArchiveBackend for MemoryBackend {
    type Handle = MemoryHandle;

    fn extensions(&self) -> &'static [&'static str] {
        &["mem"]
    }

    fn open(&self, path: &Path) -> Result<MemoryHandle, ArchiveError> {
        *self.opens.borrow_mut() += 1;
        if self.corrupt.iter().any(|p| p == path) {
            return Err(ArchiveError::Format {
                path: path.to_path_buf(),
                reason: "bad magic".to_string(),
            });
        }
        let files = self
            .archives
            .get(path)
            .cloned()
            .ok_or_else(|| ArchiveError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })?;
        Ok(MemoryHandle {
            path: path.to_path_buf(),
            entries: files.iter().map(|f| f.entry.clone()).collect(),
            files,
            attempts: Vec::new(),
        })
    }

    fn write(&self, entries: &[StagedEntry], destination: &Path) -> Result<(), ArchiveError> {
        match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(ArchiveError::OutputOpen {
                    path: destination.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no parent"),
                })
            }
            _ => {
                self.written
                    .borrow_mut()
                    .push((entries.to_vec(), destination.to_path_buf()));
                Ok(())
            }
        }
    }
}
