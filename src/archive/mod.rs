//! The archive collaborator seam.
//!
//! Sessions never touch a container format directly: they open archives,
//! read manifests, extract entries, and write new archives through
//! [`ArchiveBackend`] and [`ArchiveHandle`].

#[cfg(test)]
pub mod memory;
pub mod zip_backend;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Metadata of one file stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub filename: String,
    pub compressed_size: u64,
    pub size: u64,
    /// Location of the file inside the archive.
    pub internal_path: String,
}

/// A file queued for a new archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub source: PathBuf,
    pub internal_path: String,
}

/// Failures of archive and export operations.
///
/// Messages are written for the error modal.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Can't open file \"{}\"", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File \"{}\" is corrupted or not a supported archive", .path.display())]
    Format { path: PathBuf, reason: String },

    /// An extracted or exported file could not be created.
    #[error("Can't create file \"{}\"", .path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination of a new archive could not be created.
    #[error("Can't create file \"{}\"", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing to file \"{}\"", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Error extracting file \"{name}\"")]
    Extract { name: String, reason: String },
}

/// An open archive.
///
/// Closing is dropping the handle.
pub trait ArchiveHandle {
    /// Manifest in stored order.
    fn entries(&self) -> &[ManifestEntry];

    /// Write entry `index` of the manifest to `destination`.
    fn extract_entry(&mut self, index: usize, destination: &Path) -> Result<(), ArchiveError>;
}

/// A container format implementation.
pub trait ArchiveBackend {
    type Handle: ArchiveHandle;

    /// Lowercase extensions (without the dot) offered by the open dialog.
    fn extensions(&self) -> &'static [&'static str];

    fn open(&self, path: &Path) -> Result<Self::Handle, ArchiveError>;

    /// Build a new archive at `destination` from `entries`, in order.
    fn write(&self, entries: &[StagedEntry], destination: &Path) -> Result<(), ArchiveError>;
}
