use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{ArchiveBackend, ArchiveError, ArchiveHandle, ManifestEntry, StagedEntry};

/// Archive backend for `.zip` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipBackend;

/// An open zip archive.
pub struct ZipHandle {
    archive: ZipArchive<BufReader<File>>,
    entries: Vec<ManifestEntry>,
    /// Zip record index of each manifest entry (directory records are
    /// skipped).
    records: Vec<usize>,
}

impl std::fmt::Debug for ZipHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipHandle")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Convert a user-entered internal path (`\levels\a.bin`) to a zip entry
/// name (`levels/a.bin`).
fn zip_entry_name(internal_path: &str) -> String {
    internal_path
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_string()
}

impl ArchiveBackend for ZipBackend {
    type Handle = ZipHandle;

    fn extensions(&self) -> &'static [&'static str] {
        &["zip"]
    }

    fn open(&self, path: &Path) -> Result<ZipHandle, ArchiveError> {
        let file = File::open(path).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let format_err = |e: ::zip::result::ZipError| ArchiveError::Format {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(format_err)?;

        let mut entries = Vec::new();
        let mut records = Vec::new();
        for i in 0..archive.len() {
            let record = archive.by_index_raw(i).map_err(format_err)?;
            if record.is_dir() {
                continue;
            }
            let name = record.name().to_string();
            let filename = name.rsplit('/').next().unwrap_or(&name).to_string();
            entries.push(ManifestEntry {
                filename,
                compressed_size: record.compressed_size(),
                size: record.size(),
                internal_path: name,
            });
            records.push(i);
        }

        Ok(ZipHandle {
            archive,
            entries,
            records,
        })
    }

    /// The archive is built next to `destination` and renamed over it only
    /// once complete, so a failed write never clobbers an existing file.
    fn write(&self, entries: &[StagedEntry], destination: &Path) -> Result<(), ArchiveError> {
        let partial = partial_path(destination);
        let file = File::create(&partial).map_err(|source| ArchiveError::OutputOpen {
            path: destination.to_path_buf(),
            source,
        })?;

        let result = write_entries(file, entries)
            .and_then(|()| fs::rename(&partial, destination).map_err(|e| e.to_string()))
            .map_err(|reason| ArchiveError::Write {
                path: destination.to_path_buf(),
                reason,
            });
        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result
    }
}

/// Sibling of `destination` the archive is assembled in.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    destination.with_file_name(name)
}

fn write_entries(file: File, entries: &[StagedEntry]) -> Result<(), String> {
    let mut zip = ZipWriter::new(BufWriter::new(file));
    for entry in entries {
        let mut source = File::open(&entry.source)
            .map_err(|e| format!("{}: {}", entry.source.display(), e))?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(zip_entry_name(&entry.internal_path), options)
            .map_err(|e| e.to_string())?;
        io::copy(&mut source, &mut zip).map_err(|e| e.to_string())?;
    }
    let mut inner = zip.finish().map_err(|e| e.to_string())?;
    inner.flush().map_err(|e| e.to_string())
}

impl ArchiveHandle for ZipHandle {
    fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    fn extract_entry(&mut self, index: usize, destination: &Path) -> Result<(), ArchiveError> {
        let (record, name) = match (self.records.get(index), self.entries.get(index)) {
            (Some(&r), Some(e)) => (r, e.filename.clone()),
            _ => {
                return Err(ArchiveError::Extract {
                    name: index.to_string(),
                    reason: "no such entry".to_string(),
                })
            }
        };
        let extract_err = |reason: String| ArchiveError::Extract {
            name: name.clone(),
            reason,
        };

        let mut data = self
            .archive
            .by_index(record)
            .map_err(|e| extract_err(e.to_string()))?;
        let mut out = File::create(destination).map_err(|source| ArchiveError::OutputCreate {
            path: PathBuf::from(destination),
            source,
        })?;
        io::copy(&mut data, &mut out).map_err(|e| extract_err(e.to_string()))?;
        Ok(())
    }
}
