use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveBackend, ArchiveError, ArchiveHandle, ManifestEntry};
use crate::browser::{Confirmed, FileBrowser, Policy};
use crate::command::CommandSlot;
use crate::error::{AppError, Result};

use super::collect;

/// The three dialogs of extract mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractDialog {
    /// Choose the archive to open.
    Open,
    /// Choose the directory to extract into.
    Extract,
    /// Choose where to write the CSV listing.
    Export,
}

/// Extract mode: one open archive, its manifest, and the commands that
/// act on it.
pub struct ExtractSession<B: ArchiveBackend> {
    backend: B,
    handle: Option<B::Handle>,
    /// Path of the archive `handle` was opened from.
    open_path: Option<PathBuf>,
    open_slot: CommandSlot<PathBuf>,
    extract_slot: CommandSlot<PathBuf>,
    export_slot: CommandSlot<PathBuf>,
    open_browser: FileBrowser,
    extract_browser: FileBrowser,
    export_browser: FileBrowser,
}

impl<B: ArchiveBackend> ExtractSession<B> {
    pub fn new(backend: B, start_dir: &Path, show_hidden: bool, ascending: bool) -> Self {
        let open_policy = Policy::open_one(backend.extensions());
        Self {
            backend,
            handle: None,
            open_path: None,
            open_slot: CommandSlot::new("open"),
            extract_slot: CommandSlot::new("extract"),
            export_slot: CommandSlot::new("export"),
            open_browser: FileBrowser::new(open_policy, start_dir, show_hidden, ascending),
            extract_browser: FileBrowser::new(
                Policy::save_multi(),
                start_dir,
                show_hidden,
                ascending,
            ),
            export_browser: FileBrowser::new(
                Policy::save_one("archive.csv"),
                start_dir,
                show_hidden,
                ascending,
            ),
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn open_path(&self) -> Option<&Path> {
        self.open_path.as_deref()
    }

    /// Manifest of the open archive; empty when none is open.
    pub fn manifest(&self) -> &[ManifestEntry] {
        match &self.handle {
            Some(h) => h.entries(),
            None => &[],
        }
    }

    /// Drop the open archive.
    pub fn close(&mut self) {
        if let Some(path) = self.open_path.take() {
            tracing::info!(path = %path.display(), "archive closed");
        }
        self.handle = None;
    }

    pub fn browser(&self, dialog: ExtractDialog) -> &FileBrowser {
        match dialog {
            ExtractDialog::Open => &self.open_browser,
            ExtractDialog::Extract => &self.extract_browser,
            ExtractDialog::Export => &self.export_browser,
        }
    }

    pub fn browser_mut(&mut self, dialog: ExtractDialog) -> &mut FileBrowser {
        match dialog {
            ExtractDialog::Open => &mut self.open_browser,
            ExtractDialog::Extract => &mut self.extract_browser,
            ExtractDialog::Export => &mut self.export_browser,
        }
    }

    /// Whether `dialog` may be shown. Extract and export need an archive.
    pub fn dialog_enabled(&self, dialog: ExtractDialog) -> bool {
        dialog == ExtractDialog::Open || self.is_open()
    }

    /// Arm the command belonging to `dialog` with its confirmed path.
    pub fn submit(&mut self, dialog: ExtractDialog, confirmed: Confirmed) {
        let Some(path) = confirmed.into_paths().into_iter().next() else {
            return;
        };
        match dialog {
            ExtractDialog::Open => self.request_open(path),
            ExtractDialog::Extract => self.request_extract(path),
            ExtractDialog::Export => self.request_export(path),
        }
    }

    pub fn request_open(&mut self, path: PathBuf) {
        self.open_slot.request(path);
    }

    pub fn request_extract(&mut self, destination: PathBuf) {
        self.extract_slot.request(destination);
    }

    pub fn request_export(&mut self, destination: PathBuf) {
        self.export_slot.request(destination);
    }

    pub fn has_pending(&self) -> bool {
        self.open_slot.is_pending() || self.extract_slot.is_pending() || self.export_slot.is_pending()
    }

    /// Drain every slot once, in the order open, export, extract, and run
    /// the side effects. Failures are returned in drain order.
    pub fn process_pending(&mut self) -> Vec<AppError> {
        let mut errors = Vec::new();
        if let Some(path) = self.open_slot.take() {
            collect(self.open_archive(path), &mut errors);
        }
        if let Some(dest) = self.export_slot.take() {
            collect(self.export_csv(&dest), &mut errors);
        }
        if let Some(dest) = self.extract_slot.take() {
            collect(self.extract_files(&dest), &mut errors);
        }
        errors
    }

    /// Open `path`, replacing the open archive.
    ///
    /// Re-opening the archive that is already open fails and leaves it
    /// untouched. Any other failure leaves no archive open.
    pub(crate) fn open_archive(&mut self, path: PathBuf) -> Result<()> {
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        if self.handle.is_some() && self.open_path.as_deref() == Some(path.as_path()) {
            return Err(AppError::AlreadyOpen(path));
        }

        let handle = match self.backend.open(&path) {
            Ok(handle) => handle,
            Err(e) => {
                self.close();
                return Err(e.into());
            }
        };
        tracing::info!(
            path = %path.display(),
            files = handle.entries().len(),
            "archive opened"
        );

        let csv_name = match path.file_name() {
            Some(name) => format!("{}.csv", name.to_string_lossy()),
            None => "archive.csv".to_string(),
        };
        self.export_browser.set_default_name(&csv_name);
        self.handle = Some(handle);
        self.open_path = Some(path);
        Ok(())
    }

    /// Extract every manifest entry to `destination/<filename>`, in
    /// manifest order. Stops at the first failure.
    pub(crate) fn extract_files(&mut self, destination: &Path) -> Result<usize> {
        let handle = match &mut self.handle {
            Some(h) if !h.entries().is_empty() => h,
            _ => return Err(AppError::NoArchiveOpen),
        };

        let names: Vec<String> = handle.entries().iter().map(|e| e.filename.clone()).collect();
        for (i, name) in names.iter().enumerate() {
            handle.extract_entry(i, &destination.join(name))?;
        }

        tracing::info!(
            files = names.len(),
            destination = %destination.display(),
            "archive extracted"
        );
        Ok(names.len())
    }

    /// Write the manifest listing to `destination` as CSV.
    pub(crate) fn export_csv(&self, destination: &Path) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(AppError::NoArchiveOpen)?;

        let file = File::create(destination).map_err(|source| ArchiveError::OutputCreate {
            path: destination.to_path_buf(),
            source,
        })?;
        let write_err = |e: std::io::Error| ArchiveError::Write {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        };

        let mut out = BufWriter::new(file);
        let entries = handle.entries();
        for (i, e) in entries.iter().enumerate() {
            write!(
                out,
                "{},{},{},{}",
                e.filename, e.compressed_size, e.size, e.internal_path
            )
            .map_err(write_err)?;
            if i + 1 < entries.len() {
                out.write_all(b"\n").map_err(write_err)?;
            }
        }
        out.flush().map_err(write_err)?;

        tracing::info!(
            rows = entries.len(),
            destination = %destination.display(),
            "manifest exported"
        );
        Ok(())
    }
}
