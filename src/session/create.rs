use std::path::{Path, PathBuf};

use crate::archive::{ArchiveBackend, StagedEntry};
use crate::browser::{Confirmed, FileBrowser, Policy};
use crate::command::CommandSlot;
use crate::error::{AppError, Result};
use crate::input::TextInput;

use super::collect;

/// The two dialogs of create mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateDialog {
    /// Choose files to stage.
    Add,
    /// Choose where to write the new archive.
    Save,
}

/// Create mode: a list of staged files, each with the path it will have
/// inside the new archive.
pub struct CreateSession<B: ArchiveBackend> {
    backend: B,
    staged: Vec<StagedEntry>,
    internal_prefix: String,
    create_slot: CommandSlot<PathBuf>,
    add_browser: FileBrowser,
    save_browser: FileBrowser,
    /// Index being edited and its uncommitted internal path.
    edit: Option<(usize, TextInput)>,
}

impl<B: ArchiveBackend> CreateSession<B> {
    pub fn new(
        backend: B,
        start_dir: &Path,
        show_hidden: bool,
        ascending: bool,
        internal_prefix: &str,
        default_archive_name: &str,
    ) -> Self {
        Self {
            backend,
            staged: Vec::new(),
            internal_prefix: internal_prefix.to_string(),
            create_slot: CommandSlot::new("create"),
            add_browser: FileBrowser::new(Policy::open_multi(), start_dir, show_hidden, ascending),
            save_browser: FileBrowser::new(
                Policy::save_one(default_archive_name),
                start_dir,
                show_hidden,
                ascending,
            ),
            edit: None,
        }
    }

    pub fn staged(&self) -> &[StagedEntry] {
        &self.staged
    }

    pub fn browser(&self, dialog: CreateDialog) -> &FileBrowser {
        match dialog {
            CreateDialog::Add => &self.add_browser,
            CreateDialog::Save => &self.save_browser,
        }
    }

    pub fn browser_mut(&mut self, dialog: CreateDialog) -> &mut FileBrowser {
        match dialog {
            CreateDialog::Add => &mut self.add_browser,
            CreateDialog::Save => &mut self.save_browser,
        }
    }

    /// Whether `dialog` may be shown. Saving needs a complete staged list.
    pub fn dialog_enabled(&self, dialog: CreateDialog) -> bool {
        dialog == CreateDialog::Add || self.ready_to_create()
    }

    /// Hand a confirmed dialog result to the session.
    pub fn submit(&mut self, dialog: CreateDialog, confirmed: Confirmed) {
        match dialog {
            CreateDialog::Add => self.drop_paths(confirmed.into_paths()),
            CreateDialog::Save => {
                if let Some(dest) = confirmed.into_paths().into_iter().next() {
                    self.request_create(dest);
                }
            }
        }
    }

    // ── Staging ─────────────────────────────────────────────────────────

    fn default_internal_path(&self, source: &Path) -> String {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("{}{}", self.internal_prefix, name)
    }

    /// Stage every path, in order.
    pub fn drop_paths<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            self.drop_path(path);
        }
    }

    /// Stage one path under the default internal path.
    pub fn drop_path(&mut self, path: PathBuf) {
        let internal_path = self.default_internal_path(&path);
        tracing::debug!(source = %path.display(), internal = %internal_path, "file staged");
        self.staged.push(StagedEntry {
            source: path,
            internal_path,
        });
    }

    /// Unstage entry `index`. Any edit in progress is abandoned.
    pub fn remove(&mut self, index: usize) -> Option<StagedEntry> {
        if index >= self.staged.len() {
            return None;
        }
        self.edit = None;
        Some(self.staged.remove(index))
    }

    /// Replace the internal path of entry `index`.
    pub fn set_internal_path(&mut self, index: usize, text: &str) {
        if let Some(entry) = self.staged.get_mut(index) {
            // Same bound as the edit field.
            entry.internal_path = TextInput::new(text).value().to_string();
        }
    }

    /// Every entry has an internal path, and there is at least one.
    pub fn ready_to_create(&self) -> bool {
        !self.staged.is_empty() && self.staged.iter().all(|e| !e.internal_path.is_empty())
    }

    // ── Edit popup ──────────────────────────────────────────────────────

    /// Start editing the internal path of entry `index`.
    pub fn begin_edit(&mut self, index: usize) -> bool {
        match self.staged.get(index) {
            Some(entry) => {
                self.edit = Some((index, TextInput::new(&entry.internal_path)));
                true
            }
            None => false,
        }
    }

    /// The entry being edited and the edit buffer.
    pub fn editing(&self) -> Option<(&StagedEntry, &TextInput)> {
        let (index, input) = self.edit.as_ref()?;
        Some((self.staged.get(*index)?, input))
    }

    pub fn edit_input_mut(&mut self) -> Option<&mut TextInput> {
        self.edit.as_mut().map(|(_, input)| input)
    }

    pub fn commit_edit(&mut self) {
        if let Some((index, input)) = self.edit.take() {
            self.set_internal_path(index, input.value());
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // ── Commands ────────────────────────────────────────────────────────

    pub fn request_create(&mut self, destination: PathBuf) {
        self.create_slot.request(destination);
    }

    pub fn has_pending(&self) -> bool {
        self.create_slot.is_pending()
    }

    /// Drain the create slot and write the archive.
    pub fn process_pending(&mut self) -> Vec<AppError> {
        let mut errors = Vec::new();
        if let Some(dest) = self.create_slot.take() {
            collect(self.create(&dest), &mut errors);
        }
        errors
    }

    /// Write the staged entries, in staged order, to `destination`.
    pub(crate) fn create(&self, destination: &Path) -> Result<()> {
        if !self.ready_to_create() {
            return Err(AppError::NotReady);
        }
        self.backend.write(&self.staged, destination)?;
        tracing::info!(
            files = self.staged.len(),
            destination = %destination.display(),
            "archive created"
        );
        Ok(())
    }
}
