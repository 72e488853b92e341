use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use crate::archive::zip_backend::ZipBackend;
use crate::browser::{Confirmed, FileBrowser};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::session::{CreateDialog, CreateSession, ExtractDialog, ExtractSession};

/// Main window mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Extract,
    Create,
}

/// A file browser popup, identified by the session dialog it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Extract(ExtractDialog),
    Create(CreateDialog),
}

impl Dialog {
    pub fn title(self) -> &'static str {
        match self {
            Dialog::Extract(ExtractDialog::Open) => "Open archive",
            Dialog::Extract(ExtractDialog::Extract) => "Select directory",
            Dialog::Extract(ExtractDialog::Export) => "Export csv",
            Dialog::Create(CreateDialog::Add) => "Add file(s)",
            Dialog::Create(CreateDialog::Save) => "Save archive",
        }
    }
}

/// The popup drawn over the main window, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Browser(Dialog),
    /// Editing the internal path of a staged file.
    EditPath,
    About,
}

/// Main application state.
pub struct App {
    pub extract: ExtractSession<ZipBackend>,
    pub create: CreateSession<ZipBackend>,
    pub mode: Mode,
    pub popup: Option<Popup>,
    /// Error modals waiting to be dismissed, oldest first. Drawn above
    /// any popup.
    pub errors: VecDeque<String>,
    /// Focused row of the main table (manifest or staged list).
    pub table_cursor: usize,
    pub status_message: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig, mode: Mode) -> Self {
        let start_dir = config.start_dir();
        let show_hidden = config.show_hidden();
        let ascending = config.ascending();
        Self {
            extract: ExtractSession::new(ZipBackend, &start_dir, show_hidden, ascending),
            create: CreateSession::new(
                ZipBackend,
                &start_dir,
                show_hidden,
                ascending,
                config.internal_prefix(),
                config.default_archive_name(),
            ),
            mode,
            popup: None,
            errors: VecDeque::new(),
            table_cursor: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Run every deferred command. Called once per cycle, before drawing.
    pub fn process_pending(&mut self) {
        let had_work = self.extract.has_pending() || self.create.has_pending();
        let mut errors = self.extract.process_pending();
        errors.extend(self.create.process_pending());

        if had_work && errors.is_empty() {
            self.set_status_message("Done".to_string());
        }
        self.errors.extend(errors.into_iter().map(|e| e.to_string()));
        self.clamp_table_cursor();
    }

    /// Queue an error modal.
    pub fn report(&mut self, err: AppError) {
        tracing::warn!(error = %err, "operation failed");
        self.errors.push_back(err.to_string());
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    // ── Main window ─────────────────────────────────────────────────────

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Extract => Mode::Create,
            Mode::Create => Mode::Extract,
        };
        self.table_cursor = 0;
    }

    pub fn table_len(&self) -> usize {
        match self.mode {
            Mode::Extract => self.extract.manifest().len(),
            Mode::Create => self.create.staged().len(),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.table_len();
        if len > 0 && self.table_cursor < len - 1 {
            self.table_cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.table_cursor = self.table_cursor.saturating_sub(1);
    }

    fn clamp_table_cursor(&mut self) {
        let len = self.table_len();
        if self.table_cursor >= len {
            self.table_cursor = len.saturating_sub(1);
        }
    }

    pub fn close_archive(&mut self) {
        self.extract.close();
        self.table_cursor = 0;
    }

    pub fn remove_selected(&mut self) {
        if self.mode == Mode::Create {
            self.create.remove(self.table_cursor);
            self.clamp_table_cursor();
        }
    }

    pub fn show_about(&mut self) {
        self.popup = Some(Popup::About);
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    // ── Edit popup ──────────────────────────────────────────────────────

    pub fn begin_edit(&mut self) {
        if self.mode == Mode::Create && self.create.begin_edit(self.table_cursor) {
            self.popup = Some(Popup::EditPath);
        }
    }

    pub fn commit_edit(&mut self) {
        self.create.commit_edit();
        self.popup = None;
    }

    pub fn cancel_edit(&mut self) {
        self.create.cancel_edit();
        self.popup = None;
    }

    // ── Browser popups ──────────────────────────────────────────────────

    pub fn browser(&self, dialog: Dialog) -> &FileBrowser {
        match dialog {
            Dialog::Extract(d) => self.extract.browser(d),
            Dialog::Create(d) => self.create.browser(d),
        }
    }

    pub fn browser_mut(&mut self, dialog: Dialog) -> &mut FileBrowser {
        match dialog {
            Dialog::Extract(d) => self.extract.browser_mut(d),
            Dialog::Create(d) => self.create.browser_mut(d),
        }
    }

    pub fn dialog_enabled(&self, dialog: Dialog) -> bool {
        match dialog {
            Dialog::Extract(d) => self.extract.dialog_enabled(d),
            Dialog::Create(d) => self.create.dialog_enabled(d),
        }
    }

    /// The browser popup currently shown.
    pub fn active_dialog(&self) -> Option<Dialog> {
        match self.popup {
            Some(Popup::Browser(d)) => Some(d),
            _ => None,
        }
    }

    /// Show the browser popup for `dialog`, if the dialog is enabled.
    pub fn open_dialog(&mut self, dialog: Dialog) {
        if !self.dialog_enabled(dialog) {
            return;
        }
        match self.browser_mut(dialog).show() {
            Ok(()) => self.popup = Some(Popup::Browser(dialog)),
            Err(e) => self.report(e),
        }
    }

    /// Run `action` on the active browser, reporting a failure as a modal.
    pub fn browser_action<F>(&mut self, action: F)
    where
        F: FnOnce(&mut FileBrowser) -> Result<()>,
    {
        let Some(dialog) = self.active_dialog() else {
            return;
        };
        if let Err(e) = action(self.browser_mut(dialog)) {
            self.report(e);
        }
    }

    /// Confirm the active browser. Stays open while confirming is disabled.
    pub fn confirm_dialog(&mut self) {
        let Some(dialog) = self.active_dialog() else {
            return;
        };
        if let Some(confirmed) = self.browser_mut(dialog).confirm() {
            self.popup = None;
            self.submit(dialog, confirmed);
        }
    }

    /// Activate the focused row of the active browser.
    pub fn activate_row(&mut self) {
        let Some(dialog) = self.active_dialog() else {
            return;
        };
        let browser = self.browser_mut(dialog);
        let Some(row) = browser.cursor_row() else {
            return;
        };
        match browser.activate(row) {
            Ok(Some(confirmed)) => {
                self.popup = None;
                self.submit(dialog, confirmed);
            }
            Ok(None) => {}
            Err(e) => self.report(e),
        }
    }

    pub fn cancel_dialog(&mut self) {
        if let Some(dialog) = self.active_dialog() {
            self.browser_mut(dialog).cancel();
        }
        self.popup = None;
    }

    fn submit(&mut self, dialog: Dialog, confirmed: Confirmed) {
        match dialog {
            Dialog::Extract(d) => self.extract.submit(d, confirmed),
            Dialog::Create(d) => self.create.submit(d, confirmed),
        }
    }

    // ── Drag and drop ───────────────────────────────────────────────────

    /// Files dropped on the window: extract mode opens the first one,
    /// create mode stages all of them. Anything but regular files is
    /// ignored.
    pub fn drop_paths(&mut self, paths: Vec<PathBuf>) {
        let files: Vec<PathBuf> = paths.into_iter().filter(|p| p.is_file()).collect();
        if files.is_empty() {
            return;
        }
        match self.mode {
            Mode::Extract => {
                if let Some(first) = files.into_iter().next() {
                    self.extract.request_open(first);
                }
            }
            Mode::Create => self.create.drop_paths(files),
        }
    }

    /// Bracketed paste: terminals paste dropped files as their paths.
    pub fn paste(&mut self, text: &str) {
        self.drop_paths(parse_dropped(text));
    }
}

/// Split pasted text into paths: one per line, surrounding quotes removed.
/// `file://` URIs lose the scheme and any `localhost` host and are
/// percent-decoded; plain paths are taken as they are.
pub fn parse_dropped(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(|line| {
            let line = line.trim();
            let line = line
                .strip_prefix('\'')
                .and_then(|l| l.strip_suffix('\''))
                .or_else(|| line.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
                .unwrap_or(line);
            match line.strip_prefix("file://") {
                Some(rest) => percent_decode(rest.strip_prefix("localhost").unwrap_or(rest)),
                None => line.to_string(),
            }
        })
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Decode `%XX` escapes. Malformed escapes are kept literally.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
