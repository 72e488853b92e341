//! Selection model layered on a directory snapshot.
//!
//! A [`FileBrowser`] owns one [`DirSnapshot`] and one [`Policy`]. The UI
//! asks it for [`rows`](FileBrowser::rows), forwards clicks and
//! activations, and on confirmation receives a [`Confirmed`] payload which
//! the owning session turns into a deferred command.

pub mod policy;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::snapshot::{DirSnapshot, ListKind};
use crate::input::TextInput;

pub use policy::Policy;

/// What a row of the listing refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The `..` entry.
    Parent,
    /// Storage index into the directory sequence.
    Directory(usize),
    /// Storage index into the file sequence.
    File(usize),
}

/// One renderable line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub name: String,
    pub selected: bool,
}

/// Result of a confirmed browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    /// One path: the chosen file, directory, or an activated override.
    Single(PathBuf),
    /// Every selected file, in ascending order.
    Multiple(Vec<PathBuf>),
}

impl Confirmed {
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Confirmed::Single(p) => vec![p],
            Confirmed::Multiple(ps) => ps,
        }
    }
}

/// A file/directory picker with one of the four selection policies.
#[derive(Debug)]
pub struct FileBrowser {
    snapshot: DirSnapshot,
    policy: Policy,
    start_dir: PathBuf,
    needs_init: bool,
    /// Index into [`rows`](Self::rows) of the focused line.
    cursor: usize,
    /// File index where a keyboard range selection started.
    anchor: Option<usize>,
}

impl FileBrowser {
    pub fn new(policy: Policy, start_dir: &Path, show_hidden: bool, ascending: bool) -> Self {
        Self {
            snapshot: DirSnapshot::new(show_hidden, ascending),
            policy,
            start_dir: start_dir.to_path_buf(),
            needs_init: true,
            cursor: 0,
            anchor: None,
        }
    }

    /// Prepare the browser for display.
    ///
    /// After construction or after a confirm/cancel this resets the policy
    /// state and lists the start directory; otherwise it does nothing.
    pub fn show(&mut self) -> Result<()> {
        if !self.needs_init {
            return Ok(());
        }
        self.policy.reset();
        self.cursor = 0;
        self.anchor = None;
        let start = self.start_dir.clone();
        self.open_dir(&start)?;
        self.needs_init = false;
        Ok(())
    }

    /// Whether the next [`show`](Self::show) will re-initialize.
    #[cfg(test)]
    pub fn needs_init(&self) -> bool {
        self.needs_init
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn snapshot(&self) -> &DirSnapshot {
        &self.snapshot
    }

    pub fn current_path(&self) -> &Path {
        self.snapshot.current_path()
    }

    /// Caller-supplied name used to pre-fill a save dialog.
    pub fn set_default_name(&mut self, name: &str) {
        if let Policy::SaveOne { default_name, .. } = &mut self.policy {
            *default_name = name.to_string();
        }
    }

    /// The editable filename of a save dialog.
    pub fn filename_mut(&mut self) -> Option<&mut TextInput> {
        match &mut self.policy {
            Policy::SaveOne { filename, .. } => Some(filename),
            _ => None,
        }
    }

    /// Text for the dialog's footer field.
    pub fn footer_text(&self) -> String {
        match &self.policy {
            Policy::OpenOne { chosen, .. } => chosen
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "(none)".to_string()),
            Policy::OpenMulti => {
                let n = self.selected_count();
                format!("{} file{} selected", n, if n == 1 { "" } else { "s" })
            }
            Policy::SaveMulti { display, .. } => display.clone(),
            Policy::SaveOne { filename, .. } => filename.value().to_string(),
        }
    }

    // ── Listing ─────────────────────────────────────────────────────────

    /// The listing in display order: `..` (unless at the root), then
    /// directories, then files.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        if !self.snapshot.is_root() {
            rows.push(Row {
                kind: RowKind::Parent,
                name: "..".to_string(),
                selected: false,
            });
        }
        let dirs = self.snapshot.entries(ListKind::Directories);
        for i in self.snapshot.visible_indices(ListKind::Directories) {
            rows.push(Row {
                kind: RowKind::Directory(i),
                name: format!("{}/", dirs[i].entry.name),
                selected: dirs[i].selected,
            });
        }
        let files = self.snapshot.entries(ListKind::Files);
        for i in self.snapshot.visible_indices(ListKind::Files) {
            if !self.policy.lists_file(&files[i].entry.path) {
                continue;
            }
            rows.push(Row {
                kind: RowKind::File(i),
                name: files[i].entry.name.clone(),
                selected: files[i].selected,
            });
        }
        rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the focus by `delta` rows, clamped to the listing.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn cursor_row(&self) -> Option<RowKind> {
        self.rows().get(self.cursor).map(|r| r.kind)
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────

    fn open_dir(&mut self, path: &Path) -> Result<()> {
        self.snapshot.open_dir(path)?;
        self.policy.on_open_dir(self.snapshot.current_path());
        self.cursor = 0;
        self.anchor = None;
        Ok(())
    }

    /// Go to the parent directory. No-op at the filesystem root.
    pub fn go_up(&mut self) -> Result<()> {
        match self.snapshot.current_path().parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.open_dir(&parent)
            }
            None => Ok(()),
        }
    }

    /// Return to the previously listed directory. No-op without one.
    pub fn go_back(&mut self) -> Result<()> {
        match self.snapshot.previous_path() {
            Some(prev) => {
                let prev = prev.to_path_buf();
                self.open_dir(&prev)
            }
            None => Ok(()),
        }
    }

    /// Re-enumerate the current directory. Selection flags are discarded.
    pub fn refresh(&mut self) -> Result<()> {
        self.snapshot.refresh()?;
        self.policy.on_open_dir(self.snapshot.current_path());
        self.anchor = None;
        self.clamp_cursor();
        Ok(())
    }

    pub fn can_go_back(&self) -> bool {
        self.snapshot.previous_path().is_some()
    }

    pub fn toggle_hidden(&mut self) {
        self.snapshot.show_hidden = !self.snapshot.show_hidden;
        self.clamp_cursor();
    }

    pub fn toggle_ascending(&mut self) {
        self.snapshot.ascending = !self.snapshot.ascending;
    }

    /// Toggle the extension filter of an open-one browser.
    pub fn toggle_filter(&mut self) {
        if let Policy::OpenOne { filter, .. } = &mut self.policy {
            *filter = !*filter;
            self.clamp_cursor();
        }
    }

    // ── Interaction ─────────────────────────────────────────────────────

    /// Single click on a row.
    pub fn click(&mut self, row: RowKind) {
        match (&mut self.policy, row) {
            (Policy::OpenOne { chosen, .. }, RowKind::File(i)) => {
                let files = self.snapshot.entries_mut(ListKind::Files);
                if let Some(target) = files.get(i) {
                    *chosen = Some(target.entry.path.clone());
                    for (j, s) in files.iter_mut().enumerate() {
                        s.selected = j == i;
                    }
                }
            }
            (Policy::OpenMulti, RowKind::File(i)) => {
                if let Some(s) = self.snapshot.entries_mut(ListKind::Files).get_mut(i) {
                    s.selected = !s.selected;
                    self.anchor = Some(i);
                }
            }
            (Policy::SaveMulti { selected, display }, RowKind::Directory(i)) => {
                let dirs = self.snapshot.entries_mut(ListKind::Directories);
                if let Some(target) = dirs.get(i) {
                    *selected = target.entry.path.clone();
                    *display = target.entry.name.clone();
                    for (j, s) in dirs.iter_mut().enumerate() {
                        s.selected = j == i;
                    }
                }
            }
            (Policy::SaveOne { filename, .. }, RowKind::File(i)) => {
                if let Some(target) = self.snapshot.entries(ListKind::Files).get(i) {
                    filename.set(&target.entry.name);
                }
            }
            _ => {}
        }
    }

    /// Double click (or Enter) on a row.
    ///
    /// Directories navigate. Activating a file in an open dialog confirms
    /// that single file immediately, bypassing the selection flags.
    pub fn activate(&mut self, row: RowKind) -> Result<Option<Confirmed>> {
        match row {
            RowKind::Parent => {
                self.go_up()?;
                Ok(None)
            }
            RowKind::Directory(i) => {
                let path = match self.snapshot.entries(ListKind::Directories).get(i) {
                    Some(s) => s.entry.path.clone(),
                    None => return Ok(None),
                };
                self.open_dir(&path)?;
                Ok(None)
            }
            RowKind::File(i) => {
                let path = match self.snapshot.entries(ListKind::Files).get(i) {
                    Some(s) => s.entry.path.clone(),
                    None => return Ok(None),
                };
                if matches!(self.policy, Policy::SaveMulti { .. }) {
                    return Ok(None);
                }
                if matches!(self.policy, Policy::SaveOne { .. }) {
                    self.click(row);
                    return Ok(self.confirm());
                }
                self.needs_init = true;
                Ok(Some(Confirmed::Single(path)))
            }
        }
    }

    /// Set every file's flag. Only meaningful for multi-select.
    pub fn set_all(&mut self, selected: bool) {
        if !matches!(self.policy, Policy::OpenMulti) {
            return;
        }
        for s in self.snapshot.entries_mut(ListKind::Files) {
            s.selected = selected;
        }
    }

    /// Set the flag of every file in the inclusive range between `first`
    /// and `last`, given in either order. Indices past the end are clamped.
    pub fn set_range(&mut self, first: usize, last: usize, selected: bool) {
        if !matches!(self.policy, Policy::OpenMulti) {
            return;
        }
        let files = self.snapshot.entries_mut(ListKind::Files);
        if files.is_empty() {
            return;
        }
        let lo = first.min(last);
        let hi = first.max(last).min(files.len() - 1);
        if lo > hi {
            return;
        }
        for s in &mut files[lo..=hi] {
            s.selected = selected;
        }
    }

    /// Move the focus and select every file between the range anchor and
    /// the newly focused file.
    pub fn extend_selection(&mut self, delta: isize) {
        if !matches!(self.policy, Policy::OpenMulti) {
            self.move_cursor(delta);
            return;
        }
        let anchor = match (self.anchor, self.cursor_row()) {
            (Some(a), _) => Some(a),
            (None, Some(RowKind::File(i))) => Some(i),
            _ => None,
        };
        self.move_cursor(delta);
        let (Some(a), Some(RowKind::File(i))) = (anchor, self.cursor_row()) else {
            return;
        };

        // Range over listed rows only; hidden files between the ends stay
        // unselected.
        let listed: Vec<usize> = self
            .rows()
            .iter()
            .filter_map(|r| match r.kind {
                RowKind::File(f) => Some(f),
                _ => None,
            })
            .collect();
        let (Some(from), Some(to)) = (
            listed.iter().position(|&f| f == a),
            listed.iter().position(|&f| f == i),
        ) else {
            return;
        };
        self.set_all(false);
        let files = self.snapshot.entries_mut(ListKind::Files);
        for &f in &listed[from.min(to)..=from.max(to)] {
            files[f].selected = true;
        }
        self.anchor = Some(a);
    }

    pub fn selected_count(&self) -> usize {
        self.snapshot
            .entries(ListKind::Files)
            .iter()
            .filter(|s| s.selected)
            .count()
    }

    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        match &self.policy {
            Policy::OpenOne { chosen, .. } => chosen.is_some(),
            Policy::OpenMulti => self.selected_count() > 0,
            Policy::SaveMulti { .. } => true,
            Policy::SaveOne { filename, .. } => !filename.is_empty(),
        }
    }

    /// Confirm the dialog. Returns `None` while confirming is disabled.
    ///
    /// A successful confirm schedules re-initialization for the next show.
    pub fn confirm(&mut self) -> Option<Confirmed> {
        if !self.can_confirm() {
            return None;
        }
        let result = match &self.policy {
            Policy::OpenOne { chosen, .. } => Confirmed::Single(chosen.clone()?),
            Policy::OpenMulti => Confirmed::Multiple(
                self.snapshot
                    .entries(ListKind::Files)
                    .iter()
                    .filter(|s| s.selected)
                    .map(|s| s.entry.path.clone())
                    .collect(),
            ),
            Policy::SaveMulti { selected, .. } => {
                if selected.as_os_str().is_empty() {
                    Confirmed::Single(self.snapshot.current_path().to_path_buf())
                } else {
                    Confirmed::Single(selected.clone())
                }
            }
            Policy::SaveOne { filename, .. } => {
                Confirmed::Single(self.snapshot.current_path().join(filename.value()))
            }
        };
        self.needs_init = true;
        Some(result)
    }

    /// Dismiss without confirming; uncommitted state is discarded on the
    /// next show.
    pub fn cancel(&mut self) {
        self.needs_init = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("inner.zip")).unwrap();
        for name in ["a.zip", "b.txt", "c.zip", "d.txt", "e.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    fn browser(policy: Policy, dir: &TempDir) -> FileBrowser {
        let mut b = FileBrowser::new(policy, dir.path(), false, true);
        b.show().unwrap();
        b
    }

    fn file_flags(b: &FileBrowser) -> Vec<bool> {
        b.snapshot()
            .entries(ListKind::Files)
            .iter()
            .map(|s| s.selected)
            .collect()
    }

    fn row_of(b: &FileBrowser, name: &str) -> RowKind {
        b.rows().into_iter().find(|r| r.name == name).unwrap().kind
    }

    #[test]
    fn rows_list_parent_dirs_then_files() {
        let dir = setup_test_dir();
        let b = browser(Policy::open_multi(), &dir);
        let names: Vec<String> = b.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["..", "sub/", "a.zip", "b.txt", "c.zip", "d.txt", "e.txt"]
        );
    }

    #[test]
    fn set_range_reversed_is_inclusive_and_idempotent() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);

        b.set_range(2, 0, true);
        assert_eq!(file_flags(&b), vec![true, true, true, false, false]);
        b.set_range(2, 0, true);
        assert_eq!(file_flags(&b), vec![true, true, true, false, false]);
        assert_eq!(b.selected_count(), 3);

        b.set_range(4, 4, true);
        assert_eq!(file_flags(&b), vec![true, true, true, false, true]);
    }

    #[test]
    fn set_range_clamps_past_the_end() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        b.set_range(3, 99, true);
        assert_eq!(file_flags(&b), vec![false, false, false, true, true]);
    }

    #[test]
    fn set_all_false_always_zeroes() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        b.set_range(1, 3, true);
        b.set_all(false);
        assert_eq!(b.selected_count(), 0);
        b.set_all(true);
        assert_eq!(b.selected_count(), 5);
        b.set_all(false);
        b.set_all(false);
        assert!(file_flags(&b).iter().all(|f| !f));
    }

    #[test]
    fn multi_confirm_requires_a_selection() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        assert!(!b.can_confirm());
        assert_eq!(b.confirm(), None);
        assert!(!b.needs_init());

        b.click(row_of(&b, "b.txt"));
        b.click(row_of(&b, "d.txt"));
        let root = b.current_path().to_path_buf();
        assert_eq!(
            b.confirm(),
            Some(Confirmed::Multiple(vec![root.join("b.txt"), root.join("d.txt")]))
        );
        assert!(b.needs_init());
    }

    #[test]
    fn multi_activate_overrides_flags() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        b.set_all(true);
        let root = b.current_path().to_path_buf();
        let result = b.activate(row_of(&b, "c.zip")).unwrap();
        assert_eq!(result, Some(Confirmed::Single(root.join("c.zip"))));
    }

    #[test]
    fn click_toggles_in_multi_mode() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        let row = row_of(&b, "a.zip");
        b.click(row);
        assert_eq!(b.selected_count(), 1);
        b.click(row);
        assert_eq!(b.selected_count(), 0);
    }

    #[test]
    fn extend_selection_selects_between_anchor_and_cursor() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        // rows: .., sub/, a.zip, b.txt, ...
        b.move_cursor(2);
        b.extend_selection(2);
        assert_eq!(file_flags(&b), vec![true, true, true, false, false]);
        b.extend_selection(-1);
        assert_eq!(file_flags(&b), vec![true, true, false, false, false]);
    }

    #[test]
    fn extend_selection_skips_hidden_files() {
        let dir = TempDir::new().unwrap();
        for name in ["-a", ".secret", "b"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let mut b = FileBrowser::new(Policy::open_multi(), dir.path(), false, true);
        b.show().unwrap();
        let names: Vec<String> = b.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["..", "-a", "b"]);

        b.move_cursor(1);
        b.extend_selection(1);
        let chosen: Vec<String> = match b.confirm().unwrap() {
            Confirmed::Multiple(paths) => paths
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                .collect(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(chosen, vec!["-a", "b"]);
    }

    #[test]
    fn reopen_discards_selection() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        b.set_all(true);
        b.cancel();
        b.show().unwrap();
        assert_eq!(b.selected_count(), 0);
    }

    #[test]
    fn directory_activation_navigates_and_parent_goes_up() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        let root = b.current_path().to_path_buf();

        assert_eq!(b.activate(row_of(&b, "sub/")).unwrap(), None);
        assert_eq!(b.current_path(), root.join("sub"));
        assert!(b.can_go_back());

        b.activate(RowKind::Parent).unwrap();
        assert_eq!(b.current_path(), root);

        b.go_back().unwrap();
        assert_eq!(b.current_path(), root.join("sub"));
    }

    #[test]
    fn back_without_history_is_noop() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_multi(), &dir);
        let root = b.current_path().to_path_buf();
        assert!(!b.can_go_back());
        b.go_back().unwrap();
        assert_eq!(b.current_path(), root);
    }

    #[test]
    fn open_one_filters_and_chooses() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_one(&["zip"]), &dir);
        let names: Vec<String> = b.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["..", "sub/", "a.zip", "c.zip"]);

        assert!(!b.can_confirm());
        b.click(row_of(&b, "a.zip"));
        b.click(row_of(&b, "c.zip"));
        assert_eq!(b.selected_count(), 1);
        assert_eq!(b.footer_text(), "c.zip");

        let root = b.current_path().to_path_buf();
        assert_eq!(b.confirm(), Some(Confirmed::Single(root.join("c.zip"))));

        b.show().unwrap();
        b.toggle_filter();
        assert_eq!(b.rows().len(), 7);
    }

    #[test]
    fn open_one_click_on_directory_does_not_choose() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::open_one(&["zip"]), &dir);
        b.click(row_of(&b, "sub/"));
        assert!(!b.can_confirm());
    }

    #[test]
    fn save_multi_defaults_to_current_directory() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::save_multi(), &dir);
        let root = b.current_path().to_path_buf();
        assert_eq!(b.confirm(), Some(Confirmed::Single(root)));
    }

    #[test]
    fn save_multi_selects_directories_only() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::save_multi(), &dir);
        let root = b.current_path().to_path_buf();

        b.click(row_of(&b, "a.zip"));
        assert_eq!(b.selected_count(), 0);

        b.click(row_of(&b, "sub/"));
        assert_eq!(b.footer_text(), "sub");
        assert_eq!(b.activate(row_of(&b, "a.zip")).unwrap(), None);
        assert_eq!(b.confirm(), Some(Confirmed::Single(root.join("sub"))));
    }

    #[test]
    fn save_one_joins_directory_and_edited_name() {
        let dir = setup_test_dir();
        let mut b = FileBrowser::new(Policy::save_one("out.zip"), dir.path(), false, true);
        b.show().unwrap();
        let root = b.current_path().to_path_buf();

        b.activate(row_of(&b, "sub/")).unwrap();
        let input = b.filename_mut().unwrap();
        input.set("");
        assert!(!b.can_confirm());
        for c in "new.zip".chars() {
            b.filename_mut().unwrap().insert(c);
        }
        assert_eq!(
            b.confirm(),
            Some(Confirmed::Single(root.join("sub").join("new.zip")))
        );
    }

    #[test]
    fn save_one_uses_default_name_after_reinit() {
        let dir = setup_test_dir();
        let mut b = FileBrowser::new(Policy::save_one("x"), dir.path(), false, true);
        b.set_default_name("archive.csv");
        b.show().unwrap();
        assert_eq!(b.footer_text(), "archive.csv");
        b.filename_mut().unwrap().set("other.csv");
        b.cancel();
        b.show().unwrap();
        assert_eq!(b.footer_text(), "archive.csv");
    }

    #[test]
    fn selection_ops_ignored_outside_multi_mode() {
        let dir = setup_test_dir();
        let mut b = browser(Policy::save_multi(), &dir);
        b.set_all(true);
        b.set_range(0, 4, true);
        assert_eq!(b.selected_count(), 0);
    }

    #[test]
    fn start_dir_failure_propagates() {
        let dir = setup_test_dir();
        let mut b = FileBrowser::new(
            Policy::open_multi(),
            &dir.path().join("missing"),
            false,
            true,
        );
        assert!(b.show().is_err());
        assert!(b.needs_init());
    }
}
