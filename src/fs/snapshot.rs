use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::fs::collate;

/// One child of the enumerated directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    /// Display name (lossy UTF-8 of the final path component).
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// An entry paired with its selection flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub entry: Entry,
    pub selected: bool,
}

/// Which of the two parallel sequences an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Directories,
    Files,
}

/// A single-level listing of one directory.
///
/// Both sequences are always stored in ascending collation order. The
/// `ascending` and `show_hidden` toggles only change how the listing is
/// iterated, never what is stored.
#[derive(Debug, Default)]
pub struct DirSnapshot {
    current_path: PathBuf,
    previous_path: Option<PathBuf>,
    dir_entries: Vec<Selector>,
    file_entries: Vec<Selector>,
    dropped_count: usize,
    pub show_hidden: bool,
    pub ascending: bool,
}

impl DirSnapshot {
    pub fn new(show_hidden: bool, ascending: bool) -> Self {
        Self {
            show_hidden,
            ascending,
            ..Self::default()
        }
    }

    /// Enumerate `path` and replace the listing wholesale.
    ///
    /// On failure the previous listing and location are left untouched.
    pub fn open_dir(&mut self, path: &Path) -> Result<()> {
        let canonical = path.canonicalize().map_err(|source| AppError::Enumeration {
            path: path.to_path_buf(),
            source,
        })?;
        let (dirs, files, dropped) = enumerate(&canonical)?;

        tracing::debug!(
            path = %canonical.display(),
            dirs = dirs.len(),
            files = files.len(),
            dropped,
            "directory enumerated"
        );

        let old = mem::replace(&mut self.current_path, canonical);
        if !old.as_os_str().is_empty() {
            self.previous_path = Some(old);
        }
        self.dir_entries = dirs;
        self.file_entries = files;
        self.dropped_count = dropped;
        Ok(())
    }

    /// Re-enumerate the current directory. Like any other successful open it
    /// records the current directory as the previous one.
    pub fn refresh(&mut self) -> Result<()> {
        let path = self.current_path.clone();
        self.open_dir(&path)
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn previous_path(&self) -> Option<&Path> {
        self.previous_path.as_deref()
    }

    /// Whether the current directory has no parent ("Up" is disabled).
    pub fn is_root(&self) -> bool {
        self.current_path.parent().is_none()
    }

    /// Entries that were neither directories nor regular files.
    pub fn dropped_count(&self) -> usize {
        self.dropped_count
    }

    pub fn entries(&self, kind: ListKind) -> &[Selector] {
        match kind {
            ListKind::Directories => &self.dir_entries,
            ListKind::Files => &self.file_entries,
        }
    }

    pub fn entries_mut(&mut self, kind: ListKind) -> &mut [Selector] {
        match kind {
            ListKind::Directories => &mut self.dir_entries,
            ListKind::Files => &mut self.file_entries,
        }
    }

    /// Storage indices of `kind` in display order, honoring the view toggles.
    pub fn visible_indices(&self, kind: ListKind) -> Vec<usize> {
        let entries = self.entries(kind);
        let keep = |&i: &usize| self.show_hidden || !entries[i].entry.is_hidden();
        if self.ascending {
            (0..entries.len()).filter(keep).collect()
        } else {
            (0..entries.len()).rev().filter(keep).collect()
        }
    }
}

/// Read `dir` once, split into sorted directories and files, and count
/// the children that are neither (broken links, sockets, devices).
fn enumerate(dir: &Path) -> Result<(Vec<Selector>, Vec<Selector>, usize)> {
    let enum_err = |source| AppError::Enumeration {
        path: dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    let mut dropped = 0;

    for entry in fs::read_dir(dir).map_err(enum_err)? {
        let entry = entry.map_err(enum_err)?;
        let path = entry.path();
        // Follows symlinks; a dangling link has no metadata and is dropped.
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if metadata.is_dir() {
            dirs.push(Entry {
                path,
                name,
                is_dir: true,
            });
        } else if metadata.is_file() {
            files.push(Entry {
                path,
                name,
                is_dir: false,
            });
        } else {
            dropped += 1;
        }
    }

    Ok((sort_entries(dirs), sort_entries(files), dropped))
}

fn sort_entries(mut entries: Vec<Entry>) -> Vec<Selector> {
    entries.sort_by(|a, b| {
        let an = a.path.file_name().unwrap_or_default();
        let bn = b.path.file_name().unwrap_or_default();
        collate::compare_bytes(an.as_encoded_bytes(), bn.as_encoded_bytes())
    });
    entries
        .into_iter()
        .map(|entry| Selector {
            entry,
            selected: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("Alpha")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("B.txt")).unwrap();
        File::create(dir.path().join("10.bin")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        dir
    }

    fn names(snapshot: &DirSnapshot, kind: ListKind) -> Vec<String> {
        snapshot
            .visible_indices(kind)
            .into_iter()
            .map(|i| snapshot.entries(kind)[i].entry.name.clone())
            .collect()
    }

    #[test]
    fn partitions_and_sorts() {
        let dir = setup_test_dir();
        let mut snapshot = DirSnapshot::new(true, true);
        snapshot.open_dir(dir.path()).unwrap();

        assert_eq!(names(&snapshot, ListKind::Directories), vec![".git", "Alpha", "beta"]);
        assert_eq!(
            names(&snapshot, ListKind::Files),
            vec![".hidden", "10.bin", "B.txt", "b.txt"]
        );
        assert!(snapshot
            .entries(ListKind::Files)
            .iter()
            .all(|s| !s.selected && !s.entry.is_dir));
    }

    #[test]
    fn counts_cover_every_child() {
        let dir = setup_test_dir();
        let mut snapshot = DirSnapshot::new(true, true);
        snapshot.open_dir(dir.path()).unwrap();

        let total = fs::read_dir(dir.path()).unwrap().count();
        let listed = snapshot.entries(ListKind::Directories).len()
            + snapshot.entries(ListKind::Files).len();
        assert_eq!(listed + snapshot.dropped_count(), total);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_dropped() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("beta"), dir.path().join("link_dir"))
            .unwrap();

        let mut snapshot = DirSnapshot::new(true, true);
        snapshot.open_dir(dir.path()).unwrap();

        assert_eq!(snapshot.dropped_count(), 1);
        assert!(names(&snapshot, ListKind::Directories).contains(&"link_dir".to_string()));
        let total = fs::read_dir(dir.path()).unwrap().count();
        let listed = snapshot.entries(ListKind::Directories).len()
            + snapshot.entries(ListKind::Files).len();
        assert_eq!(listed + snapshot.dropped_count(), total);
    }

    #[test]
    fn hidden_filter_is_applied_at_iteration() {
        let dir = setup_test_dir();
        let mut snapshot = DirSnapshot::new(false, true);
        snapshot.open_dir(dir.path()).unwrap();

        assert_eq!(names(&snapshot, ListKind::Directories), vec!["Alpha", "beta"]);
        // Still stored.
        assert_eq!(snapshot.entries(ListKind::Directories).len(), 3);

        snapshot.show_hidden = true;
        assert_eq!(names(&snapshot, ListKind::Directories).len(), 3);
    }

    #[test]
    fn descending_is_exact_reverse() {
        let dir = setup_test_dir();
        let mut snapshot = DirSnapshot::new(true, true);
        snapshot.open_dir(dir.path()).unwrap();
        let mut forward = names(&snapshot, ListKind::Files);

        snapshot.ascending = false;
        let backward = names(&snapshot, ListKind::Files);
        forward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn enumeration_error_propagates_and_keeps_listing() {
        let dir = setup_test_dir();
        let mut snapshot = DirSnapshot::new(true, true);
        snapshot.open_dir(dir.path()).unwrap();
        let before = snapshot.current_path().to_path_buf();

        let err = snapshot.open_dir(&dir.path().join("does_not_exist")).unwrap_err();
        assert!(matches!(err, AppError::Enumeration { .. }));
        assert_eq!(snapshot.current_path(), before);
        assert_eq!(snapshot.entries(ListKind::Directories).len(), 3);
    }

    #[test]
    fn opening_a_file_is_an_enumeration_error() {
        let dir = setup_test_dir();
        let mut snapshot = DirSnapshot::new(true, true);
        let err = snapshot.open_dir(&dir.path().join("b.txt")).unwrap_err();
        assert!(matches!(err, AppError::Enumeration { .. }));
    }

    #[test]
    fn previous_path_is_single_level() {
        let dir = setup_test_dir();
        let root = dir.path().canonicalize().unwrap();
        let mut snapshot = DirSnapshot::new(true, true);
        assert!(snapshot.previous_path().is_none());

        snapshot.open_dir(&root).unwrap();
        assert!(snapshot.previous_path().is_none());

        snapshot.open_dir(&root.join("Alpha")).unwrap();
        assert_eq!(snapshot.previous_path(), Some(root.as_path()));

        snapshot.open_dir(&root.join("beta")).unwrap();
        assert_eq!(snapshot.previous_path(), Some(root.join("Alpha").as_path()));
    }

    #[test]
    fn refresh_records_current_as_previous_and_picks_up_changes() {
        let dir = setup_test_dir();
        let root = dir.path().canonicalize().unwrap();
        let mut snapshot = DirSnapshot::new(true, true);
        snapshot.open_dir(&root.join("Alpha")).unwrap();
        snapshot.open_dir(&root).unwrap();

        File::create(root.join("new.txt")).unwrap();
        snapshot.refresh().unwrap();
        assert_eq!(snapshot.current_path(), root.as_path());
        assert_eq!(snapshot.previous_path(), Some(root.as_path()));
        assert!(names(&snapshot, ListKind::Files).contains(&"new.txt".to_string()));
    }

    #[test]
    fn filesystem_root_has_no_parent() {
        let mut snapshot = DirSnapshot::new(false, true);
        let root = std::env::temp_dir()
            .canonicalize()
            .unwrap()
            .ancestors()
            .last()
            .unwrap()
            .to_path_buf();
        snapshot.open_dir(&root).unwrap();
        assert!(snapshot.is_root());
    }
}
