use std::path::{Path, PathBuf};

use crate::input::TextInput;

/// Selection discipline of a [`FileBrowser`](super::FileBrowser).
///
/// The set is closed: each variant carries only the state its click and
/// confirm semantics need.
#[derive(Debug, Clone)]
pub enum Policy {
    /// Pick one existing file.
    OpenOne {
        chosen: Option<PathBuf>,
        /// Whether only files with an accepted extension are listed.
        filter: bool,
        /// Lowercase extensions without the dot.
        extensions: Vec<String>,
    },
    /// Pick any number of existing files.
    OpenMulti,
    /// Pick a destination directory.
    SaveMulti {
        selected: PathBuf,
        /// Name of `selected`, mirrored for display.
        display: String,
    },
    /// Pick a destination file path: current directory + edited name.
    SaveOne {
        filename: TextInput,
        default_name: String,
    },
}

impl Policy {
    pub fn open_one(extensions: &[&str]) -> Self {
        Policy::OpenOne {
            chosen: None,
            filter: !extensions.is_empty(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn open_multi() -> Self {
        Policy::OpenMulti
    }

    pub fn save_multi() -> Self {
        Policy::SaveMulti {
            selected: PathBuf::new(),
            display: String::new(),
        }
    }

    pub fn save_one(default_name: &str) -> Self {
        Policy::SaveOne {
            filename: TextInput::new(default_name),
            default_name: default_name.to_string(),
        }
    }

    /// Drop everything chosen so far, as when the popup is reopened.
    pub(super) fn reset(&mut self) {
        match self {
            Policy::OpenOne { chosen, .. } => *chosen = None,
            Policy::OpenMulti => {}
            Policy::SaveMulti { selected, display } => {
                *selected = PathBuf::new();
                display.clear();
            }
            Policy::SaveOne {
                filename,
                default_name,
            } => filename.set(default_name),
        }
    }

    /// Hook run after every successful directory change.
    pub(super) fn on_open_dir(&mut self, current: &Path) {
        match self {
            Policy::OpenOne { chosen, .. } => *chosen = None,
            Policy::OpenMulti => {}
            Policy::SaveMulti { selected, display } => {
                *selected = current.to_path_buf();
                *display = current
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| current.to_string_lossy().to_string());
            }
            Policy::SaveOne {
                filename,
                default_name,
            } => {
                if filename.is_empty() {
                    filename.set(default_name);
                }
            }
        }
    }

    /// Whether the file at `path` is listed under this policy.
    pub(super) fn lists_file(&self, path: &Path) -> bool {
        match self {
            Policy::OpenOne {
                filter: true,
                extensions,
                ..
            } => path
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    extensions.iter().any(|e| *e == ext)
                })
                .unwrap_or(false),
            _ => true,
        }
    }
}
