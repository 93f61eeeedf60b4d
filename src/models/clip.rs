// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clip discovery.
//!
//! A run works through the video files of one directory in lexicographic
//! file-name order, so the same directory always yields the same sequence.

use crate::error::SetupError;
use std::path::{Path, PathBuf};

/// Container extensions treated as clips (ASCII case-insensitive).
pub const CLIP_EXTENSIONS: [&str; 2] = ["mp4", "avi"];

/// How a clip is named in the label file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipIdentifier {
    /// Clip file name joined onto the clip directory as given.
    #[default]
    Path,
    /// Bare file name.
    FileName,
}

/// Ordered clips of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipSet {
    clips: Vec<PathBuf>,
}

impl ClipSet {
    /// List recognized clips in `dir`, sorted by file name.
    pub fn discover(dir: &Path) -> Result<Self, SetupError> {
        let dir_err = |source| SetupError::ClipDirectory {
            path: dir.to_path_buf(),
            source,
        };

        let mut clips = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(dir_err)? {
            let entry = entry.map_err(dir_err)?;
            let path = dir.join(entry.file_name());
            if is_clip(&path) && path.is_file() {
                clips.push(path);
            }
        }

        log::debug!("found {} clips in {}", clips.len(), dir.display());
        Ok(Self::from_paths(clips))
    }

    /// Build a set from explicit paths, applying the same ordering.
    pub fn from_paths(mut clips: Vec<PathBuf>) -> Self {
        clips.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
        Self { clips }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.clips.get(index).map(PathBuf::as_path)
    }
}

/// Whether `path` has a recognized clip extension.
pub fn is_clip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CLIP_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Clip name as written to the label file.
pub fn clip_identifier(path: &Path, style: ClipIdentifier) -> String {
    match style {
        ClipIdentifier::Path => path.display().to_string(),
        ClipIdentifier::FileName => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["c.avi", "a.mp4", "notes.txt", "b.MP4", "d.mkv"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let clips = ClipSet::discover(dir.path()).unwrap();
        let names: Vec<_> = (0..clips.len())
            .filter_map(|i| clips.get(i))
            .map(|p| clip_identifier(p, ClipIdentifier::FileName))
            .collect();

        assert_eq!(names, vec!["a.mp4", "b.MP4", "c.avi"]);
    }

    #[test]
    fn test_discover_is_stable() {
        let dir = tempdir().unwrap();
        for name in ["z.mp4", "m.avi", "a.avi"] {
            touch(dir.path(), name);
        }
        let first = ClipSet::discover(dir.path()).unwrap();
        let second = ClipSet::discover(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            ClipSet::discover(&missing),
            Err(SetupError::ClipDirectory { .. })
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(ClipSet::discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_identifier_styles() {
        let path = Path::new("clips").join("a.mp4");
        assert_eq!(clip_identifier(&path, ClipIdentifier::FileName), "a.mp4");
        assert_eq!(
            clip_identifier(&path, ClipIdentifier::Path),
            path.display().to_string()
        );
    }
}
