// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resolved run configuration.
//!
//! This is what the annotation loop is built from once command line
//! arguments have been validated.

use super::clip::ClipIdentifier;
use super::label::LabelMap;
use crate::util::geometry::DisplayGeometry;
use std::path::{Path, PathBuf};

/// Suffix used for the label file when none is given.
pub const DEFAULT_LABEL_SUFFIX: &str = "label";

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub clip_dir: PathBuf,
    pub label_file: PathBuf,
    pub geometry: DisplayGeometry,
    pub label_map: LabelMap,
    pub identifier: ClipIdentifier,
}

/// `<label_dir>/<clip dir base name>_<suffix>.txt`.
pub fn default_label_file(clip_dir: &Path, label_dir: &Path, suffix: Option<&str>) -> PathBuf {
    let base = dir_base_name(clip_dir);
    let suffix = suffix.unwrap_or(DEFAULT_LABEL_SUFFIX);
    label_dir.join(format!("{}_{}.txt", base, suffix))
}

/// Base name of a directory, tolerating trailing separators and `.`.
fn dir_base_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }
    dir.canonicalize()
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "clips".to_string())
}
