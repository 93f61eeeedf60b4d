// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label map deserialization.
//!
//! This module loads custom key-to-label tables from YAML or JSON files.
//! Parsing and validation are separate steps, so a table that parses but
//! binds a key twice is reported with its [`LabelMapError`] as the source.
//!
//! [`LabelMapError`]: crate::error::LabelMapError

use crate::error::SetupError;
use crate::models::label::{LabelMap, LabelMapFile};
use anyhow::Result;
use std::path::Path;

/// Import label map bindings from YAML format.
pub fn import_yaml(path: &Path) -> Result<LabelMapFile> {
    let yaml = std::fs::read_to_string(path)?;
    let file = serde_yaml::from_str(&yaml)?;
    Ok(file)
}

/// Import label map bindings from JSON format.
pub fn import_json(path: &Path) -> Result<LabelMapFile> {
    let json = std::fs::read_to_string(path)?;
    let file = serde_json::from_str(&json)?;
    Ok(file)
}

/// Import a label map, choosing the format from the file extension.
pub fn import_label_map(path: &Path) -> Result<LabelMap, SetupError> {
    let extension = path.extension().and_then(|s| s.to_str());
    let result = match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => {
            return Err(SetupError::LabelMap {
                path: path.to_path_buf(),
                reason: format!("unsupported file extension: {:?}", extension),
            })
        }
    };

    let file = result.map_err(|e| SetupError::LabelMap {
        path: path.to_path_buf(),
        reason: format!("{:#}", e),
    })?;

    LabelMap::try_from(file).map_err(|source| SetupError::LabelBindings {
        path: path.to_path_buf(),
        source,
    })
}
