// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Append-only label file.
//!
//! One `<clip>: <label>` line per committed clip, flushed as soon as it is
//! written so an abort on the next frame never loses it.

use crate::error::{SetupError, SinkError};
use crate::models::label::LabelValue;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct LabelSink {
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
}

impl LabelSink {
    /// Create or truncate the label file.
    pub fn create(path: &Path) -> Result<Self, SetupError> {
        let file = File::create(path).map_err(|source| SetupError::LabelFile {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("writing labels to {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    /// Append and flush one record.
    pub fn commit(&mut self, clip: &str, label: &LabelValue) -> Result<(), SinkError> {
        writeln!(self.writer, "{}: {}", clip, label)
            .and_then(|()| self.writer.flush())
            .map_err(|source| SinkError {
                path: self.path.clone(),
                clip: clip.to_string(),
                source,
            })?;
        self.records += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush and release the file.
    pub fn close(mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|source| SinkError {
            path: self.path.clone(),
            clip: String::new(),
            source,
        })
    }
}
