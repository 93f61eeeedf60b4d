// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types.
//!
//! Setup errors abort the run before anything is written. Media errors are
//! scoped to a single clip and are absorbed by the annotation loop, which
//! skips the clip and moves on. Sink errors mean a label could not be
//! persisted and end the run.

use crate::models::label::Key;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems detected before the first clip is shown.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("cannot read clip directory {}: {source}", .path.display())]
    ClipDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create label file {}: {source}", .path.display())]
    LabelFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid label map {}: {reason}", .path.display())]
    LabelMap { path: PathBuf, reason: String },

    #[error("invalid bindings in {}: {source}", .path.display())]
    LabelBindings {
        path: PathBuf,
        #[source]
        source: LabelMapError,
    },

    #[error("invalid display geometry {width}x{height}: both sides must be positive")]
    Geometry { width: u32, height: u32 },

    #[error("no clip directory selected")]
    NoClipDirectory,

    #[error("no video backend compiled in; rebuild with `--features video-opencv`")]
    NoVideoBackend,
}

/// A key-to-label table that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelMapError {
    #[error("label map has no bindings")]
    Empty,

    #[error("key '{0}' is bound more than once")]
    DuplicateKey(Key),
}

/// Recoverable per-clip decoding failures.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("cannot open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("cannot read frame {frame}: {reason}")]
    Read { frame: u64, reason: String },
}

/// A committed label could not be written to disk.
#[derive(Error, Debug)]
#[error("cannot write label for {clip} to {}: {source}", .path.display())]
pub struct SinkError {
    pub path: PathBuf,
    pub clip: String,
    #[source]
    pub source: std::io::Error,
}
