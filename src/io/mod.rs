// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for clips, label maps and the label file.

pub mod label_sink;
pub mod media;
#[cfg(feature = "video-opencv")]
pub mod video;
pub mod serialization;
