// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line interface.

use crate::error::SetupError;
use crate::io::serialization::import_label_map;
use crate::models::clip::ClipIdentifier;
use crate::models::config::{default_label_file, RunConfig};
use crate::models::label::LabelMap;
use crate::util::geometry::DisplayGeometry;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cliplabel")]
#[command(about = "Play video clips one by one and label each with a single key press")]
#[command(version)]
pub struct Cli {
    /// Directory of .mp4/.avi clips (a folder picker opens when omitted)
    #[arg(long, alias = "video_folder")]
    pub video_folder: Option<PathBuf>,

    /// Directory the label file is written to
    #[arg(long, alias = "label_path", default_value = ".")]
    pub label_path: PathBuf,

    /// Label file suffix, giving <folder>_<SUFFIX>.txt [default: label]
    #[arg(long, alias = "label_filename")]
    pub label_filename: Option<String>,

    /// Exact label file path (overrides --label-path and --label-filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show and resize every clip at this size
    #[arg(long, alias = "video_size", num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub video_size: Option<Vec<u32>>,

    /// Built-in key bindings
    #[arg(long, value_enum, default_value_t = Vocabulary::Binary)]
    pub labels: Vocabulary,

    /// YAML or JSON key bindings (overrides --labels)
    #[arg(long)]
    pub label_map: Option<PathBuf>,

    /// Write clip file names instead of paths
    #[arg(long)]
    pub name_only: bool,
}

/// Built-in label vocabularies.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    /// left = 1 (good case), right = 0 (bad case)
    Binary,
    /// arrow keys = Label_Up / Label_Down / Label_Left / Label_Right
    Directional,
}

impl Cli {
    /// Validate arguments into a run configuration. `pick_folder` is asked
    /// for the clip directory when none was given.
    pub fn resolve(
        self,
        pick_folder: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<RunConfig, SetupError> {
        let clip_dir = match self.video_folder {
            Some(dir) => dir,
            None => pick_folder().ok_or(SetupError::NoClipDirectory)?,
        };

        let label_file = match self.output {
            Some(path) => path,
            None => default_label_file(
                &clip_dir,
                &self.label_path,
                self.label_filename.as_deref(),
            ),
        };

        let geometry = match self.video_size.as_deref() {
            Some(&[width, height]) => DisplayGeometry::with_override(width, height)?,
            _ => DisplayGeometry::Native,
        };

        let label_map = match &self.label_map {
            Some(path) => import_label_map(path)?,
            None => match self.labels {
                Vocabulary::Binary => LabelMap::binary(),
                Vocabulary::Directional => LabelMap::directional(),
            },
        };

        let identifier = if self.name_only {
            ClipIdentifier::FileName
        } else {
            ClipIdentifier::Path
        };

        Ok(RunConfig {
            clip_dir,
            label_file,
            geometry,
            label_map,
            identifier,
        })
    }
}
