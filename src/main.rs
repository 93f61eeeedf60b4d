// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! cliplabel - keyboard-driven video clip labeling
//!
//! Plays every clip of a folder in a loop until a bound key is pressed,
//! then appends `<clip>: <label>` to a text file and moves to the next clip.

mod app;
mod cli;
mod error;
mod io;
mod models;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::{LabelerApp, RunResult};
use clap::Parser;
use cli::Cli;
use io::label_sink::LabelSink;
use io::media;
use models::clip::ClipSet;
use session::Annotator;

const WINDOW_TITLE: &str = "Video Labeling Tool";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().resolve(|| {
        rfd::FileDialog::new()
            .set_title("Select clip folder")
            .pick_folder()
    })?;

    // Everything that can fail the run is checked before the label file exists
    let backend = media::default_backend()?;
    let clips = ClipSet::discover(&config.clip_dir)?;
    let sink = LabelSink::create(&config.label_file)?;

    log::info!("label keys: {}", config.label_map.legend());

    if clips.is_empty() {
        log::info!(
            "no clips in {}, wrote empty {}",
            config.clip_dir.display(),
            sink.path().display()
        );
        sink.close()?;
        return Ok(());
    }

    let annotator = Annotator::new(clips, config.label_map, backend, sink)
        .with_geometry(config.geometry)
        .with_identifier(config.identifier);

    let result = RunResult::default();
    let app_result = result.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "cliplabel",
        options,
        Box::new(move |_cc| Ok(Box::new(LabelerApp::new(annotator, app_result)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    let outcome = result.borrow_mut().take();
    match outcome {
        Some(Err(e)) => Err(e.into()),
        Some(Ok(_)) => Ok(()),
        None => {
            log::info!("window closed, labels written so far are kept");
            Ok(())
        }
    }
}
