// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status bar.
//!
//! Shows how far the run has progressed, which clip is on screen, and the
//! keys that commit a label.

/// Height reserved above the clip when sizing the window.
pub const HEIGHT: f32 = 24.0;

/// Display the status bar.
pub fn show(ui: &mut egui::Ui, progress: (usize, usize), clip_name: Option<&str>, legend: &str) {
    ui.set_height(HEIGHT);
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let (position, total) = progress;
        ui.label(format!("Clip {}/{}", position, total));

        if let Some(name) = clip_name {
            ui.separator();
            ui.label(egui::RichText::new(name).monospace());
        }

        ui.separator();
        ui.label(egui::RichText::new(legend).italics().weak());
    });
}
