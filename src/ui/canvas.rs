// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clip display area.
//!
//! Draws the most recently presented frame, scaled to fit and centered.

use crate::util::geometry::{fit_centered, Size};

/// Display the current frame, or a placeholder before the first one.
pub fn show(ui: &mut egui::Ui, texture: Option<&egui::TextureHandle>, frame_size: Option<Size>) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::BLACK;

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        match (texture, frame_size) {
            (Some(texture), Some(size)) => {
                let available = ui.available_size();
                let (x_offset, y_offset, width, height) =
                    fit_centered(size, (available.x, available.y));

                let image_rect = egui::Rect::from_min_size(
                    ui.min_rect().min + egui::vec2(x_offset, y_offset),
                    egui::vec2(width, height),
                );

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Loading clip...")
                            .size(16.0)
                            .color(egui::Color32::from_gray(200)),
                    );
                });
            }
        }
    });
}
