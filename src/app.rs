// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the [`Annotator`] and advances it by one tick whenever a
//! frame is due at the clip frame rate. Repaints in between only collect
//! input. When the run ends it records the result for `main` and closes the
//! window.

use crate::error::SinkError;
use crate::models::clip::{clip_identifier, ClipIdentifier};
use crate::session::{Annotator, RunOutcome, RunSummary, Tick};
use crate::ui::{canvas, surface, toolbar};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Where the app leaves the outcome of the run.
pub type RunResult = Rc<RefCell<Option<Result<RunSummary, SinkError>>>>;

/// Main application state.
pub struct LabelerApp {
    annotator: Annotator,
    surface: surface::SurfaceState,
    legend: String,
    result: RunResult,
    /// When the last frame was shown; `None` makes the next repaint tick.
    last_tick: Option<Instant>,
}

impl LabelerApp {
    pub fn new(annotator: Annotator, result: RunResult) -> Self {
        let legend = annotator.label_map().legend();
        Self {
            annotator,
            surface: surface::SurfaceState::default(),
            legend,
            result,
            last_tick: None,
        }
    }

    /// Tick the annotator if a frame is due at `now`, or if the window is
    /// closing. Returns the tick, or `None` when this repaint only queued input.
    fn advance(&mut self, ctx: &egui::Context, now: Instant) -> Option<Tick> {
        self.surface.collect_input(ctx);
        let closing = self.surface.quit_pending();

        if let Some(last) = self.last_tick {
            let elapsed = now.saturating_duration_since(last);
            let interval = self.annotator.frame_interval();
            if elapsed < interval && !closing {
                ctx.request_repaint_after(interval - elapsed);
                return None;
            }
        }
        self.last_tick = Some(now);

        let mut surface = surface::EguiSurface::new(ctx, &mut self.surface);
        let tick = match self.annotator.tick(&mut surface) {
            Ok(tick) => tick,
            Err(e) => {
                log::error!("{}", e);
                *self.result.borrow_mut() = Some(Err(e));
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return None;
            }
        };

        // A key queued ahead of the close request may have labeled the clip;
        // the window is still going away
        let tick = if closing && !self.annotator.is_finished() {
            Tick::Finished(self.annotator.abort())
        } else {
            tick
        };

        match &tick {
            Tick::Frame { clip, frame } => {
                log::trace!("clip {} frame {}", clip + 1, frame);
                ctx.request_repaint_after(self.annotator.frame_interval());
            }
            Tick::Labeled { clip, label } => {
                log::debug!("clip {} done with label {}", clip + 1, label);
                self.last_tick = None;
                ctx.request_repaint();
            }
            Tick::Skipped { clip } => {
                log::debug!("clip {} skipped, loading the next one", clip + 1);
                self.last_tick = None;
                ctx.request_repaint();
            }
            Tick::Finished(summary) => {
                if summary.outcome == RunOutcome::Completed {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                *self.result.borrow_mut() = Some(Ok(summary.clone()));
            }
        }
        Some(tick)
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.annotator.is_finished() {
            self.advance(ctx, Instant::now());
        }

        let clip_name = self
            .annotator
            .current_clip()
            .map(|path| clip_identifier(path, ClipIdentifier::FileName));

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            toolbar::show(
                ui,
                self.annotator.progress(),
                clip_name.as_deref(),
                &self.legend,
            );
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                canvas::show(ui, self.surface.texture.as_ref(), self.surface.frame_size);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::{LabelMap, LabelValue};
    use crate::session::testing::{frames, labels_in, Harness};
    use crate::session::DEFAULT_FRAME_INTERVAL;
    use std::time::Duration;

    fn key_press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Run one egui pass that advances the app at `now`.
    fn repaint(
        app: &mut LabelerApp,
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        now: Instant,
    ) -> Option<Tick> {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let mut tick = None;
        let _ = ctx.run(input, |ctx| tick = app.advance(ctx, now));
        tick
    }

    #[test]
    fn test_early_repaint_does_not_advance() {
        let Harness { dir, annotator, .. } = Harness::new(
            &[("a.mp4", frames(3)), ("b.mp4", frames(3))],
            LabelMap::binary(),
        );
        let result = RunResult::default();
        let mut app = LabelerApp::new(annotator, result.clone());
        let ctx = egui::Context::default();
        let t0 = Instant::now();

        assert_eq!(
            repaint(&mut app, &ctx, Vec::new(), t0),
            Some(Tick::Frame { clip: 0, frame: 0 })
        );

        // Pointer motion or a resize repaints before the next frame is due
        let early = t0 + Duration::from_millis(1);
        assert_eq!(repaint(&mut app, &ctx, Vec::new(), early), None);
        assert_eq!(repaint(&mut app, &ctx, vec![key_press(egui::Key::ArrowLeft)], early), None);
        assert_eq!(labels_in(&dir), "");

        // The key pressed between frames is handled on the next tick
        let due = t0 + DEFAULT_FRAME_INTERVAL;
        assert_eq!(
            repaint(&mut app, &ctx, Vec::new(), due),
            Some(Tick::Labeled {
                clip: 0,
                label: LabelValue::Int(1)
            })
        );
        assert_eq!(labels_in(&dir), "a.mp4: 1\n");

        // The next clip starts without waiting out an interval
        assert_eq!(
            repaint(&mut app, &ctx, Vec::new(), due),
            Some(Tick::Frame { clip: 1, frame: 0 })
        );
        assert!(result.borrow().is_none());
    }

    #[test]
    fn test_run_result_recorded_when_done() {
        let Harness { dir, annotator, .. } =
            Harness::new(&[("a.mp4", frames(2))], LabelMap::binary());
        let result = RunResult::default();
        let mut app = LabelerApp::new(annotator, result.clone());
        let ctx = egui::Context::default();
        let t0 = Instant::now();

        repaint(&mut app, &ctx, vec![key_press(egui::Key::ArrowRight)], t0);
        let done = repaint(&mut app, &ctx, Vec::new(), t0);

        assert!(matches!(done, Some(Tick::Finished(_))));
        assert!(app.annotator.is_finished());
        let summary = result.borrow_mut().take().unwrap().unwrap();
        assert_eq!((summary.total, summary.labeled), (1, 1));
        assert_eq!(labels_in(&dir), "a.mp4: 0\n");
    }
}
