// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! egui-backed display surface.
//!
//! egui repaints more often than frames are due (pointer motion, resizes),
//! so input is collected on every repaint and held in [`SurfaceState`]
//! until the next tick drains it. Frames are uploaded into a single texture
//! that the canvas draws.

use super::toolbar;
use crate::io::media::Frame;
use crate::models::label::Key;
use crate::session::{DisplaySurface, InputEvent};
use crate::util::geometry::Size;

/// Texture and queued input that outlive a single repaint.
#[derive(Default)]
pub struct SurfaceState {
    pub texture: Option<egui::TextureHandle>,
    pub frame_size: Option<Size>,
    pending: Vec<InputEvent>,
}

impl SurfaceState {
    /// Queue the input of the current repaint for the next tick.
    pub fn collect_input(&mut self, ctx: &egui::Context) {
        ctx.input(|input| {
            for event in &input.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } = event
                {
                    if let Some(key) = map_key(*key) {
                        self.pending.push(InputEvent::KeyDown(key));
                    }
                }
            }

            if input.viewport().close_requested() {
                self.pending.push(InputEvent::Quit);
            }
        });
    }

    /// Whether a close request is waiting to be handled.
    pub fn quit_pending(&self) -> bool {
        self.pending.contains(&InputEvent::Quit)
    }
}

/// Borrowed view of the window for one repaint.
pub struct EguiSurface<'a> {
    ctx: &'a egui::Context,
    state: &'a mut SurfaceState,
}

impl<'a> EguiSurface<'a> {
    pub fn new(ctx: &'a egui::Context, state: &'a mut SurfaceState) -> Self {
        Self { ctx, state }
    }
}

impl DisplaySurface for EguiSurface<'_> {
    fn ensure_size(&mut self, size: Size) {
        log::debug!("resizing window to {}", size);
        self.ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
            size.width as f32,
            size.height as f32 + toolbar::HEIGHT,
        )));
    }

    fn present(&mut self, frame: &Frame) {
        let size = frame.size();
        let image = egui::ColorImage::from_rgb(
            [size.width as usize, size.height as usize],
            frame.as_bytes(),
        );

        match &mut self.state.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.state.texture = Some(self.ctx.load_texture(
                    "clip_frame",
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
        self.state.frame_size = Some(size);
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.state.pending)
    }
}

/// Translate an egui key into a bindable key.
pub fn map_key(key: egui::Key) -> Option<Key> {
    use egui::Key as K;

    let mapped = match key {
        K::ArrowUp => Key::Up,
        K::ArrowDown => Key::Down,
        K::ArrowLeft => Key::Left,
        K::ArrowRight => Key::Right,
        K::Space => Key::Space,
        K::Enter => Key::Enter,
        K::Num0 => Key::Digit(0),
        K::Num1 => Key::Digit(1),
        K::Num2 => Key::Digit(2),
        K::Num3 => Key::Digit(3),
        K::Num4 => Key::Digit(4),
        K::Num5 => Key::Digit(5),
        K::Num6 => Key::Digit(6),
        K::Num7 => Key::Digit(7),
        K::Num8 => Key::Digit(8),
        K::Num9 => Key::Digit(9),
        K::A => Key::Letter('a'),
        K::B => Key::Letter('b'),
        K::C => Key::Letter('c'),
        K::D => Key::Letter('d'),
        K::E => Key::Letter('e'),
        K::F => Key::Letter('f'),
        K::G => Key::Letter('g'),
        K::H => Key::Letter('h'),
        K::I => Key::Letter('i'),
        K::J => Key::Letter('j'),
        K::K => Key::Letter('k'),
        K::L => Key::Letter('l'),
        K::M => Key::Letter('m'),
        K::N => Key::Letter('n'),
        K::O => Key::Letter('o'),
        K::P => Key::Letter('p'),
        K::Q => Key::Letter('q'),
        K::R => Key::Letter('r'),
        K::S => Key::Letter('s'),
        K::T => Key::Letter('t'),
        K::U => Key::Letter('u'),
        K::V => Key::Letter('v'),
        K::W => Key::Letter('w'),
        K::X => Key::Letter('x'),
        K::Y => Key::Letter('y'),
        K::Z => Key::Letter('z'),
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_arrows_and_digits() {
        assert_eq!(map_key(egui::Key::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(egui::Key::Num7), Some(Key::Digit(7)));
        assert_eq!(map_key(egui::Key::Q), Some(Key::Letter('q')));
        assert_eq!(map_key(egui::Key::F5), None);
    }

    fn key_event(key: egui::Key, pressed: bool, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn repaint(ctx: &egui::Context, state: &mut SurfaceState, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| state.collect_input(ctx));
    }

    #[test]
    fn test_input_queued_across_repaints() {
        let ctx = egui::Context::default();
        let mut state = SurfaceState::default();

        repaint(
            &ctx,
            &mut state,
            vec![
                key_event(egui::Key::ArrowLeft, true, false),
                key_event(egui::Key::ArrowLeft, true, true),
                key_event(egui::Key::ArrowLeft, false, false),
                key_event(egui::Key::F5, true, false),
            ],
        );
        repaint(&ctx, &mut state, Vec::new());
        repaint(&ctx, &mut state, vec![key_event(egui::Key::Num2, true, false)]);

        assert!(!state.quit_pending());
        let mut surface = EguiSurface::new(&ctx, &mut state);
        assert_eq!(
            surface.poll_events(),
            vec![InputEvent::KeyDown(Key::Left), InputEvent::KeyDown(Key::Digit(2))]
        );
        assert!(surface.poll_events().is_empty());
    }
}
