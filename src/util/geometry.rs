// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the display geometry used for the window and for
//! resizing decoded frames, plus the aspect-preserving fit used when a
//! frame is drawn into the window.

use crate::error::SetupError;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size after a quarter turn.
    pub const fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Geometry policy for a whole run: either each clip's own size or one
/// override applied to every clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayGeometry {
    #[default]
    Native,
    Override(Size),
}

impl DisplayGeometry {
    /// Validate a caller-supplied override.
    pub fn with_override(width: u32, height: u32) -> Result<Self, SetupError> {
        if width == 0 || height == 0 {
            return Err(SetupError::Geometry { width, height });
        }
        Ok(Self::Override(Size::new(width, height)))
    }

    /// Target size for a clip with the given native size.
    pub fn resolve(self, native: Size) -> Size {
        match self {
            Self::Native => native,
            Self::Override(size) => size,
        }
    }
}

/// Fit content of `content` size into `available` space, centered.
///
/// Returns `(x_offset, y_offset, width, height)` in the units of `available`.
pub fn fit_centered(content: Size, available: (f32, f32)) -> (f32, f32, f32, f32) {
    let (avail_w, avail_h) = available;
    if avail_w <= 0.0 || avail_h <= 0.0 || content.pixel_count() == 0 {
        return (0.0, 0.0, 0.0, 0.0);
    }

    let content_aspect = content.aspect();
    let available_aspect = avail_w / avail_h;

    let (width, height) = if content_aspect > available_aspect {
        // Wider than the space - fit to width
        (avail_w, avail_w / content_aspect)
    } else {
        (avail_h * content_aspect, avail_h)
    };

    ((avail_w - width) / 2.0, (avail_h - height) / 2.0, width, height)
}
