// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module defines the decoder seam used by the annotation loop: a
//! [`MediaBackend`] opens clips and hands back a [`FrameSource`] that yields
//! decoded frames in order. The concrete decoder lives behind a cargo
//! feature so the rest of the crate builds and tests without it.

use crate::error::{MediaError, SetupError};
use crate::util::geometry::Size;
use image::RgbImage;
use std::path::Path;

/// Byte order of the three color channels in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Bgr,
    Rgb,
}

/// One decoded frame, 8 bits per channel, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub order: ChannelOrder,
    pub image: RgbImage,
}

impl Frame {
    /// Wrap a packed 3-channel buffer. Returns `None` when the buffer length
    /// does not match the size.
    pub fn from_raw(size: Size, order: ChannelOrder, pixels: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(size.width, size.height, pixels).map(|image| Self { order, image })
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// Packed pixel bytes in `order`.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Result of asking a source for its next frame.
#[derive(Debug)]
pub enum ReadOutcome {
    Frame(Frame),
    EndOfStream,
}

/// An opened clip.
pub trait FrameSource {
    /// Declared number of frames. May be zero or inaccurate; the loop also
    /// honours [`ReadOutcome::EndOfStream`].
    fn frame_count(&self) -> u64;

    /// Size of decoded frames before any resize.
    fn native_size(&self) -> Size;

    /// Nominal frame rate, when the container declares one.
    fn frame_rate(&self) -> Option<f64> {
        None
    }

    /// Decode the next frame.
    fn read_next(&mut self) -> Result<ReadOutcome, MediaError>;

    /// Seek back to the first frame.
    fn rewind(&mut self) -> Result<(), MediaError>;

    /// Release decoder resources. Safe to call more than once.
    fn close(&mut self);
}

/// Opens clips for playback.
pub trait MediaBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError>;
}

/// The decoder compiled into this build.
#[cfg(feature = "video-opencv")]
pub fn default_backend() -> Result<Box<dyn MediaBackend>, SetupError> {
    Ok(Box::new(super::video::OpenCvBackend))
}

/// The decoder compiled into this build.
#[cfg(not(feature = "video-opencv"))]
pub fn default_backend() -> Result<Box<dyn MediaBackend>, SetupError> {
    Err(SetupError::NoVideoBackend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        let size = Size::new(2, 2);
        assert!(Frame::from_raw(size, ChannelOrder::Bgr, vec![0; 12]).is_some());
        assert!(Frame::from_raw(size, ChannelOrder::Bgr, vec![0; 11]).is_none());
    }

    #[test]
    fn test_frame_reports_size() {
        let frame = Frame::from_raw(Size::new(3, 1), ChannelOrder::Rgb, vec![7; 9]).unwrap();
        assert_eq!(frame.size(), Size::new(3, 1));
        assert_eq!(frame.as_bytes().len(), 9);
    }
}
