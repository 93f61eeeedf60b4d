// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! OpenCV-backed clip decoding.

use super::media::{ChannelOrder, Frame, FrameSource, MediaBackend, ReadOutcome};
use crate::error::MediaError;
use crate::util::geometry::Size;
use opencv::{core::Mat, prelude::*, videoio};
use std::path::Path;

/// Opens clips with `cv::VideoCapture`.
pub struct OpenCvBackend;

impl MediaBackend for OpenCvBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
        let open_err = |reason: String| MediaError::Open {
            path: path.to_path_buf(),
            reason,
        };

        let path_str = path
            .to_str()
            .ok_or_else(|| open_err("path is not valid UTF-8".to_string()))?;
        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .map_err(|e| open_err(e.to_string()))?;
        if !capture.is_opened().map_err(|e| open_err(e.to_string()))? {
            return Err(open_err("unsupported container or codec".to_string()));
        }

        let property = |id: i32| capture.get(id).map_err(|e| open_err(e.to_string()));
        let frame_count = property(videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as u64;
        let width = property(videoio::CAP_PROP_FRAME_WIDTH)?.max(0.0) as u32;
        let height = property(videoio::CAP_PROP_FRAME_HEIGHT)?.max(0.0) as u32;
        let fps = property(videoio::CAP_PROP_FPS)?;

        log::debug!(
            "opened {} ({}x{}, {} frames, {:.2} fps)",
            path.display(),
            width,
            height,
            frame_count,
            fps
        );

        Ok(Box::new(OpenCvSource {
            capture,
            frame_count,
            size: Size::new(width, height),
            frame_rate: (fps.is_finite() && fps > 0.0).then_some(fps),
            position: 0,
            closed: false,
        }))
    }
}

struct OpenCvSource {
    capture: videoio::VideoCapture,
    frame_count: u64,
    size: Size,
    frame_rate: Option<f64>,
    position: u64,
    closed: bool,
}

impl OpenCvSource {
    fn read_err(&self, reason: impl ToString) -> MediaError {
        MediaError::Read {
            frame: self.position,
            reason: reason.to_string(),
        }
    }
}

impl FrameSource for OpenCvSource {
    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn native_size(&self) -> Size {
        self.size
    }

    fn frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    fn read_next(&mut self) -> Result<ReadOutcome, MediaError> {
        if self.closed {
            return Err(self.read_err("source already closed"));
        }

        let mut mat = Mat::default();
        let grabbed = self
            .capture
            .read(&mut mat)
            .map_err(|e| self.read_err(e))?;
        if !grabbed || mat.empty() {
            return Ok(ReadOutcome::EndOfStream);
        }

        // Decoded frames are packed BGR; copy out of OpenCV-owned memory
        let size = Size::new(mat.cols().max(0) as u32, mat.rows().max(0) as u32);
        let pixels = if mat.is_continuous() {
            mat.data_bytes().map_err(|e| self.read_err(e))?.to_vec()
        } else {
            mat.try_clone()
                .and_then(|m| m.data_bytes().map(<[u8]>::to_vec))
                .map_err(|e| self.read_err(e))?
        };
        let frame = Frame::from_raw(size, ChannelOrder::Bgr, pixels)
            .ok_or_else(|| self.read_err("unexpected pixel layout"))?;

        self.position += 1;
        Ok(ReadOutcome::Frame(frame))
    }

    fn rewind(&mut self) -> Result<(), MediaError> {
        self.capture
            .set(videoio::CAP_PROP_POS_FRAMES, 0.0)
            .map_err(|e| self.read_err(e))?;
        self.position = 0;
        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.capture.release() {
            log::warn!("failed to release video capture: {}", e);
        }
        self.closed = true;
    }
}

impl Drop for OpenCvSource {
    fn drop(&mut self) {
        self.close();
    }
}
