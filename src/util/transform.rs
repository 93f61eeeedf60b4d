// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame preparation for display.
//!
//! Every decoded frame goes through the same fixed pipeline before it is
//! presented: optional linear resize to the target geometry, a quarter turn
//! counter-clockwise to correct the decoder's orientation, and conversion
//! to RGB channel order.

use crate::io::media::{ChannelOrder, Frame};
use crate::util::geometry::Size;
use image::imageops::{self, FilterType};

/// Resize (only when needed), rotate and reorder channels.
pub fn prepare_for_display(frame: Frame, target: Size) -> Frame {
    let Frame { order, mut image } = frame;

    if Size::new(image.width(), image.height()) != target {
        image = imageops::resize(&image, target.width, target.height, FilterType::Triangle);
    }

    let mut image = imageops::rotate270(&image);

    if order == ChannelOrder::Bgr {
        for pixel in image.pixels_mut() {
            pixel.0.swap(0, 2);
        }
    }

    Frame {
        order: ChannelOrder::Rgb,
        image,
    }
}
