// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry and frame helpers.

pub mod geometry;
pub mod transform;
