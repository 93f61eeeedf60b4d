// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: clips, labels and run configuration.

pub mod clip;
pub mod config;
pub mod label;
