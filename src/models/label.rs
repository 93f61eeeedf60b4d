// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label data structures.
//!
//! This module defines the keys a labeler can press, the label values they
//! map to, and the fixed key-to-label table a run is configured with.

use crate::error::LabelMapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A key the label table can bind.
///
/// Serialized by name: `up`, `down`, `left`, `right`, `space`, `enter`,
/// a digit `0`-`9`, or a lowercase letter `a`-`z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Digit(u8),
    Letter(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Space => f.write_str("space"),
            Key::Enter => f.write_str("enter"),
            Key::Digit(d) => write!(f, "{}", d),
            Key::Letter(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
                    (Some(c), None) if c.is_ascii_lowercase() => Key::Letter(c),
                    _ => return Err(format!("unknown key name '{}'", s)),
                }
            }
        };
        Ok(key)
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// Value written for a labeled clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Int(i64),
    Tag(String),
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Int(v) => write!(f, "{}", v),
            LabelValue::Tag(tag) => f.write_str(tag),
        }
    }
}

/// One key binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: Key,
    pub label: LabelValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Binding {
    pub fn new(key: Key, label: LabelValue, description: Option<&str>) -> Self {
        Self {
            key,
            label,
            description: description.map(str::to_string),
        }
    }
}

/// Fixed table from key to label. Keys outside the table never commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelMap {
    bindings: Vec<Binding>,
}

/// On-disk shape of a label map, validated by converting into [`LabelMap`].
#[derive(Debug, Deserialize)]
pub struct LabelMapFile {
    pub bindings: Vec<Binding>,
}

impl TryFrom<LabelMapFile> for LabelMap {
    type Error = LabelMapError;

    fn try_from(file: LabelMapFile) -> Result<Self, Self::Error> {
        LabelMap::new(file.bindings)
    }
}

impl LabelMap {
    /// Build a table, rejecting empty tables and duplicate keys.
    pub fn new(bindings: Vec<Binding>) -> Result<Self, LabelMapError> {
        if bindings.is_empty() {
            return Err(LabelMapError::Empty);
        }
        for (i, binding) in bindings.iter().enumerate() {
            if bindings[..i].iter().any(|b| b.key == binding.key) {
                return Err(LabelMapError::DuplicateKey(binding.key));
            }
        }
        Ok(Self { bindings })
    }

    /// Left is a good case (1), right is a bad case (0).
    pub fn binary() -> Self {
        Self {
            bindings: vec![
                Binding::new(Key::Left, LabelValue::Int(1), Some("good case")),
                Binding::new(Key::Right, LabelValue::Int(0), Some("bad case")),
            ],
        }
    }

    /// One symbolic tag per arrow key.
    pub fn directional() -> Self {
        let tag = |s: &str| LabelValue::Tag(s.to_string());
        Self {
            bindings: vec![
                Binding::new(Key::Up, tag("Label_Up"), None),
                Binding::new(Key::Down, tag("Label_Down"), None),
                Binding::new(Key::Left, tag("Label_Left"), None),
                Binding::new(Key::Right, tag("Label_Right"), None),
            ],
        }
    }

    /// Label bound to `key`, if any.
    pub fn lookup(&self, key: Key) -> Option<&LabelValue> {
        self.bindings
            .iter()
            .find(|b| b.key == key)
            .map(|b| &b.label)
    }

    #[cfg(test)]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Human readable key legend, e.g. `left: 1 (good case), right: 0 (bad case)`.
    pub fn legend(&self) -> String {
        self.bindings
            .iter()
            .map(|b| match &b.description {
                Some(desc) => format!("{}: {} ({})", b.key, b.label, desc),
                None => format!("{}: {}", b.key, b.label),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
