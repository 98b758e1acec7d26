// Copyright 2025 VDisplay Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Display modes and per-device mode catalogs

use crate::error::{DisplayError, DisplayResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (width, height, refresh rate) configuration a display can be driven at
///
/// Immutable once constructed; equality is by exact value of the triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMode {
    width: u32,
    height: u32,
    refresh_hz: f64,
}

impl DisplayMode {
    /// Create a mode, rejecting non-positive dimensions or refresh rate
    pub fn new(width: u32, height: u32, refresh_hz: f64) -> DisplayResult<Self> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidMode(format!(
                "mode dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if !(refresh_hz > 0.0) || !refresh_hz.is_finite() {
            return Err(DisplayError::InvalidMode(format!(
                "refresh rate must be a positive finite value, got {}",
                refresh_hz
            )));
        }
        Ok(DisplayMode {
            width,
            height,
            refresh_hz,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn refresh_hz(&self) -> f64 {
        self.refresh_hz
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{}Hz", self.width, self.height, self.refresh_hz)
    }
}

/// Ordered set of modes a device supports
///
/// Insertion order is preference order: the first mode added is the device's
/// preferred/default mode. Entries are unique by exact triple and bounded by
/// the owning descriptor's max pixel dimensions. Catalogs are append-only;
/// no removal is exposed, so settings in flight can never reference a mode
/// that silently disappeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeCatalog {
    modes: Vec<DisplayMode>,
    max_width: u32,
    max_height: u32,
}

impl ModeCatalog {
    /// Create an empty catalog bounded by the descriptor's max dimensions
    pub fn new(max_width: u32, max_height: u32) -> Self {
        ModeCatalog {
            modes: Vec::new(),
            max_width,
            max_height,
        }
    }

    /// Append a mode
    ///
    /// Fails with `DuplicateMode` if an identical triple is already present
    /// and with `OutOfBounds` if the mode exceeds the descriptor bounds.
    pub fn add(&mut self, mode: DisplayMode) -> DisplayResult<()> {
        if mode.width() > self.max_width || mode.height() > self.max_height {
            return Err(DisplayError::OutOfBounds {
                mode,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }
        if self.contains(&mode) {
            return Err(DisplayError::DuplicateMode(mode));
        }
        self.modes.push(mode);
        Ok(())
    }

    /// Exact-match membership test
    pub fn contains(&self, mode: &DisplayMode) -> bool {
        self.modes.iter().any(|m| m == mode)
    }

    /// The first-added (preferred) mode
    pub fn preferred(&self) -> DisplayResult<DisplayMode> {
        self.modes
            .first()
            .copied()
            .ok_or(DisplayError::EmptyCatalog)
    }

    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}
