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

//! Display settings bundles

use crate::error::{DisplayError, DisplayResult};
use crate::mode::DisplayMode;
use serde::{Deserialize, Serialize};

/// A proposed device configuration: mode list plus HiDPI scale
///
/// Catalog membership of the modes is not checked here; the negotiator
/// re-checks it against the owning device's catalog at apply time, since the
/// catalog may have changed between proposal and commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    modes: Vec<DisplayMode>,
    hidpi: u32,
}

impl DisplaySettings {
    /// Create a settings bundle
    ///
    /// The mode list must be non-empty and the scale positive. Whether the
    /// scale is actually accepted is device policy, decided at apply time.
    pub fn new(modes: Vec<DisplayMode>, hidpi: u32) -> DisplayResult<Self> {
        if modes.is_empty() {
            return Err(DisplayError::InvalidSettings(
                "settings must list at least one mode".to_string(),
            ));
        }
        if hidpi == 0 {
            return Err(DisplayError::UnsupportedScale(0));
        }
        Ok(DisplaySettings { modes, hidpi })
    }

    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }

    /// Integer density multiplier (1 = standard, 2 = HiDPI double-density)
    pub fn hidpi(&self) -> u32 {
        self.hidpi
    }
}
