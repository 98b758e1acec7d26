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

//! Error types for VDisplay

use crate::mode::DisplayMode;
use crate::types::DeviceId;

/// Result type alias for VDisplay operations
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Main error type for VDisplay
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Duplicate mode: {0}")]
    DuplicateMode(DisplayMode),

    #[error("Mode {mode} exceeds descriptor bounds {max_width}x{max_height}")]
    OutOfBounds {
        mode: DisplayMode,
        max_width: u32,
        max_height: u32,
    },

    #[error("Mode catalog is empty")]
    EmptyCatalog,

    #[error("Unknown device: {0}")]
    UnknownDevice(DeviceId),

    #[error("Device {0} is terminating or terminated")]
    DeviceGone(DeviceId),

    #[error("Mode not supported: {0}")]
    ModeNotSupported(DisplayMode),

    #[error("Unsupported HiDPI scale: {0}")]
    UnsupportedScale(u32),

    #[error("Registry is full ({limit} devices)")]
    RegistryFull { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
