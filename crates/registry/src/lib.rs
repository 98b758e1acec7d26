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

//! # VDisplay Registry
//!
//! The mutable half of the virtual display manager: device lifecycle,
//! settings negotiation, and the compositor notification seam.

pub mod compositor;
pub mod config;
pub mod device;
pub mod negotiator;
pub mod registry;

pub use compositor::{CompositorLink, NullCompositor};
pub use config::{RegistryConfig, RegistryConfigFile};
pub use device::VirtualDevice;
pub use negotiator::SettingsNegotiator;
pub use registry::DeviceRegistry;
