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

//! # VDisplay Core
//!
//! Value types shared across the VDisplay workspace: display modes and
//! catalogs, settings bundles, registration descriptors, and the common
//! error enum.

pub mod descriptor;
pub mod error;
pub mod mode;
pub mod settings;
pub mod types;

pub use descriptor::{DisplayDescriptor, DisplayDescriptorBuilder};
pub use error::{DisplayError, DisplayResult};
pub use mode::{DisplayMode, ModeCatalog};
pub use settings::DisplaySettings;
pub use types::{DeliveryContext, DeviceId, DeviceSnapshot, LifecycleState, TerminationHandler};
