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

//! Compositor notification seam

use anyhow::Result;
use tracing::debug;
use vdisplay_core::{DeviceId, DeviceSnapshot};

/// Host-side collaborator wired and unwired as devices change
///
/// The registry calls `settings_applied` after every committed apply and
/// `device_terminated` during teardown, in both cases with no internal lock
/// held. Errors are logged by the registry and never affect device state;
/// frame delivery is entirely the collaborator's concern.
pub trait CompositorLink: Send + Sync {
    fn settings_applied(&self, snapshot: &DeviceSnapshot) -> Result<()>;

    fn device_terminated(&self, id: DeviceId) -> Result<()>;
}

/// Compositor link that only logs
///
/// Used by tests and hosts that drive the registry without a real display
/// server behind it.
#[derive(Debug, Default)]
pub struct NullCompositor;

impl CompositorLink for NullCompositor {
    fn settings_applied(&self, snapshot: &DeviceSnapshot) -> Result<()> {
        debug!(
            "{}: settings applied ({} modes)",
            snapshot.id,
            snapshot
                .current_settings
                .as_ref()
                .map(|s| s.modes().len())
                .unwrap_or(0)
        );
        Ok(())
    }

    fn device_terminated(&self, id: DeviceId) -> Result<()> {
        debug!("{}: unwired from compositor", id);
        Ok(())
    }
}
